//! Callback constraint.

use serde::Deserialize;

use crate::foundation::{ConfigError, ConstraintError, Configure, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CallbackOptions {
    callback: FormValue,
    methods: Vec<FormValue>,
}

/// Invokes named callbacks against the element.
///
/// Callbacks report their own errors through the UI; the constraint itself
/// never returns messages. A name that cannot be resolved is a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    /// Callback names, invoked in order.
    pub names: Vec<String>,
}

impl Configure for Callback {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: CallbackOptions = decode("Callback", options)?;
        let names = if raw.methods.is_empty() {
            vec![raw.callback]
        } else {
            raw.methods
        };
        Ok(Self {
            names: names
                .into_iter()
                .filter(|name| !name.is_blank())
                .map(|name| name.to_string())
                .collect(),
        })
    }
}

impl Validate for Callback {
    fn validate(
        &self,
        _value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        let element = scope.element();
        for name in &self.names {
            let callback = scope
                .callback(name)
                .ok_or_else(|| ConstraintError::MissingCallback {
                    callback: name.clone(),
                    element_id: element.id().to_owned(),
                    purpose: "validate the Callback constraint",
                })?;
            callback(element);
        }
        Ok(Vec::new())
    }
}
