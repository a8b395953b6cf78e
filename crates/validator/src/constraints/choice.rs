//! Choice constraint.

use serde::Deserialize;

use crate::config::flag;
use crate::foundation::message::{VALUE, prepare};
use crate::foundation::{ConfigError, ConstraintError, Configure, Message, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChoiceOptions {
    choices: FormValue,
    callback: Option<String>,
    #[serde(deserialize_with = "flag")]
    multiple: bool,
    #[serde(deserialize_with = "flag")]
    strict: bool,
    min: FormValue,
    max: FormValue,
    message: String,
    multiple_message: String,
    min_message: String,
    max_message: String,
}

impl Default for ChoiceOptions {
    fn default() -> Self {
        Self {
            choices: FormValue::Null,
            callback: None,
            multiple: false,
            strict: false,
            min: FormValue::Null,
            max: FormValue::Null,
            message: "The value you selected is not a valid choice.".to_owned(),
            multiple_message: "One or more of the given values is invalid.".to_owned(),
            min_message: "You must select at least {{ limit }} choice.|You must select at least {{ limit }} choices.".to_owned(),
            max_message: "You must select at most {{ limit }} choice.|You must select at most {{ limit }} choices.".to_owned(),
        }
    }
}

/// Membership in a static or callback-provided choice set.
///
/// A scalar candidate is treated as a one-entry list. Invalid entries are
/// reported from last to first.
#[derive(Debug, Clone)]
pub struct Choice {
    /// Static choices.
    pub choices: Vec<FormValue>,
    /// Callback providing the choices; `null` from it falls back to the
    /// static list.
    pub callback: Option<String>,
    /// Several entries may be selected.
    pub multiple: bool,
    /// Strict detection mode.
    ///
    /// An entry is flagged when it differs from *any* choice, so with more
    /// than one choice every entry is flagged.
    pub strict: bool,
    /// Minimum selections in multiple mode.
    pub min: Option<i64>,
    /// Maximum selections in multiple mode.
    pub max: Option<i64>,
    message: String,
    multiple_message: String,
    min_message: String,
    max_message: String,
}

impl Configure for Choice {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: ChoiceOptions = decode("Choice", options)?;
        let (min, max) = (raw.min.parse_int(), raw.max.parse_int());
        Ok(Self {
            choices: into_list(raw.choices),
            callback: raw.callback.filter(|name| !name.is_empty()),
            multiple: raw.multiple,
            strict: raw.strict,
            min,
            max,
            message: raw.message,
            multiple_message: raw.multiple_message,
            min_message: prepare(&raw.min_message, min),
            max_message: prepare(&raw.max_message, max),
        })
    }
}

impl Choice {
    fn available(&self, scope: &Scope<'_>) -> Result<Vec<FormValue>, ConstraintError> {
        let Some(name) = &self.callback else {
            return Ok(self.choices.clone());
        };
        let callback = scope
            .callback(name)
            .ok_or_else(|| ConstraintError::MissingCallback {
                callback: name.clone(),
                element_id: scope.element().id().to_owned(),
                purpose: "receive choices for the Choice constraint",
            })?;
        match callback(scope.element()) {
            FormValue::Null | FormValue::Undefined => Ok(self.choices.clone()),
            provided => Ok(into_list(provided)),
        }
    }

    fn is_invalid(&self, entry: &FormValue, choices: &[FormValue]) -> bool {
        if self.strict {
            choices.iter().any(|choice| !entry.strict_eq(choice))
        } else {
            !choices.iter().any(|choice| entry.strict_eq(choice))
        }
    }
}

impl Validate for Choice {
    fn validate(
        &self,
        value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() {
            return Ok(Vec::new());
        }
        let entries = selected(value);
        let choices = self.available(scope)?;
        let invalid: Vec<&FormValue> = entries
            .iter()
            .filter(|entry| self.is_invalid(entry, &choices))
            .collect();

        let template = if self.multiple {
            &self.multiple_message
        } else {
            &self.message
        };
        let mut errors: Vec<String> = invalid
            .iter()
            .rev()
            .map(|entry| Message::new(template).with(VALUE, entry).finish())
            .collect();

        if self.multiple {
            let count = entries.len() as i64;
            if self.min.is_some_and(|min| count < min) {
                errors.push(self.min_message.clone());
            }
            if self.max.is_some_and(|max| count > max) {
                errors.push(self.max_message.clone());
            }
        }
        Ok(errors)
    }
}

/// The submitted entries. Only a list holds several; a map is one entry.
fn selected(value: &FormValue) -> Vec<FormValue> {
    match value {
        FormValue::List(items) => items.clone(),
        single => vec![single.clone()],
    }
}

/// Available choices. A map offers its values.
fn into_list(value: FormValue) -> Vec<FormValue> {
    match value {
        FormValue::Undefined | FormValue::Null => Vec::new(),
        FormValue::List(items) => items,
        FormValue::Map(entries) => entries.into_values().collect(),
        scalar => vec![scalar],
    }
}
