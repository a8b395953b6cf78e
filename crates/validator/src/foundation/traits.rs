//! Core traits for the validation system

use serde::de::DeserializeOwned;

use crate::foundation::{ConfigError, ConstraintError, Scope};
use crate::value::FormValue;

/// Raw option bag attached to a constraint or transformer.
pub type Options = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// VALIDATE
// ============================================================================

/// The trait every constraint implements.
///
/// `validate` returns the violation messages for `value`, empty when it
/// passes. An `Err` signals a configuration fault (a callback that cannot be
/// resolved, a payload that cannot be encoded), never a failed rule.
///
/// Constraints that need the server do not report through the return value;
/// they queue a check on [`Scope::remote`] and return an empty list.
pub trait Validate {
    /// Validates `value` in the context of `scope`.
    fn validate(
        &self,
        value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError>;
}

// ============================================================================
// CONFIGURE
// ============================================================================

/// Where a constraint instance sits: its owning element and its index in
/// that element's constraint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    /// Id of the element the constraint is attached to.
    pub element_id: &'a str,
    /// Zero-based position in the element's constraint list.
    pub position: usize,
}

impl<'a> Site<'a> {
    /// Creates a site.
    pub const fn new(element_id: &'a str, position: usize) -> Self {
        Self {
            element_id,
            position,
        }
    }
}

/// Construction from a configuration option bag.
///
/// Unknown options are ignored. Options the kind cannot interpret (a regex
/// that does not compile, an unknown type name) fail here, at construction,
/// rather than on every validation pass.
pub trait Configure: Sized {
    /// Builds the instance from its options.
    fn from_options(options: &Options, site: &Site<'_>) -> Result<Self, ConfigError>;
}

/// Deserializes an option bag into a typed options struct.
pub fn decode<T: DeserializeOwned>(kind: &str, options: &Options) -> Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::Object(options.clone())).map_err(|source| {
        ConfigError::InvalidOptions {
            kind: kind.to_owned(),
            source,
        }
    })
}
