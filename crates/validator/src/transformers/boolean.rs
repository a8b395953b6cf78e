use serde::Deserialize;

use super::{ReverseTransform, TransformScope};
use crate::foundation::TransformError;
use crate::value::FormValue;

/// Checkbox value → boolean.
///
/// Booleans pass through, the configured true value maps to `true`, any
/// falsy value to `false`; anything else is rejected. Without a true value
/// (unset or `null`) nothing maps to `true`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BooleanToString {
    /// The submitted value meaning "checked".
    pub true_value: Option<FormValue>,
}

impl ReverseTransform for BooleanToString {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        match value {
            FormValue::Bool(_) => Ok(value),
            _ if self.true_value.as_ref().is_some_and(|checked| value.strict_eq(checked)) => {
                Ok(FormValue::Bool(true))
            }
            _ if !value.is_truthy() => Ok(FormValue::Bool(false)),
            _ => Err(TransformError::WrongType),
        }
    }
}
