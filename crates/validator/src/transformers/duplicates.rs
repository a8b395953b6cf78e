use serde::Deserialize;

use super::{ReverseTransform, TransformScope};
use crate::display::ErrorUpdate;
use crate::foundation::TransformError;
use crate::value::FormValue;

const FALLBACK_MESSAGE: &str = "The values do not match.";

/// Repeated inputs (password + confirmation) → their common value.
///
/// Returns the first entry. Whether the entries agree is shown on the child
/// named by the first key, under its own source id, so a later agreement
/// clears the mismatch message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValueToDuplicates {
    /// Child field names, the first one receiving the mismatch message.
    pub keys: Vec<String>,
}

impl ReverseTransform for ValueToDuplicates {
    fn reverse_transform(
        &self,
        value: FormValue,
        scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        let Some(entries) = value.entries() else {
            return Ok(value);
        };
        let first = entries
            .first()
            .map(|(_, entry)| (*entry).clone())
            .unwrap_or_default();
        let agree = entries.iter().all(|(_, entry)| entry.strict_eq(&first));

        let element = scope.element();
        if let Some(child) = self.keys.first().and_then(|key| element.child(key)) {
            let errors = if agree {
                Vec::new()
            } else {
                vec![
                    element
                        .invalid_message()
                        .unwrap_or(FALLBACK_MESSAGE)
                        .to_owned(),
                ]
            };
            scope.publish(ErrorUpdate::new(
                child.id(),
                format!("value-to-duplicates-{}", child.id()),
                errors,
            ));
        }
        Ok(first)
    }
}
