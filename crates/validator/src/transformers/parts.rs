use indexmap::IndexMap;
use serde::Deserialize;

use super::{ReverseTransform, TransformScope};
use crate::foundation::TransformError;
use crate::value::FormValue;

/// Grouped parts → flat map.
///
/// `part_mapping` names, for each part, the original keys it holds. Keys
/// present under their part are copied to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrayToParts {
    /// Part name → original keys.
    pub part_mapping: IndexMap<String, Vec<String>>,
}

impl ReverseTransform for ArrayToParts {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        if !value.is_collection() && value != FormValue::Null {
            return Err(TransformError::ExpectedObject);
        }
        let mut result = IndexMap::new();
        for (part, keys) in &self.part_mapping {
            let Some(group) = value.get(part).filter(|group| **group != FormValue::Undefined) else {
                continue;
            };
            for key in keys.iter().rev() {
                if let Some(found) = group.get(key).filter(|found| **found != FormValue::Undefined) {
                    result.insert(key.clone(), found.clone());
                }
            }
        }
        Ok(FormValue::Map(result))
    }
}
