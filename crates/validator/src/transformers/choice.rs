use serde::Deserialize;

use super::{ChoiceList, ReverseTransform, TransformScope};
use crate::config::flag;
use crate::foundation::TransformError;
use crate::value::FormValue;

fn selections(value: &FormValue) -> Result<Vec<(String, &FormValue)>, TransformError> {
    match value {
        FormValue::Null => Ok(Vec::new()),
        _ => value
            .entries()
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|(key, entry)| (key.into_owned(), entry))
                    .collect()
            })
            .ok_or(TransformError::UnexpectedType),
    }
}

/// Checkbox map → the value of the first checked choice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoiceToBooleanArray {
    /// Choice label → choice value.
    pub choice_list: ChoiceList,
    /// Whether a `placeholder` entry may be checked.
    #[serde(deserialize_with = "flag")]
    pub placeholder_present: bool,
}

impl ReverseTransform for ChoiceToBooleanArray {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        for (key, checked) in selections(&value)? {
            if !checked.is_truthy() {
                continue;
            }
            return match self.choice_list.get(&key) {
                Some(choice) if choice.is_empty_string() => Ok(FormValue::Null),
                Some(choice) => Ok(choice.clone()),
                None if self.placeholder_present && key == "placeholder" => Ok(FormValue::Null),
                None => Err(TransformError::UnknownChoice(key)),
            };
        }
        Ok(FormValue::Null)
    }
}

/// Checkbox map → the values of every checked choice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoicesToBooleanArray {
    /// Choice label → choice value.
    pub choice_list: ChoiceList,
}

impl ReverseTransform for ChoicesToBooleanArray {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        let mut chosen = Vec::new();
        let mut unknown = Vec::new();
        for (key, checked) in selections(&value)? {
            if !checked.is_truthy() {
                continue;
            }
            match self.choice_list.get(&key) {
                Some(choice) => chosen.push(choice.clone()),
                None => unknown.push(key),
            }
        }
        if unknown.is_empty() {
            Ok(FormValue::List(chosen))
        } else {
            Err(TransformError::UnknownChoices(unknown))
        }
    }
}

/// Drops empty-string entries from a list; other values pass through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropEmptyChoices;

impl ReverseTransform for DropEmptyChoices {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        Ok(match value {
            FormValue::List(items) => {
                FormValue::List(items.into_iter().filter(|item| !item.is_empty_string()).collect())
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformers::{apply, from_options};
    use serde_json::json;

    fn single(placeholder: bool) -> ChoiceToBooleanArray {
        from_options(json!({
            "choiceList": { "red": "r", "none": "" },
            "placeholderPresent": placeholder
        }))
    }

    #[test]
    fn first_checked_choice_wins() {
        let transformer = single(false);
        assert_eq!(
            apply(&transformer, json!({ "red": true, "none": true })),
            Ok(FormValue::from("r"))
        );
        assert_eq!(apply(&transformer, json!({ "none": "1" })), Ok(FormValue::Null));
        assert_eq!(apply(&transformer, json!({ "red": false })), Ok(FormValue::Null));
    }

    #[test]
    fn placeholder_and_unknown_choices() {
        assert_eq!(apply(&single(true), json!({ "placeholder": true })), Ok(FormValue::Null));
        assert_eq!(
            apply(&single(false), json!({ "placeholder": true })),
            Err(TransformError::UnknownChoice("placeholder".into()))
        );
        assert_eq!(apply(&single(false), json!("red")), Err(TransformError::UnexpectedType));
    }

    #[test]
    fn unknown_labels_reported_together() {
        let transformer: ChoicesToBooleanArray =
            from_options(json!({ "choiceList": { "a": 1 } }));
        assert_eq!(
            apply(&transformer, json!({ "a": true, "x": true, "y": 1 })),
            Err(TransformError::UnknownChoices(vec!["x".into(), "y".into()]))
        );
        assert_eq!(
            apply(&transformer, json!({ "a": true, "x": false })),
            Ok(FormValue::from(json!([1])))
        );
    }

    #[test]
    fn empty_entries_are_dropped() {
        assert_eq!(
            apply(&DropEmptyChoices, json!(["a", "", "b", ""])),
            Ok(FormValue::from(json!(["a", "b"])))
        );
        assert_eq!(apply(&DropEmptyChoices, json!("a")), Ok(FormValue::from("a")));
    }
}
