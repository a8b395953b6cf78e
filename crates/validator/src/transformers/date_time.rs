use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use super::{ReverseTransform, TransformScope};
use crate::foundation::TransformError;
use crate::value::FormValue;

static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([0-9]+)\}").expect("valid slot regex"));

/// Date and time parts → `date time` string.
///
/// The date segment is emitted when any of year, month or day is positive,
/// the time segment when any of hour, minute or second is set. Missing parts
/// and zero parts default to `1970-01-01` and `00:00:00`; positive ones are
/// zero-padded to two digits (the year is kept as is).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeToArray {
    /// Date layout; `{0}`, `{1}`, `{2}` are year, month, day.
    pub date_format: String,
    /// Time layout; `{0}`, `{1}`, `{2}` are hour, minute, second.
    pub time_format: String,
}

impl Default for DateTimeToArray {
    fn default() -> Self {
        Self {
            date_format: "{0}-{1}-{2}".to_owned(),
            time_format: "{0}:{1}:{2}".to_owned(),
        }
    }
}

impl ReverseTransform for DateTimeToArray {
    fn reverse_transform(
        &self,
        value: FormValue,
        _scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        let part = |key: &str| value.get(key).cloned().unwrap_or_default();
        let (year, month, day) = (part("year"), part("month"), part("day"));
        let (hour, minute, second) = (part("hour"), part("minute"), part("second"));

        let mut segments = Vec::with_capacity(2);
        if [&year, &month, &day].into_iter().any(is_positive) {
            segments.push(fill(
                &self.date_format,
                &[
                    or_default(&year, |v| v.to_string(), "1970"),
                    or_default(&month, two_digits, "01"),
                    or_default(&day, two_digits, "01"),
                ],
            ));
        }
        if [&hour, &minute, &second].into_iter().any(FormValue::is_truthy) {
            segments.push(fill(
                &self.time_format,
                &[
                    or_default(&hour, two_digits, "00"),
                    or_default(&minute, two_digits, "00"),
                    or_default(&second, two_digits, "00"),
                ],
            ));
        }
        Ok(FormValue::String(segments.join(" ")))
    }
}

fn is_positive(value: &FormValue) -> bool {
    value.compare(&FormValue::Number(0.0)) == Some(std::cmp::Ordering::Greater)
}

fn or_default(value: &FormValue, render: impl Fn(&FormValue) -> String, fallback: &str) -> String {
    if is_positive(value) {
        render(value)
    } else {
        fallback.to_owned()
    }
}

fn two_digits(value: &FormValue) -> String {
    let padded = format!("0{value}");
    let start = padded.char_indices().rev().nth(1).map_or(0, |(i, _)| i);
    padded[start..].to_owned()
}

fn fill(format: &str, parts: &[String]) -> String {
    SLOT.replace_all(format, |captures: &Captures<'_>| {
        captures[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| parts.get(index))
            .map_or_else(|| captures[0].to_owned(), Clone::clone)
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformers::{apply, from_options};
    use serde_json::json;

    fn transform(value: serde_json::Value) -> FormValue {
        apply(&DateTimeToArray::default(), value).unwrap()
    }

    #[test]
    fn pads_date_and_time() {
        let value = transform(json!({
            "year": "2024", "month": "3", "day": "7",
            "hour": "9", "minute": "5", "second": "0"
        }));
        assert_eq!(value, FormValue::from("2024-03-07 09:05:00"));
    }

    #[test]
    fn omits_absent_segments() {
        assert_eq!(transform(json!({ "year": 2024, "month": 12, "day": 31 })), FormValue::from("2024-12-31"));
        assert_eq!(transform(json!({ "hour": 23, "minute": 59 })), FormValue::from("23:59:00"));
        assert_eq!(transform(json!({})), FormValue::from(""));
    }

    #[test]
    fn missing_date_parts_use_epoch_defaults() {
        assert_eq!(transform(json!({ "month": 2 })), FormValue::from("1970-02-01"));
    }

    #[test]
    fn custom_layouts() {
        let transformer: DateTimeToArray =
            from_options(json!({ "dateFormat": "{2}.{1}.{0}", "timeFormat": "{0}h{1}{3}" }));
        let value = apply(&transformer, json!({ "year": 2024, "month": 1, "day": 2, "hour": 8 })).unwrap();
        assert_eq!(value, FormValue::from("02.01.2024 08h00{3}"));
    }
}
