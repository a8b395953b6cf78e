//! Range constraint.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::foundation::message::{LIMIT, VALUE};
use crate::foundation::{ConfigError, ConstraintError, Configure, Message, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RangeOptions {
    min: FormValue,
    max: FormValue,
    min_message: String,
    max_message: String,
    invalid_message: String,
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self {
            min: FormValue::Null,
            max: FormValue::Null,
            min_message: "This value should be {{ limit }} or more.".to_owned(),
            max_message: "This value should be {{ limit }} or less.".to_owned(),
            invalid_message: "This value should be a valid number.".to_owned(),
        }
    }
}

/// Numeric bounds.
///
/// The non-numeric check and the bound checks are independent: a value
/// that is not a number still goes through the bound comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Lower bound, inclusive.
    pub min: Option<i64>,
    /// Upper bound, inclusive.
    pub max: Option<i64>,
    /// Message for values below `min`.
    pub min_message: String,
    /// Message for values above `max`.
    pub max_message: String,
    /// Message for non-numeric values.
    pub invalid_message: String,
}

impl Configure for Range {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: RangeOptions = decode("Range", options)?;
        Ok(Self {
            min: raw.min.parse_int(),
            max: raw.max.parse_int(),
            min_message: raw.min_message,
            max_message: raw.max_message,
            invalid_message: raw.invalid_message,
        })
    }
}

impl Validate for Range {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() {
            return Ok(Vec::new());
        }

        let mut errors = Vec::new();
        if value.is_nan() {
            errors.push(Message::new(&self.invalid_message).with(VALUE, value).finish());
        }
        let beyond = |limit: Option<i64>, side: Ordering| {
            limit.filter(|limit| value.compare(&FormValue::from(*limit)) == Some(side))
        };
        if let Some(max) = beyond(self.max, Ordering::Greater) {
            errors.push(
                Message::new(&self.max_message)
                    .with(VALUE, value)
                    .with(LIMIT, max)
                    .finish(),
            );
        }
        if let Some(min) = beyond(self.min, Ordering::Less) {
            errors.push(
                Message::new(&self.min_message)
                    .with(VALUE, value)
                    .with(LIMIT, min)
                    .finish(),
            );
        }
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::testing::{build, run};
    use serde_json::json;

    fn range() -> Range {
        build(Range::from_options, json!({ "min": 1, "max": 10 }))
    }

    #[test]
    fn in_range_passes() {
        assert!(run(&range(), json!(5)).is_empty());
        assert!(run(&range(), json!("10")).is_empty());
    }

    #[test]
    fn bounds_report_their_limit() {
        assert_eq!(run(&range(), json!(20)), ["This value should be 10 or less."]);
        assert_eq!(run(&range(), json!(0)), ["This value should be 1 or more."]);
    }

    #[test]
    fn non_numeric_reports_invalid() {
        assert_eq!(run(&range(), json!("abc")), ["This value should be a valid number."]);
    }

    #[test]
    fn empty_is_skipped() {
        assert!(run(&range(), json!("")).is_empty());
        assert!(run(&range(), json!(null)).is_empty());
    }

    // The invalid check does not stop the bound checks. A NaN never
    // orders against a bound, so in practice only one of them fires.
    #[test]
    fn invalid_check_does_not_stop_bound_checks() {
        let rule: Range = build(Range::from_options, json!({ "min": 1, "max": "10" }));
        assert_eq!(run(&rule, json!([20])), ["This value should be 10 or less."]);
        assert_eq!(run(&rule, json!("1e3")), ["This value should be 10 or less."]);
        assert_eq!(run(&rule, json!("x")), ["This value should be a valid number."]);
    }
}
