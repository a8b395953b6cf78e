//! Presence and boolean constraints.

use crate::macros::message_constraint;
use crate::value::FormValue;

message_constraint! {
    /// Fires when the value is not empty.
    pub Blank = "This value should be blank.";
    violated(value) { !value.is_blank() }
}

message_constraint! {
    /// Fires when the value is empty.
    pub NotBlank = "This value should not be blank.";
    violated(value) { value.is_blank() }
}

message_constraint! {
    /// Fires on an explicit `null` only.
    pub NotNull = "This value should not be null.";
    violated(value) { matches!(value, FormValue::Null) }
}

message_constraint! {
    /// Fires on anything but `null`.
    pub IsNull = "This value should be null.";
    violated(value) { !matches!(value, FormValue::Null) }
}

message_constraint! {
    /// Fires on anything but boolean `true`.
    pub IsTrue = "This value should be true.";
    skip_blank;
    violated(value) { !matches!(value, FormValue::Bool(true)) }
}

message_constraint! {
    /// Fires on anything but boolean `false`.
    pub IsFalse = "This value should be false.";
    skip_blank;
    violated(value) { !matches!(value, FormValue::Bool(false)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::testing::run;
    use serde_json::json;

    #[test]
    fn not_blank_fires_on_empty_only() {
        let rule = NotBlank::default();
        assert_eq!(run(&rule, json!("")), ["This value should not be blank."]);
        assert_eq!(run(&rule, json!(null)).len(), 1);
        assert!(run(&rule, json!("x")).is_empty());
        assert!(run(&rule, json!(0)).is_empty());
    }

    #[test]
    fn blank_is_the_inverse() {
        let rule = Blank::default();
        assert!(run(&rule, json!("")).is_empty());
        assert_eq!(run(&rule, json!("x")).len(), 1);
    }

    #[test]
    fn null_checks_distinguish_null() {
        assert_eq!(run(&NotNull::default(), json!(null)).len(), 1);
        assert!(run(&NotNull::default(), json!("")).is_empty());
        assert!(run(&IsNull::default(), json!(null)).is_empty());
        assert_eq!(run(&IsNull::default(), json!("")).len(), 1);
    }

    #[test]
    fn boolean_checks_want_real_booleans() {
        assert!(run(&IsTrue::default(), json!(true)).is_empty());
        assert_eq!(run(&IsTrue::default(), json!("1")).len(), 1);
        assert!(run(&IsTrue::default(), json!("")).is_empty());
        assert!(run(&IsFalse::default(), json!(false)).is_empty());
        assert_eq!(run(&IsFalse::default(), json!(0)).len(), 1);
    }

    #[test]
    fn value_placeholder_is_substituted() {
        let rule = IsTrue {
            message: "{{ value }} is not true".into(),
        };
        assert_eq!(run(&rule, json!("no")), ["no is not true"]);
    }
}
