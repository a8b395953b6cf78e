//! Property-based tests.

use formbridge_validator::prelude::*;
use proptest::prelude::*;
use serde_json::json;

use crate::check;

// ============================================================================
// IDEMPOTENCY: check(x) == check(x)
// ============================================================================

proptest! {
    #[test]
    fn email_is_idempotent(s in ".{0,40}") {
        let first = check("Email", json!({}), json!(s));
        let second = check("Email", json!({}), json!(s));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn regex_is_idempotent(s in ".{0,20}") {
        let options = json!({ "pattern": "/^[a-z]+$/i" });
        prop_assert_eq!(
            check("Regex", options.clone(), json!(s)),
            check("Regex", options, json!(s))
        );
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

proptest! {
    #[test]
    fn length_passes_exactly_inside_its_bounds(s in "[a-z]{1,12}") {
        let errors = check("Length", json!({ "min": 3, "max": 8 }), json!(s));
        prop_assert_eq!(errors.is_empty(), (3..=8).contains(&s.len()));
    }

    #[test]
    fn range_agrees_with_numeric_ordering(n in -1000i64..1000) {
        let errors = check("Range", json!({ "min": -10, "max": 10 }), json!(n));
        prop_assert_eq!(errors.is_empty(), (-10..=10).contains(&n));
    }

    #[test]
    fn numeric_strings_compare_like_numbers(n in -1000i64..1000) {
        let as_number = check("GreaterThan", json!({ "value": 0 }), json!(n));
        let as_string = check("GreaterThan", json!({ "value": 0 }), json!(n.to_string()));
        prop_assert_eq!(as_number.is_empty(), as_string.is_empty());
    }

    #[test]
    fn at_most_one_length_message(s in ".{0,20}") {
        let errors = check("Length", json!({ "min": 2, "max": 5 }), json!(s));
        prop_assert!(errors.len() <= 1, "got {:?}", errors);
    }
}

// ============================================================================
// VALUE MODEL
// ============================================================================

proptest! {
    #[test]
    fn loose_equality_is_symmetric(a in any::<i32>(), b in "-?[0-9]{1,6}") {
        let left = FormValue::from(a);
        let right = FormValue::from(b.as_str());
        prop_assert_eq!(left.loose_eq(&right), right.loose_eq(&left));
    }

    #[test]
    fn blank_values_are_never_truthy(choice in 0usize..3) {
        let value = [FormValue::Undefined, FormValue::Null, FormValue::from("")][choice].clone();
        prop_assert!(value.is_blank());
        prop_assert!(!value.is_truthy());
    }
}
