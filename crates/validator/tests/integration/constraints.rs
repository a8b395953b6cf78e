//! Constraint behaviour through the public `Constraint` entry point.

use formbridge_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::check;

// ============================================================================
// EMPTINESS: only NotBlank, NotNull and IsNull look at empty input
// ============================================================================

fn configured(kind: &str) -> Value {
    match kind {
        "EqualTo" | "NotEqualTo" | "IdenticalTo" | "NotIdenticalTo" | "GreaterThan"
        | "GreaterThanOrEqual" | "LessThan" | "LessThanOrEqual" => json!({ "value": 5 }),
        "Choice" => json!({ "choices": ["a", "b"] }),
        "Regex" => json!({ "pattern": "/^[0-9]+$/" }),
        "Type" => json!({ "type": "integer" }),
        "Length" | "Count" => json!({ "min": 2, "max": 4 }),
        "Range" => json!({ "min": 1, "max": 10 }),
        _ => json!({}),
    }
}

#[test]
fn empty_input_passes_everything_but_presence_checks() {
    for kind in Constraint::KINDS {
        let constraint = Constraint::from_kind(kind, configured(kind)).unwrap();
        for empty in [FormValue::Undefined, FormValue::Null, FormValue::from("")] {
            let errors = constraint.check(&empty).unwrap();
            match constraint.kind() {
                "NotBlank" => assert_eq!(errors, ["This value should not be blank."]),
                "NotNull" | "IsNull" => {}
                other => assert!(errors.is_empty(), "{other} rejected {empty:?}: {errors:?}"),
            }
        }
    }
}

#[test]
fn null_checks_distinguish_null_from_empty_string() {
    assert!(check("NotNull", json!({}), json!("")).is_empty());
    assert_eq!(check("NotNull", json!({}), Value::Null), ["This value should not be null."]);
    assert!(check("IsNull", json!({}), Value::Null).is_empty());
    assert_eq!(check("Null", json!({}), json!("x")), ["This value should be null."]);
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn comparison_messages_carry_the_compared_value() {
    assert_eq!(
        check("GreaterThan", json!({ "value": 5 }), json!(3)),
        ["This value should be greater than 5."]
    );
    assert!(check("GreaterThan", json!({ "value": 5 }), json!("12")).is_empty());
    assert_eq!(
        check("EqualTo", json!({ "value": "yes", "message": "Type {{ compared_value }}" }), json!("no")),
        ["Type yes"]
    );
}

#[test]
fn length_pluralizes_its_limit() {
    assert_eq!(
        check("Length", json!({ "min": 1, "max": 1 }), json!("ab")),
        ["This value should have exactly 1 character."]
    );
    assert_eq!(
        check("Length", json!({ "max": 3 }), json!("abcd")),
        ["This value is too long. It should have 3 characters or less."]
    );
}

#[test]
fn custom_messages_substitute_the_value() {
    assert_eq!(
        check("Email", json!({ "message": "{{ value }} is not an address" }), json!("nope")),
        ["nope is not an address"]
    );
}

// ============================================================================
// CHOICE AND RANGE
// ============================================================================

#[test]
fn choice_reports_invalid_entries() {
    let options = json!({ "choices": ["red", "green"], "multiple": true, "max": 2 });
    assert!(check("Choice", options.clone(), json!(["red"])).is_empty());
    assert_eq!(
        check("Choice", options.clone(), json!(["red", "blue"])),
        ["One or more of the given values is invalid."]
    );
    assert_eq!(
        check("Choice", options, json!(["red", "green", "red"])),
        ["You must select at most 2 choices."]
    );
}

#[test]
fn range_reports_unparsable_values_and_bounds() {
    let options = json!({ "min": 1, "max": 10 });
    assert_eq!(check("Range", options.clone(), json!("ten")), ["This value should be a valid number."]);
    assert_eq!(check("Range", options.clone(), json!(11)), ["This value should be 10 or less."]);
    assert!(check("Range", options, json!("7")).is_empty());
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[test]
fn construction_rejects_bad_options() {
    assert!(matches!(
        Constraint::from_kind("Type", json!({ "type": "quaternion" })),
        Err(ConfigError::UnknownType { .. })
    ));
    assert!(matches!(
        Constraint::from_kind("Regex", json!({ "pattern": "/(/" })),
        Err(ConfigError::MalformedPattern { .. })
    ));
    assert!(matches!(
        Constraint::from_kind("Luhn", json!({})),
        Err(ConfigError::UnknownConstraint { .. })
    ));
}

// ============================================================================
// DOCUMENTED PROPERTIES
// ============================================================================

#[test]
fn exact_size_reports_only_the_exact_message() {
    let options = json!({ "min": 5, "max": 5 });
    assert!(check("Length", options.clone(), json!("abcde")).is_empty());
    for value in ["abcd", "abcdef"] {
        assert_eq!(
            check("Length", options.clone(), json!(value)),
            ["This value should have exactly 5 characters."]
        );
    }
    assert_eq!(
        check("Count", options, json!([1, 2, 3, 4])),
        ["This collection should contain exactly 5 elements."]
    );
}

#[test]
fn single_choice_uses_the_singular_message() {
    let options = json!({ "choices": ["a", "b"] });
    assert_eq!(
        check("Choice", options.clone(), json!("c")),
        ["The value you selected is not a valid choice."]
    );
    assert!(check("Choice", options, json!("a")).is_empty());
}

#[test]
fn multiple_choice_below_min_reports_only_the_count() {
    let options = json!({ "choices": ["a", "b"], "multiple": true, "min": 2 });
    assert_eq!(
        check("Choice", options, json!(["a"])),
        ["You must select at least 2 choices."]
    );
}

#[test]
fn equality_is_loose_and_identity_is_strict() {
    let five = json!({ "value": 5 });
    assert!(check("EqualTo", five.clone(), json!(5)).is_empty());
    assert!(check("EqualTo", five.clone(), json!("5")).is_empty());
    assert!(check("IdenticalTo", five.clone(), json!(5)).is_empty());
    assert_eq!(check("IdenticalTo", five, json!("5")).len(), 1);
}

#[test]
fn unknown_type_fails_before_seeing_any_value() {
    let error = Constraint::from_kind("Type", json!({ "type": "quaternion" })).unwrap_err();
    assert_eq!(
        error.to_string(),
        "the wrong \"quaternion\" type was passed to the Type constraint"
    );
}

#[test]
fn not_blank_end_to_end() {
    assert_eq!(check("NotBlank", json!({ "message": "Required" }), json!("")), ["Required"]);
    assert!(check("NotBlank", json!({ "message": "Required" }), json!("x")).is_empty());
}
