//! Whole-form passes: trees, transformers, callbacks and rendering.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formbridge_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::validator;

fn birthday() -> serde_json::Value {
    json!({
        "born": {
            "children": { "year": "born_year", "month": "born_month", "day": "born_day" },
            "transformers": [{ "kind": "DateTimeToArray" }],
            "constraints": [{ "kind": "Date", "message": "{{ value }} is not a date" }]
        }
    })
}

#[test]
fn composite_value_is_validated_after_transforming() {
    let form = MemoryForm::new()
        .with_value("born_year", "2024")
        .with_value("born_month", "3")
        .with_value("born_day", "7");
    let mut validator = validator("born", birthday(), &form, Arc::new(NoTransport));
    assert!(validator.validate(Trigger::Submit).is_valid());

    form.set("born_year", "24");
    let report = validator.validate(Trigger::Submit);
    assert_eq!(report.errors_for("born"), ["24-03-07 is not a date"]);
    assert_eq!(form.field("born").rendered(), ["24-03-07 is not a date"]);
}

#[test]
fn repeated_fields_flag_the_first_child() {
    let config = json!({
        "password": {
            "children": { "first": "password_first", "second": "password_second" },
            "transformers": [{ "kind": "ValueToDuplicates", "keys": ["first", "second"] }],
            "invalid_message": "Passwords differ",
            "constraints": [{ "kind": "Length", "min": 8 }]
        }
    });
    let form = MemoryForm::new()
        .with_value("password_first", "correct horse")
        .with_value("password_second", "correct hose");
    let mut validator = validator("password", config, &form, Arc::new(NoTransport));

    let report = validator.validate(Trigger::Submit);
    assert!(report.is_valid());
    assert_eq!(form.field("password_first").rendered(), ["Passwords differ"]);

    form.set("password_second", "correct horse");
    validator.validate(Trigger::Submit);
    assert!(form.field("password_first").rendered().is_empty());
    assert!(validator.element("password_first").unwrap().board().is_empty());
}

#[test]
fn untransformable_value_reports_invalid_message_and_skips_constraints() {
    let config = json!({
        "terms": {
            "transformers": [{ "kind": "BooleanToString", "trueValue": "1" }],
            "constraints": [{ "kind": "IsTrue", "message": "Accept the terms" }],
            "invalid_message": "Unreadable checkbox"
        }
    });
    let form = MemoryForm::new().with_value("terms", "maybe");
    let mut validator = validator("terms", config, &form, Arc::new(NoTransport));

    let report = validator.validate(Trigger::Submit);
    assert_eq!(report.errors_for("terms"), ["Unreadable checkbox"]);
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].element_id, "terms");
    assert!(matches!(
        report.faults[0].error,
        FaultError::Transform(TransformError::WrongType)
    ));

    form.set("terms", "1");
    assert!(validator.validate(Trigger::Submit).is_valid());
    form.set("terms", false);
    assert_eq!(validator.validate(Trigger::Submit).errors_for("terms"), ["Accept the terms"]);
}

#[test]
fn callbacks_are_resolved_per_element() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let mut registry = CallbackRegistry::new();
    registry
        .register("colors", |_: &FormElement| FormValue::List(vec!["red".into(), "blue".into()]))
        .register_for("other", "colors", |_: &FormElement| FormValue::Null)
        .register("audit", move |_: &FormElement| {
            seen.fetch_add(1, Ordering::SeqCst);
            FormValue::Undefined
        });

    let config = json!({
        "color": {
            "constraints": [
                { "kind": "Choice", "callback": "colors", "message": "{{ value }} is not offered" },
                { "kind": "Callback", "callback": "audit" }
            ]
        }
    });
    let form = MemoryForm::new().with_value("color", "green");
    let mut validator = validator("color", config, &form, Arc::new(NoTransport))
        .with_resolver(Arc::new(registry));

    let report = validator.validate(Trigger::Load);
    assert_eq!(report.errors_for("color"), ["green is not offered"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    form.set("color", "blue");
    assert!(validator.validate(Trigger::Load).is_valid());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_callback_is_a_fault_not_a_message() {
    let config = json!({
        "color": { "constraints": [{ "kind": "Choice", "callback": "nowhere" }] }
    });
    let form = MemoryForm::new().with_value("color", "green");
    let mut validator = validator("color", config, &form, Arc::new(NoTransport));

    let report = validator.validate(Trigger::Submit);
    assert!(report.is_valid());
    let [fault] = report.faults.as_slice() else {
        panic!("expected one fault, got {:?}", report.faults);
    };
    assert_eq!(
        fault.error.to_string(),
        "can not find a \"nowhere\" callback for the element id=\"color\" to receive choices for the Choice constraint"
    );
}

#[test]
fn broken_configuration_faults_its_element_only() {
    let config = json!({
        "form": { "children": { "age": "form_age", "name": "form_name" } },
        "form_age": { "constraints": [{ "kind": "Type", "type": "quaternion" }] },
        "form_name": { "constraints": [{ "kind": "NotBlank", "message": "Required" }] }
    });
    let form = MemoryForm::new().with_value("form_age", "12");
    let mut validator = validator("form", config, &form, Arc::new(NoTransport));

    for _ in 0..2 {
        let report = validator.validate(Trigger::Submit);
        assert_eq!(report.errors_for("form_name"), ["Required"]);
        assert!(report.errors_for("form_age").is_empty());
        let [fault] = report.faults.as_slice() else {
            panic!("expected one fault, got {:?}", report.faults);
        };
        assert_eq!(fault.element_id, "form_age");
        assert!(matches!(
            &fault.error,
            FaultError::Config(error) if matches!(&**error, ConfigError::Element { element_id, .. } if element_id == "form_age")
        ));
    }
    assert_eq!(form.field("form_name").rendered(), ["Required"]);
}

#[test]
fn cyclic_tree_is_rejected() {
    let config = FormConfig::from_value(json!({
        "a": { "children": { "b": "b" } },
        "b": { "children": { "a": "a" } }
    }))
    .unwrap();
    assert!(matches!(
        FormValidator::new("a", Arc::new(config), &MemoryForm::new(), Arc::new(NoTransport)),
        Err(ConfigError::CyclicTree(_))
    ));
}
