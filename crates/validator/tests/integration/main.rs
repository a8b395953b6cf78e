//! Integration tests for formbridge-validator.

mod constraints;
mod forms;
mod http_transport;
mod property;
mod remote;

use std::sync::Arc;

use formbridge_validator::prelude::*;
use serde_json::Value;

/// Builds a validator over `config` rooted at `root`.
pub fn validator(
    root: &str,
    config: Value,
    form: &MemoryForm,
    transport: Arc<dyn RemoteTransport>,
) -> FormValidator {
    let config = FormConfig::from_value(config).expect("config parses");
    FormValidator::new(root, Arc::new(config), form, transport).expect("tree builds")
}

/// Runs one constraint against a bare JSON value.
pub fn check(kind: &str, options: Value, value: Value) -> Vec<String> {
    Constraint::from_kind(kind, options)
        .expect("constraint builds")
        .check(&FormValue::from(value))
        .expect("constraint does not fault")
}
