//! Remote checks: request bodies, deduplication and settlement order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use formbridge_validator::prelude::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::validator;

/// Records every request. Bodies whose data mentions `slow` answer late.
#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(String, Value)>>,
}

impl Recorder {
    fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl RemoteTransport for Recorder {
    async fn send(&self, route: &str, body: &Value) -> Result<bool, TransportError> {
        self.sent.lock().push((route.to_owned(), body.clone()));
        let data = body["data"].to_string();
        if data.contains("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
            return Ok(true);
        }
        Ok(!data.contains("taken"))
    }
}

fn registration() -> Value {
    json!({
        "routing": { "check_unique_entity": "/check/unique" },
        "user": {
            "children": { "email": "user_email", "id": "user_id" },
            "constraints": [{
                "kind": "Symfony\\Component\\Validator\\Constraints\\UniqueEntity",
                "fields": ["email"],
                "entityName": "App\\Entity\\User",
                "message": "Email already registered"
            }]
        }
    })
}

#[tokio::test]
async fn uniqueness_body_mirrors_the_server_options() {
    let transport = Arc::new(Recorder::default());
    let form = MemoryForm::new()
        .with_value("user_email", "ada@example.com")
        .with_value("user_id", 42);
    let mut validator = validator("user", registration(), &form, transport.clone());

    assert_eq!(validator.validate(Trigger::Submit).dispatched, 1);
    validator.settle().await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (route, body) = &sent[0];
    assert_eq!(route, "/check/unique");
    assert_eq!(
        body,
        &json!({
            "message": "Email already registered",
            "service": "doctrine.orm.validator.unique",
            "em": null,
            "repositoryMethod": "findBy",
            "fields": ["email"],
            "errorPath": null,
            "ignoreNull": 1,
            "checkFromValidator": 0,
            "entityName": "App\\Entity\\User",
            "groups": [],
            "idValues": { "id": 42 },
            "data": { "email": "ada@example.com" }
        })
    );
}

#[tokio::test]
async fn unchanged_snapshot_is_sent_once() {
    let transport = Arc::new(Recorder::default());
    let form = MemoryForm::new().with_value("user_email", "taken@example.com");
    let mut validator = validator("user", registration(), &form, transport.clone());

    validator.validate(Trigger::Submit);
    validator.settle().await;
    assert_eq!(form.field("user_email").rendered(), ["Email already registered"]);

    assert_eq!(validator.validate(Trigger::Submit).dispatched, 0);
    assert_eq!(transport.sent().len(), 1);

    form.set("user_email", "grace@example.com");
    assert_eq!(validator.validate(Trigger::Submit).dispatched, 1);
    let summary = validator.settle().await;
    assert_eq!(summary.rejected, 0);
    assert!(form.field("user_email").rendered().is_empty());
}

#[tokio::test]
async fn empty_watched_field_skips_the_check() {
    let transport = Arc::new(Recorder::default());
    let form = MemoryForm::new();
    let mut validator = validator("user", registration(), &form, transport.clone());

    assert_eq!(validator.validate(Trigger::Submit).dispatched, 0);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn load_never_reaches_the_server() {
    let transport = Arc::new(Recorder::default());
    let form = MemoryForm::new().with_value("user_email", "ada@example.com");
    let mut validator = validator("user", registration(), &form, transport.clone());

    assert_eq!(validator.validate(Trigger::Load).dispatched, 0);
    assert_eq!(validator.pending(), 0);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn verdicts_apply_in_arrival_order() {
    let transport = Arc::new(Recorder::default());
    let form = MemoryForm::new().with_value("user_email", "slow@example.com");
    let mut validator = validator("user", registration(), &form, transport.clone());

    validator.validate(Trigger::Submit);
    form.set("user_email", "taken@example.com");
    validator.validate(Trigger::Submit);
    assert_eq!(validator.pending(), 2);

    let summary = validator.settle().await;
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.rejected, 1);
    // The slow answer belongs to the older value but arrives last.
    assert!(validator.element("user_email").unwrap().errors().is_empty());
}

#[tokio::test]
async fn password_check_is_sent_on_every_submit() {
    let transport = Arc::new(Recorder::default());
    let config = json!({
        "old_password": {
            "routing": { "check_user_password": "/check/password" },
            "constraints": [{ "kind": "UserPassword" }]
        }
    });
    let form = MemoryForm::new().with_value("old_password", "taken");
    let mut validator = validator("old_password", config, &form, transport.clone());

    validator.validate(Trigger::Submit);
    validator.validate(Trigger::Submit);
    validator.settle().await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        (
            "/check/password".to_owned(),
            json!({ "message": "Old password is invalid", "data": { "value": "taken" } })
        )
    );
    assert_eq!(form.field("old_password").rendered(), ["Old password is invalid"]);
}

#[tokio::test]
async fn missing_route_dispatches_nothing() {
    let transport = Arc::new(Recorder::default());
    let config = json!({
        "old_password": { "constraints": [{ "kind": "UserPassword" }] }
    });
    let form = MemoryForm::new().with_value("old_password", "secret");
    let mut validator = validator("old_password", config, &form, transport);

    assert_eq!(validator.validate(Trigger::Submit).dispatched, 0);
}
