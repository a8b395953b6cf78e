//! `HttpTransport` against a mock server.

use std::sync::Arc;

use formbridge_validator::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::validator;

#[tokio::test]
async fn posts_json_and_reads_the_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check/unique"))
        .and(body_partial_json(json!({ "data": { "email": "ada@example.com" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&server.uri()).unwrap();
    let valid = transport
        .send(
            "/check/unique",
            &json!({ "fields": ["email"], "data": { "email": "ada@example.com" } }),
        )
        .await
        .unwrap();
    assert!(!valid);
}

#[tokio::test]
async fn non_boolean_answer_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&server.uri()).unwrap();
    let error = transport.send("/check", &json!({})).await.unwrap_err();
    assert!(matches!(error, TransportError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn server_error_leaves_the_field_untouched_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check/unique"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/check/unique"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let config = json!({
        "routing": { "check_unique_entity": "/check/unique" },
        "user": {
            "children": { "email": "user_email" },
            "constraints": [{ "kind": "UniqueEntity", "fields": "email", "message": "Taken" }]
        }
    });
    let form = MemoryForm::new().with_value("user_email", "ada@example.com");
    let transport = Arc::new(HttpTransport::new(&server.uri()).unwrap());
    let mut validator = validator("user", config, &form, transport);

    validator.validate(Trigger::Submit);
    assert_eq!(validator.settle().await.failed, 1);
    assert_eq!(form.field("user_email").render_count(), 0);

    assert_eq!(validator.validate(Trigger::Submit).dispatched, 1);
    assert_eq!(validator.settle().await.rejected, 1);
    assert_eq!(form.field("user_email").rendered(), ["Taken"]);
}

#[test]
fn rejects_a_malformed_base() {
    assert!(matches!(
        HttpTransport::new("not a url"),
        Err(TransportError::Url(_))
    ));
}
