//! Constraints that need the server: UniqueEntity and UserPassword.
//!
//! Both return no messages synchronously. They queue a check on the scope's
//! remote channel; the verdict lands on the target element's error board
//! under the constraint's own source id once the channel settles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CHECK_UNIQUE_ENTITY, CHECK_USER_PASSWORD, flag};
use crate::element::FormElement;
use crate::foundation::{ConfigError, ConstraintError, Configure, Options, Scope, Site, Validate, decode};
use crate::remote::{DedupMemo, RemoteCheck};
use crate::value::FormValue;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(one) => vec![one],
            Self::Many(many) => many,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UniqueEntityOptions {
    message: String,
    service: String,
    em: Option<String>,
    repository_method: String,
    fields: Option<OneOrMany>,
    error_path: Option<String>,
    #[serde(deserialize_with = "flag")]
    ignore_null: bool,
    entity_name: Option<String>,
    groups: Vec<String>,
    #[serde(deserialize_with = "flag")]
    check_from_validator: bool,
    id_fields: Option<OneOrMany>,
}

impl Default for UniqueEntityOptions {
    fn default() -> Self {
        Self {
            message: "This value is already used.".to_owned(),
            service: "doctrine.orm.validator.unique".to_owned(),
            em: None,
            repository_method: "findBy".to_owned(),
            fields: None,
            error_path: None,
            ignore_null: true,
            entity_name: None,
            groups: Vec::new(),
            check_from_validator: false,
            id_fields: Some(OneOrMany::One("id".to_owned())),
        }
    }
}

/// Request body of a uniqueness check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UniqueEntityRequest<'a> {
    message: &'a str,
    service: &'a str,
    em: Option<&'a str>,
    repository_method: &'a str,
    fields: &'a [String],
    error_path: Option<&'a str>,
    ignore_null: u8,
    check_from_validator: u8,
    entity_name: Option<&'a str>,
    groups: &'a [String],
    id_values: Option<IndexMap<String, FormValue>>,
    data: &'a IndexMap<String, FormValue>,
}

/// Server-side uniqueness of one or more field values.
#[derive(Debug, Clone)]
pub struct UniqueEntity {
    /// Message shown when the server reports a conflict.
    pub message: String,
    /// Validator service hint.
    pub service: String,
    /// Entity manager name.
    pub em: Option<String>,
    /// Lookup method.
    pub repository_method: String,
    /// Watched fields.
    pub fields: Vec<String>,
    /// Field the error is shown on, when it names a child.
    pub error_path: Option<String>,
    /// Skip the check while any watched field is empty.
    pub ignore_null: bool,
    /// Entity class name.
    pub entity_name: Option<String>,
    /// Validation groups.
    pub groups: Vec<String>,
    /// Ask the server to run its own validator instead of a lookup.
    pub check_from_validator: bool,
    /// Identifier fields, sent so the record being edited is not a conflict.
    pub id_fields: Option<Vec<String>>,
    source_id: String,
    memo: DedupMemo,
}

impl Configure for UniqueEntity {
    fn from_options(options: &Options, site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: UniqueEntityOptions = decode("UniqueEntity", options)?;
        Ok(Self {
            message: raw.message,
            service: raw.service,
            em: raw.em,
            repository_method: raw.repository_method,
            fields: raw.fields.map(OneOrMany::into_vec).unwrap_or_default(),
            error_path: raw.error_path,
            ignore_null: raw.ignore_null,
            entity_name: raw.entity_name,
            groups: raw.groups,
            check_from_validator: raw.check_from_validator,
            id_fields: raw.id_fields.map(OneOrMany::into_vec),
            source_id: format!("unique-entity-{}-{}", site.element_id, site.position),
            memo: DedupMemo::default(),
        })
    }
}

impl UniqueEntity {
    /// Error source id of this instance.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// The snapshot of the most recent dispatched check, if any.
    pub fn last_snapshot(&self) -> Option<String> {
        self.memo.current()
    }

    fn field_value(scope: &Scope<'_>, field: &str) -> FormValue {
        let element = scope.element();
        if let Some(pinned) = scope
            .config()
            .custom_value(element.id(), field)
            .filter(|pinned| pinned.is_truthy())
        {
            return pinned.clone();
        }
        element
            .child(field)
            .and_then(|child| child.value(&mut Vec::new()).ok())
            .unwrap_or(FormValue::Null)
    }

    fn values(scope: &Scope<'_>, fields: &[String]) -> IndexMap<String, FormValue> {
        fields
            .iter()
            .map(|field| {
                let value = Self::field_value(scope, field);
                let value = if value.is_truthy() {
                    value
                } else {
                    FormValue::from("")
                };
                (field.clone(), value)
            })
            .collect()
    }

    fn any_empty(&self, scope: &Scope<'_>) -> bool {
        self.fields
            .iter()
            .any(|field| !Self::field_value(scope, field).is_truthy())
    }

    fn target<'e>(&self, element: &'e FormElement) -> &'e FormElement {
        self.error_path
            .iter()
            .chain(&self.fields)
            .find_map(|field| element.child(field))
            .unwrap_or(element)
    }
}

impl Validate for UniqueEntity {
    fn validate(
        &self,
        _value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        let element = scope.element();
        let Some(route) = scope.config().route(element.id(), CHECK_UNIQUE_ENTITY) else {
            return Ok(Vec::new());
        };
        if scope.remote().is_none() || (self.ignore_null && self.any_empty(scope)) {
            return Ok(Vec::new());
        }

        let data = Self::values(scope, &self.fields);
        let snapshot = serde_json::to_string(&data)?;
        if !self.memo.should_issue(&snapshot) {
            debug!(source_id = %self.source_id, "uniqueness snapshot unchanged, skipping");
            return Ok(Vec::new());
        }

        let id_values = self
            .id_fields
            .as_ref()
            .map(|fields| Self::values(scope, fields));
        let body = serde_json::to_value(UniqueEntityRequest {
            message: &self.message,
            service: &self.service,
            em: self.em.as_deref(),
            repository_method: &self.repository_method,
            fields: &self.fields,
            error_path: self.error_path.as_deref(),
            ignore_null: u8::from(self.ignore_null),
            check_from_validator: u8::from(self.check_from_validator),
            entity_name: self.entity_name.as_deref(),
            groups: &self.groups,
            id_values,
            data: &data,
        });
        let body = match body {
            Ok(body) => body,
            Err(error) => {
                self.memo.rearm(&snapshot);
                return Err(error.into());
            }
        };

        let check = RemoteCheck::new(route, body, self.target(element).id(), &self.source_id, &self.message)
            .deduplicated(self.memo.clone(), snapshot);
        if let Some(remote) = scope.remote() {
            remote.dispatch(check);
        }
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct UserPasswordOptions {
    message: String,
}

impl Default for UserPasswordOptions {
    fn default() -> Self {
        Self {
            message: "Old password is invalid".to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserPasswordRequest<'a> {
    message: &'a str,
    data: PasswordData<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordData<'a> {
    value: &'a FormValue,
}

/// Server-side check of the current user's password. Every pass that
/// dispatches sends a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword {
    /// Message shown when the server rejects the password.
    pub message: String,
    source_id: String,
}

impl Configure for UserPassword {
    fn from_options(options: &Options, site: &Site<'_>) -> Result<Self, ConfigError> {
        let UserPasswordOptions { message } = decode("UserPassword", options)?;
        Ok(Self {
            message,
            source_id: format!("user-password-{}-{}", site.element_id, site.position),
        })
    }
}

impl UserPassword {
    /// Error source id of this instance.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl Validate for UserPassword {
    fn validate(
        &self,
        value: &FormValue,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        let element = scope.element();
        let Some(route) = scope.config().route(element.id(), CHECK_USER_PASSWORD) else {
            return Ok(Vec::new());
        };
        let Some(remote) = scope.remote() else {
            return Ok(Vec::new());
        };
        let body = serde_json::to_value(UserPasswordRequest {
            message: &self.message,
            data: PasswordData { value },
        })?;
        remote.dispatch(RemoteCheck::new(
            route,
            body,
            element.id(),
            &self.source_id,
            &self.message,
        ));
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::testing::build;
    use serde_json::json;

    #[test]
    fn defaults_follow_the_server() {
        let rule: UniqueEntity = build(
            |o, s| UniqueEntity::from_options(o, &Site::new("user", s.position + 2)),
            json!({ "fields": "email" }),
        );
        assert_eq!(rule.fields, ["email"]);
        assert_eq!(rule.repository_method, "findBy");
        assert!(rule.ignore_null);
        assert!(!rule.check_from_validator);
        assert_eq!(rule.id_fields.as_deref(), Some(&["id".to_owned()][..]));
        assert_eq!(rule.source_id(), "unique-entity-user-2");
    }

    #[test]
    fn id_fields_may_be_disabled() {
        let rule: UniqueEntity = build(
            UniqueEntity::from_options,
            json!({ "fields": ["a", "b"], "idFields": null, "ignoreNull": 0 }),
        );
        assert_eq!(rule.id_fields, None);
        assert!(!rule.ignore_null);
    }

    #[test]
    fn password_source_id() {
        let rule: UserPassword = build(UserPassword::from_options, json!({}));
        assert_eq!(rule.source_id(), "user-password-field-0");
        assert_eq!(rule.message, "Old password is invalid");
    }
}
