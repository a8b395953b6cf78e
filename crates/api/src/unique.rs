//! Uniqueness checks
//!
//! Two paths answer `check_unique_entity`:
//!
//! - direct lookup: a value-empty watched field passes when `ignoreNull` is
//!   set; otherwise the store is queried with the submitted data and the
//!   check passes on zero matches, or on a single match whose identifier
//!   values all equal `idValues` (the record being edited);
//! - validator path (`checkFromValidator`): the submission is treated as a
//!   new entity, so any match on the watched fields is a conflict. Every
//!   failure on this path answers `false`.

use formbridge_validator::config::flag;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::store::{FIND_BY, RecordStore, StoreError, same_value};

/// Body of a uniqueness request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueRequest {
    /// Entity name.
    pub entity_name: Option<String>,
    /// Watched field → submitted value.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Identifier field → value of the record being edited.
    #[serde(default)]
    pub id_values: Option<Value>,
    /// Lookup method.
    #[serde(default = "find_by")]
    pub repository_method: String,
    /// Pass while any watched value is empty.
    #[serde(default, deserialize_with = "flag")]
    pub ignore_null: bool,
    /// Use the validator path.
    #[serde(default, deserialize_with = "flag")]
    pub check_from_validator: bool,
    /// Watched fields for the validator path; defaults to the data keys.
    #[serde(default)]
    pub fields: Option<Value>,
    /// Validation groups, informational.
    #[serde(default)]
    pub groups: Vec<String>,
}

fn find_by() -> String {
    FIND_BY.to_owned()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl UniqueRequest {
    fn entity(&self) -> ApiResult<&str> {
        self.entity_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::BadRequest("missing entityName".to_owned()))
    }

    /// Runs whichever path the request selects.
    pub fn check(&self, store: &dyn RecordStore) -> ApiResult<bool> {
        if self.check_from_validator {
            Ok(self.check_from_validator(store))
        } else {
            self.check_from_store(store)
        }
    }

    /// Direct lookup path.
    pub fn check_from_store(&self, store: &dyn RecordStore) -> ApiResult<bool> {
        if self.ignore_null && self.data.values().any(is_empty_value) {
            debug!("empty watched value, uniqueness not checked");
            return Ok(true);
        }
        let entity = self.entity()?;
        let matches = store.find(entity, &self.repository_method, &self.data)?;
        match matches.as_slice() {
            [] => Ok(true),
            [only] => Ok(self.id_values.as_ref().and_then(Value::as_object).is_some_and(|expected| {
                only.id.iter().all(|(field, actual)| {
                    expected
                        .get(field)
                        .is_some_and(|value| same_value(actual, value))
                })
            })),
            _ => Ok(false),
        }
    }

    /// Validator path. Errors of any kind mean `false`.
    pub fn check_from_validator(&self, store: &dyn RecordStore) -> bool {
        match self.validator_verdict(store) {
            Ok(valid) => valid,
            Err(error) => {
                warn!(%error, "uniqueness validator failed, answering false");
                false
            }
        }
    }

    fn watched_fields(&self) -> Vec<String> {
        match &self.fields {
            Some(Value::String(field)) => vec![field.clone()],
            Some(Value::Array(fields)) => fields
                .iter()
                .filter_map(|field| field.as_str().map(str::to_owned))
                .collect(),
            _ => self.data.keys().cloned().collect(),
        }
    }

    fn validator_verdict(&self, store: &dyn RecordStore) -> ApiResult<bool> {
        let entity = self.entity()?;
        if !store.has_entity(entity) {
            return Err(StoreError::UnknownEntity(entity.to_owned()).into());
        }
        let mut criteria = Map::new();
        for field in self.watched_fields() {
            let value = self.data.get(&field).cloned().unwrap_or(Value::Null);
            if value.is_null() && self.ignore_null {
                return Ok(true);
            }
            criteria.insert(field, value);
        }
        if criteria.is_empty() {
            return Err(ApiError::BadRequest("no fields to check".to_owned()));
        }
        Ok(store.find(entity, &self.repository_method, &criteria)?.is_empty())
    }
}
