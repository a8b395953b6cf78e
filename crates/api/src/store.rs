//! Record lookup
//!
//! Uniqueness checks need two things from storage: the records matching a
//! set of criteria (through a named lookup method) and the identifier
//! values of a record. [`RecordStore`] is that seam; [`InMemoryStore`] is
//! the bundled implementation, seeded from fixtures.

use std::collections::HashMap;

use formbridge_validator::value::FormValue;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Lookup method that matches every criterion.
pub const FIND_BY: &str = "findBy";

/// Storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No table for this entity name.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    /// The lookup method is not supported.
    #[error("entity `{entity}` has no lookup method `{method}`")]
    UnknownMethod {
        /// Entity name.
        entity: String,
        /// Requested method.
        method: String,
    },
}

/// A stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Identifier field → value.
    pub id: IndexMap<String, Value>,
    /// All fields, identifiers included.
    pub fields: Map<String, Value>,
}

/// Read access to entity records.
pub trait RecordStore: Send + Sync {
    /// Returns true if `entity` is known.
    fn has_entity(&self, entity: &str) -> bool;

    /// Records of `entity` selected by `method` with `criteria`.
    fn find(
        &self,
        entity: &str,
        method: &str,
        criteria: &Map<String, Value>,
    ) -> Result<Vec<Record>, StoreError>;
}

/// One entity's records and identifier fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    /// Identifier field names.
    pub id_fields: Vec<String>,
    /// Rows.
    pub records: Vec<Map<String, Value>>,
}

impl Table {
    fn record(&self, row: &Map<String, Value>) -> Record {
        Record {
            id: self
                .id_fields
                .iter()
                .map(|field| (field.clone(), row.get(field).cloned().unwrap_or(Value::Null)))
                .collect(),
            fields: row.clone(),
        }
    }
}

/// Tables held in memory, keyed by entity name.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tables`.
    pub fn with_tables(tables: HashMap<String, Table>) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Declares an entity and its identifier fields.
    pub fn define(&self, entity: impl Into<String>, id_fields: &[&str]) {
        self.tables.write().insert(
            entity.into(),
            Table {
                id_fields: id_fields.iter().map(|&field| field.to_owned()).collect(),
                records: Vec::new(),
            },
        );
    }

    /// Appends a row.
    pub fn insert(&self, entity: &str, row: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(entity)
            .ok_or_else(|| StoreError::UnknownEntity(entity.to_owned()))?;
        if let Value::Object(row) = row {
            table.records.push(row);
        }
        Ok(())
    }
}

/// Compares the way the lookup endpoint does: by string form.
pub fn same_value(left: &Value, right: &Value) -> bool {
    FormValue::from(left.clone()).to_string() == FormValue::from(right.clone()).to_string()
}

impl RecordStore for InMemoryStore {
    fn has_entity(&self, entity: &str) -> bool {
        self.tables.read().contains_key(entity)
    }

    fn find(
        &self,
        entity: &str,
        method: &str,
        criteria: &Map<String, Value>,
    ) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read();
        let table = tables
            .get(entity)
            .ok_or_else(|| StoreError::UnknownEntity(entity.to_owned()))?;
        if method != FIND_BY {
            return Err(StoreError::UnknownMethod {
                entity: entity.to_owned(),
                method: method.to_owned(),
            });
        }
        Ok(table
            .records
            .iter()
            .filter(|row| {
                criteria.iter().all(|(field, expected)| {
                    row.get(field)
                        .is_some_and(|actual| same_value(actual, expected))
                })
            })
            .map(|row| table.record(row))
            .collect())
    }
}
