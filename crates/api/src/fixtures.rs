//! Fixture files seeding the store and the entity catalog.
//!
//! ```json
//! {
//!   "entities": { "App\\Entity\\User": { "idFields": ["id"], "records": [{ "id": 1, "email": "ada@example.com" }] } },
//!   "catalog": { "App\\Entity\\User": { "Default": { "email": [{ "kind": "Email" }] } } }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::entity::EntityCatalog;
use crate::store::{InMemoryStore, Table};

/// Fixture loading failures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixtures from {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid fixture document.
    #[error("invalid fixtures: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parsed fixture document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    /// Entity name → table.
    pub entities: HashMap<String, Table>,
    /// Entity name → property constraints.
    pub catalog: EntityCatalog,
}

impl Fixtures {
    /// Reads a fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Splits into a store and a catalog.
    pub fn into_parts(self) -> (InMemoryStore, EntityCatalog) {
        (InMemoryStore::with_tables(self.entities), self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use std::io::Write;

    #[test]
    fn loads_store_and_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "entities": {{ "User": {{ "idFields": ["id"], "records": [{{ "id": 1 }}] }} }},
                "catalog": {{ "User": {{ "Default": {{ "email": [{{ "kind": "Email" }}] }} }} }}
            }}"#
        )
        .unwrap();

        let (store, catalog) = Fixtures::load(file.path()).unwrap().into_parts();
        assert!(store.has_entity("User"));
        assert!(catalog.entity("User").is_some());
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = Fixtures::load(Path::new("/nonexistent/fixtures.json")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/fixtures.json"));
    }
}
