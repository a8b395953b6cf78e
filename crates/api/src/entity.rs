//! Property-level entity validation
//!
//! An [`EntityCatalog`] maps entity names to their constraints, grouped by
//! validation group and property. Validating a submission runs every
//! constraint of the group on the matching property of `data`, using the
//! client engine with no form around it. Remote kinds are skipped there.

use std::collections::HashMap;

use formbridge_validator::config::ConstraintConfig;
use formbridge_validator::constraints::Constraint;
use formbridge_validator::foundation::{ConfigError, Site};
use formbridge_validator::value::FormValue;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Group used when a request names none.
pub const DEFAULT_GROUP: &str = "Default";

/// Constraints of one entity: group → property → constraints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EntityRules {
    groups: IndexMap<String, IndexMap<String, Vec<ConstraintConfig>>>,
}

impl EntityRules {
    /// Adds a constraint on `property` in `group`.
    #[must_use]
    pub fn rule(mut self, group: &str, property: &str, constraint: ConstraintConfig) -> Self {
        self.groups
            .entry(group.to_owned())
            .or_default()
            .entry(property.to_owned())
            .or_default()
            .push(constraint);
        self
    }

    /// Validates `data` against `group`. An unknown group has no
    /// constraints and passes.
    pub fn validate(&self, data: &Map<String, Value>, group: &str) -> Result<bool, ConfigError> {
        let Some(properties) = self.groups.get(group) else {
            return Ok(true);
        };
        for (property, configs) in properties {
            let value = data.get(property).cloned().map_or(FormValue::Undefined, FormValue::from);
            for (position, config) in configs.iter().enumerate() {
                let constraint = Constraint::from_config(config, &Site::new(property, position))
                    .map_err(|error| error.in_element(property))?;
                match constraint.check(&value) {
                    Ok(errors) if errors.is_empty() => {}
                    Ok(errors) => {
                        debug!(property, kind = constraint.kind(), ?errors, "property rejected");
                        return Ok(false);
                    }
                    Err(error) => {
                        warn!(property, kind = constraint.kind(), %error, "constraint fault");
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}

/// Entity name → rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EntityCatalog {
    entities: HashMap<String, EntityRules>,
}

impl EntityCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity.
    #[must_use]
    pub fn with_entity(mut self, name: impl Into<String>, rules: EntityRules) -> Self {
        self.entities.insert(name.into(), rules);
        self
    }

    /// Rules for `name`, if the entity is known.
    pub fn entity(&self, name: &str) -> Option<&EntityRules> {
        self.entities.get(name)
    }
}
