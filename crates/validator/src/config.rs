//! Configuration payload
//!
//! The server renders one JSON object per page: element id → element
//! configuration, plus a top-level `routing` table used as the fallback for
//! route lookups. It is parsed once and shared read-only behind an `Arc`.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::foundation::{ConfigError, Options};
use crate::value::FormValue;

/// Route name the uniqueness constraint posts to.
pub const CHECK_UNIQUE_ENTITY: &str = "check_unique_entity";
/// Route name the password constraint posts to.
pub const CHECK_USER_PASSWORD: &str = "check_user_password";

/// The page-wide configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormConfig {
    /// Global route table, consulted when an element has no route of its own.
    #[serde(default)]
    pub routing: HashMap<String, String>,
    /// Element id → element configuration.
    #[serde(flatten)]
    pub elements: HashMap<String, ElementConfig>,
}

impl FormConfig {
    /// Parses a configuration payload.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Converts an already parsed payload.
    pub fn from_value(payload: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(payload)?)
    }

    /// Adds or replaces an element entry.
    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>, element: ElementConfig) -> Self {
        self.elements.insert(id.into(), element);
        self
    }

    /// Adds a global route.
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.routing.insert(name.into(), path.into());
        self
    }

    /// Configuration for one element, if any.
    pub fn element(&self, id: &str) -> Option<&ElementConfig> {
        self.elements.get(id)
    }

    /// Resolves a named route: the element's own table first, then the
    /// global one.
    pub fn route(&self, element_id: &str, name: &str) -> Option<&str> {
        self.element(element_id)
            .and_then(|element| element.routing.get(name))
            .or_else(|| self.routing.get(name))
            .map(String::as_str)
    }

    /// A value pinned for `field` on `element_id` instead of being read
    /// from the form.
    pub fn custom_value(&self, element_id: &str, field: &str) -> Option<&FormValue> {
        self.element(element_id)
            .and_then(|element| element.custom_values.get(field))
    }
}

/// Configuration for one element.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Constraints, in evaluation order.
    pub constraints: Vec<ConstraintConfig>,
    /// Data transformers, in application order.
    pub transformers: Vec<TransformerConfig>,
    /// Field name → child element id.
    pub children: IndexMap<String, String>,
    /// Element-scoped route table.
    pub routing: HashMap<String, String>,
    /// Field values pinned by the server.
    pub custom_values: IndexMap<String, FormValue>,
    /// Message shown when the element's value cannot be transformed.
    pub invalid_message: Option<String>,
}

impl ElementConfig {
    /// Appends a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: ConstraintConfig) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a transformer.
    #[must_use]
    pub fn transformer(mut self, transformer: TransformerConfig) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Adds a child field.
    #[must_use]
    pub fn child(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.children.insert(name.into(), id.into());
        self
    }
}

/// A `{kind, options}` entry, for constraints and transformers alike.
///
/// Options may sit in `options` or inline next to `kind`; inline keys win.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KindConfig {
    /// Kind name, optionally namespaced.
    pub kind: String,
    #[serde(default)]
    options: Options,
    #[serde(flatten)]
    inline: Options,
}

/// A configured constraint entry.
pub type ConstraintConfig = KindConfig;
/// A configured transformer entry.
pub type TransformerConfig = KindConfig;

impl KindConfig {
    /// Creates an entry without options.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets an option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.inline.insert(key.into(), value.into());
        self
    }

    /// The merged option bag.
    pub fn options(&self) -> Options {
        let mut merged = self.options.clone();
        merged.extend(self.inline.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// The kind name without namespace, prefix or `suffix`.
    pub fn short_kind(&self, prefix: &str, suffix: &str) -> &str {
        let name = self.kind.rsplit('\\').next().unwrap_or(&self.kind);
        let name = name.strip_prefix(prefix).unwrap_or(name);
        match name.strip_suffix(suffix) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        }
    }
}

/// Reads a server-side flag: booleans, `0`/`1`, `"0"`/`"1"`, `"true"`/`"false"`.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    })
}
