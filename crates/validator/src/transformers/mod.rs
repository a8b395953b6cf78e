//! Data transformers
//!
//! Compound widgets hand back UI-shaped values (a map of date parts, a map
//! of checked boxes). A transformer's `reverse_transform` turns that into
//! the canonical value constraints expect. An element's transformers run as
//! a chain, in configured order, each consuming the previous output.

mod boolean;
mod choice;
mod date_time;
mod duplicates;
mod parts;

pub use boolean::BooleanToString;
pub use choice::{ChoiceToBooleanArray, ChoicesToBooleanArray, DropEmptyChoices};
pub use date_time::DateTimeToArray;
pub use duplicates::ValueToDuplicates;
pub use parts::ArrayToParts;

use crate::config::TransformerConfig;
use crate::display::ErrorUpdate;
use crate::element::FormElement;
use crate::foundation::{ConfigError, TransformError, decode};
use crate::value::FormValue;

/// What a transformer may consult and publish while running.
#[derive(Debug)]
pub struct TransformScope<'a> {
    element: &'a FormElement,
    updates: &'a mut Vec<ErrorUpdate>,
}

impl<'a> TransformScope<'a> {
    /// Creates a scope for `element`, collecting display updates into
    /// `updates`.
    pub fn new(element: &'a FormElement, updates: &'a mut Vec<ErrorUpdate>) -> Self {
        Self { element, updates }
    }

    /// The element whose value is being transformed.
    pub fn element(&self) -> &'a FormElement {
        self.element
    }

    /// Queues a display update.
    pub fn publish(&mut self, update: ErrorUpdate) {
        self.updates.push(update);
    }
}

/// Conversion from a UI-shaped value back to a canonical one.
pub trait ReverseTransform {
    /// Converts `value`, or rejects it.
    fn reverse_transform(
        &self,
        value: FormValue,
        scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError>;
}

/// A configured transformer.
#[derive(Debug, Clone)]
pub enum Transformer {
    /// Checkbox string → boolean.
    BooleanToString(BooleanToString),
    /// Date/time parts → formatted string.
    DateTimeToArray(DateTimeToArray),
    /// Grouped parts → flat map.
    ArrayToParts(ArrayToParts),
    /// Checked box → its choice value.
    ChoiceToBooleanArray(ChoiceToBooleanArray),
    /// Checked boxes → their choice values.
    ChoicesToBooleanArray(ChoicesToBooleanArray),
    /// Drops empty entries from a single-choice list.
    ChoiceToValue(DropEmptyChoices),
    /// Drops empty entries from a multi-choice list.
    ChoicesToValues(DropEmptyChoices),
    /// Repeated inputs → the single value they must agree on.
    ValueToDuplicates(ValueToDuplicates),
}

impl Transformer {
    /// Builds a transformer from its configuration entry.
    ///
    /// Kind names match with or without namespace and `Transformer` suffix.
    pub fn from_config(config: &TransformerConfig) -> Result<Self, ConfigError> {
        let options = config.options();
        let kind = config.short_kind("SymfonyComponentFormExtensionCoreDataTransformer", "Transformer");
        Ok(match kind {
            "BooleanToString" => Self::BooleanToString(decode(kind, &options)?),
            "DateTimeToArray" => Self::DateTimeToArray(decode(kind, &options)?),
            "ArrayToParts" => Self::ArrayToParts(decode(kind, &options)?),
            "ChoiceToBooleanArray" => Self::ChoiceToBooleanArray(decode(kind, &options)?),
            "ChoicesToBooleanArray" => Self::ChoicesToBooleanArray(decode(kind, &options)?),
            "ChoiceToValue" => Self::ChoiceToValue(DropEmptyChoices),
            "ChoicesToValues" => Self::ChoicesToValues(DropEmptyChoices),
            "ValueToDuplicates" => Self::ValueToDuplicates(decode(kind, &options)?),
            other => {
                return Err(ConfigError::UnknownTransformer {
                    kind: other.to_owned(),
                });
            }
        })
    }

    /// Builds a transformer from a kind name and an options object.
    pub fn from_kind(kind: &str, options: serde_json::Value) -> Result<Self, ConfigError> {
        let mut config = TransformerConfig::new(kind);
        if let serde_json::Value::Object(options) = options {
            for (key, value) in options {
                config = config.option(key, value);
            }
        }
        Self::from_config(&config)
    }
}

impl ReverseTransform for Transformer {
    fn reverse_transform(
        &self,
        value: FormValue,
        scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        match self {
            Self::BooleanToString(inner) => inner.reverse_transform(value, scope),
            Self::DateTimeToArray(inner) => inner.reverse_transform(value, scope),
            Self::ArrayToParts(inner) => inner.reverse_transform(value, scope),
            Self::ChoiceToBooleanArray(inner) => inner.reverse_transform(value, scope),
            Self::ChoicesToBooleanArray(inner) => inner.reverse_transform(value, scope),
            Self::ChoiceToValue(inner) | Self::ChoicesToValues(inner) => {
                inner.reverse_transform(value, scope)
            }
            Self::ValueToDuplicates(inner) => inner.reverse_transform(value, scope),
        }
    }
}

/// An element's transformers, applied in order.
#[derive(Debug, Clone, Default)]
pub struct TransformerChain {
    transformers: Vec<Transformer>,
}

impl TransformerChain {
    /// Creates a chain.
    pub fn new(transformers: Vec<Transformer>) -> Self {
        Self { transformers }
    }

    /// Builds a chain from configuration entries.
    pub fn from_configs(configs: &[TransformerConfig]) -> Result<Self, ConfigError> {
        configs
            .iter()
            .map(Transformer::from_config)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Returns true if the chain has no transformers.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Number of transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }
}

impl ReverseTransform for TransformerChain {
    fn reverse_transform(
        &self,
        value: FormValue,
        scope: &mut TransformScope<'_>,
    ) -> Result<FormValue, TransformError> {
        self.transformers
            .iter()
            .try_fold(value, |value, transformer| transformer.reverse_transform(value, scope))
    }
}

/// Options shared by the choice transformers.
pub(crate) type ChoiceList = indexmap::IndexMap<String, FormValue>;

/// Decodes a transformer's options; used by tests.
#[cfg(test)]
pub(crate) fn from_options<T: serde::de::DeserializeOwned>(options: serde_json::Value) -> T {
    let serde_json::Value::Object(options) = options else {
        panic!("options must be an object");
    };
    match decode("test", &options) {
        Ok(built) => built,
        Err(error) => panic!("construction failed: {error}"),
    }
}

#[cfg(test)]
pub(crate) fn apply(transformer: &impl ReverseTransform, value: serde_json::Value) -> Result<FormValue, TransformError> {
    let element = FormElement::detached("field", FormValue::Null);
    let mut updates = Vec::new();
    transformer.reverse_transform(FormValue::from(value), &mut TransformScope::new(&element, &mut updates))
}
