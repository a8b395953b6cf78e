//! Error types
//!
//! Each layer gets its own `thiserror` enum: configuration problems surface
//! at construction and again as faults on every pass, constraint faults and
//! transform failures during a pass, transport failures when remote checks
//! settle.

use std::sync::Arc;

use thiserror::Error;

/// Malformed or inconsistent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration payload itself could not be parsed.
    #[error("invalid configuration payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// No constraint kind matches the configured name.
    #[error("unknown constraint kind `{kind}`")]
    UnknownConstraint {
        /// Kind as configured.
        kind: String,
    },

    /// No transformer kind matches the configured name.
    #[error("unknown transformer kind `{kind}`")]
    UnknownTransformer {
        /// Kind as configured.
        kind: String,
    },

    /// Options did not deserialize into the kind's option set.
    #[error("invalid options for {kind}: {source}")]
    InvalidOptions {
        /// Kind being configured.
        kind: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The Type constraint names a type it does not know.
    #[error("the wrong \"{type_name}\" type was passed to the Type constraint")]
    UnknownType {
        /// Type name as configured.
        type_name: String,
    },

    /// A Regex pattern could not be compiled.
    #[error("malformed pattern `{pattern}`: {reason}")]
    MalformedPattern {
        /// Pattern as configured, delimiters included.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The root element id is not present in the tree.
    #[error("unknown element `{0}`")]
    UnknownElement(String),

    /// An element lists one of its ancestors as a child.
    #[error("element `{0}` is its own ancestor")]
    CyclicTree(String),

    /// Wraps an error raised while building a specific element.
    #[error("element `{element_id}`: {source}")]
    Element {
        /// Element being built.
        element_id: String,
        /// What went wrong.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attaches the element id, unless already attached.
    #[must_use]
    pub fn in_element(self, element_id: &str) -> Self {
        match self {
            Self::Element { .. } | Self::CyclicTree(_) => self,
            other => Self::Element {
                element_id: element_id.to_owned(),
                source: Box::new(other),
            },
        }
    }
}

/// A constraint could not be evaluated.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A named callback is not registered for the element.
    #[error("can not find a \"{callback}\" callback for the element id=\"{element_id}\" to {purpose}")]
    MissingCallback {
        /// Callback name.
        callback: String,
        /// Element the constraint belongs to.
        element_id: String,
        /// What the callback was needed for.
        purpose: &'static str,
    },

    /// A remote check payload could not be encoded.
    #[error("failed to encode remote check payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A data transformer rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The transformer needs a list or map.
    #[error("expected an object")]
    ExpectedObject,

    /// The transformer needs a list or map of selections.
    #[error("unexpected value type")]
    UnexpectedType,

    /// The element's transformer chain could not be built.
    #[error("no usable transformer chain")]
    Unconfigured,

    /// The value matches neither the true value nor emptiness.
    #[error("wrong type of value")]
    WrongType,

    /// A selected key is not a known choice.
    #[error("the choice \"{0}\" does not exist")]
    UnknownChoice(String),

    /// Several selected keys are not known choices.
    #[error("the choices \"{}\" were not found", .0.join(", "))]
    UnknownChoices(Vec<String>),
}

/// A remote check could not obtain a verdict.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request failed or returned a non-success status.
    #[cfg(feature = "http")]
    #[error("remote check request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The route could not be resolved against the base URL.
    #[cfg(feature = "http")]
    #[error("invalid remote check url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with something other than a boolean.
    #[error("expected a boolean verdict, got {0}")]
    UnexpectedResponse(serde_json::Value),

    /// No transport is available.
    #[error("remote checks are unavailable: {0}")]
    Unavailable(String),
}

/// A fault recorded during a validation pass.
#[derive(Debug, Error)]
pub enum FaultError {
    /// A constraint could not be evaluated.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// The element value could not be reverse transformed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A constraint or transformer of the element could not be built.
    #[error("{0}")]
    Config(Arc<ConfigError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_context_is_attached_once() {
        let error = ConfigError::UnknownConstraint {
            kind: "Nope".into(),
        }
        .in_element("inner")
        .in_element("outer");
        assert_eq!(error.to_string(), "element `inner`: unknown constraint kind `Nope`");
    }

    #[test]
    fn unknown_choices_are_joined() {
        let error = TransformError::UnknownChoices(vec!["a".into(), "b".into()]);
        assert_eq!(error.to_string(), "the choices \"a, b\" were not found");
    }
}
