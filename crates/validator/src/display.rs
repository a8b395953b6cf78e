//! Error display merging
//!
//! Several producers contribute errors to one element: the synchronous pass,
//! each remote constraint, duplicate-value transformers. Each owns a source
//! id. Publishing for a source replaces that source's previous contribution
//! and leaves the others alone.

use indexmap::IndexMap;
use serde::Serialize;

/// Source id of the synchronous validation pass.
pub const SYNC_SOURCE: &str = "sync";

/// One producer's errors for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorUpdate {
    /// Element the errors belong to.
    pub element_id: String,
    /// Producer.
    pub source_id: String,
    /// Messages; empty clears the source.
    pub errors: Vec<String>,
}

impl ErrorUpdate {
    /// Creates an update.
    pub fn new(
        element_id: impl Into<String>,
        source_id: impl Into<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            source_id: source_id.into(),
            errors,
        }
    }
}

/// Per-element error state, keyed by source id.
///
/// Sources keep the position they were first published at, so the merged
/// list is stable across repeated passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBoard {
    sources: IndexMap<String, Vec<String>>,
}

impl ErrorBoard {
    /// Replaces the contribution of `source_id`. Returns true if it changed.
    pub fn publish(&mut self, source_id: &str, errors: Vec<String>) -> bool {
        match self.sources.get_mut(source_id) {
            Some(current) if *current == errors => false,
            Some(current) => {
                *current = errors;
                true
            }
            None if errors.is_empty() => false,
            None => {
                self.sources.insert(source_id.to_owned(), errors);
                true
            }
        }
    }

    /// Errors of one source.
    pub fn source(&self, source_id: &str) -> &[String] {
        self.sources.get(source_id).map_or(&[][..], Vec::as_slice)
    }

    /// All errors, in first-published source order.
    pub fn merged(&self) -> Vec<String> {
        self.sources.values().flatten().cloned().collect()
    }

    /// Returns true when no source has errors.
    pub fn is_empty(&self) -> bool {
        self.sources.values().all(Vec::is_empty)
    }
}
