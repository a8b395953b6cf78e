//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use formbridge_validator::prelude::*;
//! ```

// ============================================================================
// FOUNDATION: value model, traits, errors
// ============================================================================

pub use crate::foundation::{
    ConfigError, ConstraintError, FaultError, Scope, TransformError, TransportError, Validate,
};
pub use crate::value::FormValue;

// ============================================================================
// CONFIGURATION AND TREE
// ============================================================================

pub use crate::binding::{BindingProvider, FieldBinding, MemoryBinding, MemoryForm};
pub use crate::callback::{Callback, CallbackRegistry, CallbackResolver, NoCallbacks};
pub use crate::config::{ConstraintConfig, ElementConfig, FormConfig, TransformerConfig};
pub use crate::constraints::Constraint;
pub use crate::display::{ErrorBoard, ErrorUpdate};
pub use crate::element::FormElement;
pub use crate::transformers::{Transformer, TransformerChain};

// ============================================================================
// ORCHESTRATION AND REMOTE CHECKS
// ============================================================================

pub use crate::orchestrator::{FormValidator, SettleSummary, Trigger, ValidationReport};
#[cfg(feature = "http")]
pub use crate::remote::HttpTransport;
pub use crate::remote::{NoTransport, RemoteTransport};

pub use std::sync::Arc;
