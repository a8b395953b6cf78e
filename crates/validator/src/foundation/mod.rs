//! Core validation types and traits
//!
//! This module contains the building blocks every constraint and transformer
//! is written against:
//!
//! - **Traits**: [`Validate`], [`Configure`]
//! - **Scope**: [`Scope`], the per-evaluation view of the element, the
//!   configuration, the callback resolver and the remote channel
//! - **Errors**: [`ConfigError`], [`ConstraintError`], [`TransformError`],
//!   [`TransportError`]
//! - **Messages**: placeholder substitution and plural selection
//!
//! Constraint violations are not errors. A constraint returns the list of
//! user-facing messages it produced (empty when the value passes); the error
//! types above are reserved for misconfiguration and infrastructure failures.

mod error;
pub mod message;
mod scope;
mod traits;

pub use error::{ConfigError, ConstraintError, FaultError, TransformError, TransportError};
pub use message::Message;
pub use scope::Scope;
pub use traits::{Configure, Options, Site, Validate, decode};
