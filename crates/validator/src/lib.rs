//! # formbridge-validator
//!
//! Client-side mirror of server form validation constraints.
//!
//! A [`FormConfig`](config::FormConfig) payload, emitted once per page by the
//! server, describes which constraints and data transformers each form element
//! carries. [`FormValidator`](orchestrator::FormValidator) builds the element
//! tree from it, validates synchronously on every pass and queues the checks
//! that need the server (uniqueness, password verification) on a
//! [`RemoteChannel`](remote::RemoteChannel). Their verdicts are merged into the
//! element error boards when the channel is settled.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formbridge_validator::prelude::*;
//! use serde_json::json;
//!
//! let config = FormConfig::from_value(json!({
//!     "user_name": { "constraints": [{ "kind": "NotBlank", "message": "Required" }] }
//! }))?;
//! let form = MemoryForm::new().with_value("user_name", "");
//! let mut validator = FormValidator::new("user_name", Arc::new(config), &form, Arc::new(NoTransport))?;
//!
//! let report = validator.validate(Trigger::Submit);
//! assert_eq!(report.errors_for("user_name"), ["Required"]);
//! ```
//!
//! ## Layout
//!
//! - [`value`]: the dynamic value model and its coercion rules
//! - [`constraints`]: one type per rule kind, unified by [`Constraint`](constraints::Constraint)
//! - [`transformers`]: reverse transforms from composite widget values
//! - [`element`]: the form element tree
//! - [`orchestrator`]: validation passes and remote settlement
//! - [`remote`]: the deduplicated asynchronous check channel

pub mod binding;
pub mod callback;
pub mod config;
pub mod constraints;
pub mod display;
pub mod element;
pub mod foundation;
mod macros;
pub mod orchestrator;
pub mod prelude;
pub mod remote;
pub mod transformers;
pub mod value;
