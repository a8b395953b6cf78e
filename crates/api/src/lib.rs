//! # formbridge-api
//!
//! Reference implementation of the endpoints remote constraints post to.
//!
//! - `POST /check_unique_entity`: uniqueness of a field combination,
//!   answered with a JSON boolean.
//! - `POST /check_entity`: property-level validation of an entity against
//!   its per-group constraints, answered with a JSON boolean (or `null`
//!   when the request carries no data).
//!
//! Records come from a [`RecordStore`]; property constraints come from an
//! [`EntityCatalog`] and run on the same engine the client uses.

pub mod config;
pub mod entity;
pub mod error;
pub mod fixtures;
pub mod routes;
pub mod store;
pub mod unique;

pub use config::ServerConfig;
pub use entity::{EntityCatalog, EntityRules};
pub use error::{ApiError, ApiResult};
pub use fixtures::Fixtures;
pub use routes::{AppState, router};
pub use store::{InMemoryStore, Record, RecordStore, StoreError};
