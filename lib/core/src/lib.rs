//! Shared types for the SIPEKA services: the unified error, list
//! parameters, storage configuration, and the module trait the daemon
//! assembles routes from.

pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use types::{ListParams, ListResult, new_sid, now_rfc3339};
