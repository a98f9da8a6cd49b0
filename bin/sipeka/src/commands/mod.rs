//! CLI command implementations.

pub mod context;
pub mod login;
pub mod resource;
pub mod session;
