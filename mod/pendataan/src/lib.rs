//! Pendataan module — enumerator and policy administration for agencies.
//!
//! # Resources
//!
//! - **Pengguna** — user row; admins and enumerators share it, split by role class
//! - **Instansi** — government agency an admin manages
//! - **Kebijakan** — policy record with optional detail (progress, effective date)
//! - **KebijakanProses** — seeded processing stages a policy moves through
//!
//! # Usage
//!
//! ```ignore
//! use pendataan::PendataanModule;
//!
//! let module = PendataanModule::new(sql)?;
//! let router = module.routes(); // Paths are absolute, merge at the root
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use sipeka_core::Module;

use crate::service::PendataanService;

/// Pendataan module implementing the Module trait.
///
/// Holds the PendataanService and provides HTTP routes for all
/// enumerator, instansi and kebijakan endpoints.
pub struct PendataanModule {
    service: Arc<PendataanService>,
}

impl PendataanModule {
    /// Create a new PendataanModule.
    pub fn new(
        sql: Arc<dyn sipeka_sql::SQLStore>,
    ) -> Result<Self, sipeka_core::ServiceError> {
        let service = PendataanService::new(sql)
            .map_err(sipeka_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying PendataanService.
    pub fn service(&self) -> &Arc<PendataanService> {
        &self.service
    }
}

impl Module for PendataanModule {
    fn name(&self) -> &str {
        "pendataan"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
