mod enumerator;
mod instansi;
mod kebijakan;

use std::sync::Arc;

use axum::Router;

use sipeka_core::ServiceError;

use crate::service::PendataanService;

/// Shared application state.
pub type AppState = Arc<PendataanService>;

/// Build the pendataan API router.
///
/// Paths are absolute; the caller merges them into the root router and
/// layers authentication on top.
pub fn build_router(svc: Arc<PendataanService>) -> Router {
    Router::new()
        .merge(enumerator::routes())
        .merge(instansi::routes())
        .merge(kebijakan::routes())
        .with_state(svc)
}

/// Path ids arrive as strings so that a bad one yields a 400 instead of
/// the extractor's own rejection shape.
fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::Validation(format!("invalid id '{}'", raw)))
}
