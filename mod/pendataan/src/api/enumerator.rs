use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use sipeka_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreateEnumerator, InstansiEnumerator, Pengguna, UpdateEnumerator};
use crate::service::{PendataanError, PendataanService};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/pengguna_enumerator", get(pengguna_enumerator))
        .route("/api/enumerator", get(list_enumerator).post(create_enumerator))
        .route(
            "/api/enumerator/{id}",
            get(get_enumerator).put(update_enumerator).delete(delete_enumerator),
        )
}

#[derive(Debug, Deserialize)]
struct AdminQuery {
    admin_instansi_id: Option<String>,
}

/// The dashboard read: the admin's agency with its enumerators nested.
/// Keeps the original envelope, bare array on success and `message` keys
/// on failure.
async fn pengguna_enumerator(
    State(svc): State<AppState>,
    Query(q): Query<AdminQuery>,
) -> Response {
    let Some(raw) = q.admin_instansi_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "admin_instansi_id is required"})),
        )
            .into_response();
    };
    match enumerator_for_admin(&svc, &raw) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("[pengguna_enumerator] {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Something went wrong", "error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// The raw parameter is only coerced inside the fallible path, so a
/// non-numeric id surfaces through the 500 envelope.
fn enumerator_for_admin(
    svc: &PendataanService,
    raw: &str,
) -> Result<Vec<InstansiEnumerator>, PendataanError> {
    let admin_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| PendataanError::Internal(format!("cannot convert '{}' to an id", raw)))?;
    svc.enumerator_by_admin(admin_id)
}

async fn list_enumerator(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_enumerator(&params).map_err(ServiceError::from)?;
    Ok(Json(json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_enumerator(
    State(svc): State<AppState>,
    Json(input): Json<CreateEnumerator>,
) -> Result<(StatusCode, Json<Pengguna>), ServiceError> {
    let pengguna = svc.create_enumerator(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(pengguna)))
}

async fn get_enumerator(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pengguna>, ServiceError> {
    let id = super::parse_id(&id)?;
    let pengguna = svc.get_enumerator(id).map_err(ServiceError::from)?;
    Ok(Json(pengguna))
}

async fn update_enumerator(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateEnumerator>,
) -> Result<Json<Pengguna>, ServiceError> {
    let id = super::parse_id(&id)?;
    let pengguna = svc.update_enumerator(id, input).map_err(ServiceError::from)?;
    Ok(Json(pengguna))
}

async fn delete_enumerator(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = super::parse_id(&id)?;
    svc.delete_enumerator(id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
