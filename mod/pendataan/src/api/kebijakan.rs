use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use sipeka_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreateKebijakan, Kebijakan, KebijakanRow, UpdateKebijakan};
use crate::service::{PendataanError, PendataanService};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/policies/instansi", get(kebijakan_instansi))
        .route("/api/kebijakan", get(list_kebijakan).post(create_kebijakan))
        .route(
            "/api/kebijakan/{id}",
            get(get_kebijakan).put(update_kebijakan).delete(delete_kebijakan),
        )
}

#[derive(Debug, Deserialize)]
struct AgencyQuery {
    agency_id: Option<String>,
}

/// The dashboard read: every policy of one agency, relations flattened,
/// nulls kept. Same envelope rules as the enumerator read.
async fn kebijakan_instansi(
    State(svc): State<AppState>,
    Query(q): Query<AgencyQuery>,
) -> Response {
    let Some(raw) = q.agency_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "agency_id is required"})),
        )
            .into_response();
    };
    match kebijakan_for_agency(&svc, &raw) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("[kebijakan_instansi] {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Something went wrong", "error": e.to_string()})),
            )
                .into_response()
        }
    }
}

fn kebijakan_for_agency(
    svc: &PendataanService,
    raw: &str,
) -> Result<Vec<KebijakanRow>, PendataanError> {
    let agency_id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| PendataanError::Internal(format!("cannot convert '{}' to an id", raw)))?;
    svc.kebijakan_by_instansi(agency_id)
}

async fn list_kebijakan(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_kebijakan(&params).map_err(ServiceError::from)?;
    Ok(Json(json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_kebijakan(
    State(svc): State<AppState>,
    Json(input): Json<CreateKebijakan>,
) -> Result<(StatusCode, Json<Kebijakan>), ServiceError> {
    let kebijakan = svc.create_kebijakan(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(kebijakan)))
}

async fn get_kebijakan(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Kebijakan>, ServiceError> {
    let id = super::parse_id(&id)?;
    let kebijakan = svc.get_kebijakan(id).map_err(ServiceError::from)?;
    Ok(Json(kebijakan))
}

async fn update_kebijakan(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateKebijakan>,
) -> Result<Json<Kebijakan>, ServiceError> {
    let id = super::parse_id(&id)?;
    let kebijakan = svc.update_kebijakan(id, input).map_err(ServiceError::from)?;
    Ok(Json(kebijakan))
}

async fn delete_kebijakan(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = super::parse_id(&id)?;
    svc.delete_kebijakan(id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
