use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use sipeka_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreateInstansi, Instansi, UpdateInstansi};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/instansi", get(list_instansi).post(create_instansi))
        .route(
            "/api/instansi/{id}",
            get(get_instansi).put(update_instansi).delete(delete_instansi),
        )
}

async fn list_instansi(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_instansi(&params).map_err(ServiceError::from)?;
    Ok(Json(json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_instansi(
    State(svc): State<AppState>,
    Json(input): Json<CreateInstansi>,
) -> Result<(StatusCode, Json<Instansi>), ServiceError> {
    let instansi = svc.create_instansi(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(instansi)))
}

async fn get_instansi(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Instansi>, ServiceError> {
    let id = super::parse_id(&id)?;
    let instansi = svc.get_instansi(id).map_err(ServiceError::from)?;
    Ok(Json(instansi))
}

async fn update_instansi(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateInstansi>,
) -> Result<Json<Instansi>, ServiceError> {
    let id = super::parse_id(&id)?;
    let instansi = svc.update_instansi(id, input).map_err(ServiceError::from)?;
    Ok(Json(instansi))
}

async fn delete_instansi(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = super::parse_id(&id)?;
    svc.delete_instansi(id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
