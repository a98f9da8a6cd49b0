//! Bearer-token guard in front of the write API.
//!
//! Pages, login, the health endpoints and the two dashboard reads pass
//! through untouched; everything else needs a valid JWT, whose claims
//! land in the request extensions for the handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried in issued tokens. The daemon both signs and verifies,
/// so the shape lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Pengguna id.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Role class (1 superadmin, 4 admin instansi, 5 enumerator).
    pub peran: i64,
    /// Agency of the user, if any.
    #[serde(default)]
    pub instansi_id: Option<String>,
    /// Session id.
    pub sid: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Decoding key and validation rules shared across requests.
#[derive(Clone)]
pub struct JwtState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
}

pub async fn auth_middleware(
    State(jwt_state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    match authenticate(&jwt_state, &request) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(msg) => (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": msg })),
        )
            .into_response(),
    }
}

fn authenticate(jwt_state: &JwtState, request: &Request) -> Result<Claims, String> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| "missing authorization token".to_string())?;

    jsonwebtoken::decode::<Claims>(token, &jwt_state.decoding_key, &jwt_state.validation)
        .map(|data| data.claims)
        .map_err(|e| format!("invalid token: {}", e))
}

/// Paths that skip the guard. The pages gate on the client side only,
/// and the two dashboard reads carry no token in the original flow.
fn is_public_path(path: &str) -> bool {
    matches!(
        path,
        "/" | "/enumerator"
            | "/enumerator/tambah"
            | "/kebijakan"
            | "/health"
            | "/version"
            | "/auth/login"
            | "/api/pengguna_enumerator"
            | "/api/policies/instansi"
    ) || path.starts_with("/enumerator/ubah/")
}
