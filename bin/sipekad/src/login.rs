//! `POST /auth/login` — password check against the stored argon2id
//! hash, JWT in return.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use pendataan::service::pengguna::verify_password;
use sipeka_core::ServiceError;

use crate::auth_middleware::Claims;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The id fields ride along so the pages can stash them in localStorage
/// next to the token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub id: String,
    pub name: String,
    pub peran: i64,
    pub instansi_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

/// The root account is an ordinary pengguna row (synced from the config
/// at bootstrap), so every account takes the same path here.
async fn login_handler(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<LoginRequest>,
) -> Result<axum::Json<LoginResponse>, ServiceError> {
    let pengguna = state
        .service
        .find_pengguna_by_email(&body.email)
        .map_err(|e| {
            tracing::error!("[login] {}", e);
            ServiceError::from(e)
        })?
        .filter(|p| verify_password(p, &body.password))
        .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".into()))?;

    let now = chrono::Utc::now().timestamp();
    let expire_secs = state.server_config.jwt.expire_secs;
    let claims = Claims {
        sub: pengguna.id.to_string(),
        name: pengguna.name,
        peran: pengguna.peran,
        instansi_id: pengguna.instansi_id.map(|i| i.to_string()),
        sid: sipeka_core::new_sid(),
        iat: now,
        exp: now + expire_secs as i64,
    };

    let key = EncodingKey::from_secret(state.server_config.jwt.secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key).map_err(|e| {
        tracing::error!("[login] failed to encode JWT: {}", e);
        ServiceError::Internal("failed to issue token".into())
    })?;

    Ok(axum::Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expire_secs,
        id: claims.sub,
        name: claims.name,
        peran: claims.peran,
        instansi_id: claims.instansi_id,
    }))
}
