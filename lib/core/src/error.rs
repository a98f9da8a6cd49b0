use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Error type shared by every SIPEKA module.
///
/// A variant carries only the human-readable message; the stable code
/// and the HTTP status are derived from the variant itself. Handlers
/// return this directly and axum renders the JSON envelope:
///
/// ```json
/// {"code": "VALIDATION_FAILED", "message": "name is required"}
/// ```
///
/// Clients match on `code`; the message text is free to change.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The requested row does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated (duplicate email, agency name).
    #[error("{0}")]
    Conflict(String),

    /// The input failed a shape or reference check.
    #[error("{0}")]
    Validation(String),

    /// Credentials missing or not accepted.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role class does not allow this.
    #[error("{0}")]
    PermissionDenied(String),

    /// The SQL store reported a failure.
    #[error("{0}")]
    Storage(String),

    /// Anything that should never happen in normal operation.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code paired with the HTTP status.
    fn kind(&self) -> (&'static str, StatusCode) {
        use ServiceError::*;
        match self {
            NotFound(_) => ("NOT_FOUND", StatusCode::NOT_FOUND),
            Conflict(_) => ("ALREADY_EXISTS", StatusCode::CONFLICT),
            Validation(_) => ("VALIDATION_FAILED", StatusCode::BAD_REQUEST),
            Unauthorized(_) => ("UNAUTHENTICATED", StatusCode::UNAUTHORIZED),
            PermissionDenied(_) => ("PERMISSION_DENIED", StatusCode::FORBIDDEN),
            Storage(_) => ("STORAGE_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
            Internal(_) => ("INTERNAL", StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().0
    }

    pub fn status(&self) -> StatusCode {
        self.kind().1
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (code, status) = self.kind();
        let body = serde_json::json!({
            "code": code,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
