use serde::{Deserialize, Serialize};

/// Current UTC time as an RFC 3339 string. Every persisted timestamp in
/// the system goes through this.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Random session id (UUIDv4 with the dashes stripped).
///
/// Row ids are integer rowids from the database; this is only for the
/// `sid` claim inside issued tokens.
pub fn new_sid() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Query-string parameters the list endpoints accept.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Sort field, when the endpoint supports one.
    #[serde(default)]
    pub sort: Option<String>,
    /// Free-text filter, when the endpoint supports one.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

impl ListParams {
    /// `(limit, offset)` as the SQL layer binds them.
    pub fn page(&self) -> (i64, i64) {
        (self.limit as i64, self.offset as i64)
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self { limit: default_limit(), offset: 0, sort: None, q: None }
    }
}

/// A page of items plus the unpaged total.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}
