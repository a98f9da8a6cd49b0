pub mod instansi;
pub mod kebijakan;
pub mod pengguna;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use sipeka_sql::{Row, SQLError, SQLStore, Value};

/// Pendataan service error type.
#[derive(Debug, Error)]
pub enum PendataanError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl From<PendataanError> for sipeka_core::ServiceError {
    fn from(e: PendataanError) -> Self {
        match e {
            PendataanError::NotFound(m) => sipeka_core::ServiceError::NotFound(m),
            PendataanError::Conflict(m) => sipeka_core::ServiceError::Conflict(m),
            PendataanError::Validation(m) => sipeka_core::ServiceError::Validation(m),
            PendataanError::Storage(m) => sipeka_core::ServiceError::Storage(m),
            PendataanError::Internal(m) => sipeka_core::ServiceError::Internal(m),
        }
    }
}

/// The pendataan service. Holds the SQL store and owns the schema.
pub struct PendataanService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl PendataanService {
    /// Create a new PendataanService, initializing the DB schema and
    /// seeding the kebijakan process statuses.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, PendataanError> {
        schema::init_schema(sql.as_ref())?;
        schema::seed_proses(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    // ── Store helpers shared by the resource services ──

    pub(crate) fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, PendataanError> {
        self.sql.query(sql, params).map_err(map_sql_err)
    }

    pub(crate) fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, PendataanError> {
        self.sql.exec(sql, params).map_err(map_sql_err)
    }

    pub(crate) fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, PendataanError> {
        self.sql.insert(sql, params).map_err(map_sql_err)
    }
}

/// Constraint violations come back from SQLite as flat strings; pick
/// them apart so callers see a 409 for duplicates and a 400 for broken
/// references instead of a blanket storage error.
fn map_sql_err(e: SQLError) -> PendataanError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint") {
        PendataanError::Conflict(msg)
    } else if msg.contains("FOREIGN KEY constraint") {
        PendataanError::Validation(msg)
    } else {
        PendataanError::Storage(msg)
    }
}

/// Text value or SQL null from an optional string.
pub(crate) fn text_or_null(v: &Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

/// Integer value or SQL null from an optional i64.
pub(crate) fn int_or_null(v: &Option<i64>) -> Value {
    match v {
        Some(i) => Value::Integer(*i),
        None => Value::Null,
    }
}
