use thiserror::Error;

/// Failures surfaced by the SQL layer. The message embeds whatever the
/// driver reported, constraint names included, so callers can pick
/// UNIQUE and FOREIGN KEY violations apart.
#[derive(Error, Debug)]
pub enum SQLError {
    #[error("sql open: {0}")]
    Open(String),

    #[error("sql query: {0}")]
    Query(String),

    #[error("sql exec: {0}")]
    Exec(String),
}
