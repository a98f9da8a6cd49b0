use crate::error::SQLError;

/// A dynamically-typed SQL value, used both for bound parameters and
/// for result cells.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One result row, keyed by the column names of the statement.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// The raw value of a column, if the statement produced it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Typed accessors. A NULL cell and a missing column both read as
    /// `None`, which is what the nullable projections want.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }
}

/// SQL execution interface over an embedded database.
///
/// Statements are plain SQL with `?N` placeholders; the store owns the
/// connection and serializes access.
pub trait SQLStore: Send + Sync {
    /// Run a SELECT and collect every row.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Run an UPDATE/DELETE/DDL statement; returns the affected count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;

    /// Run an INSERT; returns the rowid the database allocated. Primary
    /// keys here are 64-bit integer rowids, so inserts report them back.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError>;
}
