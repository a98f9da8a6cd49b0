use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, params_from_iter};

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SQLStore backed by rusqlite with the bundled SQLite.
///
/// The connection sits behind a mutex; WAL keeps concurrent readers
/// happy and the foreign-keys pragma makes the schema's references
/// binding, since the application never re-checks them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path).map_err(open_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(open_err)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// In-memory database for tests. Foreign keys stay on so tests see
    /// the same constraint behavior as production.
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;").map_err(open_err)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Exec(format!("connection poisoned: {}", e)))
    }
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(query_err)?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mapped = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut columns = Vec::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    columns.push((name.clone(), from_cell(row.get_ref(i)?)));
                }
                Ok(Row::new(columns))
            })
            .map_err(query_err)?;

        mapped.collect::<Result<Vec<_>, _>>().map_err(query_err)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(exec_err)?;
        Ok(affected as u64)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(exec_err)?;
        Ok(conn.last_insert_rowid())
    }
}

impl rusqlite::types::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned((*i).into()),
            Value::Real(f) => ToSqlOutput::Owned((*f).into()),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn from_cell(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn open_err(e: rusqlite::Error) -> SQLError {
    SQLError::Open(e.to_string())
}

fn query_err(e: rusqlite::Error) -> SQLError {
    SQLError::Query(e.to_string())
}

fn exec_err(e: rusqlite::Error) -> SQLError {
    SQLError::Exec(e.to_string())
}
