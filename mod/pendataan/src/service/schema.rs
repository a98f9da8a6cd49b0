use sipeka_sql::{SQLStore, Value};

use crate::service::PendataanError;

/// Initialize the SQLite schema for all pendataan resources.
///
/// Referential integrity lives in the schema: the application never
/// re-checks what a foreign key already guarantees.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), PendataanError> {
    let statements = [
        // Agencies: organizational units owning users and policies
        "CREATE TABLE IF NOT EXISTS agencies (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_agencies_name ON agencies(name)",

        // Users: admins and enumerators, told apart by role class
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            peran INTEGER NOT NULL,
            nip TEXT,
            unit_kerja TEXT,
            agency_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (agency_id) REFERENCES agencies(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_agency ON users(agency_id)",
        "CREATE INDEX IF NOT EXISTS idx_users_peran ON users(peran)",

        // Process/status records policies point at
        "CREATE TABLE IF NOT EXISTS policy_process (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",

        // Policies: one agency, optionally one enumerator and one process
        "CREATE TABLE IF NOT EXISTS policies (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            agency_id INTEGER NOT NULL,
            enumerator_id INTEGER,
            process_id INTEGER,
            assigned_by_admin_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (agency_id) REFERENCES agencies(id),
            FOREIGN KEY (enumerator_id) REFERENCES users(id) ON DELETE SET NULL,
            FOREIGN KEY (process_id) REFERENCES policy_process(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_policies_agency ON policies(agency_id)",
        "CREATE INDEX IF NOT EXISTS idx_policies_enumerator ON policies(enumerator_id)",

        // One-to-one detail record per policy
        "CREATE TABLE IF NOT EXISTS policy_details (
            policy_id INTEGER PRIMARY KEY,
            progress INTEGER,
            effective_date TEXT,
            FOREIGN KEY (policy_id) REFERENCES policies(id) ON DELETE CASCADE
        )",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| PendataanError::Storage(e.to_string()))?;
    }

    Ok(())
}

/// Seed the well-known kebijakan process statuses. Idempotent across
/// restarts (names are unique).
pub fn seed_proses(sql: &dyn SQLStore) -> Result<(), PendataanError> {
    for name in ["Belum Diproses", "Sedang Diproses", "Selesai"] {
        sql.exec(
            "INSERT OR IGNORE INTO policy_process (name) VALUES (?1)",
            &[Value::Text(name.to_string())],
        )
        .map_err(|e| PendataanError::Storage(e.to_string()))?;
    }
    Ok(())
}
