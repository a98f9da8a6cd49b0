use serde::{Deserialize, Serialize};

use super::{id_str, id_str_opt};

/// Role class: superadmin (root account).
pub const PERAN_SUPERADMIN: i64 = 1;
/// Role class: agency admin — manages the enumerators of one instansi.
pub const PERAN_ADMIN_INSTANSI: i64 = 4;
/// Role class: enumerator — field data collector.
pub const PERAN_ENUMERATOR: i64 = 5;

/// A user row. Admins and enumerators share the table; the role class
/// (`peran`) tells them apart.
#[derive(Debug, Clone, Serialize)]
pub struct Pengguna {
    #[serde(with = "id_str")]
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Login email, unique across users.
    pub email: String,

    /// Role class (see the `PERAN_*` constants).
    pub peran: i64,

    /// NIP — civil-servant identifier number.
    pub nip: Option<String>,

    /// Work unit within the agency.
    pub unit_kerja: Option<String>,

    /// The agency this user belongs to. Superadmin has none.
    #[serde(with = "id_str_opt")]
    pub instansi_id: Option<i64>,

    /// Argon2id hash, kept out of every response.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// An enumerator row as the dashboard table consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct Enumerator {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
    pub nip: Option<String>,
    pub unit_kerja: Option<String>,
}

/// An agency together with its enumerators — the element shape of the
/// `/api/pengguna_enumerator` response. The page reads the `enumerator`
/// list off the first element.
#[derive(Debug, Clone, Serialize)]
pub struct InstansiEnumerator {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
    pub enumerator: Vec<Enumerator>,
}

/// Input for creating a new enumerator.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnumerator {
    pub name: String,
    pub email: String,
    #[serde(with = "id_str")]
    pub instansi_id: i64,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub nip: Option<String>,
    #[serde(default)]
    pub unit_kerja: Option<String>,
}

/// Input for creating an agency admin.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, with = "id_str_opt")]
    pub instansi_id: Option<i64>,
}

/// Partial update for an enumerator. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEnumerator {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nip: Option<String>,
    #[serde(default)]
    pub unit_kerja: Option<String>,
}
