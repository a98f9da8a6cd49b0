use serde::{Deserialize, Serialize};

use super::id_str;

/// An agency — the organizational unit owning enumerators and kebijakan.
#[derive(Debug, Clone, Serialize)]
pub struct Instansi {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating an agency.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstansi {
    pub name: String,
}

/// Partial update for an agency.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstansi {
    #[serde(default)]
    pub name: Option<String>,
}
