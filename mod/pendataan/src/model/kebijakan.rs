use serde::{Deserialize, Serialize};

use super::{id_str, id_str_opt};

/// A policy record tracked for an agency.
#[derive(Debug, Clone, Serialize)]
pub struct Kebijakan {
    #[serde(with = "id_str")]
    pub id: i64,

    pub name: String,

    /// Owning agency.
    #[serde(with = "id_str")]
    pub instansi_id: i64,

    /// Assigned enumerator, if any.
    #[serde(with = "id_str_opt")]
    pub enumerator_id: Option<i64>,

    /// Process/status record, if any.
    #[serde(with = "id_str_opt")]
    pub proses_id: Option<i64>,

    /// When the agency admin assigned the enumerator (RFC 3339).
    pub assigned_by_admin_at: Option<String>,

    /// One-to-one detail record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<KebijakanDetail>,

    pub created_at: String,
    pub updated_at: String,
}

/// Detail attached one-to-one to a kebijakan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KebijakanDetail {
    /// Filling progress, 0..=100.
    pub progress: Option<i64>,
    /// Date the policy takes effect (YYYY-MM-DD).
    pub effective_date: Option<String>,
}

/// A process/status record kebijakan point at ("Selesai", ...).
#[derive(Debug, Clone, Serialize)]
pub struct KebijakanProses {
    #[serde(with = "id_str")]
    pub id: i64,
    pub name: String,
}

/// The flat row the kebijakan table renders, one per policy. Field
/// names match the table columns; every missing relation projects as
/// null.
#[derive(Debug, Clone, Serialize)]
pub struct KebijakanRow {
    #[serde(with = "id_str")]
    pub id: i64,
    /// Display name of the assigned enumerator.
    pub enumerator: Option<String>,
    pub name: String,
    /// Admin assignment timestamp.
    pub tanggal_proses: Option<String>,
    /// Effective date from the detail record.
    pub tanggal_berlaku: Option<String>,
    /// Agency name.
    pub instansi: Option<String>,
    /// Filling progress from the detail record.
    pub progress_pengisian: Option<i64>,
    /// Process name.
    pub status_kebijakan: Option<String>,
}

/// Input for creating a kebijakan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateKebijakan {
    pub name: String,
    #[serde(with = "id_str")]
    pub instansi_id: i64,
    #[serde(default, with = "id_str_opt")]
    pub enumerator_id: Option<i64>,
    #[serde(default, with = "id_str_opt")]
    pub proses_id: Option<i64>,
    #[serde(default)]
    pub detail: Option<KebijakanDetail>,
}

/// Partial update for a kebijakan. Absent fields are left unchanged;
/// assigning an enumerator stamps `assigned_by_admin_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateKebijakan {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "id_str_opt")]
    pub enumerator_id: Option<i64>,
    #[serde(default, with = "id_str_opt")]
    pub proses_id: Option<i64>,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub effective_date: Option<String>,
}
