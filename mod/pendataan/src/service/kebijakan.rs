use sipeka_core::{ListParams, ListResult, now_rfc3339};
use sipeka_sql::{Row, Value};

use crate::model::{
    CreateKebijakan, Kebijakan, KebijakanDetail, KebijakanProses, KebijakanRow, UpdateKebijakan,
};
use crate::service::{int_or_null, text_or_null, PendataanError, PendataanService};

/// Policies joined with their optional detail row. `detail_id` doubles as
/// the row-exists marker for the LEFT JOIN.
const POLICY_SELECT: &str = "SELECT p.id AS id, p.name AS name, p.agency_id AS agency_id,
        p.enumerator_id AS enumerator_id, p.process_id AS process_id,
        p.assigned_by_admin_at AS assigned_by_admin_at,
        p.created_at AS created_at, p.updated_at AS updated_at,
        d.policy_id AS detail_id, d.progress AS progress, d.effective_date AS effective_date
     FROM policies p
     LEFT JOIN policy_details d ON d.policy_id = p.id";

impl PendataanService {
    /// Create a policy under an agency. Assigning an enumerator at create
    /// time stamps the assignment date.
    pub fn create_kebijakan(&self, input: CreateKebijakan) -> Result<Kebijakan, PendataanError> {
        if input.name.trim().is_empty() {
            return Err(PendataanError::Validation("name is required".into()));
        }

        // New policies start in the seeded initial stage unless told otherwise.
        let proses_id = match input.proses_id {
            Some(p) => Some(p),
            None => self
                .query(
                    "SELECT id FROM policy_process WHERE name = ?1",
                    &[Value::Text("Belum Diproses".into())],
                )?
                .first()
                .and_then(|r| r.get_i64("id")),
        };

        let now = now_rfc3339();
        let assigned_at = input.enumerator_id.map(|_| now.clone());
        let id = self.insert(
            "INSERT INTO policies (name, agency_id, enumerator_id, process_id, assigned_by_admin_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            &[
                Value::Text(input.name),
                Value::Integer(input.instansi_id),
                int_or_null(&input.enumerator_id),
                int_or_null(&proses_id),
                text_or_null(&assigned_at),
                Value::Text(now.clone()),
                Value::Text(now),
            ],
        )?;

        if let Some(detail) = input.detail {
            self.exec(
                "INSERT INTO policy_details (policy_id, progress, effective_date) VALUES (?1, ?2, ?3)",
                &[
                    Value::Integer(id),
                    int_or_null(&detail.progress),
                    text_or_null(&detail.effective_date),
                ],
            )?;
        }

        self.get_kebijakan(id)
    }

    /// Get a policy by id, detail attached when present.
    pub fn get_kebijakan(&self, id: i64) -> Result<Kebijakan, PendataanError> {
        let rows = self.query(
            &format!("{} WHERE p.id = ?1", POLICY_SELECT),
            &[Value::Integer(id)],
        )?;
        let row = rows
            .first()
            .ok_or_else(|| PendataanError::NotFound(format!("kebijakan {} not found", id)))?;
        kebijakan_from_row(row)
    }

    /// List policies with pagination, oldest first.
    pub fn list_kebijakan(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Kebijakan>, PendataanError> {
        let count_rows = self.query("SELECT COUNT(*) AS cnt FROM policies", &[])?;
        let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let (limit, offset) = params.page();
        let rows = self.query(
            &format!("{} ORDER BY p.id LIMIT ?1 OFFSET ?2", POLICY_SELECT),
            &[Value::Integer(limit), Value::Integer(offset)],
        )?;
        let items = rows
            .iter()
            .map(kebijakan_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    /// Update a policy. Absent fields are left unchanged; assigning an
    /// enumerator stamps the assignment date.
    pub fn update_kebijakan(
        &self,
        id: i64,
        input: UpdateKebijakan,
    ) -> Result<Kebijakan, PendataanError> {
        self.get_kebijakan(id)?;

        let mut sets = vec!["updated_at = ?1".to_string()];
        let mut params = vec![Value::Text(now_rfc3339())];

        if let Some(name) = &input.name {
            let idx = params.len() + 1;
            sets.push(format!("name = ?{}", idx));
            params.push(Value::Text(name.clone()));
        }
        if let Some(enumerator_id) = input.enumerator_id {
            let idx = params.len() + 1;
            sets.push(format!("enumerator_id = ?{}", idx));
            params.push(Value::Integer(enumerator_id));
            let idx = params.len() + 1;
            sets.push(format!("assigned_by_admin_at = ?{}", idx));
            params.push(Value::Text(now_rfc3339()));
        }
        if let Some(proses_id) = input.proses_id {
            let idx = params.len() + 1;
            sets.push(format!("process_id = ?{}", idx));
            params.push(Value::Integer(proses_id));
        }

        let id_idx = params.len() + 1;
        params.push(Value::Integer(id));
        let sql = format!("UPDATE policies SET {} WHERE id = ?{}", sets.join(", "), id_idx);
        self.exec(&sql, &params)?;

        if input.progress.is_some() || input.effective_date.is_some() {
            // Upsert the detail row; a NULL incoming field keeps the stored one.
            self.exec(
                "INSERT INTO policy_details (policy_id, progress, effective_date) VALUES (?1, ?2, ?3)
                 ON CONFLICT(policy_id) DO UPDATE SET
                     progress = COALESCE(excluded.progress, progress),
                     effective_date = COALESCE(excluded.effective_date, effective_date)",
                &[
                    Value::Integer(id),
                    int_or_null(&input.progress),
                    text_or_null(&input.effective_date),
                ],
            )?;
        }

        self.get_kebijakan(id)
    }

    /// Delete a policy. The detail row goes with it through the cascade.
    pub fn delete_kebijakan(&self, id: i64) -> Result<(), PendataanError> {
        let affected = self.exec("DELETE FROM policies WHERE id = ?1", &[Value::Integer(id)])?;
        if affected == 0 {
            return Err(PendataanError::NotFound(format!(
                "kebijakan {} not found",
                id
            )));
        }
        Ok(())
    }

    /// The seeded policy stages, in id order.
    pub fn list_proses(&self) -> Result<Vec<KebijakanProses>, PendataanError> {
        let rows = self.query("SELECT id, name FROM policy_process ORDER BY id", &[])?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(KebijakanProses {
                id: row
                    .get_i64("id")
                    .ok_or_else(|| PendataanError::Internal("process row missing id".into()))?,
                name: row.get_str("name").unwrap_or_default().to_string(),
            });
        }
        Ok(out)
    }

    /// The policy table the dashboard fetches for one agency: every policy
    /// with its relations flattened, missing pieces carried as nulls.
    pub fn kebijakan_by_instansi(
        &self,
        agency_id: i64,
    ) -> Result<Vec<KebijakanRow>, PendataanError> {
        let rows = self.query(
            "SELECT p.id AS id,
                    u.name AS enumerator,
                    p.name AS name,
                    p.assigned_by_admin_at AS tanggal_proses,
                    d.effective_date AS tanggal_berlaku,
                    a.name AS instansi,
                    d.progress AS progress_pengisian,
                    pr.name AS status_kebijakan
             FROM policies p
             LEFT JOIN users u ON u.id = p.enumerator_id
             LEFT JOIN agencies a ON a.id = p.agency_id
             LEFT JOIN policy_details d ON d.policy_id = p.id
             LEFT JOIN policy_process pr ON pr.id = p.process_id
             WHERE p.agency_id = ?1
             ORDER BY p.id",
            &[Value::Integer(agency_id)],
        )?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(KebijakanRow {
                id: row
                    .get_i64("id")
                    .ok_or_else(|| PendataanError::Internal("policy row missing id".into()))?,
                enumerator: row.get_str("enumerator").map(str::to_string),
                name: row.get_str("name").unwrap_or_default().to_string(),
                tanggal_proses: row.get_str("tanggal_proses").map(str::to_string),
                tanggal_berlaku: row.get_str("tanggal_berlaku").map(str::to_string),
                instansi: row.get_str("instansi").map(str::to_string),
                progress_pengisian: row.get_i64("progress_pengisian"),
                status_kebijakan: row.get_str("status_kebijakan").map(str::to_string),
            });
        }
        Ok(out)
    }
}

fn kebijakan_from_row(row: &Row) -> Result<Kebijakan, PendataanError> {
    let detail = row.get_i64("detail_id").map(|_| KebijakanDetail {
        progress: row.get_i64("progress"),
        effective_date: row.get_str("effective_date").map(str::to_string),
    });
    Ok(Kebijakan {
        id: row
            .get_i64("id")
            .ok_or_else(|| PendataanError::Internal("policy row missing id".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| PendataanError::Internal("policy row missing name".into()))?
            .to_string(),
        instansi_id: row
            .get_i64("agency_id")
            .ok_or_else(|| PendataanError::Internal("policy row missing agency_id".into()))?,
        enumerator_id: row.get_i64("enumerator_id"),
        proses_id: row.get_i64("process_id"),
        assigned_by_admin_at: row.get_str("assigned_by_admin_at").map(str::to_string),
        detail,
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
        updated_at: row.get_str("updated_at").unwrap_or_default().to_string(),
    })
}
