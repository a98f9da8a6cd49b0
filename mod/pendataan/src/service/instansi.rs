use sipeka_core::{ListParams, ListResult, now_rfc3339};
use sipeka_sql::{Row, Value};

use crate::model::{CreateInstansi, Instansi, UpdateInstansi};
use crate::service::{PendataanError, PendataanService};

impl PendataanService {
    /// Create an agency.
    pub fn create_instansi(&self, input: CreateInstansi) -> Result<Instansi, PendataanError> {
        if input.name.trim().is_empty() {
            return Err(PendataanError::Validation("name is required".into()));
        }
        let now = now_rfc3339();
        let id = self.insert(
            "INSERT INTO agencies (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
            &[
                Value::Text(input.name),
                Value::Text(now.clone()),
                Value::Text(now),
            ],
        )?;
        self.get_instansi(id)
    }

    /// Get an agency by id.
    pub fn get_instansi(&self, id: i64) -> Result<Instansi, PendataanError> {
        let rows = self.query(
            "SELECT id, name, created_at, updated_at FROM agencies WHERE id = ?1",
            &[Value::Integer(id)],
        )?;
        let row = rows
            .first()
            .ok_or_else(|| PendataanError::NotFound(format!("instansi {} not found", id)))?;
        instansi_from_row(row)
    }

    /// List agencies with pagination, ordered by name.
    pub fn list_instansi(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Instansi>, PendataanError> {
        let count_rows = self.query("SELECT COUNT(*) AS cnt FROM agencies", &[])?;
        let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let (limit, offset) = params.page();
        let rows = self.query(
            "SELECT id, name, created_at, updated_at FROM agencies
             ORDER BY name LIMIT ?1 OFFSET ?2",
            &[Value::Integer(limit), Value::Integer(offset)],
        )?;
        let items = rows
            .iter()
            .map(instansi_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    /// Rename an agency.
    pub fn update_instansi(
        &self,
        id: i64,
        input: UpdateInstansi,
    ) -> Result<Instansi, PendataanError> {
        self.get_instansi(id)?;
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(PendataanError::Validation("name is required".into()));
            }
            self.exec(
                "UPDATE agencies SET name = ?1, updated_at = ?2 WHERE id = ?3",
                &[
                    Value::Text(name),
                    Value::Text(now_rfc3339()),
                    Value::Integer(id),
                ],
            )?;
        }
        self.get_instansi(id)
    }

    /// Delete an agency. Users and policies referencing it keep it alive,
    /// so the foreign key turns the delete into a validation error.
    pub fn delete_instansi(&self, id: i64) -> Result<(), PendataanError> {
        let affected = self.exec("DELETE FROM agencies WHERE id = ?1", &[Value::Integer(id)])?;
        if affected == 0 {
            return Err(PendataanError::NotFound(format!(
                "instansi {} not found",
                id
            )));
        }
        Ok(())
    }
}

fn instansi_from_row(row: &Row) -> Result<Instansi, PendataanError> {
    Ok(Instansi {
        id: row
            .get_i64("id")
            .ok_or_else(|| PendataanError::Internal("agency row missing id".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| PendataanError::Internal("agency row missing name".into()))?
            .to_string(),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
        updated_at: row.get_str("updated_at").unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreateAdmin, CreateEnumerator};
    use sipeka_sql::sqlite::SqliteStore;

    fn test_service() -> std::sync::Arc<PendataanService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        PendataanService::new(sql).unwrap()
    }

    #[test]
    fn test_instansi_crud() {
        let svc = test_service();

        let agency = svc.create_instansi(CreateInstansi { name: "BKN".into() }).unwrap();
        assert_eq!(svc.get_instansi(agency.id).unwrap().name, "BKN");

        let renamed = svc
            .update_instansi(agency.id, UpdateInstansi { name: Some("BKN Pusat".into()) })
            .unwrap();
        assert_eq!(renamed.name, "BKN Pusat");

        // No-op update keeps the row.
        let same = svc.update_instansi(agency.id, UpdateInstansi { name: None }).unwrap();
        assert_eq!(same.name, "BKN Pusat");

        svc.create_instansi(CreateInstansi { name: "BPS".into() }).unwrap();
        let list = svc.list_instansi(&ListParams::default()).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.items[0].name, "BKN Pusat");

        svc.delete_instansi(agency.id).unwrap();
        assert!(svc.get_instansi(agency.id).is_err());
    }

    #[test]
    fn test_duplicate_name_is_conflict() {
        let svc = test_service();
        svc.create_instansi(CreateInstansi { name: "BKN".into() }).unwrap();
        let err = svc.create_instansi(CreateInstansi { name: "BKN".into() }).unwrap_err();
        assert!(matches!(err, PendataanError::Conflict(_)));
    }

    #[test]
    fn test_delete_with_members_is_blocked() {
        let svc = test_service();
        let agency = svc.create_instansi(CreateInstansi { name: "BKN".into() }).unwrap();
        svc.create_enumerator(CreateEnumerator {
            name: "Budi".into(),
            email: "budi@bkn.go.id".into(),
            instansi_id: agency.id,
            password: None,
            nip: None,
            unit_kerja: None,
        })
        .unwrap();

        let err = svc.delete_instansi(agency.id).unwrap_err();
        assert!(matches!(err, PendataanError::Validation(_)));

        // Admins block it the same way.
        let other = svc.create_instansi(CreateInstansi { name: "BPS".into() }).unwrap();
        svc.create_admin(CreateAdmin {
            name: "Admin".into(),
            email: "admin@bps.go.id".into(),
            password: "rahasia123".into(),
            instansi_id: Some(other.id),
        })
        .unwrap();
        assert!(svc.delete_instansi(other.id).is_err());
    }
}
