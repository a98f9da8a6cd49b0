use sipeka_core::{ListParams, ListResult, now_rfc3339};
use sipeka_sql::{Row, Value};

use crate::model::{
    CreateAdmin, CreateEnumerator, Enumerator, InstansiEnumerator, Pengguna, UpdateEnumerator,
    PERAN_ADMIN_INSTANSI, PERAN_ENUMERATOR, PERAN_SUPERADMIN,
};
use crate::service::{text_or_null, PendataanError, PendataanService};

const USER_COLS: &str =
    "id, name, email, password_hash, peran, nip, unit_kerja, agency_id, created_at, updated_at";

impl PendataanService {
    /// Create a new enumerator under an agency.
    pub fn create_enumerator(&self, input: CreateEnumerator) -> Result<Pengguna, PendataanError> {
        if input.name.trim().is_empty() {
            return Err(PendataanError::Validation("name is required".into()));
        }
        if input.email.trim().is_empty() {
            return Err(PendataanError::Validation("email is required".into()));
        }

        let password_hash = match input.password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash_password(p)?),
            _ => None,
        };

        let now = now_rfc3339();
        let id = self.insert(
            "INSERT INTO users (name, email, password_hash, peran, nip, unit_kerja, agency_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            &[
                Value::Text(input.name),
                Value::Text(input.email),
                text_or_null(&password_hash),
                Value::Integer(PERAN_ENUMERATOR),
                text_or_null(&input.nip),
                text_or_null(&input.unit_kerja),
                Value::Integer(input.instansi_id),
                Value::Text(now.clone()),
                Value::Text(now),
            ],
        )?;

        self.get_pengguna(id)
    }

    /// Create an agency admin (role class 4).
    pub fn create_admin(&self, input: CreateAdmin) -> Result<Pengguna, PendataanError> {
        if input.name.trim().is_empty() {
            return Err(PendataanError::Validation("name is required".into()));
        }
        if input.email.trim().is_empty() {
            return Err(PendataanError::Validation("email is required".into()));
        }
        if input.password.is_empty() {
            return Err(PendataanError::Validation("password is required".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let now = now_rfc3339();
        let id = self.insert(
            "INSERT INTO users (name, email, password_hash, peran, agency_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            &[
                Value::Text(input.name),
                Value::Text(input.email),
                Value::Text(password_hash),
                Value::Integer(PERAN_ADMIN_INSTANSI),
                match input.instansi_id {
                    Some(i) => Value::Integer(i),
                    None => Value::Null,
                },
                Value::Text(now.clone()),
                Value::Text(now),
            ],
        )?;

        self.get_pengguna(id)
    }

    /// Ensure the root superadmin row exists with the given hash.
    ///
    /// The hash comes from the server config file, which stays the source
    /// of truth: if the stored row differs, it is brought in line.
    pub fn ensure_root(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Pengguna, PendataanError> {
        if let Some(existing) = self.find_pengguna_by_email(email)? {
            if existing.password_hash.as_deref() != Some(password_hash) {
                self.exec(
                    "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
                    &[
                        Value::Text(password_hash.to_string()),
                        Value::Text(now_rfc3339()),
                        Value::Integer(existing.id),
                    ],
                )?;
            }
            return self.get_pengguna(existing.id);
        }

        let now = now_rfc3339();
        let id = self.insert(
            "INSERT INTO users (name, email, password_hash, peran, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            &[
                Value::Text(name.to_string()),
                Value::Text(email.to_string()),
                Value::Text(password_hash.to_string()),
                Value::Integer(PERAN_SUPERADMIN),
                Value::Text(now.clone()),
                Value::Text(now),
            ],
        )?;
        self.get_pengguna(id)
    }

    /// Get a user by id.
    pub fn get_pengguna(&self, id: i64) -> Result<Pengguna, PendataanError> {
        let rows = self.query(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
            &[Value::Integer(id)],
        )?;
        let row = rows
            .first()
            .ok_or_else(|| PendataanError::NotFound(format!("pengguna {} not found", id)))?;
        pengguna_from_row(row)
    }

    /// Get an enumerator by id. Other role classes read as absent.
    pub fn get_enumerator(&self, id: i64) -> Result<Pengguna, PendataanError> {
        let pengguna = self.get_pengguna(id)?;
        if pengguna.peran != PERAN_ENUMERATOR {
            return Err(PendataanError::NotFound(format!(
                "enumerator {} not found",
                id
            )));
        }
        Ok(pengguna)
    }

    /// Find a user by login email.
    pub fn find_pengguna_by_email(&self, email: &str) -> Result<Option<Pengguna>, PendataanError> {
        let rows = self.query(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
            &[Value::Text(email.to_string())],
        )?;
        rows.first().map(pengguna_from_row).transpose()
    }

    /// List enumerators with pagination, ordered by name.
    pub fn list_enumerator(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<Pengguna>, PendataanError> {
        let count_rows = self.query(
            "SELECT COUNT(*) AS cnt FROM users WHERE peran = ?1",
            &[Value::Integer(PERAN_ENUMERATOR)],
        )?;
        let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let (limit, offset) = params.page();
        let rows = self.query(
            &format!(
                "SELECT {} FROM users WHERE peran = ?1 ORDER BY name LIMIT ?2 OFFSET ?3",
                USER_COLS
            ),
            &[
                Value::Integer(PERAN_ENUMERATOR),
                Value::Integer(limit),
                Value::Integer(offset),
            ],
        )?;
        let items = rows
            .iter()
            .map(pengguna_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    /// Update an enumerator. Absent fields are left unchanged.
    pub fn update_enumerator(
        &self,
        id: i64,
        input: UpdateEnumerator,
    ) -> Result<Pengguna, PendataanError> {
        self.get_enumerator(id)?;

        let mut sets = vec!["updated_at = ?1".to_string()];
        let mut params = vec![Value::Text(now_rfc3339())];

        for (col, val) in [
            ("name", &input.name),
            ("email", &input.email),
            ("nip", &input.nip),
            ("unit_kerja", &input.unit_kerja),
        ] {
            if let Some(v) = val {
                let idx = params.len() + 1;
                sets.push(format!("{} = ?{}", col, idx));
                params.push(Value::Text(v.clone()));
            }
        }

        let id_idx = params.len() + 1;
        params.push(Value::Integer(id));

        let sql = format!("UPDATE users SET {} WHERE id = ?{}", sets.join(", "), id_idx);
        self.exec(&sql, &params)?;

        self.get_pengguna(id)
    }

    /// Delete an enumerator. Policies assigned to them fall back to
    /// unassigned through the schema's ON DELETE SET NULL.
    pub fn delete_enumerator(&self, id: i64) -> Result<(), PendataanError> {
        let affected = self.exec(
            "DELETE FROM users WHERE id = ?1 AND peran = ?2",
            &[Value::Integer(id), Value::Integer(PERAN_ENUMERATOR)],
        )?;
        if affected == 0 {
            return Err(PendataanError::NotFound(format!(
                "enumerator {} not found",
                id
            )));
        }
        Ok(())
    }

    /// The enumerator listing the dashboard fetches: resolve the admin's
    /// agency and return it with its enumerators nested, ordered by name.
    ///
    /// An unknown admin, or one without an agency, yields an empty list;
    /// an agency without enumerators yields one element whose
    /// `enumerator` list is empty.
    pub fn enumerator_by_admin(
        &self,
        admin_id: i64,
    ) -> Result<Vec<InstansiEnumerator>, PendataanError> {
        let rows = self.query(
            "SELECT a.id AS id, a.name AS name
             FROM users u
             JOIN agencies a ON a.id = u.agency_id
             WHERE u.id = ?1",
            &[Value::Integer(admin_id)],
        )?;
        let Some(agency) = rows.first() else {
            return Ok(Vec::new());
        };
        let agency_id = agency
            .get_i64("id")
            .ok_or_else(|| PendataanError::Internal("agency row missing id".into()))?;
        let agency_name = agency
            .get_str("name")
            .ok_or_else(|| PendataanError::Internal("agency row missing name".into()))?
            .to_string();

        let enum_rows = self.query(
            "SELECT id, name, nip, unit_kerja FROM users
             WHERE agency_id = ?1 AND peran = ?2
             ORDER BY name",
            &[Value::Integer(agency_id), Value::Integer(PERAN_ENUMERATOR)],
        )?;

        let mut enumerator = Vec::with_capacity(enum_rows.len());
        for row in &enum_rows {
            enumerator.push(Enumerator {
                id: row
                    .get_i64("id")
                    .ok_or_else(|| PendataanError::Internal("user row missing id".into()))?,
                name: row.get_str("name").unwrap_or_default().to_string(),
                nip: row.get_str("nip").map(str::to_string),
                unit_kerja: row.get_str("unit_kerja").map(str::to_string),
            });
        }

        Ok(vec![InstansiEnumerator {
            id: agency_id,
            name: agency_name,
            enumerator,
        }])
    }
}

/// Verify a login attempt against a stored argon2id hash.
pub fn verify_password(pengguna: &Pengguna, password: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    let Some(hash) = pengguna.password_hash.as_deref() else {
        return false;
    };
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn hash_password(password: &str) -> Result<String, PendataanError> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PendataanError::Internal(format!("failed to hash password: {}", e)))
}

fn pengguna_from_row(row: &Row) -> Result<Pengguna, PendataanError> {
    Ok(Pengguna {
        id: row
            .get_i64("id")
            .ok_or_else(|| PendataanError::Internal("user row missing id".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| PendataanError::Internal("user row missing name".into()))?
            .to_string(),
        email: row
            .get_str("email")
            .ok_or_else(|| PendataanError::Internal("user row missing email".into()))?
            .to_string(),
        peran: row
            .get_i64("peran")
            .ok_or_else(|| PendataanError::Internal("user row missing peran".into()))?,
        nip: row.get_str("nip").map(str::to_string),
        unit_kerja: row.get_str("unit_kerja").map(str::to_string),
        instansi_id: row.get_i64("agency_id"),
        password_hash: row.get_str("password_hash").map(str::to_string),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
        updated_at: row.get_str("updated_at").unwrap_or_default().to_string(),
    })
}
