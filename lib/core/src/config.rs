use std::path::{Path, PathBuf};

/// Storage locations a service binary hands to the SQL layer.
///
/// The daemon fills this in from its TOML config and command line; the
/// only derived value is where the SQLite file lives.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the service's persistent data.
    pub data_dir: PathBuf,

    /// Explicit SQLite file location, when not `{data_dir}/data.sqlite`.
    pub sqlite_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl ServiceConfig {
    pub fn new(data_dir: impl Into<PathBuf>, listen: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sqlite_path: None,
            listen: listen.into(),
        }
    }

    /// The SQLite file to open: the override if set, otherwise
    /// `data.sqlite` under the data directory.
    pub fn sqlite_file(&self) -> PathBuf {
        match &self.sqlite_path {
            Some(p) => p.clone(),
            None => self.data_dir.join("data.sqlite"),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(Path::new("."), "0.0.0.0:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_file_under_data_dir() {
        let config = ServiceConfig::new("/var/lib/sipeka/prod", "0.0.0.0:8080");
        assert_eq!(
            config.sqlite_file(),
            PathBuf::from("/var/lib/sipeka/prod/data.sqlite")
        );
    }

    #[test]
    fn explicit_sqlite_path_wins() {
        let mut config = ServiceConfig::new("/data", "0.0.0.0:8080");
        config.sqlite_path = Some(PathBuf::from("/elsewhere/db.sqlite"));
        assert_eq!(config.sqlite_file(), PathBuf::from("/elsewhere/db.sqlite"));
    }

    #[test]
    fn default_listen_address() {
        assert_eq!(ServiceConfig::default().listen, "0.0.0.0:8080");
    }
}
