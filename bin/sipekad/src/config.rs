//! Server-side configuration.
//!
//! Reads the TOML file a context points at, usually
//! `/etc/sipeka/<name>.toml` written by `sipeka context create`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Root account section.
#[derive(Debug, Clone, Deserialize)]
pub struct RootConfig {
    /// Argon2id hash of the root password.
    pub password_hash: String,

    /// Login email of the root account.
    #[serde(default = "default_root_email")]
    pub email: String,
}

fn default_root_email() -> String {
    "root@sipeka.local".to_string()
}

/// Storage section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

/// JWT section.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing secret.
    pub secret: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

fn default_expire_secs() -> u64 {
    86400
}

/// Full server configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub root: RootConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A bare name maps to `/etc/sipeka/<name>.toml`; anything containing
    /// a `/` or `.` is treated as a path and used directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/sipeka").join(format!("{}.toml", name_or_path))
        }
    }

    /// Load and parse the config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("cannot read config {}: {}", path.display(), e)
        })?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }
}
