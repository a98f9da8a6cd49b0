//! Bootstrap — first-start checks and root admin creation.
//!
//! When sipekad starts:
//! 1. Verify the config has a root password hash — if not, refuse to start.
//! 2. Ensure the root superadmin pengguna row exists and carries the
//!    configured hash.

use std::sync::Arc;

use tracing::info;

use pendataan::service::PendataanService;

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.root.password_hash.is_empty() {
        anyhow::bail!(
            "No root password hash found in configuration.\n\
             Run `sipeka context create <name>` to set up the server first."
        );
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Ensure the root superadmin row exists. The config hash wins over
/// whatever the database holds.
pub fn ensure_root_admin(
    svc: &Arc<PendataanService>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let root = svc
        .ensure_root("Root", &config.root.email, &config.root.password_hash)
        .map_err(|e| anyhow::anyhow!("failed to ensure root admin: {}", e))?;
    info!("Root admin ready (id {})", root.id);
    Ok(())
}
