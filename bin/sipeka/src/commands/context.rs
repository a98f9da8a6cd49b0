//! Context commands: create, list, set, delete, use.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::config::{ClientConfig, Context};

/// The server-side config file `sipeka context create` writes out,
/// mirroring what sipekad expects to load.
#[derive(Serialize)]
struct ServerFile {
    root: RootSection,
    storage: StorageSection,
    jwt: JwtSection,
}

#[derive(Serialize)]
struct RootSection {
    password_hash: String,
    email: String,
}

#[derive(Serialize)]
struct StorageSection {
    data_dir: String,
}

#[derive(Serialize)]
struct JwtSection {
    secret: String,
    expire_secs: u64,
}

/// Provision a new deployment: hash the root password, mint a JWT
/// secret, write the server config and register the context.
pub fn create(
    client_path: &Path,
    name: &str,
    config_dir: &str,
    data_dir: &str,
    root_password: &str,
) -> Result<()> {
    let server_file = ServerFile {
        root: RootSection {
            password_hash: hash_root_password(root_password)?,
            email: "root@sipeka.local".to_string(),
        },
        storage: StorageSection {
            data_dir: data_dir.to_string(),
        },
        jwt: JwtSection {
            secret: fresh_jwt_secret(),
            expire_secs: 86400,
        },
    };

    let server_path = PathBuf::from(config_dir).join(format!("{}.toml", name));
    std::fs::create_dir_all(config_dir)?;
    std::fs::write(&server_path, toml::to_string_pretty(&server_file)?)?;
    std::fs::create_dir_all(data_dir)?;

    let mut config = ClientConfig::load(client_path)?;
    config.put(
        name,
        Context {
            config_path: server_path.to_string_lossy().into_owned(),
            ..Default::default()
        },
    );
    config.save(client_path)?;

    println!("context \"{}\" created", name);
    println!("  server config: {}", server_path.display());
    println!("  data dir:      {}", data_dir);
    Ok(())
}

pub fn list(client_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_path)?;
    if config.contexts.is_empty() {
        println!("no contexts; run `sipeka context create <name>`");
        return Ok(());
    }

    println!("  {:<20} {:<36} CONFIG", "NAME", "SERVER");
    for (name, ctx) in &config.contexts {
        let marker = if *name == config.current_context { "*" } else { " " };
        println!(
            "{} {:<20} {:<36} {}",
            marker,
            name,
            or_dash(&ctx.server),
            or_dash(&ctx.config_path),
        );
    }
    Ok(())
}

pub fn set(client_path: &Path, name: &str, server: Option<&str>) -> Result<()> {
    let mut config = ClientConfig::load(client_path)?;
    let ctx = config.context_mut(name)?;
    if let Some(url) = server {
        ctx.server = url.to_string();
    }
    config.save(client_path)?;
    println!("context \"{}\" updated", name);
    Ok(())
}

/// Forget a context. The server config file stays on disk.
pub fn delete(client_path: &Path, name: &str) -> Result<()> {
    let mut config = ClientConfig::load(client_path)?;
    if !config.remove(name) {
        anyhow::bail!("context \"{}\" not found", name);
    }
    config.save(client_path)?;
    println!("context \"{}\" deleted", name);
    Ok(())
}

pub fn use_context(client_path: &Path, name: &str) -> Result<()> {
    let mut config = ClientConfig::load(client_path)?;
    config.switch(name)?;
    config.save(client_path)?;
    println!("switched to context \"{}\"", name);
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn hash_root_password(password: &str) -> Result<String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))
}

/// 32 random bytes, hex-encoded.
fn fresh_jwt_secret() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
