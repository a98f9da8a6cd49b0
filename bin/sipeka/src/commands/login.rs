//! Login and logout against the active context.

use std::path::Path;

use anyhow::Result;

use crate::commands::session::Session;
use crate::config::ClientConfig;

/// POST `/auth/login` and stash the returned token in the context.
pub fn login(client_path: &Path, email: &str, password: &str) -> Result<()> {
    let mut config = ClientConfig::load(client_path)?;
    let session = Session::open(&config)?;

    let body = session.post(
        "/auth/login",
        &serde_json::json!({ "email": email, "password": password }),
    )?;
    let token = body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("login response carried no access_token"))?
        .to_string();

    let name = session.context_name.clone();
    config.context_mut(&name)?.token = token;
    config.save(client_path)?;

    println!("logged in as {} (context \"{}\")", email, name);
    Ok(())
}

/// Drop the saved token from the active context.
pub fn logout(client_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_path)?;
    let name = config.active()?.0.to_string();

    config.context_mut(&name)?.token.clear();
    config.save(client_path)?;

    println!("logged out of context \"{}\"", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Context;

    #[test]
    fn test_logout_clears_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ClientConfig::default();
        config.put(
            "a",
            Context {
                token: "tok".to_string(),
                ..Default::default()
            },
        );
        config.save(&path).unwrap();

        logout(&path).unwrap();
        let back = ClientConfig::load(&path).unwrap();
        assert!(back.contexts["a"].token.is_empty());
    }

    #[test]
    fn test_logout_without_context_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(logout(&path).is_err());
    }
}
