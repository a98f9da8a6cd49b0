//! Client-side configuration, kept in `~/.sipeka/config.toml`.
//!
//! Contexts live in a name-keyed table; `current-context` picks the
//! active one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Connection details for one sipekad instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Server-side config file, when the daemon runs on this machine.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_path: String,

    /// Base URL, e.g. "http://localhost:8080".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// JWT from the last `sipeka login`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "current-context", default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, Context>,
}

impl ClientConfig {
    /// Resolve the config file location: an explicit `--config` path
    /// wins, otherwise `~/.sipeka/config.toml`.
    pub fn resolve_file(explicit: Option<&str>) -> PathBuf {
        match explicit {
            Some(p) => PathBuf::from(p),
            None => home_dir().join(".sipeka").join("config.toml"),
        }
    }

    /// A missing file is an empty config, not an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The active context, by name and value.
    pub fn active(&self) -> anyhow::Result<(&str, &Context)> {
        self.contexts
            .get_key_value(&self.current_context)
            .map(|(n, c)| (n.as_str(), c))
            .ok_or_else(|| {
                anyhow::anyhow!("no current context; run `sipeka use context <name>` first")
            })
    }

    pub fn context_mut(&mut self, name: &str) -> anyhow::Result<&mut Context> {
        self.contexts
            .get_mut(name)
            .ok_or_else(|| anyhow::anyhow!("context \"{}\" not found", name))
    }

    /// Register or replace a context. The first one registered becomes
    /// current automatically.
    pub fn put(&mut self, name: &str, ctx: Context) {
        self.contexts.insert(name.to_string(), ctx);
        if self.current_context.is_empty() {
            self.current_context = name.to_string();
        }
    }

    pub fn switch(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context \"{}\" not found; see `sipeka context list`", name);
        }
        self.current_context = name.to_string();
        Ok(())
    }

    /// Drop a context. Clears `current-context` when it pointed here.
    pub fn remove(&mut self, name: &str) -> bool {
        let found = self.contexts.remove(name).is_some();
        if found && self.current_context == name {
            self.current_context.clear();
        }
        found
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
