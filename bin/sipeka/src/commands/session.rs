//! One authenticated HTTP session against the active context's server.

use anyhow::Result;

use crate::config::{ClientConfig, Context};

#[derive(Debug)]
pub struct Session {
    pub context_name: String,
    base: String,
    http: reqwest::blocking::Client,
}

impl Session {
    /// Open a session for the active context.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let (name, ctx) = config.active()?;
        Self::for_context(name, ctx)
    }

    /// Open a session for a specific context. The saved token, when
    /// present, rides along as a default Bearer header.
    pub fn for_context(name: &str, ctx: &Context) -> Result<Self> {
        if ctx.server.is_empty() {
            anyhow::bail!(
                "context \"{}\" has no server URL; set one with `sipeka context set {} --server <url>`",
                name,
                name
            );
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if !ctx.token.is_empty() {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", ctx.token))?,
            );
        }

        Ok(Self {
            context_name: name.to_string(),
            base: ctx.server.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::builder()
                .default_headers(headers)
                .build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn get(&self, path: &str) -> Result<serde_json::Value> {
        self.run(self.http.get(self.url(path)))
    }

    pub fn post(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        self.run(self.http.post(self.url(path)).json(body))
    }

    pub fn put(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        self.run(self.http.put(self.url(path)).json(body))
    }

    pub fn delete(&self, path: &str) -> Result<serde_json::Value> {
        self.run(self.http.delete(self.url(path)))
    }

    /// Probe `/health` without turning a bad status into an error.
    pub fn ping(&self) -> Result<reqwest::StatusCode> {
        let resp = self.http.get(self.url("/health")).send()?;
        Ok(resp.status())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn run(&self, req: reqwest::blocking::RequestBuilder) -> Result<serde_json::Value> {
        let resp = req
            .send()
            .map_err(|e| anyhow::anyhow!("request failed: {}", e))?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
        if !status.is_success() {
            anyhow::bail!("server returned {}: {}", status, server_message(&body));
        }
        Ok(body)
    }
}

/// The daemon answers with either a `message` or an `error` field
/// depending on the endpoint.
fn server_message(body: &serde_json::Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_envelopes() {
        let m = serde_json::json!({ "message": "agency_id is required" });
        assert_eq!(server_message(&m), "agency_id is required");
        let e = serde_json::json!({ "error": "missing authorization token" });
        assert_eq!(server_message(&e), "missing authorization token");
        assert_eq!(server_message(&serde_json::Value::Null), "unknown error");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let ctx = Context {
            server: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        let session = Session::for_context("x", &ctx).unwrap();
        assert_eq!(session.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_server_url_required() {
        let err = Session::for_context("kosong", &Context::default()).unwrap_err();
        assert!(err.to_string().contains("no server URL"));
    }
}
