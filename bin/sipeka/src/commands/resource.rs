//! Resource commands: get, create, update, delete, status.
//!
//! `sipeka get kebijakan`, `sipeka create enumerator --json ...` and
//! friends, all routed through the daemon's `/api` endpoints.

use anyhow::Result;

use crate::commands::session::Session;
use crate::config::ClientConfig;

/// The resource kinds the daemon exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Resource {
    Enumerator,
    Instansi,
    Kebijakan,
}

impl Resource {
    fn base_path(self) -> &'static str {
        match self {
            Resource::Enumerator => "/api/enumerator",
            Resource::Instansi => "/api/instansi",
            Resource::Kebijakan => "/api/kebijakan",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Enumerator => "enumerator",
            Resource::Instansi => "instansi",
            Resource::Kebijakan => "kebijakan",
        }
    }

    fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.base_path(), id)
    }
}

pub fn get(
    config: &ClientConfig,
    resource: Resource,
    id: Option<&str>,
    limit: Option<usize>,
    offset: Option<usize>,
    as_json: bool,
) -> Result<()> {
    let session = Session::open(config)?;

    let body = match id {
        Some(id) => session.get(&resource.item_path(id))?,
        None => {
            let mut query = Vec::new();
            if let Some(l) = limit {
                query.push(format!("limit={}", l));
            }
            if let Some(o) = offset {
                query.push(format!("offset={}", o));
            }
            let path = if query.is_empty() {
                resource.base_path().to_string()
            } else {
                format!("{}?{}", resource.base_path(), query.join("&"))
            };
            session.get(&path)?
        }
    };

    print_body(&body, as_json)
}

pub fn create(config: &ClientConfig, resource: Resource, json_body: &str) -> Result<()> {
    let body = parse_json(json_body)?;
    let session = Session::open(config)?;
    let created = session.post(resource.base_path(), &body)?;
    println!("{} created.", resource.label());
    print_body(&created, true)
}

pub fn update(config: &ClientConfig, resource: Resource, id: &str, json_body: &str) -> Result<()> {
    let body = parse_json(json_body)?;
    let session = Session::open(config)?;
    let updated = session.put(&resource.item_path(id), &body)?;
    println!("{} {} updated.", resource.label(), id);
    print_body(&updated, true)
}

pub fn delete(config: &ClientConfig, resource: Resource, id: &str) -> Result<()> {
    let session = Session::open(config)?;
    session.delete(&resource.item_path(id))?;
    println!("{} {} deleted.", resource.label(), id);
    Ok(())
}

/// Print the active context and whether its server answers `/health`.
pub fn status(config: &ClientConfig) -> Result<()> {
    let (name, ctx) = config.active()?;
    println!("context: {}", name);

    if ctx.server.is_empty() {
        println!("server:  (not set)");
        return Ok(());
    }
    println!("server:  {}", ctx.server);

    let session = Session::for_context(name, ctx)?;
    match session.ping() {
        Ok(status) if status.is_success() => println!("health:  ok"),
        Ok(status) => println!("health:  {}", status),
        Err(e) => println!("health:  unreachable ({})", e),
    }
    Ok(())
}

fn parse_json(text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| anyhow::anyhow!("invalid JSON body: {}", e))
}

fn print_body(body: &serde_json::Value, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(body)?);
        return Ok(());
    }
    match body {
        serde_json::Value::Array(rows) => print_table(rows),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// Columnar output for list responses. Column set comes from the first
/// row; nested values render as compact JSON.
fn print_table(rows: &[serde_json::Value]) {
    let Some(serde_json::Value::Object(first)) = rows.first() else {
        println!("(no rows)");
        return;
    };

    let headers: Vec<&String> = first.keys().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());

    for row in rows {
        let rendered: Vec<String> = headers
            .iter()
            .map(|h| cell_text(row.get(h.as_str())))
            .collect();
        for (i, c) in rendered.iter().enumerate() {
            widths[i] = widths[i].max(c.len());
        }
        cells.push(rendered);
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<1$}", h.to_uppercase(), *w))
        .collect();
    println!("{}", header_line.join("  "));
    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<1$}", c, *w))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
