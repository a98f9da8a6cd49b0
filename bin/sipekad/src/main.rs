//! `sipekad` — the SIPEKA server daemon.
//!
//! Serves the dashboard pages and the JSON API over an embedded SQLite
//! database. Configuration comes from a TOML file written by
//! `sipeka context create`; `-c <name>` resolves it under `/etc/sipeka/`.

mod auth_middleware;
mod bootstrap;
mod config;
mod login;
mod routes;

use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use sipeka_core::Module;
use tracing::info;

use auth_middleware::JwtState;
use config::ServerConfig;
use routes::AppState;

#[derive(Parser, Debug)]
#[command(name = "sipekad", about = "SIPEKA server daemon")]
struct Cli {
    /// Context name or path to the server config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("loading server config from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let core_config =
        sipeka_core::ServiceConfig::new(&server_config.storage.data_dir, cli.listen.clone());
    std::fs::create_dir_all(&core_config.data_dir)?;

    let sql: Arc<dyn sipeka_sql::SQLStore> = Arc::new(
        sipeka_sql::SqliteStore::open(&core_config.sqlite_file())
            .map_err(|e| anyhow::anyhow!("cannot open database: {}", e))?,
    );

    // Module construction applies the schema and seeds the stages.
    let pendataan_module = pendataan::PendataanModule::new(Arc::clone(&sql))?;
    info!("Pendataan module initialized");

    bootstrap::ensure_root_admin(pendataan_module.service(), &server_config)?;

    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    let app_state = AppState {
        jwt_state,
        server_config: Arc::new(server_config),
        service: pendataan_module.service().clone(),
    };

    let module_routes = vec![(pendataan_module.name(), pendataan_module.routes())];
    let app = routes::build_router(app_state, module_routes);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("sipekad listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
