//! `sipeka` — command line client for the SIPEKA daemon.
//!
//! Provisions deployments (`context create`), handles login, and runs
//! CRUD against the `/api` resources from the shell.

mod commands;
mod config;

use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};

use commands::resource::Resource;
use config::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "sipeka", about = "SIPEKA command line client")]
struct Cli {
    /// Client config file (default: ~/.sipeka/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format for `get`.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value = "table")]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the active context.
    Use {
        #[command(subcommand)]
        target: UseTarget,
    },

    /// Authenticate against the active context's server.
    Login {
        /// Account email; prompted for when omitted.
        #[arg(long)]
        email: Option<String>,
        /// Password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the saved token.
    Logout,

    /// Fetch one resource by id, or list them.
    Get {
        #[arg(value_enum)]
        resource: Resource,
        id: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Create a resource from a JSON body.
    Create {
        #[arg(value_enum)]
        resource: Resource,
        /// Inline JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read the JSON body from a file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource (PUT) from a JSON body.
    Update {
        #[arg(value_enum)]
        resource: Resource,
        id: String,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource by id.
    Delete {
        #[arg(value_enum)]
        resource: Resource,
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show the active context and whether its server answers.
    Status,

    /// Print the client version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Provision a deployment and register it as a context.
    Create {
        name: String,
        /// Directory for the generated server config.
        #[arg(long, default_value = "/etc/sipeka")]
        config_dir: String,
        /// Data directory (default: /var/lib/sipeka/<name>).
        #[arg(long)]
        data_dir: Option<String>,
        /// Root password; prompted for interactively when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// List registered contexts.
    List,
    /// Change properties of a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Forget a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseTarget {
    Context { name: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = ClientConfig::resolve_file(cli.config.as_deref());
    run(cli, &path)
}

fn run(cli: Cli, path: &Path) -> anyhow::Result<()> {
    match cli.command {
        Command::Context { action } => match action {
            ContextAction::Create {
                name,
                config_dir,
                data_dir,
                password,
            } => {
                let data_dir =
                    data_dir.unwrap_or_else(|| format!("/var/lib/sipeka/{}", name));
                let password = match password {
                    Some(p) => p,
                    None => prompt_new_password()?,
                };
                if password.is_empty() {
                    anyhow::bail!("password must not be empty");
                }
                commands::context::create(path, &name, &config_dir, &data_dir, &password)
            }
            ContextAction::List => commands::context::list(path),
            ContextAction::Set { name, server } => {
                commands::context::set(path, &name, server.as_deref())
            }
            ContextAction::Delete { name } => commands::context::delete(path, &name),
        },

        Command::Use {
            target: UseTarget::Context { name },
        } => commands::context::use_context(path, &name),

        Command::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt_line("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::login::login(path, &email, &password)
        }

        Command::Logout => commands::login::logout(path),

        Command::Get {
            resource,
            id,
            limit,
            offset,
        } => {
            let config = ClientConfig::load(path)?;
            commands::resource::get(
                &config,
                resource,
                id.as_deref(),
                limit,
                offset,
                cli.output == Output::Json,
            )
        }

        Command::Create {
            resource,
            json_body,
            file,
        } => {
            let body = match (json_body, file) {
                (_, Some(f)) => std::fs::read_to_string(&f)?,
                (Some(j), None) => j,
                (None, None) => anyhow::bail!("provide --json or -f <file>"),
            };
            let config = ClientConfig::load(path)?;
            commands::resource::create(&config, resource, &body)
        }

        Command::Update {
            resource,
            id,
            json_body,
        } => {
            let config = ClientConfig::load(path)?;
            commands::resource::update(&config, resource, &id, &json_body)
        }

        Command::Delete { resource, id, yes } => {
            if !yes && !confirm(&format!("delete {} {}? [y/N]: ", resource.label(), id))? {
                println!("cancelled");
                return Ok(());
            }
            let config = ClientConfig::load(path)?;
            commands::resource::delete(&config, resource, &id)
        }

        Command::Status => {
            let config = ClientConfig::load(path)?;
            commands::resource::status(&config)
        }

        Command::Version => {
            println!("sipeka {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn prompt_line(label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_new_password() -> anyhow::Result<String> {
    let password = rpassword::prompt_password("Root password: ")?;
    let again = rpassword::prompt_password("Confirm root password: ")?;
    if password != again {
        anyhow::bail!("passwords do not match");
    }
    Ok(password)
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    Ok(prompt_line(question)?.eq_ignore_ascii_case("y"))
}
