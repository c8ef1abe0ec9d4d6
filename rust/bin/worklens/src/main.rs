//! `worklens` — operator CLI.
//!
//! Sets up server configuration and performs offline CSV data imports
//! against the review database.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// WorkLens CLI tool.
#[derive(Parser, Debug)]
#[command(name = "worklens", about = "WorkLens operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Context management (server config files).
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Import companies (and optionally reviews) from CSV files.
    Import {
        /// Path to the SQLite database file.
        #[arg(long)]
        db: PathBuf,
        /// Companies CSV.
        #[arg(long)]
        companies: PathBuf,
        /// Reviews CSV (references companies by slug).
        #[arg(long)]
        reviews: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a server config file (sets the root password).
    Create {
        /// Context name — the config lands at `{config_dir}/{name}.toml`.
        name: String,
        /// Server config directory.
        #[arg(long, default_value = "/etc/worklens")]
        config_dir: String,
        /// Data directory (default: /var/lib/worklens/<name>).
        #[arg(long)]
        data_dir: Option<String>,
        /// Public site host (for internal-link classification).
        #[arg(long, default_value = "localhost:8080")]
        site_host: String,
        /// Root password (non-interactive, for CI/automation).
        /// If not provided, will prompt interactively.
        #[arg(long)]
        password: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create {
                name,
                config_dir,
                data_dir,
                site_host,
                password,
            } => {
                let data_dir =
                    data_dir.unwrap_or_else(|| format!("/var/lib/worklens/{}", name));

                let password = if let Some(p) = password {
                    // Non-interactive mode (CI/automation).
                    if p.is_empty() {
                        anyhow::bail!("Password cannot be empty.");
                    }
                    p
                } else {
                    let pw = rpassword::prompt_password("Enter root password: ")?;
                    let confirm = rpassword::prompt_password("Confirm root password: ")?;
                    if pw != confirm {
                        anyhow::bail!("Passwords do not match.");
                    }
                    if pw.is_empty() {
                        anyhow::bail!("Password cannot be empty.");
                    }
                    pw
                };

                commands::context::create(&name, &config_dir, &data_dir, &site_host, &password)?;
            }
        },

        Commands::Import { db, companies, reviews } => {
            commands::import::run(&db, &companies, reviews.as_deref())?;
        }
    }

    Ok(())
}
