//! Dahlia CLI - authentication gateway from the command line
//!
//! Runs sign-up, login, token refresh, logout and dice rolls directly
//! against the local user store.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dahlia_core::config::SECRETS_FILE_NAME;
use dahlia_core::db::get_db_path;
use dahlia_core::{AuthConfig, Database, Gateway, TokenService};

#[derive(Parser)]
#[command(name = "dahlia")]
#[command(author, version, about = "Authentication gateway CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override database path (or set DAHLIA_DB_PATH env var)
    #[arg(long, env = "DAHLIA_DB_PATH", global = true)]
    db: Option<String>,

    /// Secret for signing access tokens (generated next to the database if unset)
    #[arg(long, env = "DAHLIA_ACCESS_TOKEN_SECRET", global = true, hide_env_values = true)]
    access_secret: Option<String>,

    /// Secret for signing refresh tokens (generated next to the database if unset)
    #[arg(long, env = "DAHLIA_REFRESH_TOKEN_SECRET", global = true, hide_env_values = true)]
    refresh_secret: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "DAHLIA_ACCESS_TOKEN_TTL_MINUTES", global = true)]
    access_ttl_minutes: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, log in, refresh and log out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },

    /// Roll dice with an access token
    Dice {
        #[command(subcommand)]
        action: commands::dice::DiceAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Set up database path if provided
    if let Some(db_path) = &cli.db {
        std::env::set_var(dahlia_core::db::DB_PATH_ENV, db_path);
    }

    let db = Database::new().await?;

    // Each invocation is its own process, so generated secrets have to
    // outlive it for tokens to be usable by the next command
    let secrets_path = get_db_path()?.with_file_name(SECRETS_FILE_NAME);
    let config = AuthConfig::from_values_or_file(
        cli.access_secret.clone(),
        cli.refresh_secret.clone(),
        cli.access_ttl_minutes.clone(),
        &secrets_path,
    )?;

    let ctx = commands::Context {
        gateway: Gateway::new(db.users(), TokenService::new(&config)),
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Auth { action } => commands::auth::execute(&ctx, action).await,
        Commands::Dice { action } => commands::dice::execute(&ctx, action).await,
    }
}
