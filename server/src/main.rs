//! Dahlia server entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dahlia_core::{AuthConfig, Database, Gateway, TokenService};

#[derive(Parser)]
#[command(name = "dahlia-server")]
#[command(author, version, about = "Authentication gateway HTTP server", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "DAHLIA_ADDR", default_value = "127.0.0.1:8080")]
    addr: String,

    /// Override database path (or set DAHLIA_DB_PATH env var)
    #[arg(long, env = "DAHLIA_DB_PATH")]
    db: Option<String>,

    /// Secret for signing access tokens
    #[arg(long, env = "DAHLIA_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    access_secret: Option<String>,

    /// Secret for signing refresh tokens
    #[arg(long, env = "DAHLIA_REFRESH_TOKEN_SECRET", hide_env_values = true)]
    refresh_secret: Option<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "DAHLIA_ACCESS_TOKEN_TTL_MINUTES")]
    access_ttl_minutes: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let db = match args.db {
        Some(path) => Database::open(path.into()).await?,
        None => Database::new().await?,
    };

    let config = AuthConfig::from_values(
        args.access_secret,
        args.refresh_secret,
        args.access_ttl_minutes,
    )?;
    let gateway = Gateway::new(db.users(), TokenService::new(&config));
    let app = dahlia_server::create_router(Arc::new(gateway));

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    log::info!("Dahlia has been started on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
