//! `tool-inventory` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the HTML server.
//! - `check-db` — verify the configured database is reachable.
//!
//! Database settings come from `DATABASE_USERNAME`, `DATABASE_PASSWORD`,
//! `DATABASE_NAME`, `DATABASE_SERVER` and `DATABASE_PORT`, optionally
//! loaded from a `.env` file in the working directory.

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use db::DatabaseConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tool-inventory",
    about = "Catalogue tools by category from the browser",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTML server.
    Serve {
        #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
        bind: String,

        /// Upper bound on pooled database connections.
        #[arg(long, default_value_t = 10)]
        max_connections: u32,

        /// Requests running longer than this are aborted.
        #[arg(long, default_value_t = 30)]
        request_timeout_secs: u64,
    },
    /// Connect to the configured database and run a liveness probe.
    CheckDb,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(_) => info!("No .env file found, using process environment only"),
    }

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env().context("reading database configuration")?;

    match cli.command {
        Command::Serve { bind, max_connections, request_timeout_secs } => {
            let pool = db::pool::connect_lazy(&config, max_connections)?;
            api::serve(&bind, pool, Duration::from_secs(request_timeout_secs))
                .await
                .with_context(|| format!("serving on {bind}"))?;
        }
        Command::CheckDb => {
            let pool = db::pool::connect(&config, 1).await?;
            db::pool::ping(&pool).await?;
            println!("Database {} on {}:{} is reachable", config.name, config.server, config.port);
        }
    }

    Ok(())
}
