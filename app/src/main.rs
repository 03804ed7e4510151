// In app/src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod commands;
mod inputs;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Validates generated option-trade candidates against risk limits and tracks their performance."
)]
struct Cli {
    /// Directory holding `base.toml` and the per-environment overrides.
    #[arg(long, global = true, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalizes model output, validates it and records accepted candidates.
    Ingest {
        /// File with the raw model output. Use "-" for stdin.
        #[arg(short, long)]
        input: PathBuf,

        /// JSON portfolio snapshot the candidates are validated against.
        #[arg(short, long)]
        portfolio: Option<PathBuf>,

        /// Standalone TOML file overriding the configured risk limits.
        #[arg(long)]
        limits: Option<PathBuf>,
    },

    /// Marks a pending recommendation as executed.
    Execute {
        id: String,

        /// Keep the recommendation pending instead.
        #[arg(long)]
        undo: bool,
    },

    /// Records the realized profit of an executed recommendation.
    Close {
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        profit: f64,
    },

    /// Prints performance metrics for a date range.
    Metrics {
        /// Start date in YYYY-MM-DD format. Defaults to 30 days before the end.
        #[arg(long)]
        start: Option<String>,

        /// End date (inclusive) in YYYY-MM-DD format. Defaults to now.
        #[arg(long)]
        end: Option<String>,
    },

    /// Prints the most recent recommendations of the current month.
    History {
        /// How many records to show; 0 shows the whole month.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Expires pending recommendations that were never acted on.
    Expire {
        /// Age in hours after which a pending recommendation expires.
        #[arg(long)]
        hours: Option<u64>,
    },

    /// Prints portfolio risk metrics for a set of positions.
    Exposure {
        /// JSON file with a position list or a full portfolio snapshot.
        #[arg(long)]
        positions: PathBuf,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings_from(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;

    // --- Tracing Setup ---
    // Logs go to stderr so command output on stdout stays machine-readable.
    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Ingest {
            input,
            portfolio,
            limits,
        } => {
            commands::handle_ingest(&settings, input, portfolio, limits).await?;
        }
        Commands::Execute { id, undo } => {
            commands::handle_execute(&settings, &id, !undo).await?;
        }
        Commands::Close { id, profit } => {
            commands::handle_close(&settings, &id, profit).await?;
        }
        Commands::Metrics { start, end } => {
            commands::handle_metrics(&settings, start, end).await?;
        }
        Commands::History { limit } => {
            commands::handle_history(&settings, limit).await?;
        }
        Commands::Expire { hours } => {
            commands::handle_expire(&settings, hours).await?;
        }
        Commands::Exposure { positions } => {
            commands::handle_exposure(positions)?;
        }
    }

    Ok(())
}
