//! GalaSwap Offer Filler
//!
//! Main entry point. Runs a single evaluation cycle over the configured pairs:
//! fetch USD prices, pull the best offer per pair, evaluate and size it, sign
//! an authorization for profitable fills and (unless dry run) submit it.
//!
//! Configuration layers, lowest to highest precedence:
//! - built-in defaults
//! - environment / `.env` (or `--env-file`)
//! - `--limits limits.toml`
//! - CLI flags (`--pairs`, `--dry-run` / `--live`)
//!
//! Created: 2026-10-19

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use swapfill_bot::config::{self, LimitsFile};
use swapfill_bot::{load_config, load_config_from_file, FillEngine, GalaSwapClient, PayloadSigner};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// GalaSwap offer filler
#[derive(Parser)]
#[command(name = "swapfill-bot")]
struct Args {
    /// Env file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// TOML file overriding risk limits / pairs
    #[arg(long, env = "LIMITS_FILE")]
    limits: Option<PathBuf>,

    /// Comma-separated pairs (A>B), overrides PAIRS
    #[arg(long)]
    pairs: Option<String>,

    /// Force dry run (sign, never submit)
    #[arg(long, conflicts_with = "live")]
    dry_run: bool,

    /// Force live submission
    #[arg(long)]
    live: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    info!("===========================================");
    info!("   GalaSwap Offer Filler");
    info!("===========================================");

    let mut config = match &args.env_file {
        Some(path) => load_config_from_file(path)?,
        None => load_config()?,
    };

    if let Some(path) = &args.limits {
        config = LimitsFile::load(path)?.apply(config)?;
        info!("Limits overlay loaded from {}", path.display());
    }
    if let Some(pairs) = &args.pairs {
        config.pairs = config::parse_pairs(pairs)?;
    }
    if args.dry_run {
        config.dry_run = true;
    } else if args.live {
        config.dry_run = false;
    }
    config::validate(&config)?;

    info!("Configuration loaded: {:?}", config);

    let signer = PayloadSigner::from_hex(&config.private_key).context("PRIVATE_KEY rejected")?;
    let venue = GalaSwapClient::new(&config.api_base_url, &config.wallet_address);
    let engine = FillEngine::new(venue, config, signer);

    let report = engine.run_cycle().await;
    info!(
        "Done. started_at={} accepted={} skipped={} failed={}",
        report.started_at.to_rfc3339(),
        report.accepted(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}
