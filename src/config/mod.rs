//! Configuration management
//!
//! Settings come from the environment (optionally seeded from a `.env` file),
//! then an optional TOML limits file, then CLI flags. The result is validated
//! once and never changes afterwards.
//!
//! Created: 2026-10-19

pub mod toml_limits;

use crate::token_class;
use crate::types::{RiskLimits, TokenClass, TradingPair};
use crate::venue::http::DEFAULT_API_BASE_URL;
use anyhow::{bail, Context, Result};
use std::path::Path;

// Re-export BotConfig for external access
pub use crate::types::BotConfig;
pub use toml_limits::LimitsFile;

pub const DEFAULT_PAIRS: &str = "GALA>SILK,GALA>GUSDC";
pub const DEFAULT_FEE_TOKEN: &str = "GALA|Unit|none|none";

/// Load from the process environment, reading `.env` if present
pub fn load_config() -> Result<BotConfig> {
    dotenv::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Load from a specific env file; process variables already set take precedence
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<BotConfig> {
    let path = path.as_ref();
    dotenv::from_path(path)
        .with_context(|| format!("Failed to load env file: {}", path.display()))?;
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any key lookup. Empty values count as unset.
pub fn config_from_lookup<F>(lookup: F) -> Result<BotConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let defaults = RiskLimits::default();
    let limits = RiskLimits {
        min_edge_bps: parse_or(&get, "MIN_EDGE_BPS", defaults.min_edge_bps)?,
        max_notional_usd: parse_or(&get, "MAX_NOTIONAL_USD", defaults.max_notional_usd)?,
        max_uses_per_trade: parse_or(&get, "MAX_USES_PER_TRADE", defaults.max_uses_per_trade)?,
        min_per_use_usd: parse_or(&get, "MIN_PER_USE_USD", defaults.min_per_use_usd)?,
    };

    let pairs = parse_pairs(&get("PAIRS").unwrap_or_else(|| DEFAULT_PAIRS.to_string()))?;

    let fee_token_symbol = get("FEE_TOKEN").unwrap_or_else(|| DEFAULT_FEE_TOKEN.to_string());
    let fee_token: TokenClass = token_class::parse(&fee_token_symbol)
        .with_context(|| format!("Invalid FEE_TOKEN: {}", fee_token_symbol))?;

    let config = BotConfig {
        api_base_url: get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        wallet_address: get("WALLET_ADDRESS").context("WALLET_ADDRESS not set")?,
        private_key: get("PRIVATE_KEY").context("PRIVATE_KEY not set")?,
        signer_public_key: get("SIGNER_PUBLIC_KEY"),
        pairs,
        limits,
        fee_token,
        dry_run: get("DRY_RUN")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true),
    };

    validate(&config)?;
    Ok(config)
}

/// Comma-separated `A>B` list; blank entries are ignored
pub fn parse_pairs(list: &str) -> Result<Vec<TradingPair>> {
    let pairs = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| TradingPair::parse(s).with_context(|| format!("Invalid trading pair: {}", s)))
        .collect::<Result<Vec<_>>>()?;

    if pairs.is_empty() {
        bail!("No trading pairs configured");
    }
    Ok(pairs)
}

/// Re-run after every override layer
pub fn validate(config: &BotConfig) -> Result<()> {
    let limits = &config.limits;
    if limits.max_uses_per_trade < 1 {
        bail!("MAX_USES_PER_TRADE must be at least 1");
    }
    for (name, value) in [
        ("MIN_EDGE_BPS", limits.min_edge_bps),
        ("MAX_NOTIONAL_USD", limits.max_notional_usd),
        ("MIN_PER_USE_USD", limits.min_per_use_usd),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{} must be a finite, non-negative number (got {})", name, value);
        }
    }
    if config.pairs.is_empty() {
        bail!("No trading pairs configured");
    }
    Ok(())
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
