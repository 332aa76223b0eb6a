//! TOML Limits File
//!
//! Optional overlay applied on top of the environment:
//!
//! ```toml
//! pairs = ["GALA>SILK"]
//! dry_run = true
//!
//! [limits]
//! min_edge_bps = 50
//! max_notional_usd = 100.0
//! max_uses_per_trade = 2
//! min_per_use_usd = 1.0
//! ```
//!
//! Every key is optional; absent keys keep the environment value.
//!
//! Created: 2026-10-19

use super::{parse_pairs, validate, BotConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level TOML structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsFile {
    #[serde(default)]
    pub limits: LimitsSection,
    pub pairs: Option<Vec<String>>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    pub min_edge_bps: Option<f64>,
    pub max_notional_usd: Option<f64>,
    pub max_uses_per_trade: Option<u64>,
    pub min_per_use_usd: Option<f64>,
}

impl LimitsFile {
    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read limits file: {}", path.as_ref().display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML limits")
    }

    /// Overlay onto an env-derived config and re-validate
    pub fn apply(&self, mut config: BotConfig) -> Result<BotConfig> {
        let limits = &mut config.limits;
        if let Some(v) = self.limits.min_edge_bps {
            limits.min_edge_bps = v;
        }
        if let Some(v) = self.limits.max_notional_usd {
            limits.max_notional_usd = v;
        }
        if let Some(v) = self.limits.max_uses_per_trade {
            limits.max_uses_per_trade = v;
        }
        if let Some(v) = self.limits.min_per_use_usd {
            limits.min_per_use_usd = v;
        }
        if let Some(pairs) = &self.pairs {
            config.pairs = parse_pairs(&pairs.join(","))?;
        }
        if let Some(dry_run) = self.dry_run {
            config.dry_run = dry_run;
        }

        validate(&config)?;
        Ok(config)
    }
}
