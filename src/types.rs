//! Core data structures
//!
//! Token identities, normalized swap quotes, the USD price snapshot, the
//! per-offer economic assessment and the immutable bot configuration.
//!
//! Created: 2026-10-19

use crate::error::EngineError;
use crate::token_class;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Four-part GalaChain token identity. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClass {
    pub collection: String,
    pub category: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub additional_key: String,
}

impl TokenClass {
    /// Unit-class token (`{collection}|Unit|none|none`)
    pub fn unit(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            category: "Unit".to_string(),
            token_type: "none".to_string(),
            additional_key: "none".to_string(),
        }
    }

    /// Canonical price-catalog key
    pub fn key(&self) -> String {
        token_class::format(self)
    }
}

/// Directed pair to scan: `offered>wanted` as passed to offer discovery.
///
/// `offered` is the token the counterparty posts (what we receive),
/// `wanted` is the token they ask for (what we pay).
#[derive(Debug, Clone, PartialEq)]
pub struct TradingPair {
    pub offered: TokenClass,
    pub wanted: TokenClass,
    pub symbol: String,
}

impl TradingPair {
    /// Parse `GALA>SILK` (either side may be a full 4-part symbol)
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let text = text.trim();
        let (offered, wanted) = text
            .split_once('>')
            .map(|(a, b)| (a.trim(), b.trim()))
            .filter(|(a, b)| !a.is_empty() && !b.is_empty() && !b.contains('>'))
            .ok_or_else(|| EngineError::MalformedSymbol(text.to_string()))?;

        Ok(Self {
            offered: token_class::parse(offered)?,
            wanted: token_class::parse(wanted)?,
            symbol: text.to_string(),
        })
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Offer contents exactly as discovery returned them.
/// Echoed back in the fill request so the ledger can reject a changed offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedTokenSwap {
    pub wanted: Vec<serde_json::Value>,
    pub offered: Vec<serde_json::Value>,
}

/// Normalized swap offer, rebuilt every cycle from the discovery response.
#[derive(Debug, Clone)]
pub struct SwapQuote {
    /// Ledger swap request id
    pub offer_id: String,
    /// Token the owner posts; we receive `get_per_use` of it per use
    pub offered_class: TokenClass,
    /// Token the owner asks for; we pay `give_per_use` of it per use
    pub wanted_class: TokenClass,
    pub give_per_use: Decimal,
    pub get_per_use: Decimal,
    /// get_per_use / give_per_use
    pub implied_price: f64,
    pub total_uses: BigUint,
    pub uses_spent: BigUint,
    /// Wallet identity that posted the offer
    pub owner: String,
    pub expected: ExpectedTokenSwap,
}

impl SwapQuote {
    /// Uses still available on the offer (never negative)
    pub fn remaining_uses(&self) -> BigUint {
        if self.uses_spent >= self.total_uses {
            BigUint::default()
        } else {
            &self.total_uses - &self.uses_spent
        }
    }
}

/// Snapshot of USD reference prices keyed by canonical token class key.
/// Read-only to the engine for the duration of a cycle.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    prices: HashMap<String, f64>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price. Non-finite and non-positive prices are treated as unknown.
    pub fn insert(&mut self, key: String, usd: f64) {
        if usd.is_finite() && usd > 0.0 {
            self.prices.insert(key, usd);
        }
    }

    pub fn usd(&self, class: &TokenClass) -> Option<f64> {
        self.prices.get(&class.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut book = PriceBook::new();
        for (key, usd) in iter {
            book.insert(key, usd);
        }
        book
    }
}

/// Derived economics for one offer, recomputed every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicAssessment {
    pub implied_price: f64,
    /// usd_offered / usd_wanted
    pub reference_price: f64,
    pub edge_bps: f64,
    /// What we receive per use, in USD
    pub per_use_value_out_usd: f64,
    /// What we pay per use, in USD (the per-use notional)
    pub per_use_value_in_usd: f64,
    pub per_use_pnl_usd: f64,
    pub uses_to_take: BigUint,
    /// Fee quoted by the ledger in its native fee token
    pub fee_native: f64,
    pub fee_usd: f64,
    pub total_pnl_usd: f64,
}

/// Risk limits applied by the evaluator and sizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Minimum edge vs reference price, in basis points
    pub min_edge_bps: f64,
    /// Notional budget per trade, in USD (a fill still takes at least 1 use)
    pub max_notional_usd: f64,
    /// Hard cap on uses per fill
    pub max_uses_per_trade: u64,
    /// Dust filter: minimum USD paid per use
    pub min_per_use_usd: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            min_edge_bps: 30.0,
            max_notional_usd: 250.0,
            max_uses_per_trade: 3,
            min_per_use_usd: 1.0,
        }
    }
}

/// Bot configuration, built once at startup and never mutated
#[derive(Clone)]
pub struct BotConfig {
    // Network
    pub api_base_url: String,

    // Wallet
    pub wallet_address: String,
    pub private_key: String,
    /// Pre-configured signer public key (looked up remotely when absent)
    pub signer_public_key: Option<String>,

    // Trading
    pub pairs: Vec<TradingPair>,
    pub limits: RiskLimits,
    /// Native token fees are quoted in
    pub fee_token: TokenClass,

    /// Sign but never submit
    pub dry_run: bool,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_base_url", &self.api_base_url)
            .field("wallet_address", &self.wallet_address)
            .field("private_key", &"<redacted>")
            .field("signer_public_key", &self.signer_public_key)
            .field("pairs", &self.pairs.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>())
            .field("limits", &self.limits)
            .field("fee_token", &self.fee_token.key())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parse() {
        let pair = TradingPair::parse(" GALA>SILK ").unwrap();
        assert_eq!(pair.offered, TokenClass::unit("GALA"));
        assert_eq!(pair.wanted, TokenClass::unit("SILK"));
        assert_eq!(pair.symbol, "GALA>SILK");

        let full = TradingPair::parse("GALA|Unit|none|none>GUSDC$Unit$none$eth").unwrap();
        assert_eq!(full.wanted.additional_key, "eth");
    }

    #[test]
    fn test_pair_parse_rejects_malformed() {
        for bad in ["GALA", ">SILK", "GALA>", "A>B>C", "GALA>SILK|Unit"] {
            assert!(TradingPair::parse(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_remaining_uses_never_negative() {
        let mut quote = SwapQuote {
            offer_id: "x".to_string(),
            offered_class: TokenClass::unit("SILK"),
            wanted_class: TokenClass::unit("GALA"),
            give_per_use: Decimal::ONE,
            get_per_use: Decimal::ONE,
            implied_price: 1.0,
            total_uses: BigUint::from(5u32),
            uses_spent: BigUint::from(2u32),
            owner: "client|other".to_string(),
            expected: ExpectedTokenSwap { wanted: vec![], offered: vec![] },
        };
        assert_eq!(quote.remaining_uses(), BigUint::from(3u32));

        quote.uses_spent = BigUint::from(9u32);
        assert_eq!(quote.remaining_uses(), BigUint::default());
    }

    #[test]
    fn test_price_book_ignores_unusable_prices() {
        let book: PriceBook = vec![
            ("GALA|Unit|none|none".to_string(), 0.02),
            ("ZERO|Unit|none|none".to_string(), 0.0),
            ("NAN|Unit|none|none".to_string(), f64::NAN),
        ]
        .into_iter()
        .collect();

        assert_eq!(book.len(), 1);
        assert_eq!(book.usd(&TokenClass::unit("GALA")), Some(0.02));
        assert_eq!(book.usd(&TokenClass::unit("ZERO")), None);
        assert_eq!(book.usd(&TokenClass::unit("NAN")), None);
    }

    #[test]
    fn test_config_debug_redacts_private_key() {
        let config = BotConfig {
            api_base_url: "http://localhost".to_string(),
            wallet_address: "client|me".to_string(),
            private_key: "deadbeef".to_string(),
            signer_public_key: None,
            pairs: vec![],
            limits: RiskLimits::default(),
            fee_token: TokenClass::unit("GALA"),
            dry_run: true,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("deadbeef"));
        assert!(rendered.contains("<redacted>"));
    }
}
