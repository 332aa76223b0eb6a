//! Swap Venue
//!
//! The remote collaborators the engine talks to: token price catalog, offer
//! discovery, fee probe, public-key lookup and fill submission. The engine
//! only sees the [`SwapVenue`] trait; [`http::GalaSwapClient`] is the REST
//! implementation and tests plug in an in-memory one.
//!
//! Response shapes that vary across API versions are read through small
//! tagged parsers with a fixed fallback order.
//!
//! Created: 2026-10-19

pub mod http;

use crate::authorization::SignedAuthorization;
use crate::error::{EngineError, EngineResult};
use crate::quote::NumericText;
use crate::types::{PriceBook, SwapQuote, TokenClass};
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub use http::GalaSwapClient;

#[async_trait]
pub trait SwapVenue: Send + Sync {
    /// Snapshot of USD reference prices
    async fn fetch_prices(&self) -> EngineResult<PriceBook>;

    /// Best offer posting `offered` and asking for `wanted`, if any
    async fn fetch_offer(
        &self,
        offered: &TokenClass,
        wanted: &TokenClass,
    ) -> EngineResult<Option<SwapQuote>>;

    /// Fee for filling `uses` of the offer, in the native fee token
    async fn estimate_fee(&self, quote: &SwapQuote, uses: &BigUint) -> EngineResult<f64>;

    async fn fetch_signer_public_key(&self, wallet_address: &str) -> EngineResult<String>;

    async fn submit(&self, authorization: &SignedAuthorization) -> EngineResult<SubmitReceipt>;
}

// ---------------------------------------------------------------------------
// Token catalog
// ---------------------------------------------------------------------------

/// Entries stay untyped so one odd-shaped token cannot sink the snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct TokenCatalog {
    #[serde(default)]
    pub tokens: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogToken {
    #[serde(flatten)]
    pub class: TokenClass,
    #[serde(default)]
    pub current_prices: Option<CurrentPrices>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPrices {
    #[serde(default)]
    pub usd: Option<NumericText>,
}

impl TokenCatalog {
    /// Priced tokens only; unpriced and undecodable entries are left out of the book
    pub fn into_price_book(self) -> PriceBook {
        self.tokens
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CatalogToken>(entry) {
                Ok(token) => Some(token),
                Err(e) => {
                    debug!("Dropping catalog entry: {}", e);
                    None
                }
            })
            .filter_map(|t| {
                let usd = t.current_prices?.usd?.to_f64()?;
                Some((t.class.key(), usd))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Fee probe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeQuote {
    #[serde(default)]
    pub fees: Vec<FeeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEntry {
    #[serde(default)]
    pub fee_in_gala: Option<NumericText>,
    #[serde(default)]
    pub fee: Option<NumericText>,
}

impl FeeQuote {
    /// Sum of `feeInGala` (falling back to `fee`) over all entries
    pub fn total(&self) -> f64 {
        self.fees
            .iter()
            .filter_map(|f| {
                f.fee_in_gala
                    .as_ref()
                    .and_then(NumericText::to_f64)
                    .or_else(|| f.fee.as_ref().and_then(NumericText::to_f64))
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Public key lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyData {
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// `GetPublicKey` response, tried in order: bare string, `{publicKey}`, `{Data:{publicKey}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PublicKeyResponse {
    Bare(String),
    Direct {
        #[serde(rename = "publicKey")]
        public_key: String,
    },
    Wrapped {
        #[serde(rename = "Data")]
        data: PublicKeyData,
    },
}

impl PublicKeyResponse {
    pub fn into_key(self) -> String {
        match self {
            PublicKeyResponse::Bare(key) => key,
            PublicKeyResponse::Direct { public_key } => public_key,
            PublicKeyResponse::Wrapped { data } => data.public_key,
        }
    }

    pub fn parse(value: Value) -> EngineResult<String> {
        serde_json::from_value::<PublicKeyResponse>(value)
            .map(PublicKeyResponse::into_key)
            .map_err(|_| EngineError::RemoteUnavailable("Could not get signerPublicKey".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Submission receipt
// ---------------------------------------------------------------------------

/// Submission response. `txid` is read from `Data.txid`, then `txid`, then `Data`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub txid: Option<String>,
    pub raw: Value,
}

impl SubmitReceipt {
    pub fn from_response(raw: Value) -> Self {
        let txid = raw
            .pointer("/Data/txid")
            .and_then(Value::as_str)
            .or_else(|| raw.get("txid").and_then(Value::as_str))
            .or_else(|| raw.get("Data").and_then(Value::as_str))
            .map(str::to_string);
        Self { txid, raw }
    }
}
