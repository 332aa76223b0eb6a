//! GalaSwap Offer Filler Library
//!
//! Scans posted token swaps, prices them against USD references, sizes a
//! fill within risk limits, and signs the fill authorization.
//!
//! Created: 2026-10-19

pub mod arbitrage;
pub mod authorization;
pub mod config;
pub mod error;
pub mod quote;
pub mod signing;
pub mod token_class;
pub mod types;
pub mod venue;

// Re-export commonly used types
pub use arbitrage::{ArbitrageEvaluator, CycleReport, FillEngine, Outcome, SkipReason};
pub use authorization::{AuthorizationPayload, SignedAuthorization};
pub use config::{load_config, load_config_from_file};
pub use error::{EngineError, EngineResult};
pub use signing::PayloadSigner;
pub use types::{BotConfig, EconomicAssessment, PriceBook, RiskLimits, SwapQuote, TokenClass, TradingPair};
pub use venue::{GalaSwapClient, SwapVenue};
