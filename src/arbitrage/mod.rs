//! Arbitrage Module
//!
//! Offer evaluation, fill sizing and the per-cycle fill engine.
//!
//! Created: 2026-10-19

pub mod engine;
pub mod evaluator;
pub mod sizer;

pub use engine::{CycleReport, FillEngine, Outcome, PairOutcome};
pub use evaluator::{ArbitrageEvaluator, Decision, Screened, SkipReason};
