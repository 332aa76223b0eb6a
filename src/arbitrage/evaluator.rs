//! Arbitrage Evaluator
//!
//! Turns a normalized offer plus the USD price snapshot into an accept/reject
//! decision. Evaluation runs in two phases around the ledger fee probe:
//!
//!   screen()  self-trade guard → exhausted guard → USD prices → reference
//!             price and edge → per-use economics → dust filter → sizing
//!   settle()  fee (native token → USD) → total PnL → edge and PnL gates
//!
//! Both gates are applied after sizing because fee and notional scale with uses.
//! USD math is plain f64; use counts stay BigUint.
//!
//! Created: 2026-10-19

use super::sizer;
use crate::types::{BotConfig, EconomicAssessment, PriceBook, RiskLimits, SwapQuote, TokenClass};
use num_bigint::BigUint;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use tracing::debug;

/// Why an offer was not filled
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Discovery returned no offer for the pair
    NoOffer,
    /// Offer posted by our own wallet
    OwnOffer,
    /// No remaining uses on the offer
    Exhausted,
    /// No USD reference price for a token class key
    MissingPrice { key: String },
    /// Per-use notional below the dust threshold (or not positive)
    Dust { per_use_value_in_usd: f64, min_per_use_usd: f64 },
    EdgeBelowThreshold { edge_bps: f64, min_edge_bps: f64 },
    /// Total PnL after fees is not positive
    Unprofitable { total_pnl_usd: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::NoOffer => write!(f, "no swaps found"),
            SkipReason::OwnOffer => write!(f, "own swap"),
            SkipReason::Exhausted => write!(f, "exhausted: no remaining uses"),
            SkipReason::MissingPrice { key } => write!(f, "missing USD price for {}", key),
            SkipReason::Dust { per_use_value_in_usd, min_per_use_usd } => write!(
                f,
                "dust: per-use notional {:.6} < MIN_PER_USE_USD {}",
                per_use_value_in_usd, min_per_use_usd
            ),
            SkipReason::EdgeBelowThreshold { edge_bps, min_edge_bps } => write!(
                f,
                "edge {:.2} bps < MIN_EDGE_BPS {}",
                edge_bps, min_edge_bps
            ),
            SkipReason::Unprofitable { total_pnl_usd } => write!(
                f,
                "total PnL after fees is not positive ({:.6} USD)",
                total_pnl_usd
            ),
        }
    }
}

/// Result of the pre-fee phase: everything except the fee-dependent numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Screened {
    pub implied_price: f64,
    pub reference_price: f64,
    pub edge_bps: f64,
    pub per_use_value_out_usd: f64,
    pub per_use_value_in_usd: f64,
    pub per_use_pnl_usd: f64,
    pub uses_to_take: BigUint,
}

/// Final verdict. Rejections keep the full economics for the audit log.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Accept(EconomicAssessment),
    Reject(EconomicAssessment, SkipReason),
}

impl Decision {
    pub fn assessment(&self) -> &EconomicAssessment {
        match self {
            Decision::Accept(a) | Decision::Reject(a, _) => a,
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept(_))
    }
}

/// Edge of `implied` over `reference` in basis points (0 for a non-positive reference)
pub fn edge_bps(implied: f64, reference: f64) -> f64 {
    if !(reference > 0.0) {
        return 0.0;
    }
    10_000.0 * (implied - reference) / reference
}

/// Lossless for any sized fill: uses are capped by a u64 limit
fn uses_as_f64(uses: &BigUint) -> f64 {
    u64::try_from(uses).map(|u| u as f64).unwrap_or(f64::INFINITY)
}

pub struct ArbitrageEvaluator {
    limits: RiskLimits,
    wallet_address: String,
    fee_token: TokenClass,
}

impl ArbitrageEvaluator {
    pub fn new(limits: RiskLimits, wallet_address: String, fee_token: TokenClass) -> Self {
        Self {
            limits,
            wallet_address,
            fee_token,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.limits.clone(),
            config.wallet_address.clone(),
            config.fee_token.clone(),
        )
    }

    /// Pre-fee phase. `Err` means skip; no fee probe or signing should follow.
    pub fn screen(&self, quote: &SwapQuote, prices: &PriceBook) -> Result<Screened, SkipReason> {
        if quote.owner == self.wallet_address {
            return Err(SkipReason::OwnOffer);
        }

        let remaining = quote.remaining_uses();
        if remaining == BigUint::default() {
            return Err(SkipReason::Exhausted);
        }

        // usd_offered: value we RECEIVE per unit, usd_wanted: value we PAY per unit
        let usd_offered = prices
            .usd(&quote.offered_class)
            .ok_or_else(|| SkipReason::MissingPrice { key: quote.offered_class.key() })?;
        let usd_wanted = prices
            .usd(&quote.wanted_class)
            .ok_or_else(|| SkipReason::MissingPrice { key: quote.wanted_class.key() })?;

        let reference_price = usd_offered / usd_wanted;
        let edge_bps = edge_bps(quote.implied_price, reference_price);

        let get_per_use = quote.get_per_use.to_f64().unwrap_or(f64::NAN);
        let give_per_use = quote.give_per_use.to_f64().unwrap_or(f64::NAN);
        let per_use_value_out_usd = get_per_use * usd_offered;
        let per_use_value_in_usd = give_per_use * usd_wanted;
        let per_use_pnl_usd = per_use_value_out_usd - per_use_value_in_usd;

        if !(per_use_value_in_usd > 0.0) || per_use_value_in_usd < self.limits.min_per_use_usd {
            return Err(SkipReason::Dust {
                per_use_value_in_usd,
                min_per_use_usd: self.limits.min_per_use_usd,
            });
        }

        let uses_to_take = sizer::size_fill(per_use_value_in_usd, &remaining, &self.limits);

        debug!(
            "Screened {}: ref={:.8} implied={:.8} edge={:.2}bps in=${:.6} uses={}",
            quote.offer_id, reference_price, quote.implied_price, edge_bps,
            per_use_value_in_usd, uses_to_take
        );

        Ok(Screened {
            implied_price: quote.implied_price,
            reference_price,
            edge_bps,
            per_use_value_out_usd,
            per_use_value_in_usd,
            per_use_pnl_usd,
            uses_to_take,
        })
    }

    /// Post-fee phase. An unpriced fee token makes the fee count as $0.
    pub fn settle(&self, screened: Screened, fee_native: f64, prices: &PriceBook) -> Decision {
        let fee_token_usd = prices.usd(&self.fee_token).unwrap_or(0.0);
        let fee_usd = fee_native * fee_token_usd;
        let total_pnl_usd =
            screened.per_use_pnl_usd * uses_as_f64(&screened.uses_to_take) - fee_usd;

        let assessment = EconomicAssessment {
            implied_price: screened.implied_price,
            reference_price: screened.reference_price,
            edge_bps: screened.edge_bps,
            per_use_value_out_usd: screened.per_use_value_out_usd,
            per_use_value_in_usd: screened.per_use_value_in_usd,
            per_use_pnl_usd: screened.per_use_pnl_usd,
            uses_to_take: screened.uses_to_take,
            fee_native,
            fee_usd,
            total_pnl_usd,
        };

        if !(assessment.edge_bps >= self.limits.min_edge_bps) {
            let reason = SkipReason::EdgeBelowThreshold {
                edge_bps: assessment.edge_bps,
                min_edge_bps: self.limits.min_edge_bps,
            };
            return Decision::Reject(assessment, reason);
        }
        if !(total_pnl_usd > 0.0) {
            return Decision::Reject(assessment, SkipReason::Unprofitable { total_pnl_usd });
        }

        Decision::Accept(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpectedTokenSwap;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const WALLET: &str = "client|me";

    fn evaluator() -> ArbitrageEvaluator {
        ArbitrageEvaluator::new(RiskLimits::default(), WALLET.to_string(), TokenClass::unit("GALA"))
    }

    fn prices() -> PriceBook {
        vec![
            ("GALA|Unit|none|none".to_string(), 0.02),
            ("SILK|Unit|none|none".to_string(), 3.00),
        ]
        .into_iter()
        .collect()
    }

    /// Offer paying `get` of `offered` for `give` of `wanted`, per use
    fn quote(offered: &str, get: Decimal, wanted: &str, give: Decimal, remaining: u32) -> SwapQuote {
        SwapQuote {
            offer_id: "swap-1".to_string(),
            offered_class: TokenClass::unit(offered),
            wanted_class: TokenClass::unit(wanted),
            give_per_use: give,
            get_per_use: get,
            implied_price: (get / give).to_f64().unwrap(),
            total_uses: BigUint::from(remaining + 5),
            uses_spent: BigUint::from(5u32),
            owner: "client|maker".to_string(),
            expected: ExpectedTokenSwap { wanted: vec![], offered: vec![] },
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_edge_bps() {
        assert!(close(edge_bps(101.0, 100.0), 100.0));
        assert!(close(edge_bps(99.0, 100.0), -100.0));
        assert_eq!(edge_bps(5.0, 0.0), 0.0);
        assert_eq!(edge_bps(5.0, -1.0), 0.0);
    }

    #[test]
    fn test_scenario_pay_gala_receive_silk() {
        // give 100 GALA, get 1 SILK per use; GALA $0.02, SILK $3.00
        let ev = evaluator();
        let q = quote("SILK", dec!(1), "GALA", dec!(100), 10);
        let screened = ev.screen(&q, &prices()).unwrap();

        assert!(close(screened.implied_price, 0.01));
        assert!(close(screened.reference_price, 150.0));
        assert!(close(screened.edge_bps, -9999.333333333334));
        assert!(close(screened.per_use_value_out_usd, 3.0));
        assert!(close(screened.per_use_value_in_usd, 2.0));
        assert!(close(screened.per_use_pnl_usd, 1.0));
        // floor(250 / 2) = 125 → remaining 10 → cap 3
        assert_eq!(screened.uses_to_take, BigUint::from(3u32));

        // 1 GALA fee = $0.02
        let decision = ev.settle(screened, 1.0, &prices());
        let a = decision.assessment();
        assert!(close(a.fee_usd, 0.02));
        assert!(close(a.total_pnl_usd, 2.98));
        match decision {
            Decision::Reject(_, SkipReason::EdgeBelowThreshold { edge_bps, min_edge_bps }) => {
                assert!(edge_bps < 0.0);
                assert_eq!(min_edge_bps, 30.0);
            }
            other => panic!("expected edge rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_pay_silk_receive_gala_accepted() {
        // give 1 SILK, get 200 GALA per use
        let ev = evaluator();
        let q = quote("GALA", dec!(200), "SILK", dec!(1), 5);
        let screened = ev.screen(&q, &prices()).unwrap();

        assert!(close(screened.reference_price, 0.02 / 3.0));
        assert!(close(screened.edge_bps, 299_990_000.0));
        assert!(close(screened.per_use_value_out_usd, 4.0));
        assert!(close(screened.per_use_value_in_usd, 3.0));
        assert!(close(screened.per_use_pnl_usd, 1.0));
        assert_eq!(screened.uses_to_take, BigUint::from(3u32));

        let decision = ev.settle(screened, 2.0, &prices());
        assert!(decision.is_accept());
        assert!(close(decision.assessment().total_pnl_usd, 2.96));
    }

    #[test]
    fn test_own_offer_always_skipped() {
        let ev = evaluator();
        let mut q = quote("GALA", dec!(200), "SILK", dec!(1), 5);
        q.owner = WALLET.to_string();
        assert_eq!(ev.screen(&q, &prices()), Err(SkipReason::OwnOffer));
    }

    #[test]
    fn test_exhausted_offer_skipped() {
        let ev = evaluator();
        let q = quote("GALA", dec!(200), "SILK", dec!(1), 0);
        assert_eq!(ev.screen(&q, &prices()), Err(SkipReason::Exhausted));
    }

    #[test]
    fn test_missing_price_skipped_not_defaulted() {
        let ev = evaluator();
        let q = quote("GALA", dec!(200), "GUSDC", dec!(1), 5);
        assert_eq!(
            ev.screen(&q, &prices()),
            Err(SkipReason::MissingPrice { key: "GUSDC|Unit|none|none".to_string() })
        );
    }

    #[test]
    fn test_dust_skipped_before_sizing() {
        // pays 10 GALA = $0.20 per use, below the $1 minimum
        let ev = evaluator();
        let q = quote("SILK", dec!(1), "GALA", dec!(10), 5);
        let skip = ev.screen(&q, &prices()).unwrap_err();
        assert!(matches!(skip, SkipReason::Dust { .. }));
        assert!(skip.to_string().starts_with("dust"));
    }

    #[test]
    fn test_unpriced_fee_token_counts_as_zero() {
        let ev = ArbitrageEvaluator::new(
            RiskLimits::default(),
            WALLET.to_string(),
            TokenClass::unit("UNPRICED"),
        );
        let q = quote("GALA", dec!(200), "SILK", dec!(1), 5);
        let screened = ev.screen(&q, &prices()).unwrap();
        let decision = ev.settle(screened, 1_000.0, &prices());
        assert_eq!(decision.assessment().fee_usd, 0.0);
        assert!(decision.is_accept());
    }

    #[test]
    fn test_fee_can_make_fill_unprofitable() {
        let ev = evaluator();
        let q = quote("GALA", dec!(200), "SILK", dec!(1), 5);
        let screened = ev.screen(&q, &prices()).unwrap();
        // 3 uses * $1 = $3 PnL, fee 200 GALA = $4
        let decision = ev.settle(screened, 200.0, &prices());
        assert!(matches!(decision, Decision::Reject(_, SkipReason::Unprofitable { .. })));
    }

    #[test]
    fn test_raising_edge_never_flips_accept_to_reject() {
        let ev = evaluator();
        let base = Screened {
            implied_price: 1.0,
            reference_price: 1.0,
            edge_bps: 0.0,
            per_use_value_out_usd: 2.0,
            per_use_value_in_usd: 1.5,
            per_use_pnl_usd: 0.5,
            uses_to_take: BigUint::from(2u32),
        };

        let mut accepted = false;
        for edge in [-500.0, 0.0, 29.9, 30.0, 31.0, 1_000.0, 1e9] {
            let screened = Screened { edge_bps: edge, ..base.clone() };
            let now_accepted = ev.settle(screened, 0.5, &prices()).is_accept();
            assert!(!(accepted && !now_accepted), "accept flipped to reject at edge {}", edge);
            accepted = now_accepted;
        }
        assert!(accepted);
    }
}
