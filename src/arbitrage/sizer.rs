//! Fill Sizer
//!
//! Picks how many uses of an offer to take:
//!     notional bound → offer's remaining uses → hard per-trade cap → at least 1
//!
//! Recomputed from scratch on every evaluation; nothing is cached across cycles.
//!
//! Created: 2026-10-19

use crate::types::RiskLimits;
use num_bigint::BigUint;

/// Uses allowed by the notional budget alone: `max(1, floor(budget / per_use))`.
/// Saturates at `u64::MAX` for a vanishing per-use notional.
pub fn max_uses_by_notional(per_use_value_in_usd: f64, max_notional_usd: f64) -> u64 {
    let bound = (max_notional_usd / per_use_value_in_usd).floor();
    // float → int casts saturate, NaN → 0
    (bound as u64).max(1)
}

/// Size a fill. `remaining_uses` must be ≥ 1; the evaluator skips exhausted
/// offers before sizing.
pub fn size_fill(
    per_use_value_in_usd: f64,
    remaining_uses: &BigUint,
    limits: &RiskLimits,
) -> BigUint {
    let by_notional = BigUint::from(max_uses_by_notional(
        per_use_value_in_usd,
        limits.max_notional_usd,
    ));
    let cap = BigUint::from(limits.max_uses_per_trade);

    by_notional
        .min(remaining_uses.clone())
        .min(cap)
        .max(BigUint::from(1u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_notional_usd: f64, max_uses_per_trade: u64) -> RiskLimits {
        RiskLimits {
            max_notional_usd,
            max_uses_per_trade,
            ..RiskLimits::default()
        }
    }

    #[test]
    fn test_remaining_uses_bound_wins() {
        // budget allows 10 uses, cap is 3, offer only has 2 left
        let uses = size_fill(10.0, &BigUint::from(2u32), &limits(100.0, 3));
        assert_eq!(uses, BigUint::from(2u32));
    }

    #[test]
    fn test_hard_cap_binds() {
        let uses = size_fill(2.0, &BigUint::from(1000u32), &limits(250.0, 3));
        assert_eq!(uses, BigUint::from(3u32));
    }

    #[test]
    fn test_notional_binds() {
        // floor(25 / 10) = 2
        let uses = size_fill(10.0, &BigUint::from(1000u32), &limits(25.0, 50));
        assert_eq!(uses, BigUint::from(2u32));
    }

    #[test]
    fn test_at_least_one_use_when_per_use_exceeds_budget() {
        let uses = size_fill(500.0, &BigUint::from(10u32), &limits(250.0, 3));
        assert_eq!(uses, BigUint::from(1u32));
        assert_eq!(max_uses_by_notional(500.0, 0.0), 1);
    }

    #[test]
    fn test_tiny_notional_saturates() {
        assert_eq!(max_uses_by_notional(0.0, 250.0), u64::MAX);
        assert_eq!(max_uses_by_notional(f64::NAN, 250.0), 1);
    }

    #[test]
    fn test_sizing_bounds_hold_across_inputs() {
        for per_use in [0.5, 1.0, 3.3, 17.0, 99.9, 250.0, 1000.0] {
            for remaining in [1u64, 2, 5, 40, 10_000] {
                for cap in [1u64, 3, 25] {
                    let l = limits(250.0, cap);
                    let uses = size_fill(per_use, &BigUint::from(remaining), &l);
                    let uses = u64::try_from(&uses).unwrap();

                    assert!(uses >= 1);
                    assert!(uses <= remaining.min(cap));

                    let notional_ok = uses as f64 * per_use <= l.max_notional_usd;
                    let other_bound = uses == remaining || uses == cap || uses == 1;
                    assert!(
                        notional_ok || other_bound,
                        "per_use={} remaining={} cap={} uses={}",
                        per_use, remaining, cap, uses
                    );
                }
            }
        }
    }
}
