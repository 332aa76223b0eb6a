//! Fill Engine
//!
//! One evaluation cycle over the configured pairs:
//!     prices (once) → per pair: offer → screen → fee probe → settle →
//!     (accept) build + sign → submit unless dry run
//!
//! Pairs run strictly one after another. Any error inside a pair is caught at
//! the pair boundary and reported as that pair's outcome; the remaining pairs
//! still run. There is no retry: a failed call skips the pair for this cycle.
//!
//! Created: 2026-10-19

use super::evaluator::{ArbitrageEvaluator, Decision, SkipReason};
use crate::authorization::{AuthorizationPayload, SignedAuthorization};
use crate::error::{EngineError, EngineResult};
use crate::signing::PayloadSigner;
use crate::types::{BotConfig, EconomicAssessment, PriceBook, TradingPair};
use crate::venue::{SubmitReceipt, SwapVenue};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// What happened to one pair in one cycle
#[derive(Debug, Clone)]
pub enum Outcome {
    Skipped {
        reason: SkipReason,
        /// Present when the skip came after fee settlement
        assessment: Option<EconomicAssessment>,
    },
    Accepted {
        assessment: EconomicAssessment,
        authorization: SignedAuthorization,
        /// None in dry-run mode
        receipt: Option<SubmitReceipt>,
    },
    Failed(EngineError),
}

#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub pair: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<PairOutcome>,
}

impl CycleReport {
    pub fn accepted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Accepted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|p| pred(&p.outcome)).count()
    }
}

pub struct FillEngine<V: SwapVenue> {
    venue: V,
    config: BotConfig,
    evaluator: ArbitrageEvaluator,
    signer: PayloadSigner,
}

impl<V: SwapVenue> FillEngine<V> {
    pub fn new(venue: V, config: BotConfig, signer: PayloadSigner) -> Self {
        let evaluator = ArbitrageEvaluator::from_config(&config);
        if config.dry_run {
            info!("Engine in DRY RUN mode - fills are signed but never submitted");
        } else {
            warn!("⚠️ Engine in LIVE mode - accepted fills will be submitted!");
        }
        Self {
            venue,
            config,
            evaluator,
            signer,
        }
    }

    pub fn venue(&self) -> &V {
        &self.venue
    }

    /// Run every configured pair once
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(self.config.pairs.len());

        let prices = match self.venue.fetch_prices().await {
            Ok(prices) => {
                info!("Price snapshot: {} priced tokens", prices.len());
                prices
            }
            Err(e) => {
                warn!("Price snapshot failed, skipping all pairs this cycle: {}", e);
                for pair in &self.config.pairs {
                    outcomes.push(PairOutcome {
                        pair: pair.symbol.clone(),
                        outcome: Outcome::Failed(e.clone()),
                    });
                }
                return CycleReport { started_at, outcomes };
            }
        };

        // Looked up at most once per cycle, and only if something is accepted
        let mut signer_public_key = self.config.signer_public_key.clone();

        for pair in &self.config.pairs {
            let outcome = match self.evaluate_pair(pair, &prices, &mut signer_public_key).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Error on {}: {}", pair, e);
                    Outcome::Failed(e)
                }
            };
            outcomes.push(PairOutcome {
                pair: pair.symbol.clone(),
                outcome,
            });
        }

        let report = CycleReport { started_at, outcomes };
        info!(
            "Cycle done: {} pairs | {} accepted | {} skipped | {} failed",
            report.outcomes.len(),
            report.accepted(),
            report.skipped(),
            report.failed()
        );
        report
    }

    async fn evaluate_pair(
        &self,
        pair: &TradingPair,
        prices: &PriceBook,
        signer_public_key: &mut Option<String>,
    ) -> EngineResult<Outcome> {
        let quote = match self.venue.fetch_offer(&pair.offered, &pair.wanted).await? {
            Some(quote) => quote,
            None => return Ok(skip(pair, SkipReason::NoOffer, None)),
        };

        let screened = match self.evaluator.screen(&quote, prices) {
            Ok(screened) => screened,
            Err(reason) => return Ok(skip(pair, reason, None)),
        };

        let fee_native = self
            .venue
            .estimate_fee(&quote, &screened.uses_to_take)
            .await?;

        let decision = self.evaluator.settle(screened, fee_native, prices);
        log_check(pair, &quote.offer_id, decision.assessment());

        let assessment = match decision {
            Decision::Accept(assessment) => assessment,
            Decision::Reject(assessment, reason) => {
                return Ok(skip(pair, reason, Some(assessment)));
            }
        };

        let public_key = match signer_public_key {
            Some(key) => key.clone(),
            None => {
                let key = self
                    .venue
                    .fetch_signer_public_key(&self.config.wallet_address)
                    .await?;
                *signer_public_key = Some(key.clone());
                key
            }
        };

        let authorization = AuthorizationPayload::build(&quote, &assessment.uses_to_take, &public_key)
            .sign(&self.signer)?;

        if self.config.dry_run {
            info!(
                "[DRY_RUN] Would accept swap {} on {} | uses={} | uniqueKey={}",
                quote.offer_id, pair, assessment.uses_to_take, authorization.payload.unique_key
            );
            debug!(
                "[DRY_RUN] Signed payload: {}",
                serde_json::to_string(&authorization).unwrap_or_default()
            );
            return Ok(Outcome::Accepted {
                assessment,
                authorization,
                receipt: None,
            });
        }

        let receipt = self.venue.submit(&authorization).await?;
        info!(
            "✅ Submitted {} | uses={} | txid={}",
            pair,
            assessment.uses_to_take,
            receipt.txid.as_deref().unwrap_or("<none>")
        );

        Ok(Outcome::Accepted {
            assessment,
            authorization,
            receipt: Some(receipt),
        })
    }
}

fn skip(pair: &TradingPair, reason: SkipReason, assessment: Option<EconomicAssessment>) -> Outcome {
    info!("Skip {}: {}", pair, reason);
    Outcome::Skipped { reason, assessment }
}

fn log_check(pair: &TradingPair, offer_id: &str, a: &EconomicAssessment) {
    info!(
        "Check {} [{}] | price={:.8} ref={:.8} edge={:.2}bps | out=${:.6} in=${:.6} pnl/use=${:.6} | uses={} fee={} (${:.6}) | total=${:.6}",
        pair,
        offer_id,
        a.implied_price,
        a.reference_price,
        a.edge_bps,
        a.per_use_value_out_usd,
        a.per_use_value_in_usd,
        a.per_use_pnl_usd,
        a.uses_to_take,
        a.fee_native,
        a.fee_usd,
        a.total_pnl_usd
    );
}
