//! Quote Normalizer
//!
//! Converts a raw offer from `FetchAvailableTokenSwaps` into a typed
//! [`SwapQuote`]. Per use, the taker pays `wanted[0].quantity` of the wanted
//! token and receives `offered[0].quantity` of the offered token.
//!
//! Created: 2026-10-19

use crate::error::EngineError;
use crate::types::{ExpectedTokenSwap, SwapQuote, TokenClass};
use num_bigint::BigUint;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Offer as returned by discovery. `offered`/`wanted` stay untyped so they can
/// be echoed back verbatim as the expected offer contents.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenSwap {
    pub swap_request_id: String,
    #[serde(default)]
    pub offered: Vec<Value>,
    #[serde(default)]
    pub wanted: Vec<Value>,
    pub uses: NumericText,
    #[serde(default)]
    pub uses_spent: Option<NumericText>,
    #[serde(default)]
    pub offered_by: String,
}

/// Ledger numbers arrive either as JSON strings or JSON numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericText {
    Text(String),
    Number(serde_json::Number),
}

impl NumericText {
    fn as_text(&self) -> String {
        match self {
            NumericText::Text(s) => s.trim().to_string(),
            NumericText::Number(n) => n.to_string(),
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        let text = self.as_text();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    pub fn to_big_uint(&self) -> Option<BigUint> {
        BigUint::from_str(&self.as_text()).ok()
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.as_text().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// One leg of an offer: a quantity of a token instance
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenQuantity {
    quantity: NumericText,
    token_instance: TokenClass,
}

/// Normalize a discovered offer into a [`SwapQuote`].
pub fn normalize(raw: &RawTokenSwap) -> Result<SwapQuote, EngineError> {
    let malformed = |what: &str| {
        EngineError::MalformedOffer(format!("{}: {}", raw.swap_request_id, what))
    };

    let offered = first_leg(&raw.offered).ok_or_else(|| malformed("no offered leg"))?;
    let wanted = first_leg(&raw.wanted).ok_or_else(|| malformed("no wanted leg"))?;

    let get_per_use = offered
        .quantity
        .to_decimal()
        .ok_or_else(|| malformed("offered quantity not a number"))?;
    let give_per_use = wanted
        .quantity
        .to_decimal()
        .ok_or_else(|| malformed("wanted quantity not a number"))?;

    if give_per_use <= Decimal::ZERO {
        return Err(malformed("wanted quantity must be positive"));
    }
    if get_per_use < Decimal::ZERO {
        return Err(malformed("offered quantity is negative"));
    }

    let implied_price = get_per_use
        .checked_div(give_per_use)
        .and_then(|price| price.to_f64())
        .ok_or_else(|| malformed("implied price out of range"))?;

    let total_uses = raw
        .uses
        .to_big_uint()
        .ok_or_else(|| malformed("uses not an unsigned integer"))?;
    let uses_spent = match &raw.uses_spent {
        Some(spent) => spent
            .to_big_uint()
            .ok_or_else(|| malformed("usesSpent not an unsigned integer"))?,
        None => BigUint::default(),
    };

    Ok(SwapQuote {
        offer_id: raw.swap_request_id.clone(),
        offered_class: offered.token_instance,
        wanted_class: wanted.token_instance,
        give_per_use,
        get_per_use,
        implied_price,
        total_uses,
        uses_spent,
        owner: raw.offered_by.clone(),
        expected: ExpectedTokenSwap {
            wanted: raw.wanted.clone(),
            offered: raw.offered.clone(),
        },
    })
}

fn first_leg(legs: &[Value]) -> Option<TokenQuantity> {
    legs.first()
        .and_then(|leg| serde_json::from_value(leg.clone()).ok())
}
