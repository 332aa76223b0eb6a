//! Authorization Builder
//!
//! Assembles the `BatchFillTokenSwap` request for an accepted offer:
//!
//! ```text
//! { swapDtos: [{ swapRequestId, uses, expectedTokenSwap: { wanted, offered } }],
//!   uniqueKey, signerPublicKey, signature }
//! ```
//!
//! `uses` is the decimal string of the sized use count. `uniqueKey` is fresh
//! for every payload; the ledger rejects a repeated key.
//!
//! Created: 2026-10-19

use crate::error::EngineError;
use crate::signing::PayloadSigner;
use crate::types::{ExpectedTokenSwap, SwapQuote};
use num_bigint::BigUint;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

pub const UNIQUE_KEY_PREFIX: &str = "galaconnect-operation-";

/// One fill of one offer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSwapDto {
    pub swap_request_id: String,
    pub uses: String,
    pub expected_token_swap: ExpectedTokenSwap,
}

impl FillSwapDto {
    pub fn new(quote: &SwapQuote, uses: &BigUint) -> Self {
        Self {
            swap_request_id: quote.offer_id.clone(),
            uses: uses.to_string(),
            expected_token_swap: quote.expected.clone(),
        }
    }
}

/// Body of the fee probe (`/v1/BatchFillTokenSwap/fee`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeProbe {
    pub swap_dtos: Vec<FillSwapDto>,
}

impl FeeProbe {
    pub fn new(quote: &SwapQuote, uses: &BigUint) -> Self {
        Self {
            swap_dtos: vec![FillSwapDto::new(quote, uses)],
        }
    }
}

/// Unsigned fill request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPayload {
    pub swap_dtos: Vec<FillSwapDto>,
    pub unique_key: String,
    pub signer_public_key: String,
}

/// Signed fill request, handed to the submission endpoint as-is
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedAuthorization {
    #[serde(flatten)]
    pub payload: AuthorizationPayload,
    pub signature: String,
}

pub fn new_idempotency_key() -> String {
    format!("{}{}", UNIQUE_KEY_PREFIX, Uuid::new_v4())
}

impl AuthorizationPayload {
    /// Build a payload with a fresh idempotency key
    pub fn build(quote: &SwapQuote, uses: &BigUint, signer_public_key: &str) -> Self {
        Self {
            swap_dtos: vec![FillSwapDto::new(quote, uses)],
            unique_key: new_idempotency_key(),
            signer_public_key: signer_public_key.to_string(),
        }
    }

    /// Sign once, consuming the payload
    pub fn sign(self, signer: &PayloadSigner) -> Result<SignedAuthorization, EngineError> {
        let signature = signer.sign_payload(&self)?;
        debug!(
            "Signed {} digest={} parity={}",
            self.unique_key, signature.digest, signature.recovery_id
        );
        Ok(SignedAuthorization {
            payload: self,
            signature: signature.der_base64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::canonical;
    use crate::types::TokenClass;
    use alloy::primitives::keccak256;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    use k256::ecdsa::Signature;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::collections::HashSet;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn quote() -> SwapQuote {
        SwapQuote {
            offer_id: "swap-42".to_string(),
            offered_class: TokenClass::unit("SILK"),
            wanted_class: TokenClass::unit("GALA"),
            give_per_use: Decimal::from(100),
            get_per_use: Decimal::ONE,
            implied_price: 0.01,
            total_uses: BigUint::from(10u32),
            uses_spent: BigUint::from(0u32),
            owner: "client|maker".to_string(),
            expected: ExpectedTokenSwap {
                wanted: vec![json!({"quantity": "100", "tokenInstance": {"collection": "GALA"}})],
                offered: vec![json!({"quantity": "1", "tokenInstance": {"collection": "SILK"}})],
            },
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = AuthorizationPayload::build(&quote(), &BigUint::from(3u32), "pubkey");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["swapDtos"][0]["swapRequestId"], "swap-42");
        assert_eq!(value["swapDtos"][0]["uses"], "3");
        assert_eq!(
            value["swapDtos"][0]["expectedTokenSwap"]["wanted"][0]["quantity"],
            "100"
        );
        assert_eq!(value["signerPublicKey"], "pubkey");
        assert!(value["uniqueKey"].as_str().unwrap().starts_with(UNIQUE_KEY_PREFIX));
        assert!(value.get("signature").is_none());
    }

    #[test]
    fn test_idempotency_keys_unique() {
        let keys: HashSet<String> = (0..1_000)
            .map(|_| AuthorizationPayload::build(&quote(), &BigUint::from(1u32), "pk").unique_key)
            .collect();
        assert_eq!(keys.len(), 1_000);
    }

    #[test]
    fn test_signed_authorization_verifies_over_unsigned_fields() {
        let signer = PayloadSigner::from_hex(KEY).unwrap();
        let signed = AuthorizationPayload::build(&quote(), &BigUint::from(2u32), "pk")
            .sign(&signer)
            .unwrap();

        let wire = serde_json::to_value(&signed).unwrap();
        assert_eq!(wire["signature"], signed.signature.as_str());
        assert_eq!(wire["uniqueKey"], signed.payload.unique_key.as_str());

        // Verifier view: strip signature from the wire body, hash, verify
        let digest = keccak256(canonical::signing_bytes(&wire).unwrap());
        let der = BASE64.decode(&signed.signature).unwrap();
        let sig = Signature::from_der(&der).unwrap();
        signer.verifying_key().verify_prehash(digest.as_slice(), &sig).unwrap();
    }

    #[test]
    fn test_fee_probe_has_no_key_material() {
        let probe = serde_json::to_value(FeeProbe::new(&quote(), &BigUint::from(2u32))).unwrap();
        assert_eq!(probe["swapDtos"][0]["uses"], "2");
        assert!(probe.get("uniqueKey").is_none());
        assert!(probe.get("signerPublicKey").is_none());
    }
}
