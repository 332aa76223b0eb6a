//! Canonical Signer
//!
//! canonical JSON → Keccak-256 → secp256k1 ECDSA → low-s → DER → base64
//!
//! Only low-s signatures are produced: if `s > n/2` it is replaced by `n - s`
//! and the recovery parity flips, so each (message, key) pair has a single
//! valid encoding.
//!
//! Created: 2026-10-19

use super::canonical;
use crate::error::EngineError;
use alloy::primitives::{hex, keccak256, B256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::Serialize;

/// Normalized signature over a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSignature {
    /// base64(DER(r, s)) with low s
    pub der_base64: String,
    /// Recovery parity after normalization
    pub recovery_id: u8,
    /// Keccak-256 of the canonical payload bytes
    pub digest: B256,
}

/// Holds the secp256k1 signing key. Read-only after construction.
pub struct PayloadSigner {
    key: SigningKey,
}

impl PayloadSigner {
    /// Load a 32-byte private scalar from hex (optional `0x` prefix)
    pub fn from_hex(private_key_hex: &str) -> Result<Self, EngineError> {
        let trimmed = private_key_hex.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped)
            .map_err(|e| EngineError::InvalidKey(format!("not hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(EngineError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| EngineError::InvalidKey("scalar out of range".to_string()))?;
        Ok(Self { key })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign a payload: its `signature` field (if any) is excluded from the signed bytes.
    pub fn sign_payload<T: Serialize>(&self, payload: &T) -> Result<CanonicalSignature, EngineError> {
        let bytes = canonical::signing_bytes(payload)?;
        self.sign_digest(keccak256(&bytes))
    }

    pub fn sign_digest(&self, digest: B256) -> Result<CanonicalSignature, EngineError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| EngineError::InvalidKey(e.to_string()))?;
        let (signature, recovery_id) = normalize_low_s(signature, recovery_id);

        Ok(CanonicalSignature {
            der_base64: BASE64.encode(signature.to_der().as_bytes()),
            recovery_id: recovery_id.to_byte(),
            digest,
        })
    }
}

/// Replace a high-s signature with its `n - s` twin and flip the parity bit.
pub fn normalize_low_s(signature: Signature, recovery_id: RecoveryId) -> (Signature, RecoveryId) {
    match signature.normalize_s() {
        Some(low) => (
            low,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    }
}

/// Sign `payload` with a hex private key, returning base64 DER.
pub fn sign<T: Serialize>(payload: &T, private_key_hex: &str) -> Result<String, EngineError> {
    let signer = PayloadSigner::from_hex(private_key_hex)?;
    Ok(signer.sign_payload(payload)?.der_base64)
}
