//! Signing Module
//!
//! Canonical payload encoding and secp256k1 authorization signatures.
//!
//! Created: 2026-10-19

pub mod canonical;
pub mod signer;

pub use canonical::{signing_bytes, to_canonical_string};
pub use signer::{normalize_low_s, sign, CanonicalSignature, PayloadSigner};
