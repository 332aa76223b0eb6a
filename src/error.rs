//! Engine error taxonomy
//!
//! Every error here is scoped to a single pair evaluation. The engine catches
//! them at the pair boundary and reports a skip or failure for that pair only.
//!
//! Created: 2026-10-19

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Token class symbol with neither 1 nor exactly 4 segments
    #[error("Malformed token class symbol: {0}")]
    MalformedSymbol(String),

    /// Private key is not a valid secp256k1 scalar
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// A collaborator call (HTTP or otherwise) failed
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Discovery returned an offer that cannot be normalized
    #[error("Malformed offer: {0}")]
    MalformedOffer(String),

    /// Payload could not be encoded for signing
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Encoding(e.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::RemoteUnavailable(e.to_string())
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
