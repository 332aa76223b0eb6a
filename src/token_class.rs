//! Token Class Codec
//!
//! GalaChain identifies a fungible token by four fields:
//! `collection|category|type|additionalKey`. The pipe-delimited form is the
//! canonical key the token catalog prices are indexed by; the `$` form is the
//! alternate spelling used in some API responses. A bare symbol such as
//! `GALA` expands to the Unit-class defaults.
//!
//! Created: 2026-10-19

use crate::error::EngineError;
use crate::types::TokenClass;
use std::fmt;
use std::str::FromStr;

pub const CANONICAL_DELIMITER: char = '|';
pub const ALTERNATE_DELIMITER: char = '$';

/// Parse a token class symbol (`GALA`, `GALA|Unit|none|none`, `GALA$Unit$none$none`).
pub fn parse(symbol: &str) -> Result<TokenClass, EngineError> {
    let delimiter = if symbol.contains(CANONICAL_DELIMITER) {
        CANONICAL_DELIMITER
    } else {
        ALTERNATE_DELIMITER
    };
    let parts: Vec<&str> = symbol.split(delimiter).collect();

    match parts.as_slice() {
        [collection] => Ok(TokenClass::unit(collection)),
        [collection, category, token_type, additional_key] => Ok(TokenClass {
            collection: collection.to_string(),
            category: category.to_string(),
            token_type: token_type.to_string(),
            additional_key: additional_key.to_string(),
        }),
        _ => Err(EngineError::MalformedSymbol(symbol.to_string())),
    }
}

/// Canonical price-catalog key for a token class.
pub fn format(class: &TokenClass) -> String {
    [
        class.collection.as_str(),
        class.category.as_str(),
        class.token_type.as_str(),
        class.additional_key.as_str(),
    ]
    .join("|")
}

impl FromStr for TokenClass {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format(self))
    }
}
