//! Error types for ASN.1 encoding.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding an ASN.1 value.
///
/// Every variant reflects invalid input for the selected rule set; nothing
/// here is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Identifier and length errors
    #[error("invalid tag number {0}")]
    InvalidTag(i64),
    #[error("length {length} does not fit in {octets} length octets")]
    LengthOverflow { length: usize, octets: usize },

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: {0}")]
    InvalidOid(String),

    // String type errors
    #[error("{string_type}: character {character:?} is out of range")]
    CharacterOutOfRange {
        string_type: &'static str,
        character: char,
    },

    // Real errors
    #[error("REAL: {0}")]
    UnsupportedRealValue(String),

    // BitString errors
    #[error("BIT STRING: {0}")]
    InvalidBitString(String),

    #[error("value nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),

    #[error(transparent)]
    Rules(#[from] kumiki::error::Error),
}

impl From<tlv::error::Error> for Error {
    fn from(value: tlv::error::Error) -> Self {
        match value {
            tlv::error::Error::InvalidTag(number) => Error::InvalidTag(number),
            tlv::error::Error::LengthOverflow { length, octets } => {
                Error::LengthOverflow { length, octets }
            }
            tlv::error::Error::Rules(e) => Error::Rules(e),
        }
    }
}
