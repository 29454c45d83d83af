//! Encoding rule sets and the policy each one resolves to.
//!
//! BER, CER and DER share the TLV skeleton and differ only at a handful of
//! points. [`RulePolicy`] names those points explicitly so the encoders
//! consult a switch instead of matching on the rule set.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::EncoderOptions;

/// Largest content length CER allows in a primitive string encoding.
pub const CER_STRING_SEGMENT_LENGTH: usize = 1000;

/// Default bound on the nesting depth of an encoded value.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    /// Basic Encoding Rules
    Ber,
    /// Canonical Encoding Rules
    Cer,
    /// Distinguished Encoding Rules
    #[default]
    Der,
}

impl RuleSet {
    /// CER and DER both pin every value to a single encoding.
    pub fn is_restricted(self) -> bool {
        matches!(self, RuleSet::Cer | RuleSet::Der)
    }
}

impl Display for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RuleSet::Ber => "BER",
            RuleSet::Cer => "CER",
            RuleSet::Der => "DER",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RuleSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ber" => Ok(RuleSet::Ber),
            "cer" => Ok(RuleSet::Cer),
            "der" => Ok(RuleSet::Der),
            _ => Err(Error::UnknownRuleSet(s.to_string())),
        }
    }
}

/// Immutable switches consulted by the tag, length and type encoders.
///
/// A policy is resolved once per top-level encode call and passed by
/// reference to every nested conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulePolicy {
    rules: RuleSet,
    boolean_true_octet: u8,
    allow_indefinite_length: bool,
    max_unchunked_string_length: Option<usize>,
    require_minimal_length_form: bool,
    require_set_ordering: bool,
    indefinite_constructed: bool,
    clear_unused_bits: bool,
    length_octets: Option<u8>,
    allow_nan: bool,
    max_depth: usize,
}

impl RulePolicy {
    pub const fn ber() -> Self {
        RulePolicy {
            rules: RuleSet::Ber,
            boolean_true_octet: 0x01,
            allow_indefinite_length: true,
            max_unchunked_string_length: None,
            require_minimal_length_form: false,
            require_set_ordering: false,
            indefinite_constructed: false,
            clear_unused_bits: false,
            length_octets: None,
            allow_nan: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn cer() -> Self {
        RulePolicy {
            rules: RuleSet::Cer,
            boolean_true_octet: 0xFF,
            allow_indefinite_length: true,
            max_unchunked_string_length: Some(CER_STRING_SEGMENT_LENGTH),
            require_minimal_length_form: true,
            require_set_ordering: true,
            indefinite_constructed: true,
            clear_unused_bits: true,
            length_octets: None,
            allow_nan: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn der() -> Self {
        RulePolicy {
            rules: RuleSet::Der,
            boolean_true_octet: 0xFF,
            allow_indefinite_length: false,
            max_unchunked_string_length: None,
            require_minimal_length_form: true,
            require_set_ordering: true,
            indefinite_constructed: false,
            clear_unused_bits: true,
            length_octets: None,
            allow_nan: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Content octet emitted for BOOLEAN TRUE.
    pub fn boolean_true_octet(&self) -> u8 {
        self.boolean_true_octet
    }

    pub fn allow_indefinite_length(&self) -> bool {
        self.allow_indefinite_length
    }

    /// Content length above which a string is split into segments.
    pub fn max_unchunked_string_length(&self) -> Option<usize> {
        self.max_unchunked_string_length
    }

    pub fn require_minimal_length_form(&self) -> bool {
        self.require_minimal_length_form
    }

    pub fn require_set_ordering(&self) -> bool {
        self.require_set_ordering
    }

    /// Whether SEQUENCE, SET and EXPLICIT wrappers use the indefinite form.
    pub fn indefinite_constructed(&self) -> bool {
        self.indefinite_constructed
    }

    /// Whether the unused trailing bits of a BIT STRING are forced to zero.
    pub fn clear_unused_bits(&self) -> bool {
        self.clear_unused_bits
    }

    /// Fixed number of long-form length octets requested by the caller.
    pub fn length_octets(&self) -> Option<u8> {
        self.length_octets
    }

    pub fn allow_nan(&self) -> bool {
        self.allow_nan
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn violation(&self, reason: &str) -> Error {
        Error::rule_violation(self.rules, reason)
    }
}

impl From<RuleSet> for RulePolicy {
    fn from(rules: RuleSet) -> Self {
        match rules {
            RuleSet::Ber => RulePolicy::ber(),
            RuleSet::Cer => RulePolicy::cer(),
            RuleSet::Der => RulePolicy::der(),
        }
    }
}

impl TryFrom<&EncoderOptions> for RulePolicy {
    type Error = Error;

    fn try_from(options: &EncoderOptions) -> Result<Self> {
        let mut policy = RulePolicy::from(options.rules);

        if let Some(octet) = options.boolean_true_octet {
            if octet == 0x00 {
                return Err(policy.violation("BOOLEAN TRUE must be a non-zero octet"));
            }
            if policy.rules.is_restricted() && octet != 0xFF {
                return Err(policy.violation("BOOLEAN TRUE must be encoded as 0xFF"));
            }
            policy.boolean_true_octet = octet;
        }

        if options.indefinite_constructed {
            if !policy.allow_indefinite_length {
                return Err(policy.violation("indefinite length form is not permitted"));
            }
            policy.indefinite_constructed = true;
        }

        policy.length_octets = options.length_octets;
        policy.allow_nan = options.allow_nan;
        policy.max_depth = options.max_depth;
        Ok(policy)
    }
}
