//! Caller-facing encoder configuration.

use serde::{Deserialize, Serialize};

use crate::rules::{DEFAULT_MAX_DEPTH, RuleSet};

/// Options resolved into a [`RulePolicy`](crate::RulePolicy) at the start of
/// every encode call.
///
/// Overrides only apply where the selected rule set leaves room for them.
/// Asking for a non-canonical form under CER or DER is reported as a rule
/// violation rather than silently ignored.
///
/// ```
/// use kumiki::{EncoderOptions, RuleSet};
///
/// let options: EncoderOptions = serde_json::from_str(r#"{"rules": "ber", "length_octets": 2}"#).unwrap();
/// assert_eq!(RuleSet::Ber, options.rules);
/// assert_eq!(Some(2), options.length_octets);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderOptions {
    pub rules: RuleSet,
    /// BOOLEAN TRUE content octet. Any non-zero octet under BER, only 0xFF
    /// under CER and DER.
    pub boolean_true_octet: Option<u8>,
    /// Use the indefinite length form for constructed values (BER).
    pub indefinite_constructed: bool,
    /// Emit every definite length in long form with exactly this many
    /// length octets.
    pub length_octets: Option<u8>,
    /// Encode NaN as the X.690 special value 0x42.
    pub allow_nan: bool,
    pub max_depth: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions::new(RuleSet::default())
    }
}

impl EncoderOptions {
    pub fn new(rules: RuleSet) -> Self {
        EncoderOptions {
            rules,
            boolean_true_octet: None,
            indefinite_constructed: false,
            length_octets: None,
            allow_nan: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_boolean_true_octet(mut self, octet: u8) -> Self {
        self.boolean_true_octet = Some(octet);
        self
    }

    pub fn with_indefinite_constructed(mut self, indefinite: bool) -> Self {
        self.indefinite_constructed = indefinite;
        self
    }

    pub fn with_length_octets(mut self, octets: u8) -> Self {
        self.length_octets = Some(octets);
        self
    }

    pub fn with_allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl From<RuleSet> for EncoderOptions {
    fn from(rules: RuleSet) -> Self {
        EncoderOptions::new(rules)
    }
}
