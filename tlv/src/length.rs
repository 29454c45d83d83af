//! Length octets (X.690 8.1.3, 10.1).

use kumiki::RulePolicy;
use kumiki::error::Error as RuleError;

use crate::error::{Error, Result};

/// The single length octet of the indefinite form.
pub const INDEFINITE_LENGTH: u8 = 0x80;

/// Marker closing the contents of an indefinite-length value.
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

/// Largest short-form length.
const SHORT_FORM_MAX: usize = 0x7f;

/// The count field is seven bits wide and 0x7F is reserved (X.690 8.1.3.5).
pub const MAX_LENGTH_OCTETS: usize = 126;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthForm {
    #[default]
    Definite,
    Indefinite,
}

impl LengthForm {
    /// Renders the length octets for `content_len` content octets.
    pub fn encode(&self, content_len: usize, policy: &RulePolicy) -> Result<Vec<u8>> {
        match self {
            LengthForm::Definite => encode_length(content_len, policy),
            LengthForm::Indefinite => {
                if !policy.allow_indefinite_length() {
                    return Err(RuleError::rule_violation(
                        policy.rules(),
                        "indefinite length form is not permitted",
                    )
                    .into());
                }
                log::trace!(
                    "indefinite length over {} content octets under {}",
                    content_len,
                    policy.rules()
                );
                Ok(indefinite_marker())
            }
        }
    }
}

/// Renders a definite length.
///
/// The shortest form is used unless the policy carries a caller-demanded
/// width, in which case the long form with exactly that many octets is
/// produced, provided the rule set allows it.
pub fn encode_length(n: usize, policy: &RulePolicy) -> Result<Vec<u8>> {
    let Some(octets) = policy.length_octets() else {
        if n <= SHORT_FORM_MAX {
            return Ok(vec![n as u8]);
        }
        return long_form(n, minimal_octets(n));
    };

    let octets = usize::from(octets);
    if policy.require_minimal_length_form() {
        if n <= SHORT_FORM_MAX {
            return Err(RuleError::rule_violation(
                policy.rules(),
                format!("length {n} must use the short form"),
            )
            .into());
        }
        if octets > minimal_octets(n) {
            return Err(RuleError::rule_violation(
                policy.rules(),
                format!("length {n} must not carry leading zero length octets"),
            )
            .into());
        }
    }
    long_form(n, octets)
}

pub fn indefinite_marker() -> Vec<u8> {
    vec![INDEFINITE_LENGTH]
}

pub fn end_of_contents() -> Vec<u8> {
    END_OF_CONTENTS.to_vec()
}

/// Number of octets needed to hold `n` big endian, at least one.
fn minimal_octets(n: usize) -> usize {
    let bits = (usize::BITS - n.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

fn long_form(n: usize, octets: usize) -> Result<Vec<u8>> {
    let needed = minimal_octets(n);
    if octets == 0 || octets > MAX_LENGTH_OCTETS || octets < needed {
        return Err(Error::LengthOverflow { length: n, octets });
    }

    let mut out = Vec::with_capacity(octets + 1);
    out.push(INDEFINITE_LENGTH | octets as u8);
    out.resize(1 + octets - needed, 0x00);
    let bytes = n.to_be_bytes();
    out.extend_from_slice(&bytes[bytes.len() - needed..]);
    Ok(out)
}
