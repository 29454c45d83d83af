//! REAL content octets (X.690 8.5, 11.3).
//!
//! A value is either a `mantissa * base ^ exponent` triple or an IEEE
//! double. Triples in base 2, 8 or 16 use the binary form, base 10 triples
//! and doubles use the ISO 6093 NR3 character form.

use kumiki::RulePolicy;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::integer::Integer;

const BINARY_ENCODING: u8 = 0x80;
const NEGATIVE: u8 = 0x40;
const NR3_FORM: u8 = 0x03;

const PLUS_INFINITY: u8 = 0x40;
const MINUS_INFINITY: u8 = 0x41;
const NOT_A_NUMBER: u8 = 0x42;
const MINUS_ZERO: u8 = 0x43;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Real {
    Binary {
        mantissa: Integer,
        base: u32,
        exponent: i64,
    },
    Decimal(f64),
}

impl Real {
    pub fn binary(mantissa: impl Into<Integer>, base: u32, exponent: i64) -> Self {
        Real::Binary {
            mantissa: mantissa.into(),
            base,
            exponent,
        }
    }

    pub(crate) fn to_content(&self, policy: &RulePolicy) -> Result<Vec<u8>> {
        match self {
            Real::Binary {
                mantissa,
                base,
                exponent,
            } => {
                let mantissa = mantissa.as_bigint();
                if mantissa.is_zero() {
                    return Ok(Vec::new());
                }
                match base {
                    10 => decimal_canonical(
                        mantissa.sign() == Sign::Minus,
                        &mantissa.magnitude().to_string(),
                        *exponent,
                    ),
                    2 | 8 | 16 => binary(mantissa, *base, *exponent),
                    _ => Err(Error::UnsupportedRealValue(format!(
                        "base {} is not one of 2, 8, 10 or 16",
                        base
                    ))),
                }
            }
            Real::Decimal(value) => decimal(*value, policy),
        }
    }
}

impl From<f64> for Real {
    fn from(value: f64) -> Self {
        Real::Decimal(value)
    }
}

/// Binary form, always normalised to base 2 with an odd mantissa
/// (X.690 11.3.1). BER permits other bases but every rule set emits the
/// same octets for the same value.
fn binary(mantissa: &BigInt, base: u32, exponent: i64) -> Result<Vec<u8>> {
    let negative = mantissa.sign() == Sign::Minus;
    let mut magnitude: BigUint = mantissa.magnitude().clone();

    let bits_per_digit: i64 = match base {
        8 => 3,
        16 => 4,
        _ => 1,
    };
    let shift = magnitude.trailing_zeros().unwrap_or(0);
    let exponent = exponent
        .checked_mul(bits_per_digit)
        .and_then(|e| e.checked_add(i64::try_from(shift).ok()?))
        .ok_or_else(|| Error::UnsupportedRealValue("exponent out of range".to_string()))?;
    magnitude >>= shift;
    log::trace!("REAL normalised to {} * 2^{}", magnitude, exponent);

    let exponent_octets = Integer::from(exponent).to_signed_bytes();
    let (format, length_octet) = match exponent_octets.len() {
        1 => (0b00, None),
        2 => (0b01, None),
        3 => (0b10, None),
        n => (0b11, Some(n as u8)),
    };

    let mut first = BINARY_ENCODING | format;
    if negative {
        first |= NEGATIVE;
    }

    let mut content = vec![first];
    content.extend(length_octet);
    content.extend(exponent_octets);
    content.extend(magnitude.to_bytes_be());
    Ok(content)
}

fn decimal(value: f64, policy: &RulePolicy) -> Result<Vec<u8>> {
    if value.is_nan() {
        if policy.allow_nan() {
            return Ok(vec![NOT_A_NUMBER]);
        }
        return Err(Error::UnsupportedRealValue(format!(
            "NaN has no encoding under {}",
            policy.rules()
        )));
    }
    if value.is_infinite() {
        let special = if value.is_sign_positive() {
            PLUS_INFINITY
        } else {
            MINUS_INFINITY
        };
        return Ok(vec![special]);
    }
    if value == 0.0 {
        if value.is_sign_negative() {
            return Ok(vec![MINUS_ZERO]);
        }
        return Ok(Vec::new());
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.23e0".
    let formatted = format!("{:e}", value.abs());
    let (mantissa, exponent) = formatted
        .split_once('e')
        .ok_or_else(|| Error::UnsupportedRealValue(format!("cannot format {}", value)))?;
    let exponent: i64 = exponent
        .parse()
        .map_err(|_| Error::UnsupportedRealValue(format!("cannot format {}", value)))?;
    let (integral, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{}{}", integral, fraction);
    decimal_canonical(
        value.is_sign_negative(),
        &digits,
        exponent - fraction.len() as i64,
    )
}

/// NR3 text with trailing mantissa zeros folded into the exponent.
fn decimal_canonical(negative: bool, digits: &str, exponent: i64) -> Result<Vec<u8>> {
    let trimmed = digits.trim_end_matches('0');
    let exponent = exponent
        .checked_add((digits.len() - trimmed.len()) as i64)
        .ok_or_else(|| Error::UnsupportedRealValue("exponent out of range".to_string()))?;
    Ok(nr3(negative, trimmed, exponent))
}

fn nr3(negative: bool, digits: &str, exponent: i64) -> Vec<u8> {
    let sign = if negative { "-" } else { "" };
    // ISO 6093 NR3 writes a sign only for negative and zero exponents.
    let exponent_sign = match exponent {
        e if e < 0 => "-",
        0 => "+",
        _ => "",
    };
    let text = format!(
        "{}{}E{}{}",
        sign,
        digits,
        exponent_sign,
        exponent.unsigned_abs()
    );

    let mut content = Vec::with_capacity(text.len() + 1);
    content.push(NR3_FORM);
    content.extend(text.into_bytes());
    content
}
