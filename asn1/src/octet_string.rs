use std::fmt::Display;

use kumiki::RulePolicy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tlv::{Tag, Tlv, UniversalTag};

use crate::string::string_tlv;

/// Arbitrary octets, emitted verbatim. Human-readable serde formats carry
/// them as a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Primitive OCTET STRING, segmented under CER once it exceeds the
    /// policy's unchunked limit.
    pub(crate) fn to_tlv(&self, policy: &RulePolicy) -> Tlv {
        string_tlv(
            Tag::universal(UniversalTag::OctetString, false),
            self.inner.clone(),
            policy,
        )
    }
}

/// Parses hex digits, ignoring whitespace and `:`/`-` separators.
fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = s
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == ':' || *c == '-'))
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| format!("invalid hex digit {:?} in {:?}", c, s))
        })
        .collect::<Result<_, _>>()?;
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {:?}", s));
    }
    Ok(digits.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.inner.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let inner = parse_hex(&s).map_err(serde::de::Error::custom)?;
            Ok(OctetString { inner })
        } else {
            let inner = Vec::<u8>::deserialize(deserializer)?;
            Ok(OctetString { inner })
        }
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

/// The UTF-8 bytes of `value`.
impl From<&str> for OctetString {
    fn from(value: &str) -> Self {
        OctetString {
            inner: value.as_bytes().to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.inner {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
