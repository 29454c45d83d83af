use std::fmt::Display;
use std::str::FromStr;

use kumiki::RulePolicy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tlv::{Tag, Tlv, UniversalTag};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            (self.unused, &self.data).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let bits = String::deserialize(deserializer)?;
            BitString::from_str(&bits).map_err(serde::de::Error::custom)
        } else {
            let (unused, data) = <(u8, Vec<u8>)>::deserialize(deserializer)?;
            BitString::new(unused, data).map_err(serde::de::Error::custom)
        }
    }
}

impl BitString {
    /// Creates a new BitString with the specified number of unused bits and data.
    ///
    /// The unused bits of the last byte are kept exactly as given. `unused`
    /// must be 0-7, and 0 when `data` is empty.
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self> {
        if unused > 7 {
            return Err(Error::InvalidBitString(format!(
                "unused bits {} out of range (must be 0-7)",
                unused
            )));
        }
        if data.is_empty() && unused != 0 {
            return Err(Error::InvalidBitString(format!(
                "{} unused bits without data",
                unused
            )));
        }
        Ok(BitString { unused, data })
    }

    /// Creates a BitString holding the first `bit_len` bits of `data`.
    pub fn from_bits(data: Vec<u8>, bit_len: usize) -> Result<Self> {
        if data.len() != bit_len.div_ceil(8) {
            return Err(Error::InvalidBitString(format!(
                "{} bits need {} bytes, got {}",
                bit_len,
                bit_len.div_ceil(8),
                data.len()
            )));
        }
        let unused = (data.len() * 8 - bit_len) as u8;
        Ok(BitString { unused, data })
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Returns a reference to the underlying byte data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            (self.data.len() * 8).saturating_sub(self.unused as usize)
        }
    }

    /// Data octets as they go on the wire. CER and DER require the unused
    /// bits to be zero (X.690 11.2.1).
    fn wire_data(&self, policy: &RulePolicy) -> Vec<u8> {
        let mut data = self.data.clone();
        if policy.clear_unused_bits() {
            if let Some(last) = data.last_mut() {
                *last &= 0xffu8 << self.unused;
            }
        }
        data
    }

    pub(crate) fn to_tlv(&self, policy: &RulePolicy) -> Tlv {
        let tag = Tag::universal(UniversalTag::BitString, false);
        let data = self.wire_data(policy);

        // The initial octet counts against the segment size.
        let segment = match policy.max_unchunked_string_length() {
            Some(limit) if data.len() + 1 > limit => limit - 1,
            _ => {
                let mut content = Vec::with_capacity(data.len() + 1);
                content.push(self.unused);
                content.extend(data);
                return Tlv::new_primitive(tag, content);
            }
        };

        log::trace!(
            "segmenting BIT STRING of {} octets into {}-octet parts",
            data.len(),
            segment
        );
        let chunks: Vec<&[u8]> = data.chunks(segment).collect();
        let last = chunks.len() - 1;
        let segments = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let unused = if i == last { self.unused } else { 0 };
                let mut content = Vec::with_capacity(chunk.len() + 1);
                content.push(unused);
                content.extend_from_slice(chunk);
                Tlv::new_primitive(tag, content)
            })
            .collect();
        Tlv::new_indefinite(tag, segments)
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Parses the textual bit form, e.g. `"101100111000"`.
impl FromStr for BitString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut data = vec![0u8; s.len().div_ceil(8)];
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => data[i / 8] |= 0x80 >> (i % 8),
                _ => {
                    return Err(Error::InvalidBitString(format!(
                        "invalid bit character {:?}",
                        c
                    )));
                }
            }
        }
        BitString::from_bits(data, s.len())
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();

        for (i, byte) in self.data.iter().enumerate() {
            if i == self.data.len() - 1 && self.unused > 0 {
                // Handle the last byte with unused bits
                let valid_bits = byte >> self.unused;
                let bit_count = 8usize.saturating_sub(self.unused as usize);
                result.push_str(&format!(
                    "{:0bit_count$b}",
                    valid_bits,
                    bit_count = bit_count
                ));
            } else {
                result.push_str(&format!("{:08b}", byte));
            }
        }

        write!(f, "{}", result)
    }
}
