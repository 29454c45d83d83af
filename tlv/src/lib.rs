//! # tlv
//!
//! Tag-length-value assembly shared by BER, CER and DER.
//!
//! A [`Tlv`] is a tree: primitive nodes carry their content octets,
//! constructed nodes carry child TLVs. Serialising a tree under a
//! [`RulePolicy`] renders the children first and only then commits the
//! identifier and length octets, so a failure never leaves half a TLV
//! behind.
//!
//! ```
//! use kumiki::RulePolicy;
//! use kumiki::encoder::Encoder;
//! use tlv::{Tag, Tlv, UniversalTag};
//!
//! let tlv = Tlv::new_primitive(Tag::universal(UniversalTag::Integer, false), vec![0x05]);
//! let bytes: Vec<u8> = tlv.encode(&RulePolicy::der()).unwrap();
//! assert_eq!(vec![0x02, 0x01, 0x05], bytes);
//! ```

#![forbid(unsafe_code)]

use kumiki::RulePolicy;
use kumiki::encoder::{EncodableTo, Encoder};

pub mod error;
pub mod length;
pub mod tag;

use error::{Error, Result};
pub use length::{LengthForm, encode_length, end_of_contents, indefinite_marker};
pub use tag::{TAG_CONSTRUCTED, Tag, TagClass, UniversalTag, encode_tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    form: LengthForm,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    /// A primitive TLV. The constructed bit of `tag` is cleared.
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag: tag.with_constructed(false),
            form: LengthForm::Definite,
            value: Value::Data(data),
        }
    }

    /// A constructed TLV with a definite length.
    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag: tag.with_constructed(true),
            form: LengthForm::Definite,
            value: Value::Tlv(tlvs),
        }
    }

    /// A constructed TLV with the indefinite length form, closed by the
    /// end-of-contents marker.
    pub fn new_indefinite(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag: tag.with_constructed(true),
            form: LengthForm::Indefinite,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn form(&self) -> LengthForm {
        self.form
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Replaces class and number of the identifier, keeping the constructed
    /// bit (IMPLICIT tagging).
    pub fn retag(self, tag: Tag) -> Self {
        let constructed = self.tag.is_constructed();
        Tlv {
            tag: tag.with_constructed(constructed),
            ..self
        }
    }

    fn content(&self, policy: &RulePolicy) -> Result<Vec<u8>> {
        match &self.value {
            Value::Data(data) => Ok(data.clone()),
            Value::Tlv(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    content.extend(tlv.encode(policy)?);
                }
                Ok(content)
            }
        }
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self, policy: &RulePolicy) -> Result<Vec<u8>> {
        let content = self.content(policy)?;
        let length = self.form.encode(content.len(), policy)?;
        let identifier = self.tag.to_bytes();

        let mut out = Vec::with_capacity(identifier.len() + length.len() + content.len() + 2);
        out.extend(identifier);
        out.extend(length);
        out.extend(content);
        if self.form == LengthForm::Indefinite {
            out.extend(end_of_contents());
        }
        Ok(out)
    }
}

/// Appends `value` as base-128 groups, most significant first, with the
/// continuation bit set on every group but the last. Zero is a single 0x00.
pub fn encode_base128(value: u64, out: &mut Vec<u8>) {
    // 64 bits need at most ten groups of seven.
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7f) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        out.push(groups[i] | continuation);
    }
}
