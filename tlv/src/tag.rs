//! Identifier octets (X.690 8.1.2).

use serde::{Deserialize, Serialize};

use crate::encode_base128;
use crate::error::{Error, Result};

/// Constructed bit of the leading identifier octet.
pub const TAG_CONSTRUCTED: u8 = 0x20;

/// Tag number field value announcing the high-tag-number form.
const HIGH_TAG_NUMBER: u8 = 0x1F;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TagClass {
    Universal = 0b00,
    Application = 0b01,
    ContextSpecific = 0b10,
    Private = 0b11,
}

/// Universal tag numbers produced by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum UniversalTag {
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    Null = 0x05,
    ObjectIdentifier = 0x06,
    Real = 0x09,
    Enumerated = 0x0a,
    UTF8String = 0x0c,
    Sequence = 0x10,
    Set = 0x11,
    PrintableString = 0x13,
    IA5String = 0x16,
    UniversalString = 0x1c,
    BMPString = 0x1e,
}

impl From<UniversalTag> for u32 {
    fn from(value: UniversalTag) -> Self {
        value as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u32,
}

impl Tag {
    pub fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Tag {
            class,
            constructed,
            number,
        }
    }

    /// Builds a tag from a caller supplied number, rejecting values that
    /// cannot be a tag number.
    pub fn try_new(class: TagClass, constructed: bool, number: i64) -> Result<Self> {
        let number = u32::try_from(number).map_err(|_| Error::InvalidTag(number))?;
        Ok(Tag::new(class, constructed, number))
    }

    pub fn universal(tag: UniversalTag, constructed: bool) -> Self {
        Tag::new(TagClass::Universal, constructed, tag.into())
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn with_constructed(self, constructed: bool) -> Self {
        Tag {
            constructed,
            ..self
        }
    }

    /// Ordering key of the canonical tag order used for SET components
    /// (X.690 8.6): universal, application, context-specific, private, then
    /// ascending tag number.
    pub fn canonical_order(&self) -> (TagClass, u32) {
        (self.class, self.number)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut leading = (self.class as u8) << 6;
        if self.constructed {
            leading |= TAG_CONSTRUCTED;
        }

        if self.number < u32::from(HIGH_TAG_NUMBER) {
            return vec![leading | self.number as u8];
        }

        let mut out = vec![leading | HIGH_TAG_NUMBER];
        encode_base128(u64::from(self.number), &mut out);
        out
    }
}

/// Renders the identifier octets of a tag.
pub fn encode_tag(class: TagClass, constructed: bool, number: i64) -> Result<Vec<u8>> {
    Ok(Tag::try_new(class, constructed, number)?.to_bytes())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(class, constructed, number, expected,
        case(TagClass::Universal, false, 1, vec![0x01]),
        case(TagClass::Universal, false, 30, vec![0x1e]),
        case(TagClass::Universal, true, 16, vec![0x30]),
        case(TagClass::Universal, true, 17, vec![0x31]),
        case(TagClass::Application, false, 5, vec![0x45]),
        case(TagClass::ContextSpecific, true, 0, vec![0xa0]),
        case(TagClass::ContextSpecific, false, 3, vec![0x83]),
        case(TagClass::Private, true, 30, vec![0xfe]),
        // high-tag-number form
        case(TagClass::ContextSpecific, false, 31, vec![0x9f, 0x1f]),
        case(TagClass::Application, true, 127, vec![0x7f, 0x7f]),
        case(TagClass::ContextSpecific, false, 128, vec![0x9f, 0x81, 0x00]),
        case(TagClass::Private, false, 201, vec![0xdf, 0x81, 0x49]),
        case(TagClass::Universal, false, 16384, vec![0x1f, 0x81, 0x80, 0x00]),
        case(TagClass::ContextSpecific, false, u32::MAX as i64, vec![0x9f, 0x8f, 0xff, 0xff, 0xff, 0x7f]),
    )]
    fn test_encode_tag(class: TagClass, constructed: bool, number: i64, expected: Vec<u8>) {
        let actual = encode_tag(class, constructed, number).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(number, case(-1), case(i64::MIN), case(u32::MAX as i64 + 1))]
    fn test_encode_tag_invalid(number: i64) {
        let err = encode_tag(TagClass::ContextSpecific, false, number).unwrap_err();
        assert_eq!(Error::InvalidTag(number), err);
    }

    #[test]
    fn test_universal_tags() {
        assert_eq!(vec![0x1c], Tag::universal(UniversalTag::UniversalString, false).to_bytes());
        assert_eq!(vec![0x24], Tag::universal(UniversalTag::OctetString, true).to_bytes());
        assert_eq!(vec![0x09], Tag::universal(UniversalTag::Real, false).to_bytes());
    }

    #[test]
    fn test_canonical_order() {
        let mut tags = vec![
            Tag::new(TagClass::Private, false, 0),
            Tag::new(TagClass::ContextSpecific, true, 1),
            Tag::new(TagClass::ContextSpecific, false, 0),
            Tag::universal(UniversalTag::Sequence, true),
            Tag::universal(UniversalTag::Integer, false),
            Tag::new(TagClass::Application, false, 2),
        ];
        tags.sort_by_key(Tag::canonical_order);
        let numbers: Vec<_> = tags.iter().map(|t| (t.class(), t.number())).collect();
        assert_eq!(
            vec![
                (TagClass::Universal, 2),
                (TagClass::Universal, 16),
                (TagClass::Application, 2),
                (TagClass::ContextSpecific, 0),
                (TagClass::ContextSpecific, 1),
                (TagClass::Private, 0),
            ],
            numbers
        );
    }
}
