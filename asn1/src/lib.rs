//! # asn1
//!
//! ASN.1 values and their BER, CER and DER encodings (ITU-T X.690).
//!
//! An [`Element`] is converted into a [`Tlv`] tree under a [`RulePolicy`],
//! and the tree is then serialised. [`encode`] and [`encode_with`] run both
//! steps.
//!
//! ```
//! use asn1::{Element, Integer, encode};
//! use kumiki::RuleSet;
//!
//! let value = Element::Sequence(vec![
//!     Element::Integer(Integer::from(5)),
//!     Element::Boolean(true),
//! ]);
//! assert_eq!(
//!     vec![0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0xff],
//!     encode(&value, RuleSet::Der).unwrap()
//! );
//! assert_eq!(
//!     vec![0x30, 0x80, 0x02, 0x01, 0x05, 0x01, 0x01, 0xff, 0x00, 0x00],
//!     encode(&value, RuleSet::Cer).unwrap()
//! );
//! ```

#![forbid(unsafe_code)]

use kumiki::encoder::{EncodableTo, Encoder};
use kumiki::{EncoderOptions, RulePolicy, RuleSet};
use serde::{Deserialize, Serialize};
use tlv::{Tag, Tlv, UniversalTag};

pub mod error;
mod bit_string;
mod integer;
mod octet_string;
mod oid;
mod real;
mod string;

pub use bit_string::BitString;
use error::{Error, Result};
pub use integer::Integer;
pub use octet_string::OctetString;
pub use oid::ObjectIdentifier;
pub use real::Real;
pub use tlv::TagClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Real(Real),
    Enumerated(Integer),
    UTF8String(String),
    PrintableString(String),
    IA5String(String),
    BMPString(String),
    UniversalString(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    SetOf(Vec<Element>),
    /// EXPLICIT tagging wraps the inner encoding, IMPLICIT tagging replaces
    /// its identifier.
    Tagged {
        class: TagClass,
        number: i64,
        explicit: bool,
        element: Box<Element>,
    },
}

impl Element {
    /// ASN.1 type name, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::Real(_) => "REAL",
            Element::Enumerated(_) => "ENUMERATED",
            Element::UTF8String(_) => "UTF8String",
            Element::PrintableString(_) => "PrintableString",
            Element::IA5String(_) => "IA5String",
            Element::BMPString(_) => "BMPString",
            Element::UniversalString(_) => "UniversalString",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::SetOf(_) => "SET OF",
            Element::Tagged { .. } => "tagged",
        }
    }

    fn to_tlv(&self, policy: &RulePolicy, depth: usize) -> Result<Tlv> {
        if depth > policy.max_depth() {
            return Err(Error::DepthExceeded(policy.max_depth()));
        }

        match self {
            Element::Boolean(value) => {
                let octet = if *value {
                    policy.boolean_true_octet()
                } else {
                    0x00
                };
                Ok(primitive(UniversalTag::Boolean, vec![octet]))
            }
            Element::Integer(integer) => {
                Ok(primitive(UniversalTag::Integer, integer.to_signed_bytes()))
            }
            Element::BitString(bit_string) => Ok(bit_string.to_tlv(policy)),
            Element::OctetString(octet_string) => Ok(octet_string.to_tlv(policy)),
            Element::Null => Ok(primitive(UniversalTag::Null, Vec::new())),
            Element::ObjectIdentifier(oid) => Ok(primitive(
                UniversalTag::ObjectIdentifier,
                Vec::<u8>::try_from(oid)?,
            )),
            Element::Real(real) => Ok(primitive(UniversalTag::Real, real.to_content(policy)?)),
            Element::Enumerated(integer) => Ok(primitive(
                UniversalTag::Enumerated,
                integer.to_signed_bytes(),
            )),
            Element::UTF8String(s) => Ok(string_element(
                UniversalTag::UTF8String,
                s.as_bytes().to_vec(),
                policy,
            )),
            Element::PrintableString(s) => Ok(string_element(
                UniversalTag::PrintableString,
                string::printable_content(s)?,
                policy,
            )),
            Element::IA5String(s) => Ok(string_element(
                UniversalTag::IA5String,
                string::ia5_content(s)?,
                policy,
            )),
            Element::BMPString(s) => Ok(string_element(
                UniversalTag::BMPString,
                string::bmp_content(s)?,
                policy,
            )),
            Element::UniversalString(s) => Ok(string_element(
                UniversalTag::UniversalString,
                string::universal_content(s),
                policy,
            )),
            Element::Sequence(elements) => {
                let tlvs = children(elements, policy, depth)?;
                Ok(constructed(
                    Tag::universal(UniversalTag::Sequence, true),
                    tlvs,
                    policy,
                ))
            }
            Element::Set(elements) => {
                let mut tlvs = children(elements, policy, depth)?;
                if policy.require_set_ordering() {
                    // Stable, so equal tags keep their given order.
                    tlvs.sort_by_key(|tlv| tlv.tag().canonical_order());
                    log::trace!("SET components ordered by tag under {}", policy.rules());
                }
                Ok(constructed(
                    Tag::universal(UniversalTag::Set, true),
                    tlvs,
                    policy,
                ))
            }
            Element::SetOf(elements) => {
                let mut tlvs = children(elements, policy, depth)?;
                if policy.require_set_ordering() {
                    let mut keyed = tlvs
                        .into_iter()
                        .map(|tlv| -> Result<(Vec<u8>, Tlv)> { Ok((tlv.encode(policy)?, tlv)) })
                        .collect::<Result<Vec<_>>>()?;
                    keyed.sort_by(|a, b| a.0.cmp(&b.0));
                    tlvs = keyed.into_iter().map(|(_, tlv)| tlv).collect();
                    log::trace!("SET OF components ordered by encoding under {}", policy.rules());
                }
                Ok(constructed(
                    Tag::universal(UniversalTag::Set, true),
                    tlvs,
                    policy,
                ))
            }
            Element::Tagged {
                class,
                number,
                explicit,
                element,
            } => {
                let tag = Tag::try_new(*class, false, *number)?;
                let inner = element.to_tlv(policy, depth + 1)?;
                if *explicit {
                    Ok(constructed(tag, vec![inner], policy))
                } else {
                    Ok(inner.retag(tag))
                }
            }
        }
    }
}

fn primitive(tag: UniversalTag, content: Vec<u8>) -> Tlv {
    Tlv::new_primitive(Tag::universal(tag, false), content)
}

fn string_element(tag: UniversalTag, content: Vec<u8>, policy: &RulePolicy) -> Tlv {
    string::string_tlv(Tag::universal(tag, false), content, policy)
}

fn constructed(tag: Tag, tlvs: Vec<Tlv>, policy: &RulePolicy) -> Tlv {
    if policy.indefinite_constructed() {
        Tlv::new_indefinite(tag, tlvs)
    } else {
        Tlv::new_constructed(tag, tlvs)
    }
}

fn children(elements: &[Element], policy: &RulePolicy, depth: usize) -> Result<Vec<Tlv>> {
    elements
        .iter()
        .map(|element| element.to_tlv(policy, depth + 1))
        .collect()
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self, policy: &RulePolicy) -> Result<Tlv> {
        self.to_tlv(policy, 1)
    }
}

/// Encodes `element` with the default policy of `rules`.
pub fn encode(element: &Element, rules: RuleSet) -> Result<Vec<u8>> {
    encode_policy(element, &RulePolicy::from(rules))
}

/// Encodes `element` with the policy resolved from `options`.
///
/// Overrides the rule set does not permit fail with a rule violation before
/// anything is encoded.
pub fn encode_with(element: &Element, options: &EncoderOptions) -> Result<Vec<u8>> {
    let policy = RulePolicy::try_from(options)?;
    encode_policy(element, &policy)
}

fn encode_policy(element: &Element, policy: &RulePolicy) -> Result<Vec<u8>> {
    log::debug!("encoding {} under {}", element.kind(), policy.rules());
    let tlv: Tlv = element.encode(policy)?;
    Ok(tlv.encode(policy)?)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kumiki::error::Error as RuleError;
    use rstest::rstest;

    use super::*;

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    fn tagged(class: TagClass, number: i64, explicit: bool, element: Element) -> Element {
        Element::Tagged {
            class,
            number,
            explicit,
            element: Box::new(element),
        }
    }

    #[rstest(input, ber, cer, der,
        case(
            Element::Sequence(vec![int(5), Element::Boolean(true)]),
            vec![0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0x01],
            vec![0x30, 0x80, 0x02, 0x01, 0x05, 0x01, 0x01, 0xff, 0x00, 0x00],
            vec![0x30, 0x06, 0x02, 0x01, 0x05, 0x01, 0x01, 0xff]
        ),
        case(
            Element::Sequence(vec![]),
            vec![0x30, 0x00],
            vec![0x30, 0x80, 0x00, 0x00],
            vec![0x30, 0x00]
        ),
        case(
            Element::Set(vec![Element::Null, int(5), Element::Boolean(true)]),
            vec![0x31, 0x08, 0x05, 0x00, 0x02, 0x01, 0x05, 0x01, 0x01, 0x01],
            vec![0x31, 0x80, 0x01, 0x01, 0xff, 0x02, 0x01, 0x05, 0x05, 0x00, 0x00, 0x00],
            vec![0x31, 0x08, 0x01, 0x01, 0xff, 0x02, 0x01, 0x05, 0x05, 0x00]
        ),
        case(
            Element::SetOf(vec![int(256), int(5), int(1)]),
            vec![0x31, 0x0a, 0x02, 0x02, 0x01, 0x00, 0x02, 0x01, 0x05, 0x02, 0x01, 0x01],
            vec![0x31, 0x80, 0x02, 0x01, 0x01, 0x02, 0x01, 0x05, 0x02, 0x02, 0x01, 0x00, 0x00, 0x00],
            vec![0x31, 0x0a, 0x02, 0x01, 0x01, 0x02, 0x01, 0x05, 0x02, 0x02, 0x01, 0x00]
        ),
    )]
    fn test_encode_constructed(input: Element, ber: Vec<u8>, cer: Vec<u8>, der: Vec<u8>) {
        assert_eq!(ber, encode(&input, RuleSet::Ber).unwrap());
        assert_eq!(cer, encode(&input, RuleSet::Cer).unwrap());
        assert_eq!(der, encode(&input, RuleSet::Der).unwrap());
    }

    #[test]
    fn test_set_orders_universal_before_context_specific() {
        let set = Element::Set(vec![
            tagged(TagClass::ContextSpecific, 0, false, Element::Null),
            int(1),
        ]);
        assert_eq!(
            vec![0x31, 0x05, 0x02, 0x01, 0x01, 0x80, 0x00],
            encode(&set, RuleSet::Der).unwrap()
        );
    }

    #[rstest(input, expected,
        case(tagged(TagClass::ContextSpecific, 0, true, int(5)), vec![0xa0, 0x03, 0x02, 0x01, 0x05]),
        case(tagged(TagClass::ContextSpecific, 1, false, int(5)), vec![0x81, 0x01, 0x05]),
        case(tagged(TagClass::ContextSpecific, 31, false, Element::Null), vec![0x9f, 0x1f, 0x00]),
        case(
            tagged(TagClass::Application, 1000, true, Element::Boolean(true)),
            vec![0x7f, 0x87, 0x68, 0x03, 0x01, 0x01, 0xff]
        ),
        case(
            tagged(TagClass::Private, 2, false, Element::Sequence(vec![Element::Null])),
            vec![0xe2, 0x02, 0x05, 0x00]
        ),
    )]
    fn test_encode_tagged(input: Element, expected: Vec<u8>) {
        assert_eq!(expected, encode(&input, RuleSet::Der).unwrap());
    }

    #[test]
    fn test_encode_tagged_invalid_number() {
        let value = tagged(TagClass::ContextSpecific, -1, true, Element::Null);
        assert_eq!(Error::InvalidTag(-1), encode(&value, RuleSet::Der).unwrap_err());
    }

    #[test]
    fn test_implicit_tag_keeps_cer_segmentation() {
        let value = tagged(
            TagClass::ContextSpecific,
            0,
            false,
            Element::OctetString(OctetString::from(vec![0x41; 1500])),
        );
        let bytes = encode(&value, RuleSet::Cer).unwrap();
        assert_eq!(vec![0xa0, 0x80, 0x04, 0x82, 0x03, 0xe8], bytes[..6].to_vec());
        assert_eq!(vec![0x00, 0x00], bytes[bytes.len() - 2..].to_vec());
    }

    #[rstest(max_depth, input, ok,
        case(2, Element::Sequence(vec![Element::Null]), true),
        case(2, Element::Sequence(vec![Element::Sequence(vec![Element::Null])]), false),
        case(1, tagged(TagClass::ContextSpecific, 0, true, Element::Null), false),
        case(1, Element::Sequence(vec![]), true),
    )]
    fn test_encode_max_depth(max_depth: usize, input: Element, ok: bool) {
        let options = EncoderOptions::new(RuleSet::Der).with_max_depth(max_depth);
        let result = encode_with(&input, &options);
        if ok {
            assert!(result.is_ok());
        } else {
            assert_eq!(Error::DepthExceeded(max_depth), result.unwrap_err());
        }
    }

    #[test]
    fn test_encode_default_depth_limit() {
        let mut value = Element::Null;
        for _ in 0..kumiki::DEFAULT_MAX_DEPTH {
            value = Element::Sequence(vec![value]);
        }
        assert_eq!(
            Error::DepthExceeded(kumiki::DEFAULT_MAX_DEPTH),
            encode(&value, RuleSet::Ber).unwrap_err()
        );
    }

    #[test]
    fn test_encode_with_ber_overrides() {
        let value = Element::Sequence(vec![Element::Boolean(true)]);
        let options = EncoderOptions::new(RuleSet::Ber)
            .with_boolean_true_octet(0x5a)
            .with_indefinite_constructed(true);
        assert_eq!(
            vec![0x30, 0x80, 0x01, 0x01, 0x5a, 0x00, 0x00],
            encode_with(&value, &options).unwrap()
        );
    }

    #[test]
    fn test_encode_with_fixed_length_octets() {
        let options = EncoderOptions::new(RuleSet::Ber).with_length_octets(2);
        assert_eq!(
            vec![0x02, 0x82, 0x00, 0x01, 0x05],
            encode_with(&int(5), &options).unwrap()
        );

        let options = EncoderOptions::new(RuleSet::Der).with_length_octets(1);
        let err = encode_with(&int(5), &options).unwrap_err();
        assert!(matches!(err, Error::Rules(RuleError::RuleViolation { .. })), "{err:?}");
    }

    #[test]
    fn test_encode_with_rejects_invalid_overrides() {
        let options = EncoderOptions::new(RuleSet::Der).with_boolean_true_octet(0x01);
        let err = encode_with(&Element::Boolean(true), &options).unwrap_err();
        assert!(matches!(err, Error::Rules(RuleError::RuleViolation { .. })));

        let options = EncoderOptions::new(RuleSet::Der).with_indefinite_constructed(true);
        let err = encode_with(&Element::Null, &options).unwrap_err();
        assert!(matches!(err, Error::Rules(RuleError::RuleViolation { .. })));
    }

    #[test]
    fn test_encode_propagates_nested_error() {
        let value = Element::Sequence(vec![
            int(1),
            Element::BMPString("\u{1f600}".to_string()),
        ]);
        assert_eq!(
            Error::CharacterOutOfRange {
                string_type: "BMPString",
                character: '\u{1f600}'
            },
            encode(&value, RuleSet::Der).unwrap_err()
        );
    }

    #[test]
    fn test_element_encoder_builds_tlv() {
        let value = Element::Sequence(vec![Element::Null]);
        let tlv: Tlv = value.encode(&RulePolicy::cer()).unwrap();
        assert_eq!(tlv::LengthForm::Indefinite, tlv.form());
        assert_eq!(1, tlv.tlvs().unwrap().len());
    }

    #[test]
    fn test_element_deserialize_and_encode() {
        let json = r#"{"Sequence":[
            {"Integer":"90000"},
            {"ObjectIdentifier":"1.2.840.113549"},
            {"BitString":"101100111000"},
            {"OctetString":"0102"},
            "Null",
            {"Tagged":{"class":"context_specific","number":0,"explicit":true,"element":{"Boolean":false}}}
        ]}"#;
        let value: Element = serde_json::from_str(json).unwrap();
        let expected = Element::Sequence(vec![
            int(90000),
            Element::ObjectIdentifier(ObjectIdentifier::from_str("1.2.840.113549").unwrap()),
            Element::BitString(BitString::from_str("101100111000").unwrap()),
            Element::OctetString(OctetString::from(vec![0x01, 0x02])),
            Element::Null,
            tagged(TagClass::ContextSpecific, 0, true, Element::Boolean(false)),
        ]);
        assert_eq!(expected, value);

        let bytes = encode(&value, RuleSet::Der).unwrap();
        assert_eq!(
            vec![
                0x30, 0x1d, 0x02, 0x03, 0x01, 0x5f, 0x90, 0x06, 0x06, 0x2a, 0x86, 0x48, 0x86, 0xf7,
                0x0d, 0x03, 0x03, 0x04, 0xb3, 0x80, 0x04, 0x02, 0x01, 0x02, 0x05, 0x00, 0xa0, 0x03,
                0x01, 0x01, 0x00
            ],
            bytes
        );
    }
}
