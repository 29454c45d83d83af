//! Character string content octets and CER string segmentation.

use kumiki::RulePolicy;
use tlv::{Tag, Tlv, UniversalTag};

use crate::error::{Error, Result};

/// BMPString: one UTF-16 code unit per character, big endian. Characters
/// outside the Basic Multilingual Plane have no single-unit form.
pub(crate) fn bmp_content(s: &str) -> Result<Vec<u8>> {
    let mut content = Vec::with_capacity(s.len() * 2);
    for c in s.chars() {
        let unit = u16::try_from(u32::from(c)).map_err(|_| Error::CharacterOutOfRange {
            string_type: "BMPString",
            character: c,
        })?;
        content.extend(unit.to_be_bytes());
    }
    Ok(content)
}

/// UniversalString: UCS-4, big endian.
pub(crate) fn universal_content(s: &str) -> Vec<u8> {
    s.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect()
}

pub(crate) fn printable_content(s: &str) -> Result<Vec<u8>> {
    restricted_content(s, "PrintableString", is_printable)
}

pub(crate) fn ia5_content(s: &str) -> Result<Vec<u8>> {
    restricted_content(s, "IA5String", |c| c.is_ascii())
}

fn restricted_content(
    s: &str,
    string_type: &'static str,
    allowed: impl Fn(char) -> bool,
) -> Result<Vec<u8>> {
    match s.chars().find(|c| !allowed(*c)) {
        Some(character) => Err(Error::CharacterOutOfRange {
            string_type,
            character,
        }),
        None => Ok(s.as_bytes().to_vec()),
    }
}

/// PrintableString repertoire (X.680 41.4).
fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '?'
        )
}

/// Wraps string content in a primitive TLV, or, when the policy caps the
/// primitive length (CER), in an indefinite constructed TLV of OCTET STRING
/// segments (X.690 9.2, 8.23.6).
pub(crate) fn string_tlv(tag: Tag, content: Vec<u8>, policy: &RulePolicy) -> Tlv {
    match policy.max_unchunked_string_length() {
        Some(limit) if content.len() > limit => {
            log::trace!(
                "segmenting string of {} octets into {}-octet parts",
                content.len(),
                limit
            );
            let segment_tag = Tag::universal(UniversalTag::OctetString, false);
            let segments = content
                .chunks(limit)
                .map(|chunk| Tlv::new_primitive(segment_tag, chunk.to_vec()))
                .collect();
            Tlv::new_indefinite(tag, segments)
        }
        _ => Tlv::new_primitive(tag, content),
    }
}

#[cfg(test)]
mod tests {
    use kumiki::encoder::Encoder;
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case("HI", vec![0x00, 0x48, 0x00, 0x49]),
        case("", vec![]),
        case("é€", vec![0x00, 0xe9, 0x20, 0xac]),
        case("\u{ffff}", vec![0xff, 0xff]),
    )]
    fn test_bmp_content(input: &str, expected: Vec<u8>) {
        assert_eq!(expected, bmp_content(input).unwrap());
    }

    #[rstest(input, expected,
        case("A😀", '😀'),
        case("\u{10000}", '\u{10000}'),
    )]
    fn test_bmp_content_out_of_range(input: &str, expected: char) {
        let err = bmp_content(input).unwrap_err();
        assert_eq!(
            Error::CharacterOutOfRange {
                string_type: "BMPString",
                character: expected
            },
            err
        );
    }

    #[rstest(input, expected,
        case("HI", vec![0x00, 0x00, 0x00, 0x48, 0x00, 0x00, 0x00, 0x49]),
        case("😀", vec![0x00, 0x01, 0xf6, 0x00]),
    )]
    fn test_universal_content(input: &str, expected: Vec<u8>) {
        assert_eq!(expected, universal_content(input));
    }

    #[rstest(input, valid,
        case("Test Org (JP) +81-3/4:5=6?", true),
        case("a.b,c'd", true),
        case("user@example.com", false),
        case("naïve", false),
        case("a*b", false),
    )]
    fn test_printable_content(input: &str, valid: bool) {
        assert_eq!(valid, printable_content(input).is_ok());
    }

    #[rstest(input, valid,
        case("user@example.com", true),
        case("\t~\u{7f}", true),
        case("naïve", false),
    )]
    fn test_ia5_content(input: &str, valid: bool) {
        assert_eq!(valid, ia5_content(input).is_ok());
    }

    #[test]
    fn test_string_tlv_primitive_at_limit() {
        let tag = Tag::universal(UniversalTag::OctetString, false);
        let tlv = string_tlv(tag, vec![0x41; 1000], &RulePolicy::cer());
        assert_eq!(1000, tlv.data().unwrap().len());
    }

    #[test]
    fn test_string_tlv_cer_segments() {
        let tag = Tag::universal(UniversalTag::BMPString, false);
        let policy = RulePolicy::cer();
        let tlv = string_tlv(tag, vec![0x00; 2500], &policy);
        let lengths: Vec<usize> = tlv
            .tlvs()
            .unwrap()
            .iter()
            .map(|t| t.data().unwrap().len())
            .collect();
        assert_eq!(vec![1000, 1000, 500], lengths);

        let bytes = tlv.encode(&policy).unwrap();
        // constructed BMPString, indefinite, first OCTET STRING segment
        assert_eq!(vec![0x3e, 0x80, 0x04, 0x82, 0x03, 0xe8], bytes[..6].to_vec());
        assert_eq!(2 + 3 * 4 + 2500 + 2, bytes.len());
    }

    #[test]
    fn test_string_tlv_ber_der_never_segment() {
        let tag = Tag::universal(UniversalTag::OctetString, false);
        for policy in [RulePolicy::ber(), RulePolicy::der()] {
            let tlv = string_tlv(tag, vec![0x41; 5000], &policy);
            assert_eq!(5000, tlv.data().unwrap().len());
        }
    }
}
