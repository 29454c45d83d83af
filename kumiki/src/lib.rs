//! # kumiki
//!
//! Core types shared by the X.690 encoder crates.
//!
//! ## Overview
//!
//! An ASN.1 value travels through the workspace like this:
//! ```text
//! Element → Tlv → Vec<u8>
//! ```
//!
//! Each step is an [`encoder::Encoder`] conversion that receives the same
//! [`RulePolicy`]. The policy is the only place where BER, CER and DER
//! diverge; the tag, length and type encoders consult its switches and never
//! branch on the rule set themselves.
//!
//! ## Example
//!
//! ```
//! use kumiki::{EncoderOptions, RulePolicy, RuleSet};
//!
//! let policy = RulePolicy::from(RuleSet::Cer);
//! assert_eq!(0xFF, policy.boolean_true_octet());
//! assert_eq!(Some(1000), policy.max_unchunked_string_length());
//!
//! let options = EncoderOptions::new(RuleSet::Ber).with_boolean_true_octet(0x01);
//! let policy = RulePolicy::try_from(&options).unwrap();
//! assert!(policy.allow_indefinite_length());
//! ```

#![forbid(unsafe_code)]

pub mod encoder;
pub mod error;
mod options;
mod rules;

pub use options::EncoderOptions;
pub use rules::{CER_STRING_SEGMENT_LENGTH, DEFAULT_MAX_DEPTH, RulePolicy, RuleSet};
