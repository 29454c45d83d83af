//! Encoder trait for policy-driven conversions.
//!
//! The `Encoder` trait converts a source type `T` into a destination type
//! `E` under a [`RulePolicy`]. Every step of the encoding chain takes the
//! same immutable policy, so the rule set selected at the top is the one
//! that governs each nested value.
//!
//! # Design Pattern
//!
//! Two traits keep the conversions type safe:
//!
//! 1. `Encoder<T, E>` - performs the conversion
//! 2. `EncodableTo<T>` - marker trait constraining valid destinations
//!
//! # Implementation Guide
//!
//! ```no_run
//! use kumiki::encoder::{EncodableTo, Encoder};
//! use kumiki::RulePolicy;
//!
//! struct Flag(bool);
//! struct Octets(Vec<u8>);
//!
//! impl EncodableTo<Flag> for Octets {}
//!
//! impl Encoder<Flag, Octets> for Flag {
//!     type Error = std::convert::Infallible;
//!
//!     fn encode(&self, policy: &RulePolicy) -> Result<Octets, Self::Error> {
//!         let octet = if self.0 { policy.boolean_true_octet() } else { 0x00 };
//!         Ok(Octets(vec![octet]))
//!     }
//! }
//! ```

use crate::RulePolicy;

/// Encoder trait for converting from type `T` to type `E`.
///
/// Implemented by the source type. The destination must implement
/// `EncodableTo<T>`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into `E` under `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value has no encoding under the policy.
    fn encode(&self, policy: &RulePolicy) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` can be encoded from type `T`.
pub trait EncodableTo<T> {}
