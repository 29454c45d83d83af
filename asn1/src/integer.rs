use std::fmt::Display;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Converts the Integer to i64 if it fits in the range
    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Minimal two's complement content octets, big endian (X.690 8.3.2).
    pub fn to_signed_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer { inner: value }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl FromStr for Integer {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Integer {
            inner: BigInt::from_str(s)?,
        })
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
