use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tlv::encode_base128;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    /// Arcs are checked when the identifier is encoded.
    pub fn new(arcs: Vec<u64>) -> Self {
        ObjectIdentifier { inner: arcs }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }

    fn validate(&self) -> Result<()> {
        let (first, second) = match self.inner.as_slice() {
            [first, second, ..] => (*first, *second),
            _ => {
                return Err(Error::InvalidOid(format!(
                    "too few components in '{}' (need at least 2)",
                    self
                )));
            }
        };
        if first > 2 {
            return Err(Error::InvalidOid(format!(
                "first component of '{}' must be 0, 1 or 2",
                self
            )));
        }
        if first < 2 && second >= 40 {
            return Err(Error::InvalidOid(format!(
                "second component of '{}' must be less than 40",
                self
            )));
        }
        Ok(())
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<&[u64]> for ObjectIdentifier {
    fn from(value: &[u64]) -> Self {
        ObjectIdentifier {
            inner: value.to_vec(),
        }
    }
}

impl From<Vec<u64>> for ObjectIdentifier {
    fn from(value: Vec<u64>) -> Self {
        ObjectIdentifier { inner: value }
    }
}

/// Content octets (X.690 8.19).
impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self> {
        oid.validate()?;

        // The first subidentifier joins the first two arcs. With a first arc
        // of 2 the second arc is unbounded, so it may span several octets.
        let first = oid.inner[0]
            .checked_mul(40)
            .and_then(|n| n.checked_add(oid.inner[1]))
            .ok_or_else(|| {
                Error::InvalidOid(format!("first subidentifier of '{}' overflows", oid))
            })?;

        let mut result = Vec::new();
        encode_base128(first, &mut result);
        for arc in oid.inner[2..].iter() {
            encode_base128(*arc, &mut result);
        }
        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidOid("empty string".to_string()));
        }
        let values = s
            .split('.')
            .map(|arc| {
                arc.parse::<u64>()
                    .map_err(|e| Error::InvalidOid(format!("invalid component '{}': {}", arc, e)))
            })
            .collect::<Result<Vec<u64>>>()?;
        Ok(ObjectIdentifier { inner: values })
    }
}
