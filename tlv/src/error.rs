use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid tag number {0}")]
    InvalidTag(i64),
    #[error("length {length} does not fit in {octets} length octets")]
    LengthOverflow { length: usize, octets: usize },
    #[error(transparent)]
    Rules(#[from] kumiki::error::Error),
}
