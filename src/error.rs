use std::result;
use thiserror::Error;

/// Errors returned by the ordered map operations.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The key being looked up does not exist in the map.
    #[error("key does not exist in the map")]
    NotFound,
    /// The operation requires at least one entry, but the map is empty.
    #[error("map is empty")]
    EmptyMap,
}

pub type Result<T> = result::Result<T, Error>;
