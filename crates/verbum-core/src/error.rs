//! Error types for `verbum-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// The reference string does not match the reference grammar.
  #[error("invalid reference: {0:?}")]
  InvalidReference(String),

  #[error("invalid search scope: {0:?}")]
  InvalidScope(String),

  #[error("invalid Strong's number: {0:?}")]
  InvalidStrongsNumber(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
