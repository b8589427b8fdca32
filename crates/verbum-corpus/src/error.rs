//! Error types for the verbum-corpus parsers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A data line or item that could not be decoded.
  #[error("malformed record: {0}")]
  MalformedRecord(String),

  #[error("unknown book: {0}")]
  UnknownBook(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
