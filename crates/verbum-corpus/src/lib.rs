//! Parsers for the corpora Verbum ingests.
//!
//! Every parser is pure and synchronous: it takes the raw file or response
//! body and returns typed [`verbum_core::record`] values. Fetching and
//! persistence live in the binary.
//!
//! Line- and item-oriented parsers never abort on a bad record. They return
//! a [`Parsed`] carrying the decoded records, a count of rows skipped on
//! purpose (below a vote threshold, no usable data) and one [`Reject`] per
//! malformed row. Only a document that cannot be read at all is an `Err`.
//!
//! # Quick start
//!
//! ```no_run
//! use verbum_corpus::openbible;
//!
//! let tsv = "From Verse\tTo Verse\tVotes\nJohn.3.16\tRom.5.8\t120\n";
//! let parsed = openbible::parse(tsv, openbible::DEFAULT_MIN_VOTES);
//! println!("{} links, {} malformed", parsed.records.len(), parsed.rejects.len());
//! ```

pub mod error;
pub mod gloss;
pub mod helloao;
pub mod openbible;
pub mod step;
pub mod strongs;
pub mod translation;

pub use error::{Error, Result};

// ─── Public types ────────────────────────────────────────────────────────────

/// The outcome of parsing one document.
#[derive(Debug)]
pub struct Parsed<T> {
  pub records: Vec<T>,
  /// Rows dropped deliberately; not errors.
  pub skipped: usize,
  pub rejects: Vec<Reject>,
}

/// A malformed row, with its 1-based line (or item) number.
#[derive(Debug)]
pub struct Reject {
  pub line:  usize,
  pub error: Error,
}

impl<T> Default for Parsed<T> {
  fn default() -> Self {
    Self {
      records: Vec::new(),
      skipped: 0,
      rejects: Vec::new(),
    }
  }
}

impl<T> Parsed<T> {
  pub(crate) fn reject(&mut self, line: usize, error: Error) {
    self.rejects.push(Reject { line, error });
  }

  pub fn malformed(&self) -> usize { self.rejects.len() }
}

/// `None` for an empty or whitespace-only field.
pub(crate) fn non_empty(field: &str) -> Option<String> {
  let field = field.trim();
  (!field.is_empty()).then(|| field.to_string())
}
