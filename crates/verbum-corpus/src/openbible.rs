//! OpenBible.info cross-reference TSV.
//!
//! ```text
//! From Verse	To Verse	Votes	#www.openbible.info CC-BY 2023-01-01
//! Gen.1.1	Ps.148.4-Ps.148.5	102
//! ```
//!
//! Ranges keep their first verse. Links with fewer than `min_votes` votes are
//! skipped; OpenBible votes can be negative.

use verbum_core::{
  canon,
  record::{CrossReference, order_of},
};

use crate::{Error, Parsed};

/// Vote threshold used when none is configured.
pub const DEFAULT_MIN_VOTES: i64 = 10;

pub const RELATIONSHIP: &str = "cross-reference";

/// Parse the whole TSV file.
pub fn parse(input: &str, min_votes: i64) -> Parsed<CrossReference> {
  let mut parsed = Parsed::default();

  for (index, raw) in input.lines().enumerate() {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with("From") {
      continue;
    }

    match parse_line(line, min_votes) {
      Ok(Some(link)) => parsed.records.push(link),
      Ok(None) => parsed.skipped += 1,
      Err(error) => parsed.reject(index + 1, error),
    }
  }

  parsed
}

/// `Ok(None)` when the link is below the vote threshold.
fn parse_line(line: &str, min_votes: i64) -> Result<Option<CrossReference>, Error> {
  let mut columns = line.split('\t');
  let (Some(from), Some(to), Some(votes)) = (columns.next(), columns.next(), columns.next())
  else {
    return Err(Error::MalformedRecord(format!("expected 3 columns: {line:?}")));
  };

  let votes: i64 = votes
    .trim()
    .parse()
    .map_err(|_| Error::MalformedRecord(format!("votes {votes:?}")))?;
  if votes < min_votes {
    return Ok(None);
  }

  let (source_book, source_chapter, source_verse) = parse_reference(from)?;
  let (target_book, target_chapter, target_verse) = parse_reference(to)?;

  Ok(Some(CrossReference {
    source_book: source_book.to_string(),
    source_chapter,
    source_verse,
    target_book: target_book.to_string(),
    target_chapter,
    target_verse,
    target_book_order: order_of(target_book),
    relationship_type: Some(RELATIONSHIP.to_string()),
    votes: Some(votes),
  }))
}

/// `Gen.1.1` or `Ps.148.4-Ps.148.5` (first verse of the range).
fn parse_reference(field: &str) -> Result<(&'static str, u32, u32), Error> {
  let first = field.split('-').next().unwrap_or_default().trim();
  let malformed = || Error::MalformedRecord(format!("verse reference {field:?}"));

  let mut parts = first.split('.');
  let (Some(code), Some(chapter), Some(verse), None) =
    (parts.next(), parts.next(), parts.next(), parts.next())
  else {
    return Err(malformed());
  };

  let chapter: u32 = chapter.parse().map_err(|_| malformed())?;
  let verse: u32 = verse.parse().map_err(|_| malformed())?;
  let book = canon::lookup(code).ok_or_else(|| Error::UnknownBook(code.to_string()))?;

  Ok((book.name, chapter, verse))
}
