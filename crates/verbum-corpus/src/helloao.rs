//! HelloAO Free Use Bible API commentary documents.
//!
//! A commentary is fetched as a book list (`{id}/books.json`) followed by
//! one document per chapter (`{id}/{BOOK}/{chapter}.json`). Only chapter
//! content items of type `verse` carry commentary; their `number` is either
//! an integer or a `"start-end"` range.

use serde::Deserialize;
use serde_json::Value;
use verbum_core::{canon, record::CommentaryEntry};

use crate::{Error, Parsed, Result};

/// Commentaries known to the importer, by API id.
pub const COMMENTARIES: &[(&str, &str)] = &[
  ("matthew-henry", "Matthew Henry"),
  ("john-gill", "John Gill"),
  ("adam-clarke", "Adam Clarke"),
  ("jamieson-fausset-brown", "Jamieson-Fausset-Brown"),
  ("keil-delitzsch", "Keil & Delitzsch"),
  ("tyndale", "Tyndale Study Notes"),
];

/// Display name stored as `CommentaryEntry::source`. Unknown ids are used
/// as is.
pub fn source_name(commentary_id: &str) -> &str {
  COMMENTARIES
    .iter()
    .find(|(id, _)| *id == commentary_id)
    .map_or(commentary_id, |(_, name)| *name)
}

// ─── Book list ───────────────────────────────────────────────────────────────

/// One book a commentary covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
  /// API id used in chapter URLs, e.g. `GEN`.
  pub id:       String,
  /// Canonical book name.
  pub book:     &'static str,
  pub chapters: u32,
}

#[derive(Deserialize)]
struct BooksDocument {
  #[serde(default)]
  books: Vec<RawBook>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBook {
  id:                 String,
  common_name:        Option<String>,
  #[serde(default)]
  number_of_chapters: u32,
}

/// Parse `books.json`. Books resolve by id, then by common name.
pub fn parse_books(input: &str) -> Result<Parsed<BookListing>> {
  let document: BooksDocument = serde_json::from_str(input)?;
  let mut parsed = Parsed::default();

  for (index, raw) in document.books.into_iter().enumerate() {
    let book = canon::lookup(&raw.id).or_else(|| raw.common_name.as_deref().and_then(canon::lookup));
    match book {
      Some(book) => parsed.records.push(BookListing {
        id:       raw.id,
        book:     book.name,
        chapters: raw.number_of_chapters,
      }),
      None => parsed.reject(index + 1, Error::UnknownBook(raw.id)),
    }
  }

  Ok(parsed)
}

// ─── Chapter documents ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChapterDocument {
  chapter: ChapterBody,
}

#[derive(Deserialize)]
struct ChapterBody {
  #[serde(default)]
  content: Vec<Value>,
}

#[derive(Deserialize)]
struct VerseItem {
  number:  Option<VerseNumber>,
  #[serde(default)]
  content: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VerseNumber {
  Single(u32),
  Text(String),
}

impl VerseNumber {
  /// Inclusive verse range.
  fn range(&self) -> Option<(u32, u32)> {
    match self {
      Self::Single(n) => Some((*n, *n)),
      Self::Text(s) => match s.split_once('-') {
        Some((start, end)) => Some((start.trim().parse().ok()?, end.trim().parse().ok()?)),
        None => s.trim().parse().ok().map(|n| (n, n)),
      },
    }
  }
}

/// Parse one chapter document into commentary entries for `source`.
///
/// Non-verse items (headings, introductions) are ignored; verse items with
/// no text are skipped.
pub fn parse_chapter(
  input: &str,
  source: &str,
  book: &str,
  chapter: u32,
) -> Result<Parsed<CommentaryEntry>> {
  let document: ChapterDocument = serde_json::from_str(input)?;
  let mut parsed = Parsed::default();

  for (index, value) in document.chapter.content.into_iter().enumerate() {
    if value.get("type").and_then(Value::as_str) != Some("verse") {
      continue;
    }
    match verse_entry(value, source, book, chapter) {
      Ok(Some(entry)) => parsed.records.push(entry),
      Ok(None) => parsed.skipped += 1,
      Err(error) => parsed.reject(index + 1, error),
    }
  }

  Ok(parsed)
}

fn verse_entry(
  value: Value,
  source: &str,
  book: &str,
  chapter: u32,
) -> Result<Option<CommentaryEntry>> {
  let item: VerseItem = serde_json::from_value(value)?;

  let paragraphs: Vec<&str> = match &item.content {
    Value::Array(parts) => parts.iter().filter_map(Value::as_str).collect(),
    Value::String(s) => vec![s.as_str()],
    _ => Vec::new(),
  };
  if paragraphs.is_empty() {
    return Ok(None);
  }

  let Some(number) = item.number else {
    return Ok(None);
  };
  let (reference_start, reference_end) = number
    .range()
    .filter(|(start, end)| *start > 0 && end >= start)
    .ok_or_else(|| Error::MalformedRecord(format!("{book} {chapter}: verse number")))?;

  Ok(Some(CommentaryEntry {
    source: source.to_string(),
    book: book.to_string(),
    chapter,
    reference_start,
    reference_end,
    content: paragraphs.join("\n\n"),
  }))
}
