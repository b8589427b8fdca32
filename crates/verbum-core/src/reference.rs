//! Reference grammar parser.
//!
//! Grammar: `<book-token> [<chapter> [':' <verse> ['-' <verse2>]]]`, where the
//! book token is an optional leading `1`/`2`/`3` followed by one or more
//! words of letters, case-insensitive, with or without internal spaces.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, canon};

// ─── Types ───────────────────────────────────────────────────────────────────

/// Which verses of a chapter a reference selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerseScope {
  /// The whole chapter; no verse was given.
  Chapter,
  /// An explicit verse or verse range. `end < start` is representable and
  /// selects nothing.
  Verses { start: u32, end: u32 },
}

impl VerseScope {
  /// An inverted range such as `18-16`.
  pub fn is_empty(&self) -> bool {
    matches!(*self, Self::Verses { start, end } if end < start)
  }

  /// Whether `verse` falls in the range. A chapter scope contains every
  /// verse.
  pub fn contains(&self, verse: u32) -> bool {
    match *self {
      Self::Chapter => true,
      Self::Verses { start, end } => (start..=end).contains(&verse),
    }
  }
}

/// A reference normalized to canonical coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalReference {
  /// Canonical full book name, or the title-cased token for unknown books.
  pub book:    String,
  pub chapter: u32,
  pub scope:   VerseScope,
}

impl CanonicalReference {
  pub fn chapter(book: impl Into<String>, chapter: u32) -> Self {
    Self { book: book.into(), chapter, scope: VerseScope::Chapter }
  }

  pub fn verses(book: impl Into<String>, chapter: u32, start: u32, end: u32) -> Self {
    Self {
      book: book.into(),
      chapter,
      scope: VerseScope::Verses { start, end },
    }
  }

  /// First selected verse; `1` for a chapter-scoped reference.
  pub fn verse_start(&self) -> u32 {
    match self.scope {
      VerseScope::Chapter => 1,
      VerseScope::Verses { start, .. } => start,
    }
  }

  /// Last selected verse; `None` means "to the end of the chapter".
  pub fn verse_end(&self) -> Option<u32> {
    match self.scope {
      VerseScope::Chapter => None,
      VerseScope::Verses { end, .. } => Some(end),
    }
  }

  pub fn has_verse(&self) -> bool { matches!(self.scope, VerseScope::Verses { .. }) }

  /// Whether `verse` is highlighted when the chapter is displayed. Nothing
  /// is for a chapter-scoped reference.
  pub fn highlights(&self, verse: u32) -> bool {
    self.has_verse() && self.scope.contains(verse)
  }

  /// Whether the book resolved to an entry of the canon.
  pub fn is_canonical(&self) -> bool { canon::lookup(&self.book).is_some() }
}

impl fmt::Display for CanonicalReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.scope {
      VerseScope::Chapter => write!(f, "{} {}", self.book, self.chapter),
      VerseScope::Verses { start, end } if start == end => {
        write!(f, "{} {}:{}", self.book, self.chapter, start)
      }
      VerseScope::Verses { start, end } => {
        write!(f, "{} {}:{}-{}", self.book, self.chapter, start, end)
      }
    }
  }
}

impl FromStr for CanonicalReference {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { parse(s) }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// `<book> [<chapter> [':' <verse> ['-' <verse2>]]]`. The book is an
/// optional leading `1`-`3` and one or more words of letters.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?x)
    ^(?P<book>(?:[1-3]\s*)?\p{L}+(?:\s+\p{L}+)*)
    \s*
    (?:(?P<chapter>[0-9]+)(?:\s*:\s*(?P<start>[0-9]+)(?:\s*-\s*(?P<end>[0-9]+))?)?)?$",
  )
  .unwrap()
});

/// Parse a human-readable reference such as `"Rom 3:25"` or `"1 Sam 17"`.
///
/// A book token absent from the canon is accepted in title case rather than
/// rejected.
pub fn parse(raw: &str) -> Result<CanonicalReference> {
  let invalid = || Error::InvalidReference(raw.to_string());
  let caps = REFERENCE_RE.captures(raw.trim()).ok_or_else(invalid)?;
  let book = normalize_book(&caps["book"]);

  let number = |group: &str| -> Result<Option<u32>> {
    caps
      .name(group)
      .map(|m| parse_number(m.as_str()).ok_or_else(invalid))
      .transpose()
  };

  let Some(chapter) = number("chapter")? else {
    return Ok(CanonicalReference::chapter(book, 1));
  };
  let Some(start) = number("start")? else {
    return Ok(CanonicalReference::chapter(book, chapter));
  };
  let end = number("end")?.unwrap_or(start);

  Ok(CanonicalReference::verses(book, chapter, start, end))
}

/// Non-zero and within `u32`.
fn parse_number(digits: &str) -> Option<u32> { digits.parse::<u32>().ok().filter(|n| *n > 0) }

fn normalize_book(token: &str) -> String {
  match canon::lookup(token) {
    Some(book) => book.name.to_string(),
    None => {
      let fallback = title_case(token);
      tracing::debug!(token, book = %fallback, "unknown book; using title-cased token");
      fallback
    }
  }
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_is_letter = false;
  for c in s.chars() {
    if c.is_alphabetic() {
      if prev_is_letter {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      prev_is_letter = true;
    } else {
      out.push(c);
      prev_is_letter = false;
    }
  }
  out
}
