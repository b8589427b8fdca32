//! STEPBible tagged source text (TAHOT for Hebrew, TAGNT for Greek).
//!
//! Data rows are tab separated and start with a word reference such as
//! `Gen.1.1#01=L` (book code, chapter, verse, word position). The files
//! interleave data with licence text, column headers and verse summaries;
//! those are recognised and dropped without being reported.
//!
//! Hebrew columns: reference, text, transliteration, gloss, dStrongs, grammar.
//! Greek columns:  reference, `text (transliteration)`, gloss,
//! `G0976=N-NSF` (Strong's and grammar), lexeme.

use std::sync::LazyLock;

use regex::Regex;
use verbum_core::{Language, canon, canonicalize, record::SourceWord};

use crate::{Error, Parsed, gloss::clean_gloss, non_empty};

/// Lines starting with any of these are never data.
const HEADER_PREFIXES: &[&str] = &["#", "=", "TAHOT", "TAGNT", "Eng", "Ref", "("];

/// Lines containing any of these belong to the licence or column headers.
const HEADER_MARKERS: &[&str] = &[
  "Translation",
  "Grammar",
  "Spreadsheet",
  "STEPBible",
  "licence",
  "TinyURL",
];

/// `Gen.1.1#01=L`: book code, chapter, verse, word position.
static WORD_REF_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z0-9]+)\.([0-9]+)\.([0-9]+)#([0-9]+)").unwrap());

/// Minimum tab-separated columns in a data row.
const MIN_COLUMNS: usize = 4;

/// The language of a STEPBible file, from its name: TAGNT files are Greek,
/// everything else is treated as TAHOT Hebrew.
pub fn language_for_file(file_name: &str) -> Language {
  if file_name.contains("TAGNT") { Language::Greek } else { Language::Hebrew }
}

/// Parse one STEPBible file.
///
/// `book` restricts the output to one canonical book name. Rows with neither
/// a gloss nor a lexical Strong's number are counted as skipped.
pub fn parse(input: &str, language: Language, book: Option<&str>) -> Parsed<SourceWord> {
  let mut parsed = Parsed::default();

  for (index, raw) in input.lines().enumerate() {
    let line = raw.trim();
    if line.is_empty() || is_header(line) {
      continue;
    }

    let columns: Vec<&str> = line.split('\t').collect();
    let reference = match parse_reference(columns[0]) {
      Ok(Some(reference)) => reference,
      Ok(None) => continue,
      Err(error) => {
        parsed.reject(index + 1, error);
        continue;
      }
    };

    if columns.len() < MIN_COLUMNS {
      let error = Error::MalformedRecord(format!(
        "{} has {} columns, expected at least {MIN_COLUMNS}",
        columns[0],
        columns.len()
      ));
      parsed.reject(index + 1, error);
      continue;
    }

    if book.is_some_and(|b| b != reference.book) {
      continue;
    }

    let word = match language {
      Language::Hebrew => hebrew_word(reference, &columns),
      Language::Greek => greek_word(reference, &columns),
    };

    if word.gloss.is_none() && word.strong_number.is_none() {
      parsed.skipped += 1;
      continue;
    }
    parsed.records.push(word);
  }

  parsed
}

fn is_header(line: &str) -> bool {
  HEADER_PREFIXES.iter().any(|p| line.starts_with(p))
    || HEADER_MARKERS.iter().any(|m| line.contains(m))
}

// ─── References ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WordRef {
  book:     &'static str,
  chapter:  u32,
  verse:    u32,
  position: u32,
}

/// Parse `Book.Chapter.Verse#Position[=Type]`.
///
/// A first column without `#` is not a word row and yields `Ok(None)`; one
/// with `#` that does not decode is a malformed record.
fn parse_reference(field: &str) -> Result<Option<WordRef>, Error> {
  if !field.contains('#') {
    return Ok(None);
  }
  let malformed = || Error::MalformedRecord(format!("word reference {field:?}"));

  let caps = WORD_REF_RE.captures(field).ok_or_else(malformed)?;
  let number = |group: usize| caps[group].parse::<u32>().map_err(|_| malformed());
  let (chapter, verse, position) = (number(2)?, number(3)?, number(4)?);

  let code = &caps[1];
  let book = canon::lookup(code).ok_or_else(|| Error::UnknownBook(code.to_string()))?;

  Ok(Some(WordRef {
    book: book.name,
    chapter,
    verse,
    position,
  }))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

fn column<'a>(columns: &[&'a str], index: usize) -> Option<&'a str> {
  columns.get(index).copied()
}

fn source_word(reference: WordRef) -> SourceWord {
  SourceWord {
    book:            reference.book.to_string(),
    chapter:         reference.chapter,
    verse:           reference.verse,
    position:        reference.position,
    original_text:   None,
    transliteration: None,
    gloss:           None,
    strong_number:   None,
    grammar_code:    None,
  }
}

fn hebrew_word(reference: WordRef, columns: &[&str]) -> SourceWord {
  SourceWord {
    original_text: column(columns, 1).and_then(non_empty),
    transliteration: column(columns, 2).and_then(non_empty),
    gloss: column(columns, 3).and_then(clean_gloss),
    strong_number: column(columns, 4).and_then(|d| canonicalize(d, Language::Hebrew)),
    grammar_code: column(columns, 5).and_then(non_empty),
    ..source_word(reference)
  }
}

fn greek_word(reference: WordRef, columns: &[&str]) -> SourceWord {
  let text = column(columns, 1).unwrap_or_default();
  let original_text = non_empty(text.split('(').next().unwrap_or_default());
  let transliteration = text
    .split_once('(')
    .and_then(|(_, rest)| rest.split_once(')'))
    .and_then(|(inner, _)| non_empty(inner));

  let tagging = column(columns, 3).unwrap_or_default();

  SourceWord {
    original_text,
    transliteration,
    gloss: column(columns, 2).and_then(clean_gloss),
    strong_number: canonicalize(tagging, Language::Greek),
    grammar_code: tagging.split_once('=').and_then(|(_, g)| non_empty(g)),
    ..source_word(reference)
  }
}
