//! Typed records for every persisted entity.
//!
//! Rows are converted into these structs once, at the storage boundary, and
//! travel through the rest of the system fully typed.

use serde::{Deserialize, Serialize};

use crate::{
  canon,
  strongs::{Language, StrongsNumber},
};

// ─── Translations & verses ───────────────────────────────────────────────────

/// A target-language translation such as `KJV`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
  pub id:               String,
  pub name:             String,
  /// ISO 639-1 code of the translation language.
  pub language:         String,
  pub is_public_domain: bool,
  pub license_info:     Option<String>,
}

/// One verse of a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
  pub translation_id: String,
  pub book:           String,
  pub chapter:        u32,
  pub verse:          u32,
  pub text:           String,
}

// ─── Source-language words ───────────────────────────────────────────────────

/// A Hebrew or Greek word of the tagged source text, with its gloss.
///
/// `position` is 1-based and unique within a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceWord {
  pub book:            String,
  pub chapter:         u32,
  pub verse:           u32,
  pub position:        u32,
  pub original_text:   Option<String>,
  pub transliteration: Option<String>,
  pub gloss:           Option<String>,
  pub strong_number:   Option<StrongsNumber>,
  pub grammar_code:    Option<String>,
}

// ─── Alignments ──────────────────────────────────────────────────────────────

/// A persisted link from a translated word to the source word it renders.
///
/// Natural key: `(translation_id, book, chapter, verse, target_position)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
  pub translation_id:  String,
  pub book:            String,
  pub chapter:         u32,
  pub verse:           u32,
  pub target_position: u32,
  pub target_word:     String,
  pub source_position: u32,
  pub confidence:      f64,
}

// ─── Lexicon ─────────────────────────────────────────────────────────────────

/// A Strong's dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
  pub strong_number:       StrongsNumber,
  pub language:            Language,
  pub original:            String,
  pub transliteration:     Option<String>,
  pub pronunciation:       Option<String>,
  pub definition:          String,
  pub extended_definition: Option<String>,
  pub derivation:          Option<String>,
}

/// One place a Strong's number occurs in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
  pub book:     String,
  pub chapter:  u32,
  pub verse:    u32,
  pub position: u32,
  pub gloss:    Option<String>,
}

/// A source word joined with its lexicon entry, for interlinear display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterlinearWord {
  pub word:  SourceWord,
  pub entry: Option<LexiconEntry>,
}

// ─── Cross references ────────────────────────────────────────────────────────

/// A directed link between two verses. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
  pub source_book:       String,
  pub source_chapter:    u32,
  pub source_verse:      u32,
  pub target_book:       String,
  pub target_chapter:    u32,
  pub target_verse:      u32,
  pub target_book_order: u8,
  pub relationship_type: Option<String>,
  pub votes:             Option<i64>,
}

impl CrossReference {
  /// Sort key for display: canonical order of the target.
  pub fn target_key(&self) -> (u8, u32, u32) {
    (self.target_book_order, self.target_chapter, self.target_verse)
  }
}

// ─── Commentary ──────────────────────────────────────────────────────────────

/// A commentary note covering verses `reference_start..=reference_end` of
/// one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEntry {
  pub source:          String,
  pub book:            String,
  pub chapter:         u32,
  pub reference_start: u32,
  pub reference_end:   u32,
  pub content:         String,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Which kind of document a search hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
  Verse,
  Commentary,
}

/// A ranked full-text match with a highlighted snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
  pub kind:    HitKind,
  pub book:    String,
  pub chapter: u32,
  pub verse:   Option<u32>,
  pub source:  Option<String>,
  pub snippet: String,
}

/// Canonical order of a record's book, or `UNKNOWN_BOOK_ORDER` for books
/// outside the canon so they sort last.
pub fn order_of(book: &str) -> u8 { canon::book_order(book).unwrap_or(UNKNOWN_BOOK_ORDER) }

pub const UNKNOWN_BOOK_ORDER: u8 = 99;
