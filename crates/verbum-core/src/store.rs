//! The `ScriptureStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `verbum-store-sqlite`).
//! The alignment pipeline and the resolver are written against this
//! abstraction, not against any concrete backend.

use std::future::Future;

use crate::{
  canon::Testament,
  record::{
    Alignment,
    CommentaryEntry,
    CrossReference,
    InterlinearWord,
    LexiconEntry,
    Occurrence,
    SearchHit,
    SourceWord,
    Translation,
    Verse,
  },
  reference::VerseScope,
  strongs::{Language, StrongsNumber},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Narrows a verse full-text search to part of the canon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
  Book(String),
  Testament(Testament),
}

/// Parameters for [`ScriptureStore::search_text`].
#[derive(Debug, Clone)]
pub struct TextQuery {
  /// A ready-made FTS5 match expression.
  pub expression:  String,
  /// Translation whose verse text is searched.
  pub translation: String,
  pub verses:      bool,
  pub commentary:  bool,
  /// Applies to verse hits only.
  pub books:       Option<BookFilter>,
  pub limit:       usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Scripture store backend.
///
/// Corpus data is replaced wholesale per unit (`replace_*` methods delete and
/// insert in one transaction). Alignments are the exception: they are written
/// with a keyed upsert so rebuilds never accumulate duplicates.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ScriptureStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Corpus writes ─────────────────────────────────────────────────────

  /// Insert or update a translation's metadata.
  fn put_translation(
    &self,
    translation: Translation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace every verse of `book` in `translation`. Returns rows written.
  fn replace_verses<'a>(
    &'a self,
    translation: &'a str,
    book: &'a str,
    verses: Vec<Verse>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Replace the tagged source words of `book`.
  fn replace_source_words<'a>(
    &'a self,
    book: &'a str,
    words: Vec<SourceWord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Replace the lexicon entries of one language.
  fn replace_lexicon(
    &self,
    language: Language,
    entries: Vec<LexiconEntry>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Replace the whole cross-reference set.
  fn replace_cross_references(
    &self,
    refs: Vec<CrossReference>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Replace the entries of one commentary source for one book.
  fn replace_commentary<'a>(
    &'a self,
    source: &'a str,
    book: &'a str,
    entries: Vec<CommentaryEntry>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Alignments ────────────────────────────────────────────────────────

  /// Upsert alignments on their natural key in one transaction. Rows whose
  /// source position has no source word are skipped. Returns rows written.
  fn upsert_alignments(
    &self,
    alignments: Vec<Alignment>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Verses of `translation` that have source words, in canonical order.
  fn alignment_targets<'a>(
    &'a self,
    translation: &'a str,
    book: Option<&'a str>,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Verse>, Self::Error>> + Send + 'a;

  /// Alignments of one verse, ordered by target position.
  fn alignments<'a>(
    &'a self,
    translation: &'a str,
    book: &'a str,
    chapter: u32,
    verse: u32,
  ) -> impl Future<Output = Result<Vec<Alignment>, Self::Error>> + Send + 'a;

  /// Number of alignment rows stored for `translation`.
  fn alignment_count<'a>(
    &'a self,
    translation: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Source words of one verse, ordered by position.
  fn source_words<'a>(
    &'a self,
    book: &'a str,
    chapter: u32,
    verse: u32,
  ) -> impl Future<Output = Result<Vec<SourceWord>, Self::Error>> + Send + 'a;

  /// Every verse of a chapter, in verse order.
  fn chapter_verses<'a>(
    &'a self,
    translation: &'a str,
    book: &'a str,
    chapter: u32,
  ) -> impl Future<Output = Result<Vec<Verse>, Self::Error>> + Send + 'a;

  /// A single verse. Returns `None` if not found.
  fn verse<'a>(
    &'a self,
    translation: &'a str,
    book: &'a str,
    chapter: u32,
    verse: u32,
  ) -> impl Future<Output = Result<Option<Verse>, Self::Error>> + Send + 'a;

  /// Look a lexicon entry up by canonical Strong's number.
  fn lexicon_entry(
    &self,
    strong_number: StrongsNumber,
  ) -> impl Future<Output = Result<Option<LexiconEntry>, Self::Error>> + Send + '_;

  /// Every source-text occurrence of a Strong's number, in canonical order.
  fn occurrences(
    &self,
    strong_number: StrongsNumber,
  ) -> impl Future<Output = Result<Vec<Occurrence>, Self::Error>> + Send + '_;

  /// Cross references whose source verse lies in `scope`, ordered by
  /// `(target_book_order, target_chapter, target_verse)`.
  fn cross_references<'a>(
    &'a self,
    book: &'a str,
    chapter: u32,
    scope: VerseScope,
  ) -> impl Future<Output = Result<Vec<CrossReference>, Self::Error>> + Send + 'a;

  /// Commentary of a chapter overlapping `scope`; every entry of the
  /// chapter for [`VerseScope::Chapter`].
  fn commentary<'a>(
    &'a self,
    book: &'a str,
    chapter: u32,
    scope: VerseScope,
  ) -> impl Future<Output = Result<Vec<CommentaryEntry>, Self::Error>> + Send + 'a;

  /// Source words of a chapter joined with their lexicon entries.
  fn interlinear<'a>(
    &'a self,
    book: &'a str,
    chapter: u32,
  ) -> impl Future<Output = Result<Vec<InterlinearWord>, Self::Error>> + Send + 'a;

  /// Ranked full-text search with highlighted snippets.
  fn search_text<'a>(
    &'a self,
    query: &'a TextQuery,
  ) -> impl Future<Output = Result<Vec<SearchHit>, Self::Error>> + Send + 'a;
}
