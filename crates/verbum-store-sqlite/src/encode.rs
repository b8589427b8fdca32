//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Strong's numbers are stored in canonical text form (`H430`) and languages
//! as lowercase names. Rows whose columns need validation are read into
//! `Raw*` structs inside the connection thread and decoded afterwards.

use rusqlite::Row;
use verbum_core::{
  Language,
  StrongsNumber,
  record::{
    Alignment,
    CommentaryEntry,
    CrossReference,
    InterlinearWord,
    LexiconEntry,
    Occurrence,
    SourceWord,
    Verse,
  },
  reference::VerseScope,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn decode_strong(s: &str) -> Result<StrongsNumber> { Ok(s.parse()?) }

pub fn decode_language(s: &str) -> Result<Language> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown language: {s:?}")))
}

/// Inclusive `source_verse` bounds for a verse scope.
pub fn verse_bounds(scope: VerseScope) -> (i64, i64) {
  match scope {
    VerseScope::Chapter => (0, i64::MAX),
    VerseScope::Verses { start, end } => (i64::from(start), i64::from(end)),
  }
}

// ─── Plain rows ──────────────────────────────────────────────────────────────

pub const VERSE_COLUMNS: &str = "translation_id, book, chapter, verse, text";

pub fn verse_row(row: &Row<'_>) -> rusqlite::Result<Verse> {
  Ok(Verse {
    translation_id: row.get(0)?,
    book:           row.get(1)?,
    chapter:        row.get(2)?,
    verse:          row.get(3)?,
    text:           row.get(4)?,
  })
}

pub fn alignment_row(row: &Row<'_>) -> rusqlite::Result<Alignment> {
  Ok(Alignment {
    translation_id:  row.get(0)?,
    book:            row.get(1)?,
    chapter:         row.get(2)?,
    verse:           row.get(3)?,
    target_position: row.get(4)?,
    target_word:     row.get(5)?,
    source_position: row.get(6)?,
    confidence:      row.get(7)?,
  })
}

pub fn cross_reference_row(row: &Row<'_>) -> rusqlite::Result<CrossReference> {
  Ok(CrossReference {
    source_book:       row.get(0)?,
    source_chapter:    row.get(1)?,
    source_verse:      row.get(2)?,
    target_book:       row.get(3)?,
    target_chapter:    row.get(4)?,
    target_verse:      row.get(5)?,
    target_book_order: row.get(6)?,
    relationship_type: row.get(7)?,
    votes:             row.get(8)?,
  })
}

pub fn commentary_row(row: &Row<'_>) -> rusqlite::Result<CommentaryEntry> {
  Ok(CommentaryEntry {
    source:          row.get(0)?,
    book:            row.get(1)?,
    chapter:         row.get(2)?,
    reference_start: row.get(3)?,
    reference_end:   row.get(4)?,
    content:         row.get(5)?,
  })
}

pub fn occurrence_row(row: &Row<'_>) -> rusqlite::Result<Occurrence> {
  Ok(Occurrence {
    book:     row.get(0)?,
    chapter:  row.get(1)?,
    verse:    row.get(2)?,
    position: row.get(3)?,
    gloss:    row.get(4)?,
  })
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const SOURCE_WORD_COLUMNS: &str = "w.book, w.chapter, w.verse, w.position, w.original_text, \
   w.transliteration, w.gloss, w.strong_number, w.grammar_code";

pub const LEXICON_COLUMNS: &str = "l.strong_number, l.language, l.original, l.transliteration, \
   l.pronunciation, l.definition, l.extended_definition, l.derivation";

/// A `source_words` row with its Strong's number still in text form.
pub struct RawSourceWord {
  pub book:            String,
  pub chapter:         u32,
  pub verse:           u32,
  pub position:        u32,
  pub original_text:   Option<String>,
  pub transliteration: Option<String>,
  pub gloss:           Option<String>,
  pub strong_number:   Option<String>,
  pub grammar_code:    Option<String>,
}

impl RawSourceWord {
  /// Read [`SOURCE_WORD_COLUMNS`] starting at column 0.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      book:            row.get(0)?,
      chapter:         row.get(1)?,
      verse:           row.get(2)?,
      position:        row.get(3)?,
      original_text:   row.get(4)?,
      transliteration: row.get(5)?,
      gloss:           row.get(6)?,
      strong_number:   row.get(7)?,
      grammar_code:    row.get(8)?,
    })
  }

  pub fn into_source_word(self) -> Result<SourceWord> {
    Ok(SourceWord {
      book:            self.book,
      chapter:         self.chapter,
      verse:           self.verse,
      position:        self.position,
      original_text:   self.original_text,
      transliteration: self.transliteration,
      gloss:           self.gloss,
      strong_number:   self.strong_number.as_deref().map(decode_strong).transpose()?,
      grammar_code:    self.grammar_code,
    })
  }
}

/// A `lexicon` row with its key and language still in text form.
pub struct RawLexiconEntry {
  pub strong_number:       String,
  pub language:            String,
  pub original:            String,
  pub transliteration:     Option<String>,
  pub pronunciation:       Option<String>,
  pub definition:          String,
  pub extended_definition: Option<String>,
  pub derivation:          Option<String>,
}

impl RawLexiconEntry {
  /// Read [`LEXICON_COLUMNS`] starting at column `at`. Returns `None` when
  /// the key column is NULL (an unmatched LEFT JOIN).
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<Self>> {
    let Some(strong_number) = row.get::<_, Option<String>>(at)? else {
      return Ok(None);
    };
    Ok(Some(Self {
      strong_number,
      language:            row.get(at + 1)?,
      original:            row.get(at + 2)?,
      transliteration:     row.get(at + 3)?,
      pronunciation:       row.get(at + 4)?,
      definition:          row.get(at + 5)?,
      extended_definition: row.get(at + 6)?,
      derivation:          row.get(at + 7)?,
    }))
  }

  pub fn into_entry(self) -> Result<LexiconEntry> {
    Ok(LexiconEntry {
      strong_number:       decode_strong(&self.strong_number)?,
      language:            decode_language(&self.language)?,
      original:            self.original,
      transliteration:     self.transliteration,
      pronunciation:       self.pronunciation,
      definition:          self.definition,
      extended_definition: self.extended_definition,
      derivation:          self.derivation,
    })
  }
}

/// A source word joined with its (possibly missing) lexicon row.
pub struct RawInterlinearWord {
  pub word:  RawSourceWord,
  pub entry: Option<RawLexiconEntry>,
}

impl RawInterlinearWord {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      word:  RawSourceWord::from_row(row)?,
      entry: RawLexiconEntry::from_row(row, 9)?,
    })
  }

  pub fn into_interlinear(self) -> Result<InterlinearWord> {
    Ok(InterlinearWord {
      word:  self.word.into_source_word()?,
      entry: self.entry.map(RawLexiconEntry::into_entry).transpose()?,
    })
  }
}
