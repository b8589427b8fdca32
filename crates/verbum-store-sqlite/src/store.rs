//! [`SqliteStore`], the SQLite implementation of [`ScriptureStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use verbum_core::{
  Language,
  StrongsNumber,
  canon::{self, BOOKS},
  record::{
    Alignment,
    CommentaryEntry,
    CrossReference,
    HitKind,
    InterlinearWord,
    LexiconEntry,
    Occurrence,
    SearchHit,
    SourceWord,
    Translation,
    Verse,
    order_of,
  },
  reference::VerseScope,
  store::{BookFilter, ScriptureStore, TextQuery},
};

use crate::{
  Result,
  encode::{
    LEXICON_COLUMNS,
    RawInterlinearWord,
    RawLexiconEntry,
    RawSourceWord,
    SOURCE_WORD_COLUMNS,
    VERSE_COLUMNS,
    alignment_row,
    commentary_row,
    cross_reference_row,
    occurrence_row,
    verse_bounds,
    verse_row,
  },
  error::Error,
  schema::{SCHEMA, SEED_BOOK},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scripture store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(SEED_BOOK)?;
          for book in &BOOKS {
            stmt.execute(rusqlite::params![
              book.name,
              book.code,
              book.order,
              book.testament.to_string(),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ScriptureStore impl ─────────────────────────────────────────────────────

impl ScriptureStore for SqliteStore {
  type Error = Error;

  // ── Corpus writes ─────────────────────────────────────────────────────────

  async fn put_translation(&self, translation: Translation) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO translations (id, name, language, is_public_domain, license_info)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (id) DO UPDATE SET
             name             = excluded.name,
             language         = excluded.language,
             is_public_domain = excluded.is_public_domain,
             license_info     = excluded.license_info",
          rusqlite::params![
            translation.id,
            translation.name,
            translation.language,
            translation.is_public_domain,
            translation.license_info,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_verses(
    &self,
    translation: &str,
    book:        &str,
    verses:      Vec<Verse>,
  ) -> Result<usize> {
    let translation = translation.to_owned();
    let book        = book.to_owned();
    let book_order  = order_of(&book);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM verses WHERE translation_id = ?1 AND book = ?2",
          rusqlite::params![translation, book],
        )?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO verses (translation_id, book, book_order, chapter, verse, text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (translation_id, book, chapter, verse) DO UPDATE SET text = excluded.text",
          )?;
          for v in &verses {
            written += stmt.execute(rusqlite::params![
              translation,
              book,
              book_order,
              v.chapter,
              v.verse,
              v.text,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn replace_source_words(&self, book: &str, words: Vec<SourceWord>) -> Result<usize> {
    let book       = book.to_owned();
    let book_order = order_of(&book);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM source_words WHERE book = ?1", rusqlite::params![book])?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO source_words (
               book, book_order, chapter, verse, position, original_text,
               transliteration, gloss, strong_number, grammar_code
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for w in &words {
            written += stmt.execute(rusqlite::params![
              book,
              book_order,
              w.chapter,
              w.verse,
              w.position,
              w.original_text,
              w.transliteration,
              w.gloss,
              w.strong_number.map(|s| s.to_string()),
              w.grammar_code,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn replace_lexicon(&self, language: Language, entries: Vec<LexiconEntry>) -> Result<usize> {
    let language = language.to_string();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM lexicon WHERE language = ?1", rusqlite::params![language])?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO lexicon (
               strong_number, language, original, transliteration,
               pronunciation, definition, extended_definition, derivation
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for e in &entries {
            written += stmt.execute(rusqlite::params![
              e.strong_number.to_string(),
              e.language.to_string(),
              e.original,
              e.transliteration,
              e.pronunciation,
              e.definition,
              e.extended_definition,
              e.derivation,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn replace_cross_references(&self, refs: Vec<CrossReference>) -> Result<usize> {
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM cross_references", [])?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO cross_references (
               source_book, source_chapter, source_verse,
               target_book, target_chapter, target_verse, target_book_order,
               relationship_type, votes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for r in &refs {
            written += stmt.execute(rusqlite::params![
              r.source_book,
              r.source_chapter,
              r.source_verse,
              r.target_book,
              r.target_chapter,
              r.target_verse,
              r.target_book_order,
              r.relationship_type,
              r.votes,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn replace_commentary(
    &self,
    source:  &str,
    book:    &str,
    entries: Vec<CommentaryEntry>,
  ) -> Result<usize> {
    let source = source.to_owned();
    let book   = book.to_owned();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM commentary WHERE source = ?1 AND book = ?2",
          rusqlite::params![source, book],
        )?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO commentary (source, book, chapter, reference_start, reference_end, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for e in &entries {
            written += stmt.execute(rusqlite::params![
              source,
              book,
              e.chapter,
              e.reference_start,
              e.reference_end,
              e.content,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  // ── Alignments ────────────────────────────────────────────────────────────

  async fn upsert_alignments(&self, alignments: Vec<Alignment>) -> Result<usize> {
    let attempted = alignments.len();
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0;
        {
          // The WHERE clause both enforces the source-word reference and
          // disambiguates the upsert's ON CONFLICT from a join constraint.
          let mut stmt = tx.prepare(
            "INSERT INTO alignments (
               translation_id, book, chapter, verse,
               target_position, target_word, source_position, confidence
             )
             SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
             WHERE EXISTS (
               SELECT 1 FROM source_words
               WHERE book = ?2 AND chapter = ?3 AND verse = ?4 AND position = ?7
             )
             ON CONFLICT (translation_id, book, chapter, verse, target_position) DO UPDATE SET
               target_word     = excluded.target_word,
               source_position = excluded.source_position,
               confidence      = excluded.confidence",
          )?;
          for a in &alignments {
            written += stmt.execute(rusqlite::params![
              a.translation_id,
              a.book,
              a.chapter,
              a.verse,
              a.target_position,
              a.target_word,
              a.source_position,
              a.confidence,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    if written < attempted {
      tracing::debug!(skipped = attempted - written, "alignments without a source word skipped");
    }
    Ok(written)
  }

  async fn alignment_targets(
    &self,
    translation: &str,
    book:        Option<&str>,
    limit:       Option<usize>,
  ) -> Result<Vec<Verse>> {
    let translation = translation.to_owned();
    let book        = book.map(str::to_owned);
    let limit       = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

    let verses = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSE_COLUMNS} FROM verses v
           WHERE v.translation_id = ?1
             AND (?2 IS NULL OR v.book = ?2)
             AND EXISTS (
               SELECT 1 FROM source_words w
               WHERE w.book = v.book AND w.chapter = v.chapter AND w.verse = v.verse
             )
           ORDER BY v.book_order, v.chapter, v.verse
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![translation, book, limit], verse_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(verses)
  }

  async fn alignments(
    &self,
    translation: &str,
    book:        &str,
    chapter:     u32,
    verse:       u32,
  ) -> Result<Vec<Alignment>> {
    let translation = translation.to_owned();
    let book        = book.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT translation_id, book, chapter, verse,
                  target_position, target_word, source_position, confidence
           FROM alignments
           WHERE translation_id = ?1 AND book = ?2 AND chapter = ?3 AND verse = ?4
           ORDER BY target_position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![translation, book, chapter, verse], alignment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn alignment_count(&self, translation: &str) -> Result<usize> {
    let translation = translation.to_owned();
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM alignments WHERE translation_id = ?1",
          rusqlite::params![translation],
          |r| r.get(0),
        )?)
      })
      .await?;
    usize::try_from(count).map_err(|e| Error::Decode(e.to_string()))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn source_words(&self, book: &str, chapter: u32, verse: u32) -> Result<Vec<SourceWord>> {
    let book = book.to_owned();

    let raws: Vec<RawSourceWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SOURCE_WORD_COLUMNS} FROM source_words w
           WHERE w.book = ?1 AND w.chapter = ?2 AND w.verse = ?3
           ORDER BY w.position"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![book, chapter, verse], RawSourceWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSourceWord::into_source_word).collect()
  }

  async fn chapter_verses(&self, translation: &str, book: &str, chapter: u32) -> Result<Vec<Verse>> {
    let translation = translation.to_owned();
    let book        = book.to_owned();

    let verses = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VERSE_COLUMNS} FROM verses
           WHERE translation_id = ?1 AND book = ?2 AND chapter = ?3
           ORDER BY verse"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![translation, book, chapter], verse_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(verses)
  }

  async fn verse(
    &self,
    translation: &str,
    book:        &str,
    chapter:     u32,
    verse:       u32,
  ) -> Result<Option<Verse>> {
    let translation = translation.to_owned();
    let book        = book.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {VERSE_COLUMNS} FROM verses
                 WHERE translation_id = ?1 AND book = ?2 AND chapter = ?3 AND verse = ?4"
              ),
              rusqlite::params![translation, book, chapter, verse],
              verse_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn lexicon_entry(&self, strong_number: StrongsNumber) -> Result<Option<LexiconEntry>> {
    let key = strong_number.to_string();

    let raw: Option<RawLexiconEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {LEXICON_COLUMNS} FROM lexicon l WHERE l.strong_number = ?1"),
              rusqlite::params![key],
              |row| RawLexiconEntry::from_row(row, 0),
            )
            .optional()?
            .flatten(),
        )
      })
      .await?;

    raw.map(RawLexiconEntry::into_entry).transpose()
  }

  async fn occurrences(&self, strong_number: StrongsNumber) -> Result<Vec<Occurrence>> {
    let key = strong_number.to_string();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT book, chapter, verse, position, gloss FROM source_words
           WHERE strong_number = ?1
           ORDER BY book_order, chapter, verse, position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![key], occurrence_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn cross_references(
    &self,
    book:    &str,
    chapter: u32,
    scope:   VerseScope,
  ) -> Result<Vec<CrossReference>> {
    let book     = book.to_owned();
    let (lo, hi) = verse_bounds(scope);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT source_book, source_chapter, source_verse,
                  target_book, target_chapter, target_verse, target_book_order,
                  relationship_type, votes
           FROM cross_references
           WHERE source_book = ?1 AND source_chapter = ?2
             AND source_verse BETWEEN ?3 AND ?4
           ORDER BY target_book_order, target_chapter, target_verse, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![book, chapter, lo, hi], cross_reference_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn commentary(
    &self,
    book:    &str,
    chapter: u32,
    scope:   VerseScope,
  ) -> Result<Vec<CommentaryEntry>> {
    let book = book.to_owned();
    // NULL bounds select the whole chapter without an overlap test.
    let (start, end) = match scope {
      VerseScope::Chapter => (None, None),
      VerseScope::Verses { start, end } => (Some(start), Some(end)),
    };

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT source, book, chapter, reference_start, reference_end, content
           FROM commentary
           WHERE book = ?1 AND chapter = ?2
             AND (?3 IS NULL OR (reference_start <= ?4 AND reference_end >= ?3))
           ORDER BY reference_start, source, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![book, chapter, start, end], commentary_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn interlinear(&self, book: &str, chapter: u32) -> Result<Vec<InterlinearWord>> {
    let book = book.to_owned();

    let raws: Vec<RawInterlinearWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SOURCE_WORD_COLUMNS}, {LEXICON_COLUMNS}
           FROM source_words w
           LEFT JOIN lexicon l ON l.strong_number = w.strong_number
           WHERE w.book = ?1 AND w.chapter = ?2
           ORDER BY w.verse, w.position"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![book, chapter], RawInterlinearWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInterlinearWord::into_interlinear).collect()
  }

  async fn search_text(&self, query: &TextQuery) -> Result<Vec<SearchHit>> {
    let query = query.clone();
    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let (book, lo, hi): (Option<String>, u8, u8) = match &query.books {
      None => (None, 0, u8::MAX),
      Some(BookFilter::Book(name)) => (
        Some(canon::lookup(name).map_or_else(|| name.clone(), |b| b.name.to_string())),
        0,
        u8::MAX,
      ),
      Some(BookFilter::Testament(t)) => {
        let range = t.order_range();
        (None, *range.start(), *range.end())
      }
    };

    let hits = self
      .conn
      .call(move |conn| {
        let mut hits = Vec::new();

        if query.verses {
          let mut stmt = conn.prepare(
            "SELECT v.book, v.chapter, v.verse,
                    snippet(verses_fts, 0, '<mark>', '</mark>', '...', 32)
             FROM verses_fts
             JOIN verses v ON v.id = verses_fts.rowid
             WHERE verses_fts MATCH ?1
               AND v.translation_id = ?2
               AND (?3 IS NULL OR v.book = ?3)
               AND v.book_order BETWEEN ?4 AND ?5
             ORDER BY rank
             LIMIT ?6",
          )?;
          let rows = stmt
            .query_map(
              rusqlite::params![
                query.expression,
                query.translation,
                book,
                lo,
                hi,
                limit,
              ],
              |row| {
                Ok(SearchHit {
                  kind:    HitKind::Verse,
                  book:    row.get(0)?,
                  chapter: row.get(1)?,
                  verse:   Some(row.get(2)?),
                  source:  None,
                  snippet: row.get(3)?,
                })
              },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          hits.extend(rows);
        }

        if query.commentary {
          let mut stmt = conn.prepare(
            "SELECT c.book, c.chapter, c.reference_start, c.source,
                    snippet(commentary_fts, 0, '<mark>', '</mark>', '...', 32)
             FROM commentary_fts
             JOIN commentary c ON c.id = commentary_fts.rowid
             WHERE commentary_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
          )?;
          let rows = stmt
            .query_map(
              rusqlite::params![query.expression, limit],
              |row| {
                Ok(SearchHit {
                  kind:    HitKind::Commentary,
                  book:    row.get(0)?,
                  chapter: row.get(1)?,
                  verse:   Some(row.get(2)?),
                  source:  Some(row.get(3)?),
                  snippet: row.get(4)?,
                })
              },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          hits.extend(rows);
        }

        Ok(hits)
      })
      .await?;
    Ok(hits)
  }
}
