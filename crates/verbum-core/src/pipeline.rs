//! The alignment build pipeline.
//!
//! Walks the verses of a translation in canonical order, aligns each against
//! the glosses of its source words and writes the result in batches. Every
//! batch is an idempotent upsert, so an interrupted build can simply be run
//! again.

use serde::Serialize;

use crate::{
  align::Aligner,
  record::Alignment,
  store::ScriptureStore,
};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Counts reported by [`AlignmentBuilder::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
  /// Verses visited.
  pub verses:                 usize,
  /// Verses whose source words carry no gloss at all.
  pub verses_without_glosses: usize,
  /// Alignments proposed by the aligner.
  pub candidates:             usize,
  /// Rows actually written by the store.
  pub written:                usize,
  /// Alignments stored for the translation once the build is done.
  pub total:                  usize,
}

#[derive(Debug, Clone, Copy)]
pub struct AlignmentBuilder {
  pub batch_size: usize,
  pub aligner:    Aligner,
}

impl Default for AlignmentBuilder {
  fn default() -> Self {
    Self { batch_size: DEFAULT_BATCH_SIZE, aligner: Aligner::default() }
  }
}

impl AlignmentBuilder {
  pub fn new(batch_size: usize, aligner: Aligner) -> Self {
    Self { batch_size: batch_size.max(1), aligner }
  }

  /// Build alignments for `translation`, optionally restricted to one book
  /// and to the first `limit` verses.
  pub async fn build<S: ScriptureStore>(
    &self,
    store: &S,
    translation: &str,
    book: Option<&str>,
    limit: Option<usize>,
  ) -> Result<BuildSummary, S::Error> {
    let verses = store.alignment_targets(translation, book, limit).await?;
    tracing::info!(translation, ?book, verses = verses.len(), "building alignments");

    let batch_size = self.batch_size.max(1);
    let mut summary = BuildSummary::default();
    let mut batch: Vec<Alignment> = Vec::with_capacity(batch_size);

    for verse in &verses {
      summary.verses += 1;

      let words = store.source_words(&verse.book, verse.chapter, verse.verse).await?;
      let glosses: Vec<(u32, &str)> = words
        .iter()
        .filter_map(|w| w.gloss.as_deref().map(|g| (w.position, g)))
        .collect();
      if glosses.is_empty() {
        summary.verses_without_glosses += 1;
        continue;
      }

      let candidates = self.aligner.align(&verse.text, glosses);
      summary.candidates += candidates.len();
      batch.extend(candidates.into_iter().map(|c| Alignment {
        translation_id:  verse.translation_id.clone(),
        book:            verse.book.clone(),
        chapter:         verse.chapter,
        verse:           verse.verse,
        target_position: c.target_position,
        target_word:     c.target_word,
        source_position: c.source_position,
        confidence:      c.confidence,
      }));

      if batch.len() >= batch_size {
        summary.written += store.upsert_alignments(std::mem::take(&mut batch)).await?;
        tracing::debug!(written = summary.written, verses = summary.verses, "committed batch");
      }
    }

    if !batch.is_empty() {
      summary.written += store.upsert_alignments(batch).await?;
    }

    summary.total = store.alignment_count(translation).await?;
    tracing::info!(
      translation,
      verses = summary.verses,
      without_glosses = summary.verses_without_glosses,
      candidates = summary.candidates,
      written = summary.written,
      total = summary.total,
      "alignment build finished"
    );
    Ok(summary)
  }
}
