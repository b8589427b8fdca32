//! Gloss-based token alignment.
//!
//! Each source word carries a short English gloss. A translated verse is
//! aligned by matching its words against the stemmed words of those glosses:
//! the first unused source position wins at [`EXACT_CONFIDENCE`]; once every
//! candidate of a gloss word has been used, the first candidate is reused at
//! the aligner's reuse confidence. Words with no candidate stay unaligned.

use std::{
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Confidence of an alignment onto a source position not yet used in the verse.
pub const EXACT_CONFIDENCE: f64 = 1.0;

/// Default confidence of an alignment that reuses an already-consumed source
/// position.
pub const REUSED_POSITION_CONFIDENCE: f64 = 0.8;

/// Closed-class words that never receive an alignment.
pub const STOPWORDS: &[&str] = &[
  "the", "a", "an", "and", "or", "of", "to", "in", "for", "is", "was", "be",
];

/// Normalized gloss words shorter than this are not indexed.
const MIN_INDEXED_LEN: usize = 2;

// ─── Tokenizer ───────────────────────────────────────────────────────────────

/// A word of a translated text with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
  pub position: u32,
  /// The word as written, original casing preserved.
  pub text:     &'a str,
}

/// Runs of ASCII letters, keeping one internal apostrophe (`LORD's`, `don't`).
static WORD_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").unwrap());

/// Split `text` into words, numbered from 1.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
  WORD_RE
    .find_iter(text)
    .zip(1..)
    .map(|(m, position)| Token { position, text: m.as_str() })
    .collect()
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Suffixes stripped by [`normalize`], in priority order, with the minimum
/// word length (exclusive) for each to apply.
const SUFFIXES: &[(&str, usize)] = &[
  ("ness", 5),
  ("less", 5),
  ("ful", 4),
  ("ing", 4),
  ("ed", 3),
  ("ly", 3),
  ("er", 3),
  ("est", 4),
  ("s", 2),
];

/// Lowercase `word` and strip at most one common suffix.
pub fn normalize(word: &str) -> String {
  let word = word.to_ascii_lowercase();
  for (suffix, min_len) in SUFFIXES {
    if word.len() > *min_len && word.ends_with(suffix) {
      return word[..word.len() - suffix.len()].to_string();
    }
  }
  word
}

pub fn is_stopword(word: &str) -> bool {
  STOPWORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

// ─── Gloss index ─────────────────────────────────────────────────────────────

/// Normalized gloss word → source positions containing it, in position order.
#[derive(Debug, Default)]
pub struct GlossIndex {
  entries: HashMap<String, Vec<u32>>,
}

impl GlossIndex {
  /// Index `glosses`, given as `(source_position, gloss)` pairs.
  pub fn build<'a, I>(glosses: I) -> Self
  where
    I: IntoIterator<Item = (u32, &'a str)>,
  {
    let mut glosses: Vec<_> = glosses.into_iter().collect();
    glosses.sort_by_key(|(position, _)| *position);

    let mut entries: HashMap<String, Vec<u32>> = HashMap::new();
    for (position, gloss) in glosses {
      for token in tokenize(gloss) {
        let key = normalize(token.text);
        if key.len() < MIN_INDEXED_LEN {
          continue;
        }
        let positions = entries.entry(key).or_default();
        if positions.last() != Some(&position) {
          positions.push(position);
        }
      }
    }
    Self { entries }
  }

  pub fn candidates(&self, normalized: &str) -> &[u32] {
    self.entries.get(normalized).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

// ─── Aligner ─────────────────────────────────────────────────────────────────

/// One proposed alignment, not yet tied to a translation or verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentCandidate {
  pub target_position: u32,
  pub target_word:     String,
  pub source_position: u32,
  pub confidence:      f64,
}

/// Gloss matcher with a tunable reuse confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aligner {
  pub reuse_confidence: f64,
}

impl Default for Aligner {
  fn default() -> Self { Self { reuse_confidence: REUSED_POSITION_CONFIDENCE } }
}

impl Aligner {
  pub fn new(reuse_confidence: f64) -> Self { Self { reuse_confidence } }

  /// Align the words of `target_text` to the source positions of `glosses`.
  pub fn align<'a, I>(&self, target_text: &str, glosses: I) -> Vec<AlignmentCandidate>
  where
    I: IntoIterator<Item = (u32, &'a str)>,
  {
    let index = GlossIndex::build(glosses);
    self.align_with_index(target_text, &index)
  }

  pub fn align_with_index(&self, target_text: &str, index: &GlossIndex) -> Vec<AlignmentCandidate> {
    let mut used: HashSet<u32> = HashSet::new();
    let mut out = Vec::new();

    for token in tokenize(target_text) {
      if is_stopword(token.text) {
        continue;
      }
      let candidates = index.candidates(&normalize(token.text));
      let Some(&first) = candidates.first() else {
        continue;
      };

      let (source_position, confidence) =
        match candidates.iter().copied().find(|p| !used.contains(p)) {
          Some(p) => {
            used.insert(p);
            (p, EXACT_CONFIDENCE)
          }
          None => (first, self.reuse_confidence),
        };

      out.push(AlignmentCandidate {
        target_position: token.position,
        target_word: token.text.to_string(),
        source_position,
        confidence,
      });
    }

    out
  }
}
