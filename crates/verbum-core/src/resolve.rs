//! Query-time composition: passages, interlinear words and search routing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  Result,
  canon::{self, Testament},
  record::{
    CommentaryEntry,
    CrossReference,
    InterlinearWord,
    LexiconEntry,
    Occurrence,
    SearchHit,
    Verse,
  },
  reference::CanonicalReference,
  store::{BookFilter, ScriptureStore, TextQuery},
  strongs::{StrongsNumber, is_lexical_id},
};

/// Queries shorter than this are not searched.
pub const MIN_QUERY_LEN: usize = 2;

// ─── Passages ────────────────────────────────────────────────────────────────

/// A chapter prepared for display around a reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passage {
  pub reference:        CanonicalReference,
  pub translation:      String,
  /// The whole chapter, even for a single-verse reference.
  pub verses:           Vec<Verse>,
  pub highlighted:      Vec<u32>,
  pub cross_references: Vec<CrossReference>,
  pub commentary:       Vec<CommentaryEntry>,
}

/// Resolve `reference` into a [`Passage`]. Returns `None` if the chapter has
/// no verses in `translation`.
pub async fn resolve_passage<S: ScriptureStore>(
  store: &S,
  translation: &str,
  reference: &CanonicalReference,
) -> Result<Option<Passage>, S::Error> {
  let verses = store.chapter_verses(translation, &reference.book, reference.chapter).await?;
  if verses.is_empty() {
    tracing::debug!(%reference, translation, "chapter not found");
    return Ok(None);
  }

  let highlighted = verses
    .iter()
    .map(|v| v.verse)
    .filter(|&n| reference.highlights(n))
    .collect();

  // An inverted range selects no verses, so no links or notes either.
  let (cross_references, commentary) = if reference.scope.is_empty() {
    (Vec::new(), Vec::new())
  } else {
    let cross_references = store
      .cross_references(&reference.book, reference.chapter, reference.scope)
      .await?;
    let commentary = store
      .commentary(&reference.book, reference.chapter, reference.scope)
      .await?;
    (cross_references, commentary)
  };

  Ok(Some(Passage {
    reference: reference.clone(),
    translation: translation.to_string(),
    verses,
    highlighted,
    cross_references,
    commentary,
  }))
}

/// The first verse of `reference`, for short previews.
pub async fn verse_text<S: ScriptureStore>(
  store: &S,
  translation: &str,
  reference: &CanonicalReference,
) -> Result<Option<Verse>, S::Error> {
  store
    .verse(translation, &reference.book, reference.chapter, reference.verse_start())
    .await
}

/// Source words with lexicon entries for the verses `reference` selects.
pub async fn interlinear<S: ScriptureStore>(
  store: &S,
  reference: &CanonicalReference,
) -> Result<Vec<InterlinearWord>, S::Error> {
  let mut words = store.interlinear(&reference.book, reference.chapter).await?;
  words.retain(|w| reference.scope.contains(w.word.verse));
  Ok(words)
}

// ─── Search scope ────────────────────────────────────────────────────────────

/// What a search covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SearchScope {
  /// Verse text and commentary.
  #[default]
  All,
  Bible,
  Commentary,
  /// Verse text of one canonical book.
  Book(String),
  OldTestament,
  NewTestament,
}

impl SearchScope {
  fn book_filter(&self) -> Option<BookFilter> {
    match self {
      Self::Book(name) => Some(BookFilter::Book(name.clone())),
      Self::OldTestament => Some(BookFilter::Testament(Testament::Old)),
      Self::NewTestament => Some(BookFilter::Testament(Testament::New)),
      Self::All | Self::Bible | Self::Commentary => None,
    }
  }

  fn searches_verses(&self) -> bool { !matches!(self, Self::Commentary) }

  fn searches_commentary(&self) -> bool { matches!(self, Self::All | Self::Commentary) }
}

impl fmt::Display for SearchScope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Bible => f.write_str("bible"),
      Self::Commentary => f.write_str("commentary"),
      Self::Book(name) => write!(f, "book:{name}"),
      Self::OldTestament => f.write_str("ot"),
      Self::NewTestament => f.write_str("nt"),
    }
  }
}

impl FromStr for SearchScope {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    if let Some((prefix, name)) = trimmed.split_once(':')
      && prefix.eq_ignore_ascii_case("book")
    {
      return canon::lookup(name)
        .map(|book| Self::Book(book.name.to_string()))
        .ok_or_else(|| Error::InvalidScope(s.to_string()));
    }
    match trimmed.to_ascii_lowercase().as_str() {
      "" | "all" => Ok(Self::All),
      "bible" => Ok(Self::Bible),
      "commentary" => Ok(Self::Commentary),
      "ot" => Ok(Self::OldTestament),
      "nt" => Ok(Self::NewTestament),
      _ => Err(Error::InvalidScope(s.to_string())),
    }
  }
}

impl From<SearchScope> for String {
  fn from(s: SearchScope) -> Self { s.to_string() }
}

impl TryFrom<String> for SearchScope {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

// ─── Search routing ──────────────────────────────────────────────────────────

/// Everything known about one Strong's number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordInfo {
  pub strong_number: StrongsNumber,
  pub entry:         Option<LexiconEntry>,
  pub occurrences:   Vec<Occurrence>,
  pub count:         usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
  pub query:     String,
  pub scope:     SearchScope,
  pub hits:      Vec<SearchHit>,
  pub word_info: Option<WordInfo>,
}

/// Lexicon entry and occurrences of `strong_number`.
pub async fn word_info<S: ScriptureStore>(
  store: &S,
  strong_number: StrongsNumber,
) -> Result<WordInfo, S::Error> {
  let entry = store.lexicon_entry(strong_number).await?;
  let occurrences = store.occurrences(strong_number).await?;
  Ok(WordInfo {
    strong_number,
    entry,
    count: occurrences.len(),
    occurrences,
  })
}

/// Route a client query: a direct lexical id (`G26`) becomes a word lookup,
/// anything else a scoped full-text search over `translation`.
pub async fn route_search<S: ScriptureStore>(
  store: &S,
  translation: &str,
  query: &str,
  scope: SearchScope,
  limit: usize,
) -> Result<SearchResults, S::Error> {
  let trimmed = query.trim();
  let mut results = SearchResults {
    query: trimmed.to_string(),
    scope,
    hits: Vec::new(),
    word_info: None,
  };

  if trimmed.chars().count() < MIN_QUERY_LEN {
    return Ok(results);
  }

  if is_lexical_id(trimmed) {
    match trimmed.parse::<StrongsNumber>() {
      Ok(strong_number) => results.word_info = Some(word_info(store, strong_number).await?),
      Err(_) => tracing::debug!(query = trimmed, "lexical id is not a lexicon entry"),
    }
    return Ok(results);
  }

  let text_query = TextQuery {
    expression:  fts_expression(trimmed),
    translation: translation.to_string(),
    verses:      results.scope.searches_verses(),
    commentary:  results.scope.searches_commentary(),
    books:       results.scope.book_filter(),
    limit,
  };
  results.hits = store.search_text(&text_query).await?;
  tracing::debug!(query = trimmed, scope = %results.scope, hits = results.hits.len(), "search");
  Ok(results)
}

/// Build an FTS5 match expression from user input.
///
/// Quoted input is passed through verbatim. Otherwise every token becomes an
/// FTS5 string, and the last token of a multi-word query becomes a prefix
/// query.
pub fn fts_expression(query: &str) -> String {
  let query = query.trim();
  if query.starts_with('"') {
    return query.to_string();
  }

  let tokens: Vec<&str> = query.split_whitespace().collect();
  let last = tokens.len().saturating_sub(1);
  tokens
    .iter()
    .enumerate()
    .map(|(i, token)| {
      let quoted = format!("\"{}\"", token.replace('"', "\"\""));
      if i == last && tokens.len() > 1 { quoted + "*" } else { quoted }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
