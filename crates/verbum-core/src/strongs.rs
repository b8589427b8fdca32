//! Strong's number canonicalization.
//!
//! The ingested corpora encode lexical identifiers in several incompatible
//! ways. [`canonicalize`] maps all of them onto `{H|G}<digits>` with no
//! leading zeros, and every importer and query path goes through it:
//!
//! | Input              | Source                      | Canonical |
//! |--------------------|-----------------------------|-----------|
//! | `H0430`            | zero padded                 | `H430`    |
//! | `H9003/{H7225G}`   | STEPBible TAHOT dStrongs    | `H7225`   |
//! | `G0976=N-NSF`      | STEPBible TAGNT             | `G976`    |
//! | `b/7225`, `1254 a` | OSHB lemma attributes       | `H7225`, `H1254` |
//! | `G2424G`           | homonym suffix              | `G2424`   |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Language ────────────────────────────────────────────────────────────────

/// Source language of a lexical entry.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
  Hebrew,
  Greek,
}

impl Language {
  /// The Strong's prefix letter for this language.
  pub fn prefix(self) -> char {
    match self {
      Self::Hebrew => 'H',
      Self::Greek => 'G',
    }
  }

  pub fn from_prefix(c: char) -> Option<Self> {
    match c.to_ascii_uppercase() {
      'H' => Some(Self::Hebrew),
      'G' => Some(Self::Greek),
      _ => None,
    }
  }
}

// ─── StrongsNumber ───────────────────────────────────────────────────────────

/// A canonical Strong's number, e.g. `H430`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StrongsNumber {
  pub language: Language,
  pub number:   u32,
}

impl StrongsNumber {
  pub fn new(language: Language, number: u32) -> Self { Self { language, number } }
}

impl fmt::Display for StrongsNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.language.prefix(), self.number)
  }
}

impl From<StrongsNumber> for String {
  fn from(s: StrongsNumber) -> Self { s.to_string() }
}

impl FromStr for StrongsNumber {
  type Err = Error;

  /// Parse a prefixed identifier in any supported encoding; the language is
  /// taken from the first prefix letter found.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidStrongsNumber(s.to_string());
    let language = s
      .chars()
      .find_map(Language::from_prefix)
      .ok_or_else(invalid)?;
    canonicalize(s, language).ok_or_else(invalid)
  }
}

impl TryFrom<String> for StrongsNumber {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

// ─── Canonicalizer ───────────────────────────────────────────────────────────

/// Normalize a raw lexical identifier for `language`.
///
/// Resolution order:
/// 1. a `{...}` bracketed token is the primary lexeme of a compound field;
/// 2. otherwise the part before `=` of a `number=morphology` field;
/// 3. otherwise the first token carrying the language prefix (or bare
///    digits). A grammatical marker (`H9xxx`/`G9xxx`) found this way
///    yields `None`.
pub fn canonicalize(raw: &str, language: Language) -> Option<StrongsNumber> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Some(inner) = bracketed(raw) {
    return lexical_digits(inner.trim(), language).and_then(|d| from_digits(d, language));
  }

  if let Some((head, _morphology)) = raw.split_once('=') {
    return lexical_digits(head.trim(), language).and_then(|d| from_digits(d, language));
  }

  let digits = raw
    .split(|c: char| !c.is_ascii_alphanumeric())
    .find_map(|token| lexical_digits(token, language))?;

  if is_grammatical_marker(digits) {
    return None;
  }
  from_digits(digits, language)
}

/// String form of [`canonicalize`].
pub fn canonicalize_strong(raw: &str, language: Language) -> Option<String> {
  canonicalize(raw, language).map(|s| s.to_string())
}

/// Whether `query` has the shape of a direct lexical-id lookup (`G25`, `h0430`).
pub fn is_lexical_id(query: &str) -> bool {
  let mut chars = query.chars();
  matches!(chars.next(), Some(c) if Language::from_prefix(c).is_some())
    && !chars.as_str().is_empty()
    && chars.as_str().bytes().all(|b| b.is_ascii_digit())
}

/// The contents of the first `{...}` group.
fn bracketed(raw: &str) -> Option<&str> {
  let open = raw.find('{')?;
  let close = raw[open..].find('}')? + open;
  Some(&raw[open + 1..close])
}

/// Digits of a single token such as `H0430`, `7225G` or `G2424G`.
///
/// The token must be an optional prefix for `language`, at least one digit,
/// then optional trailing letters (homonym suffixes).
fn lexical_digits(token: &str, language: Language) -> Option<&str> {
  let body = match token.chars().next()? {
    c if c.is_ascii_digit() => token,
    c if c.to_ascii_uppercase() == language.prefix() => &token[1..],
    _ => return None,
  };
  let digit_len = body.bytes().take_while(u8::is_ascii_digit).count();
  if digit_len == 0 || !body[digit_len..].bytes().all(|b| b.is_ascii_alphabetic()) {
    return None;
  }
  Some(&body[..digit_len])
}

/// STEPBible reserves the four-digit `9xxx` range for function-word markers.
fn is_grammatical_marker(digits: &str) -> bool {
  let significant = digits.trim_start_matches('0');
  significant.len() == 4 && significant.starts_with('9')
}

fn from_digits(digits: &str, language: Language) -> Option<StrongsNumber> {
  let significant = digits.trim_start_matches('0');
  let number = significant.parse::<u32>().ok()?;
  (number > 0).then(|| StrongsNumber::new(language, number))
}
