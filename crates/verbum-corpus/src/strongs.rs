//! openscriptures Strong's dictionaries.
//!
//! Both files are one JSON object keyed by Strong's number. The Greek file
//! spells transliteration `translit`, the Hebrew one `xlit` and pronunciation
//! `pron`; a few third-party dumps carry a bare definition string instead of
//! an object. Keys are canonicalized, so `G0025`, `G25` and `25` agree.

use serde::Deserialize;
use serde_json::{Map, Value};
use verbum_core::{Language, canonicalize, record::LexiconEntry};

use crate::{Error, Parsed, Result, non_empty};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
  Fields(RawFields),
  Plain(String),
}

#[derive(Deserialize)]
struct RawFields {
  #[serde(alias = "word")]
  lemma:         Option<String>,
  #[serde(alias = "xlit", alias = "transliteration")]
  translit:      Option<String>,
  #[serde(alias = "pron")]
  pronunciation: Option<String>,
  #[serde(alias = "definition")]
  strongs_def:   Option<String>,
  #[serde(alias = "extended_definition")]
  kjv_def:       Option<String>,
  derivation:    Option<String>,
}

/// Parse a dictionary for `language`. Entries are numbered from 1 in key
/// order for reject reporting.
pub fn parse(input: &str, language: Language) -> Result<Parsed<LexiconEntry>> {
  let document: Map<String, Value> = serde_json::from_str(input)?;
  let mut parsed = Parsed::default();

  for (index, (key, value)) in document.into_iter().enumerate() {
    match parse_entry(&key, value, language) {
      Ok(entry) => parsed.records.push(entry),
      Err(error) => parsed.reject(index + 1, error),
    }
  }

  Ok(parsed)
}

fn parse_entry(key: &str, value: Value, language: Language) -> Result<LexiconEntry> {
  let strong_number = canonicalize(key, language)
    .ok_or_else(|| Error::MalformedRecord(format!("{language} Strong's key {key:?}")))?;

  let entry = match serde_json::from_value(value)? {
    RawEntry::Fields(fields) => LexiconEntry {
      strong_number,
      language,
      original: fields.lemma.unwrap_or_default(),
      transliteration: fields.translit.as_deref().and_then(non_empty),
      pronunciation: fields.pronunciation.as_deref().and_then(non_empty),
      definition: fields.strongs_def.unwrap_or_default().trim().to_string(),
      extended_definition: fields.kjv_def.as_deref().and_then(non_empty),
      derivation: fields.derivation.as_deref().and_then(non_empty),
    },
    RawEntry::Plain(definition) => LexiconEntry {
      strong_number,
      language,
      original: String::new(),
      transliteration: None,
      pronunciation: None,
      definition,
      extended_definition: None,
      derivation: None,
    },
  };
  Ok(entry)
}
