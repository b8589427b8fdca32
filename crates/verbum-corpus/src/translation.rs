//! Chapters-JSON translation files, one per book.
//!
//! ```json
//! { "book": "Genesis",
//!   "chapters": [ { "chapter": "1",
//!                   "verses": [ { "verse": "1", "text": "In the beginning ..." } ] } ] }
//! ```
//!
//! Chapter and verse numbers appear both as strings and as integers.

use serde::Deserialize;
use verbum_core::record::Verse;

use crate::{Error, Parsed, Result};

#[derive(Deserialize)]
struct BookDocument {
  chapters: Vec<RawChapter>,
}

#[derive(Deserialize)]
struct RawChapter {
  chapter: Number,
  #[serde(default)]
  verses:  Vec<RawVerse>,
}

#[derive(Deserialize)]
struct RawVerse {
  verse: Number,
  #[serde(default)]
  text:  String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
  Int(u32),
  Text(String),
}

impl Number {
  fn value(&self) -> Option<u32> {
    let n = match self {
      Self::Int(n) => Some(*n),
      Self::Text(s) => s.trim().parse().ok(),
    };
    n.filter(|n| *n > 0)
  }
}

/// The file name a book is published under: its canonical name without
/// spaces (`1 Samuel` → `1Samuel.json`).
pub fn file_name(book: &str) -> String { format!("{}.json", book.replace(' ', "")) }

/// Parse one book file into verses of `translation_id`. Verses are numbered
/// across the whole document for reject reporting; empty texts are skipped.
pub fn parse(input: &str, translation_id: &str, book: &str) -> Result<Parsed<Verse>> {
  let document: BookDocument = serde_json::from_str(input)?;
  let mut parsed = Parsed::default();
  let mut item = 0;

  for chapter in &document.chapters {
    let chapter_number = chapter.chapter.value();
    for verse in &chapter.verses {
      item += 1;

      let (Some(chapter_number), Some(verse_number)) = (chapter_number, verse.verse.value()) else {
        parsed.reject(
          item,
          Error::MalformedRecord(format!("{book}: chapter or verse number")),
        );
        continue;
      };

      let text = verse.text.trim();
      if text.is_empty() {
        parsed.skipped += 1;
        continue;
      }

      parsed.records.push(Verse {
        translation_id: translation_id.to_string(),
        book:           book.to_string(),
        chapter:        chapter_number,
        verse:          verse_number,
        text:           text.to_string(),
      });
    }
  }

  Ok(parsed)
}
