//! The fixed 66-book Protestant canon.
//!
//! Every book code seen in queries and in the ingested corpora (STEPBible,
//! OpenBible, HelloAO) resolves through the single [`lookup`] table built
//! here, so the reference parser and the importers cannot drift apart.

use std::{collections::HashMap, ops::RangeInclusive, sync::LazyLock};

use serde::{Deserialize, Serialize};

// ─── Testament ───────────────────────────────────────────────────────────────

/// The OT/NT partition of the canon, determined by book order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Testament {
  #[serde(rename = "OT")]
  #[strum(serialize = "OT")]
  Old,
  #[serde(rename = "NT")]
  #[strum(serialize = "NT")]
  New,
}

impl Testament {
  /// The testament a book order belongs to, or `None` outside `1..=66`.
  pub fn of(order: u8) -> Option<Self> {
    match order {
      1..=39 => Some(Self::Old),
      40..=66 => Some(Self::New),
      _ => None,
    }
  }

  /// Inclusive book-order bounds of this testament.
  pub fn order_range(self) -> RangeInclusive<u8> {
    match self {
      Self::Old => 1..=39,
      Self::New => 40..=66,
    }
  }
}

// ─── Book table ──────────────────────────────────────────────────────────────

/// One canonical book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
  /// Canonical full name, e.g. `"1 Samuel"`.
  pub name:      &'static str,
  /// Short code used in the books table, e.g. `"1Sam"`.
  pub code:      &'static str,
  /// Canonical order, 1–66.
  pub order:     u8,
  pub testament: Testament,
  /// Additional spellings accepted by [`lookup`].
  pub aliases:   &'static [&'static str],
}

macro_rules! book {
  ($order:expr, $name:expr, $code:expr, [$($alias:expr),* $(,)?]) => {
    Book {
      name:      $name,
      code:      $code,
      order:     $order,
      testament: if $order <= 39 { Testament::Old } else { Testament::New },
      aliases:   &[$($alias),*],
    }
  };
}

/// All 66 books in canonical order.
pub static BOOKS: [Book; 66] = [
  book!(1, "Genesis", "Gen", ["ge", "gn"]),
  book!(2, "Exodus", "Exod", ["ex", "exo"]),
  book!(3, "Leviticus", "Lev", ["le", "lv"]),
  book!(4, "Numbers", "Num", ["nu", "nm"]),
  book!(5, "Deuteronomy", "Deut", ["deu", "dt"]),
  book!(6, "Joshua", "Josh", ["jos", "jsh"]),
  book!(7, "Judges", "Judg", ["jdg", "jdgs"]),
  book!(8, "Ruth", "Ruth", ["rut", "ru"]),
  book!(9, "1 Samuel", "1Sam", ["1sa", "1sm"]),
  book!(10, "2 Samuel", "2Sam", ["2sa", "2sm"]),
  book!(11, "1 Kings", "1Kgs", ["1ki", "1kin"]),
  book!(12, "2 Kings", "2Kgs", ["2ki", "2kin"]),
  book!(13, "1 Chronicles", "1Chr", ["1ch", "1chron"]),
  book!(14, "2 Chronicles", "2Chr", ["2ch", "2chron"]),
  book!(15, "Ezra", "Ezra", ["ezr"]),
  book!(16, "Nehemiah", "Neh", ["ne"]),
  book!(17, "Esther", "Esth", ["est", "es"]),
  book!(18, "Job", "Job", ["jb"]),
  book!(19, "Psalms", "Ps", ["psa", "psalm", "pss", "psm"]),
  book!(20, "Proverbs", "Prov", ["pro", "prv", "pr"]),
  book!(21, "Ecclesiastes", "Eccl", ["ecc", "ec", "qoh"]),
  book!(22, "Song of Solomon", "Song", ["sng", "sos", "songofsongs", "canticles"]),
  book!(23, "Isaiah", "Isa", ["is"]),
  book!(24, "Jeremiah", "Jer", ["je", "jr"]),
  book!(25, "Lamentations", "Lam", ["la"]),
  book!(26, "Ezekiel", "Ezek", ["ezk", "eze"]),
  book!(27, "Daniel", "Dan", ["da", "dn"]),
  book!(28, "Hosea", "Hos", ["ho"]),
  book!(29, "Joel", "Joel", ["joe", "jol", "jl"]),
  book!(30, "Amos", "Amos", ["amo", "am"]),
  book!(31, "Obadiah", "Obad", ["oba", "ob"]),
  book!(32, "Jonah", "Jonah", ["jon", "jnh"]),
  book!(33, "Micah", "Mic", ["mi"]),
  book!(34, "Nahum", "Nah", ["nam", "na"]),
  book!(35, "Habakkuk", "Hab", ["hb"]),
  book!(36, "Zephaniah", "Zeph", ["zep", "zp"]),
  book!(37, "Haggai", "Hag", ["hg"]),
  book!(38, "Zechariah", "Zech", ["zec", "zc"]),
  book!(39, "Malachi", "Mal", ["ml"]),
  book!(40, "Matthew", "Matt", ["mat", "mt"]),
  book!(41, "Mark", "Mark", ["mrk", "mk", "mr"]),
  book!(42, "Luke", "Luke", ["luk", "lk"]),
  book!(43, "John", "John", ["jhn", "jn"]),
  book!(44, "Acts", "Acts", ["act", "ac"]),
  book!(45, "Romans", "Rom", ["ro", "rm"]),
  book!(46, "1 Corinthians", "1Cor", ["1co"]),
  book!(47, "2 Corinthians", "2Cor", ["2co"]),
  book!(48, "Galatians", "Gal", ["ga"]),
  book!(49, "Ephesians", "Eph", ["ephes"]),
  book!(50, "Philippians", "Phil", ["php", "pp"]),
  book!(51, "Colossians", "Col", []),
  book!(52, "1 Thessalonians", "1Thess", ["1th", "1thes"]),
  book!(53, "2 Thessalonians", "2Thess", ["2th", "2thes"]),
  book!(54, "1 Timothy", "1Tim", ["1ti", "1tm"]),
  book!(55, "2 Timothy", "2Tim", ["2ti", "2tm"]),
  book!(56, "Titus", "Titus", ["tit"]),
  book!(57, "Philemon", "Phlm", ["phm", "philem"]),
  book!(58, "Hebrews", "Heb", []),
  book!(59, "James", "Jas", ["jm"]),
  book!(60, "1 Peter", "1Pet", ["1pe", "1pt"]),
  book!(61, "2 Peter", "2Pet", ["2pe", "2pt"]),
  book!(62, "1 John", "1John", ["1jn", "1jhn"]),
  book!(63, "2 John", "2John", ["2jn", "2jhn"]),
  book!(64, "3 John", "3John", ["3jn", "3jhn"]),
  book!(65, "Jude", "Jude", ["jud", "jd"]),
  book!(66, "Revelation", "Rev", ["re", "rv", "apocalypse"]),
];

/// Normalise a book token into a lookup key: drop spaces and dots, lowercase.
pub fn lookup_key(token: &str) -> String {
  token
    .chars()
    .filter(|c| !c.is_whitespace() && *c != '.')
    .flat_map(char::to_lowercase)
    .collect()
}

static INDEX: LazyLock<HashMap<String, &'static Book>> = LazyLock::new(|| {
  let mut index = HashMap::new();
  for book in &BOOKS {
    index.insert(lookup_key(book.name), book);
    index.insert(lookup_key(book.code), book);
    for alias in book.aliases {
      index.insert(lookup_key(alias), book);
    }
  }
  index
});

/// Resolve any known spelling of a book (full name, code, query abbreviation
/// or corpus code) to its canonical entry.
pub fn lookup(token: &str) -> Option<&'static Book> {
  INDEX.get(&lookup_key(token)).copied()
}

/// Look a book up by canonical order.
pub fn by_order(order: u8) -> Option<&'static Book> {
  BOOKS.get(usize::from(order).checked_sub(1)?)
}

/// Canonical order for a canonical book name.
pub fn book_order(name: &str) -> Option<u8> { lookup(name).map(|b| b.order) }
