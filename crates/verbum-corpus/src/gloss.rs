//! Gloss cleanup for tagged source text.
//!
//! STEPBible glosses mark optional words with `<...>`, implied words with
//! `[...]` and morpheme boundaries with `/`. The aligner wants plain words.

use std::sync::LazyLock;

use regex::Regex;

static OPTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]+)>").unwrap());

static IMPLIED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

/// Clean a raw gloss: `<obj.>` → `obj.`, `[was]` → `was`,
/// `in/ beginning` → `in beginning`, whitespace collapsed. Returns `None`
/// when nothing is left. Unbalanced or empty groups are kept as written.
pub fn clean_gloss(raw: &str) -> Option<String> {
  let gloss = OPTIONAL_RE.replace_all(raw, "$1");
  let gloss = IMPLIED_RE.replace_all(&gloss, "$1");
  let cleaned = gloss
    .replace('/', " ")
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ");
  (!cleaned.is_empty()).then_some(cleaned)
}
