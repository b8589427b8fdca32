//! Integration tests for `SqliteStore` against an in-memory database.
//!
//! The alignment pipeline and the resolver live in `verbum-core` but are
//! exercised here, end to end, against the real schema.

use verbum_core::{
  Language,
  StrongsNumber,
  align::{Aligner, EXACT_CONFIDENCE, REUSED_POSITION_CONFIDENCE},
  canon,
  parse,
  pipeline::AlignmentBuilder,
  record::{
    Alignment,
    CommentaryEntry,
    CrossReference,
    HitKind,
    LexiconEntry,
    SourceWord,
    Translation,
    Verse,
  },
  reference::VerseScope,
  resolve::{SearchScope, interlinear, resolve_passage, route_search, verse_text},
  store::ScriptureStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn verse(book: &str, chapter: u32, verse: u32, text: &str) -> Verse {
  Verse {
    translation_id: "KJV".into(),
    book: book.into(),
    chapter,
    verse,
    text: text.into(),
  }
}

fn word(
  book: &str,
  verse: u32,
  position: u32,
  gloss: Option<&str>,
  strong: &str,
) -> SourceWord {
  SourceWord {
    book: book.into(),
    chapter: 1,
    verse,
    position,
    original_text: None,
    transliteration: None,
    gloss: gloss.map(str::to_owned),
    strong_number: Some(strong.parse().unwrap()),
    grammar_code: None,
  }
}

fn lexicon(strong: &str, original: &str, definition: &str) -> LexiconEntry {
  let strong_number: StrongsNumber = strong.parse().unwrap();
  LexiconEntry {
    strong_number,
    language: strong_number.language,
    original: original.into(),
    transliteration: None,
    pronunciation: None,
    definition: definition.into(),
    extended_definition: None,
    derivation: None,
  }
}

fn xref(source_verse: u32, target: &str, chapter: u32, verse: u32) -> CrossReference {
  CrossReference {
    source_book: "John".into(),
    source_chapter: 3,
    source_verse,
    target_book: target.into(),
    target_chapter: chapter,
    target_verse: verse,
    target_book_order: canon::book_order(target).unwrap(),
    relationship_type: Some("cross-reference".into()),
    votes: Some(10),
  }
}

fn commentary(chapter: u32, start: u32, end: u32, content: &str) -> CommentaryEntry {
  CommentaryEntry {
    source: "Matthew Henry".into(),
    book: "John".into(),
    chapter,
    reference_start: start,
    reference_end: end,
    content: content.into(),
  }
}

const GEN_1_1: &str = "In the beginning God created the heaven and the earth.";
const GEN_1_2: &str = "And the earth was without form, and void; and darkness was upon the face \
                       of the deep. And the Spirit of God moved upon the face of the waters.";
const JOHN_1_1: &str =
  "In the beginning was the Word, and the Word was with God, and the Word was God.";
const JOHN_3_16: &str = "For God so loved the world, that he gave his only begotten Son, that \
                         whosoever believeth in him should not perish, but have everlasting life.";

/// Genesis 1:1-3 and John 1:1 with tagged source words, John 3:16-17,
/// lexicon, cross references and commentary. John is loaded first so
/// canonical ordering is observable.
async fn seeded() -> SqliteStore {
  let s = store().await;

  s.put_translation(Translation {
    id:               "KJV".into(),
    name:             "King James Version".into(),
    language:         "en".into(),
    is_public_domain: true,
    license_info:     None,
  })
  .await
  .unwrap();

  s.replace_verses("KJV", "John", vec![
    verse("John", 1, 1, JOHN_1_1),
    verse("John", 3, 16, JOHN_3_16),
    verse("John", 3, 17, "For God sent not his Son into the world to condemn the world."),
  ])
  .await
  .unwrap();
  s.replace_verses("KJV", "Genesis", vec![
    verse("Genesis", 1, 1, GEN_1_1),
    verse("Genesis", 1, 2, GEN_1_2),
    verse("Genesis", 1, 3, "And God said, Let there be light: and there was light."),
  ])
  .await
  .unwrap();

  s.replace_source_words("John", vec![
    word("John", 1, 1, Some("in"), "G1722"),
    word("John", 1, 2, Some("beginning"), "G746"),
    word("John", 1, 3, Some("was"), "G1510"),
    word("John", 1, 4, Some("the"), "G3588"),
    word("John", 1, 5, Some("Word"), "G3056"),
  ])
  .await
  .unwrap();

  s.replace_source_words("Genesis", vec![
    word("Genesis", 1, 1, Some("in beginning"), "H7225"),
    word("Genesis", 1, 2, Some("he created"), "H1254"),
    word("Genesis", 1, 3, Some("God"), "H430"),
    word("Genesis", 1, 4, Some("obj."), "H853"),
    word("Genesis", 1, 5, Some("the heavens"), "H8064"),
    word("Genesis", 1, 6, Some("and"), "H853"),
    word("Genesis", 1, 7, Some("the earth"), "H776"),
    word("Genesis", 2, 1, Some("and the earth"), "H776"),
    word("Genesis", 2, 2, Some("it was"), "H1961"),
    word("Genesis", 2, 3, Some("formless"), "H8414"),
    word("Genesis", 2, 4, Some("and void"), "H922"),
    word("Genesis", 2, 5, Some("and darkness"), "H2822"),
    word("Genesis", 2, 6, Some("on"), "H5921"),
    word("Genesis", 2, 7, Some("the face of"), "H6440"),
    word("Genesis", 2, 8, Some("the deep"), "H8415"),
    word("Genesis", 2, 9, Some("and the Spirit of"), "H7307"),
    word("Genesis", 2, 10, Some("God"), "H430"),
    word("Genesis", 2, 11, Some("hovering"), "H7363"),
    word("Genesis", 2, 12, Some("over"), "H5921"),
    word("Genesis", 2, 13, Some("the face of"), "H6440"),
    word("Genesis", 2, 14, Some("the waters"), "H4325"),
    word("Genesis", 3, 1, None, "H559"),
    word("Genesis", 3, 2, None, "H430"),
  ])
  .await
  .unwrap();

  s.replace_lexicon(Language::Hebrew, vec![
    lexicon("H430", "אֱלֹהִים", "gods in the ordinary sense; but specifically used of the supreme God"),
    lexicon("H7225", "רֵאשִׁית", "the first, in place, time, order or rank"),
  ])
  .await
  .unwrap();
  s.replace_lexicon(Language::Greek, vec![lexicon("G3056", "λόγος", "something said")])
    .await
    .unwrap();

  s.replace_cross_references(vec![
    xref(16, "Romans", 5, 8),
    xref(16, "Genesis", 22, 2),
    xref(17, "1 John", 4, 9),
    xref(16, "John", 1, 14),
    xref(16, "Romans", 5, 6),
    xref(3, "Titus", 3, 5),
  ])
  .await
  .unwrap();

  s.replace_commentary("Matthew Henry", "John", vec![
    commentary(3, 3, 5, "Nicodemus is taught the nature of the new birth."),
    commentary(3, 16, 16, "God so loved the world; here is the love of God in its height."),
    commentary(4, 1, 2, "The woman of Samaria."),
  ])
  .await
  .unwrap();

  s
}

async fn all_alignments(s: &SqliteStore) -> Vec<Alignment> {
  let mut out = Vec::new();
  for (book, chapter, v) in [("Genesis", 1, 1), ("Genesis", 1, 2), ("Genesis", 1, 3), ("John", 1, 1)] {
    out.extend(s.alignments("KJV", book, chapter, v).await.unwrap());
  }
  out
}

// ─── Corpus writes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_verses_is_wholesale_per_book() {
  let s = seeded().await;
  assert_eq!(s.chapter_verses("KJV", "Genesis", 1).await.unwrap().len(), 3);

  let written = s
    .replace_verses("KJV", "Genesis", vec![verse("Genesis", 1, 1, GEN_1_1)])
    .await
    .unwrap();
  assert_eq!(written, 1);
  assert_eq!(s.chapter_verses("KJV", "Genesis", 1).await.unwrap().len(), 1);
  // Other books are untouched.
  assert_eq!(s.chapter_verses("KJV", "John", 3).await.unwrap().len(), 2);
}

#[tokio::test]
async fn chapter_verses_are_in_verse_order() {
  let s = store().await;
  s.replace_verses("KJV", "Ruth", vec![
    verse("Ruth", 1, 3, "c"),
    verse("Ruth", 1, 1, "a"),
    verse("Ruth", 1, 2, "b"),
  ])
  .await
  .unwrap();
  let numbers: Vec<u32> = s
    .chapter_verses("KJV", "Ruth", 1)
    .await
    .unwrap()
    .iter()
    .map(|v| v.verse)
    .collect();
  assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn source_words_round_trip_strongs_numbers() {
  let s = seeded().await;
  let words = s.source_words("Genesis", 1, 1).await.unwrap();
  assert_eq!(words.len(), 7);
  assert_eq!(words[2].gloss.as_deref(), Some("God"));
  assert_eq!(words[2].strong_number.map(|n| n.to_string()).as_deref(), Some("H430"));
  assert!(words.windows(2).all(|w| w[0].position < w[1].position));
}

#[tokio::test]
async fn replace_source_words_drops_old_rows() {
  let s = seeded().await;
  s.replace_source_words("John", vec![word("John", 1, 1, Some("in"), "G1722")])
    .await
    .unwrap();
  assert_eq!(s.source_words("John", 1, 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_lexicon_is_per_language() {
  let s = seeded().await;
  let h430: StrongsNumber = "H430".parse().unwrap();
  let g3056: StrongsNumber = "G3056".parse().unwrap();

  let entry = s.lexicon_entry(h430).await.unwrap().unwrap();
  assert_eq!(entry.language, Language::Hebrew);
  assert!(entry.definition.contains("supreme God"));

  s.replace_lexicon(Language::Hebrew, vec![lexicon("H1254", "בָּרָא", "to create")])
    .await
    .unwrap();
  assert!(s.lexicon_entry(h430).await.unwrap().is_none());
  assert!(s.lexicon_entry(g3056).await.unwrap().is_some());
}

#[tokio::test]
async fn occurrences_are_in_canonical_order() {
  let s = seeded().await;
  let occurrences = s.occurrences("H430".parse().unwrap()).await.unwrap();
  let coords: Vec<_> = occurrences.iter().map(|o| (o.verse, o.position)).collect();
  assert_eq!(coords, vec![(1, 3), (2, 10), (3, 2)]);
}

// ─── Alignment pipeline ──────────────────────────────────────────────────────

#[tokio::test]
async fn build_aligns_genesis_one_one() {
  let s = seeded().await;
  let summary = AlignmentBuilder::default()
    .build(&s, "KJV", Some("Genesis"), None)
    .await
    .unwrap();
  assert_eq!(summary.verses, 3);
  assert_eq!(summary.verses_without_glosses, 1);
  assert_eq!(summary.written, summary.candidates);
  assert_eq!(summary.total, s.alignment_count("KJV").await.unwrap());
  assert!(summary.total > 0);

  let rows = s.alignments("KJV", "Genesis", 1, 1).await.unwrap();
  let pairs: Vec<_> = rows
    .iter()
    .map(|a| (a.target_position, a.target_word.as_str(), a.source_position))
    .collect();
  assert_eq!(pairs, vec![
    (3, "beginning", 1),
    (4, "God", 3),
    (5, "created", 2),
    (7, "heaven", 5),
    (10, "earth", 7),
  ]);
}

#[tokio::test]
async fn alignment_rows_satisfy_confidence_and_reference_invariants() {
  let s = seeded().await;
  AlignmentBuilder::default().build(&s, "KJV", None, None).await.unwrap();

  let rows = all_alignments(&s).await;
  assert!(!rows.is_empty());
  for a in &rows {
    assert!(
      a.confidence == EXACT_CONFIDENCE || a.confidence == REUSED_POSITION_CONFIDENCE,
      "unexpected confidence {}",
      a.confidence
    );
    let words = s.source_words(&a.book, a.chapter, a.verse).await.unwrap();
    assert!(words.iter().any(|w| w.position == a.source_position));
  }
  // "Word" appears three times in John 1:1 against a single gloss.
  let john = s.alignments("KJV", "John", 1, 1).await.unwrap();
  let word_rows: Vec<_> = john.iter().filter(|a| a.target_word == "Word").collect();
  assert_eq!(word_rows.len(), 3);
  assert_eq!(word_rows[0].confidence, EXACT_CONFIDENCE);
  assert!(word_rows[1..].iter().all(|a| a.confidence == REUSED_POSITION_CONFIDENCE));
}

#[tokio::test]
async fn rebuilding_is_idempotent() {
  let s = seeded().await;
  let builder = AlignmentBuilder::default();

  builder.build(&s, "KJV", None, None).await.unwrap();
  let first = all_alignments(&s).await;
  let first_count = s.alignment_count("KJV").await.unwrap();

  builder.build(&s, "KJV", None, None).await.unwrap();
  let second = all_alignments(&s).await;

  assert_eq!(first, second);
  assert_eq!(s.alignment_count("KJV").await.unwrap(), first_count);
  assert_eq!(first_count, first.len());
}

#[tokio::test]
async fn batch_size_does_not_change_the_result() {
  let a = seeded().await;
  let b = seeded().await;
  AlignmentBuilder::new(1, Aligner::default()).build(&a, "KJV", None, None).await.unwrap();
  AlignmentBuilder::new(1000, Aligner::default()).build(&b, "KJV", None, None).await.unwrap();
  assert_eq!(all_alignments(&a).await, all_alignments(&b).await);
}

#[tokio::test]
async fn upsert_skips_rows_without_a_source_word() {
  let s = seeded().await;
  let written = s
    .upsert_alignments(vec![Alignment {
      translation_id:  "KJV".into(),
      book:            "Genesis".into(),
      chapter:         1,
      verse:           1,
      target_position: 4,
      target_word:     "God".into(),
      source_position: 99,
      confidence:      EXACT_CONFIDENCE,
    }])
    .await
    .unwrap();
  assert_eq!(written, 0);
  assert_eq!(s.alignment_count("KJV").await.unwrap(), 0);
}

#[tokio::test]
async fn alignment_targets_follow_canonical_order() {
  let s = seeded().await;

  let all = s.alignment_targets("KJV", None, None).await.unwrap();
  let coords: Vec<_> = all.iter().map(|v| (v.book.as_str(), v.chapter, v.verse)).collect();
  // John 3 has no source words and is not a target.
  assert_eq!(coords, vec![
    ("Genesis", 1, 1),
    ("Genesis", 1, 2),
    ("Genesis", 1, 3),
    ("John", 1, 1),
  ]);

  let limited = s.alignment_targets("KJV", None, Some(2)).await.unwrap();
  assert_eq!(limited.len(), 2);
  assert_eq!(limited[1].verse, 2);

  let john = s.alignment_targets("KJV", Some("John"), None).await.unwrap();
  assert_eq!(john.len(), 1);
}

// ─── Cross references & commentary ───────────────────────────────────────────

#[tokio::test]
async fn cross_references_are_ordered_by_target() {
  let s = seeded().await;
  let refs = s
    .cross_references("John", 3, VerseScope::Verses { start: 16, end: 16 })
    .await
    .unwrap();
  let targets: Vec<_> = refs
    .iter()
    .map(|r| (r.target_book.as_str(), r.target_chapter, r.target_verse))
    .collect();
  assert_eq!(targets, vec![
    ("Genesis", 22, 2),
    ("John", 1, 14),
    ("Romans", 5, 6),
    ("Romans", 5, 8),
  ]);
  assert!(refs.windows(2).all(|w| w[0].target_key() < w[1].target_key()));
}

#[tokio::test]
async fn chapter_scope_cross_references_cover_every_verse() {
  let s = seeded().await;
  let refs = s.cross_references("John", 3, VerseScope::Chapter).await.unwrap();
  assert_eq!(refs.len(), 6);
  assert_eq!(refs.last().map(|r| r.target_book.as_str()), Some("1 John"));
}

#[tokio::test]
async fn commentary_overlap_rule() {
  let s = seeded().await;
  let starts = |entries: Vec<CommentaryEntry>| -> Vec<u32> {
    entries.iter().map(|e| e.reference_start).collect()
  };

  let hit = |start, end| VerseScope::Verses { start, end };
  assert_eq!(starts(s.commentary("John", 3, hit(4, 4)).await.unwrap()), vec![3]);
  assert_eq!(starts(s.commentary("John", 3, hit(1, 3)).await.unwrap()), vec![3]);
  assert!(s.commentary("John", 3, hit(6, 9)).await.unwrap().is_empty());
  assert_eq!(
    starts(s.commentary("John", 3, VerseScope::Chapter).await.unwrap()),
    vec![3, 16]
  );
}

#[tokio::test]
async fn replace_commentary_is_per_source_and_book() {
  let s = seeded().await;
  s.replace_commentary("Adam Clarke", "John", vec![CommentaryEntry {
    source: "Adam Clarke".into(),
    ..commentary(3, 16, 17, "For God so loved the world.")
  }])
  .await
  .unwrap();
  assert_eq!(s.commentary("John", 3, VerseScope::Chapter).await.unwrap().len(), 3);

  s.replace_commentary("Matthew Henry", "John", vec![]).await.unwrap();
  let left = s.commentary("John", 3, VerseScope::Chapter).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].source, "Adam Clarke");
}

// ─── Resolver ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_single_verse_passage() {
  let s = seeded().await;
  let reference = parse("Jn 3:16").unwrap();
  let passage = resolve_passage(&s, "KJV", &reference).await.unwrap().unwrap();

  assert_eq!(passage.reference.book, "John");
  assert_eq!(passage.verses.len(), 2, "the whole chapter is returned");
  assert_eq!(passage.highlighted, vec![16]);
  assert_eq!(passage.cross_references.len(), 4);
  assert_eq!(passage.commentary.len(), 1);
  assert_eq!(passage.commentary[0].reference_start, 16);
}

#[tokio::test]
async fn resolve_chapter_passage() {
  let s = seeded().await;
  let passage = resolve_passage(&s, "KJV", &parse("John 3").unwrap())
    .await
    .unwrap()
    .unwrap();
  assert!(passage.highlighted.is_empty());
  assert_eq!(passage.commentary.len(), 2);
  assert_eq!(passage.cross_references.len(), 6);
}

#[tokio::test]
async fn open_ended_range_highlights_only_existing_verses() {
  let s = seeded().await;
  let reference = parse("John 3:1-4294967295").unwrap();
  let passage = resolve_passage(&s, "KJV", &reference).await.unwrap().unwrap();
  assert_eq!(passage.highlighted, vec![16, 17]);
  assert_eq!(passage.cross_references.len(), 6);
  assert_eq!(passage.commentary.len(), 2);
}

#[tokio::test]
async fn inverted_range_selects_nothing() {
  let s = seeded().await;
  // Commentary on 3-5 would pass the literal overlap test for 5-4.
  let passage = resolve_passage(&s, "KJV", &parse("John 3:5-4").unwrap())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(passage.verses.len(), 2);
  assert!(passage.highlighted.is_empty());
  assert!(passage.cross_references.is_empty());
  assert!(passage.commentary.is_empty());
}

#[tokio::test]
async fn missing_chapter_resolves_to_none() {
  let s = seeded().await;
  assert!(resolve_passage(&s, "KJV", &parse("John 5").unwrap()).await.unwrap().is_none());
  assert!(resolve_passage(&s, "WEB", &parse("John 3").unwrap()).await.unwrap().is_none());
}

#[tokio::test]
async fn verse_text_uses_first_selected_verse() {
  let s = seeded().await;
  let v = verse_text(&s, "KJV", &parse("John 3:17-18").unwrap()).await.unwrap().unwrap();
  assert_eq!(v.verse, 17);
  let chapter = verse_text(&s, "KJV", &parse("Genesis 1").unwrap()).await.unwrap().unwrap();
  assert_eq!(chapter.text, GEN_1_1);
}

#[tokio::test]
async fn interlinear_joins_lexicon_and_respects_scope() {
  let s = seeded().await;
  let words = interlinear(&s, &parse("Gen 1:2").unwrap()).await.unwrap();
  assert_eq!(words.len(), 14);
  assert!(words.iter().all(|w| w.word.verse == 2));

  let god = &words[9];
  assert_eq!(god.word.gloss.as_deref(), Some("God"));
  assert_eq!(god.entry.as_ref().map(|e| e.original.as_str()), Some("אֱלֹהִים"));
  assert!(words[0].entry.is_none());

  let chapter = interlinear(&s, &parse("Genesis 1").unwrap()).await.unwrap();
  assert_eq!(chapter.len(), 23);
}

// ─── Search routing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn lexical_id_query_returns_word_info() {
  let s = seeded().await;
  let results = route_search(&s, "KJV", "h0430", SearchScope::All, 20).await.unwrap();
  assert!(results.hits.is_empty());

  let info = results.word_info.unwrap();
  assert_eq!(info.strong_number.to_string(), "H430");
  assert_eq!(info.count, 3);
  assert!(info.entry.is_some());
}

#[tokio::test]
async fn grammatical_marker_query_has_no_word_info() {
  let s = seeded().await;
  let results = route_search(&s, "KJV", "H9003", SearchScope::All, 20).await.unwrap();
  assert!(results.word_info.is_none());
  assert!(results.hits.is_empty());
}

#[tokio::test]
async fn full_text_search_highlights_matches() {
  let s = seeded().await;
  let results = route_search(&s, "KJV", "beginning", SearchScope::Bible, 20).await.unwrap();
  assert_eq!(results.hits.len(), 2);
  assert!(results.hits.iter().all(|h| h.kind == HitKind::Verse));
  assert!(results.hits.iter().all(|h| h.snippet.contains("<mark>beginning</mark>")));
}

#[tokio::test]
async fn book_and_testament_scopes_narrow_verse_hits() {
  let s = seeded().await;
  let search = |scope: &str| {
    let scope: SearchScope = scope.parse().unwrap();
    let s = s.clone();
    async move { route_search(&s, "KJV", "beginning", scope, 20).await.unwrap() }
  };

  let john = search("book:jhn").await;
  assert_eq!(john.hits.len(), 1);
  assert_eq!(john.hits[0].book, "John");

  let ot = search("ot").await;
  assert_eq!(ot.hits.len(), 1);
  assert_eq!(ot.hits[0].book, "Genesis");

  let nt = search("nt").await;
  assert_eq!(nt.hits.len(), 1);
  assert_eq!(nt.hits[0].book, "John");
}

#[tokio::test]
async fn commentary_scope_searches_commentary_only() {
  let s = seeded().await;
  let commentary = route_search(&s, "KJV", "loved", SearchScope::Commentary, 20).await.unwrap();
  assert_eq!(commentary.hits.len(), 1);
  assert_eq!(commentary.hits[0].kind, HitKind::Commentary);
  assert_eq!(commentary.hits[0].source.as_deref(), Some("Matthew Henry"));

  let all = route_search(&s, "KJV", "loved", SearchScope::All, 20).await.unwrap();
  assert_eq!(all.hits.len(), 2);
}

#[tokio::test]
async fn multi_word_query_matches_a_prefix() {
  let s = seeded().await;
  let results = route_search(&s, "KJV", "in the begin", SearchScope::OldTestament, 20)
    .await
    .unwrap();
  assert_eq!(results.hits.len(), 1);
  assert_eq!(results.hits[0].verse, Some(1));
}

#[tokio::test]
async fn short_queries_return_nothing() {
  let s = seeded().await;
  let results = route_search(&s, "KJV", " a ", SearchScope::All, 20).await.unwrap();
  assert!(results.hits.is_empty());
  assert!(results.word_info.is_none());
}
