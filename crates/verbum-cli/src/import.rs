//! Importers: read or fetch a corpus, parse it and replace it in the store.
//!
//! A document that cannot be fetched or read as a whole is logged, counted
//! and skipped, and whatever the store already holds for it is left alone.
//! Malformed rows inside a readable document are logged and counted; the
//! rest of the document is imported.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use verbum_core::{
  Language,
  canon::{self, Book},
  record::{CommentaryEntry, SourceWord, Translation},
  store::ScriptureStore,
};
use verbum_corpus::{Parsed, helloao, openbible, step, strongs, translation};

use crate::{fetch::Fetcher, settings::Sources};

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Counts reported at the end of every import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
  pub imported:       usize,
  pub skipped:        usize,
  pub malformed:      usize,
  pub fetch_failures: usize,
}

impl ImportSummary {
  fn absorb<T>(&mut self, origin: &str, parsed: &Parsed<T>) {
    self.skipped += parsed.skipped;
    self.malformed += parsed.malformed();
    for reject in &parsed.rejects {
      tracing::warn!(origin, line = reject.line, error = %reject.error, "malformed record");
    }
  }

  fn unreadable(&mut self, origin: &str, error: &verbum_corpus::Error) {
    self.malformed += 1;
    tracing::warn!(origin, %error, "unreadable document, skipping");
  }

  fn fetch_failed(&mut self, origin: &str, error: &anyhow::Error) {
    self.fetch_failures += 1;
    tracing::warn!(origin, error = %format!("{error:#}"), "fetch failed, skipping");
  }

  pub fn log(&self, corpus: &str) {
    tracing::info!(
      corpus,
      imported = self.imported,
      skipped = self.skipped,
      malformed = self.malformed,
      fetch_failures = self.fetch_failures,
      "import finished"
    );
  }
}

async fn read_local(path: &Path) -> Result<String> {
  tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("reading {}", path.display()))
}

// ─── Verses ──────────────────────────────────────────────────────────────────

/// Import chapters-JSON files for `books`, from `dir` when given, otherwise
/// from `base_url`.
pub async fn verses<S: ScriptureStore>(
  store: &S,
  fetcher: &Fetcher,
  base_url: &str,
  meta: Translation,
  books: &[&'static Book],
  dir: Option<&Path>,
) -> Result<ImportSummary> {
  let mut summary = ImportSummary::default();
  let id = meta.id.clone();
  store.put_translation(meta).await?;

  for book in books {
    let file_name = translation::file_name(book.name);
    let (origin, body) = match dir {
      Some(dir) => {
        let path = dir.join(&file_name);
        (path.display().to_string(), read_local(&path).await)
      }
      None => {
        let url = format!("{}/{file_name}", base_url.trim_end_matches('/'));
        let body = fetcher.text(&url).await;
        (url, body)
      }
    };

    let body = match body {
      Ok(body) => body,
      Err(error) => {
        summary.fetch_failed(&origin, &error);
        continue;
      }
    };

    let parsed = match translation::parse(&body, &id, book.name) {
      Ok(parsed) => parsed,
      Err(error) => {
        summary.unreadable(&origin, &error);
        continue;
      }
    };
    summary.absorb(&origin, &parsed);

    let written = store.replace_verses(&id, book.name, parsed.records).await?;
    tracing::debug!(book = book.name, written, "verses replaced");
    summary.imported += written;
  }

  Ok(summary)
}

// ─── Source words ────────────────────────────────────────────────────────────

/// Import STEPBible TAHOT/TAGNT files. Each book found is replaced as a
/// whole.
pub async fn source_words<S: ScriptureStore>(
  store: &S,
  files: &[PathBuf],
  book: Option<&'static Book>,
) -> Result<ImportSummary> {
  let mut summary = ImportSummary::default();
  let mut by_book: BTreeMap<u8, (&'static str, Vec<SourceWord>)> = BTreeMap::new();

  for path in files {
    let body = match read_local(path).await {
      Ok(body) => body,
      Err(error) => {
        summary.fetch_failed(&path.display().to_string(), &error);
        continue;
      }
    };
    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let language = step::language_for_file(&file_name);
    tracing::info!(file = %path.display(), %language, "parsing tagged text");

    let parsed = step::parse(&body, language, book.map(|b| b.name));
    summary.absorb(&path.display().to_string(), &parsed);

    for word in parsed.records {
      let Some(entry) = canon::lookup(&word.book) else {
        continue;
      };
      by_book
        .entry(entry.order)
        .or_insert_with(|| (entry.name, Vec::new()))
        .1
        .push(word);
    }
  }

  for (name, words) in by_book.into_values() {
    let written = store.replace_source_words(name, words).await?;
    tracing::debug!(book = name, written, "source words replaced");
    summary.imported += written;
  }

  Ok(summary)
}

// ─── Cross references ────────────────────────────────────────────────────────

/// Replace the cross-reference set with an OpenBible TSV export.
pub async fn cross_references<S: ScriptureStore>(
  store: &S,
  file: &Path,
  min_votes: i64,
) -> Result<ImportSummary> {
  let mut summary = ImportSummary::default();
  let origin = file.display().to_string();
  let body = match read_local(file).await {
    Ok(body) => body,
    Err(error) => {
      summary.fetch_failed(&origin, &error);
      return Ok(summary);
    }
  };

  let parsed = openbible::parse(&body, min_votes);
  summary.absorb(&origin, &parsed);
  summary.imported = store.replace_cross_references(parsed.records).await?;

  Ok(summary)
}

// ─── Lexicon ─────────────────────────────────────────────────────────────────

/// Import Strong's dictionaries for `languages`, from `file` when given
/// (single language only), otherwise from the configured URLs.
pub async fn lexicon<S: ScriptureStore>(
  store: &S,
  fetcher: &Fetcher,
  sources: &Sources,
  languages: &[Language],
  file: Option<&Path>,
) -> Result<ImportSummary> {
  let mut summary = ImportSummary::default();

  for &language in languages {
    let (origin, body) = match file {
      Some(path) => (path.display().to_string(), read_local(path).await),
      None => {
        let url = match language {
          Language::Hebrew => &sources.lexicon_hebrew_url,
          Language::Greek => &sources.lexicon_greek_url,
        };
        (url.clone(), fetcher.text(url).await)
      }
    };

    let body = match body {
      Ok(body) => body,
      Err(error) => {
        summary.fetch_failed(&origin, &error);
        continue;
      }
    };

    let parsed = match strongs::parse(&body, language) {
      Ok(parsed) => parsed,
      Err(error) => {
        summary.unreadable(&origin, &error);
        continue;
      }
    };
    summary.absorb(&origin, &parsed);

    let written = store.replace_lexicon(language, parsed.records).await?;
    tracing::info!(%language, written, "lexicon replaced");
    summary.imported += written;
  }

  Ok(summary)
}

// ─── Commentary ──────────────────────────────────────────────────────────────

/// Import HelloAO commentaries chapter by chapter, pausing between
/// requests. A book is only replaced if at least one of its chapters was
/// fetched.
pub async fn commentary<S: ScriptureStore>(
  store: &S,
  fetcher: &Fetcher,
  api_base: &str,
  commentaries: &[String],
  book: Option<&'static Book>,
) -> Result<ImportSummary> {
  let mut summary = ImportSummary::default();
  let api_base = api_base.trim_end_matches('/');

  for id in commentaries {
    let source = helloao::source_name(id);
    let books_url = format!("{api_base}/{id}/books.json");

    let listings = match fetcher.text(&books_url).await {
      Ok(body) => match helloao::parse_books(&body) {
        Ok(parsed) => {
          summary.absorb(&books_url, &parsed);
          parsed.records
        }
        Err(error) => {
          summary.unreadable(&books_url, &error);
          continue;
        }
      },
      Err(error) => {
        summary.fetch_failed(&books_url, &error);
        continue;
      }
    };

    for listing in listings {
      if book.is_some_and(|b| b.name != listing.book) {
        continue;
      }
      tracing::info!(source, book = listing.book, chapters = listing.chapters, "importing commentary");

      let mut entries: Vec<CommentaryEntry> = Vec::new();
      let mut fetched = 0usize;
      for chapter in 1..=listing.chapters {
        fetcher.pause().await;
        let url = format!("{api_base}/{id}/{}/{chapter}.json", listing.id);
        let body = match fetcher.text(&url).await {
          Ok(body) => body,
          Err(error) => {
            summary.fetch_failed(&url, &error);
            continue;
          }
        };
        match helloao::parse_chapter(&body, source, listing.book, chapter) {
          Ok(parsed) => {
            fetched += 1;
            summary.absorb(&url, &parsed);
            entries.extend(parsed.records);
          }
          Err(error) => summary.unreadable(&url, &error),
        }
      }

      if fetched == 0 {
        continue;
      }
      let written = store.replace_commentary(source, listing.book, entries).await?;
      tracing::debug!(source, book = listing.book, written, "commentary replaced");
      summary.imported += written;
    }
  }

  Ok(summary)
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
  };
  use verbum_core::{
    StrongsNumber,
    VerseScope,
    record::{CrossReference, LexiconEntry, Verse},
  };
  use verbum_corpus::Reject;
  use verbum_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.expect("in-memory store")
  }

  fn fetcher() -> Fetcher {
    Fetcher::new(Duration::from_secs(5), Duration::ZERO).expect("http client")
  }

  fn book(name: &str) -> &'static Book { canon::lookup(name).expect("canonical book") }

  fn kjv() -> Translation {
    Translation {
      id:               "KJV".into(),
      name:             "King James Version".into(),
      language:         "en".into(),
      is_public_domain: true,
      license_info:     None,
    }
  }

  fn verse(book: &str, chapter: u32, verse: u32, text: &str) -> Verse {
    Verse {
      translation_id: "KJV".into(),
      book: book.into(),
      chapter,
      verse,
      text: text.into(),
    }
  }

  /// Serve `routes` as JSON over HTTP/1.1; every other path is a 404.
  async fn serve(routes: Vec<(String, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
      while let Ok((mut socket, _)) = listener.accept().await {
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await.unwrap_or(0);
        let request = String::from_utf8_lossy(&buf[..n]);
        let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
        let response = match routes.iter().find(|(p, _)| *p == path) {
          Some((_, body)) => format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
          ),
          None => "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string(),
        };
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
      }
    });
    format!("http://{addr}")
  }

  #[test]
  fn absorb_accumulates_counts() {
    let mut summary = ImportSummary::default();
    let parsed: Parsed<()> = Parsed {
      records: vec![(), ()],
      skipped: 3,
      rejects: vec![Reject {
        line:  7,
        error: verbum_corpus::Error::UnknownBook("Xyz".into()),
      }],
    };
    summary.absorb("test", &parsed);
    summary.absorb("test", &parsed);
    assert_eq!(summary, ImportSummary {
      imported:       0,
      skipped:        6,
      malformed:      2,
      fetch_failures: 0,
    });
  }

  #[tokio::test]
  async fn missing_book_files_are_counted_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join("Genesis.json"),
      r#"{"chapters":[{"chapter":"1","verses":[
        {"verse":"1","text":"In the beginning God created the heaven and the earth."},
        {"verse":2,"text":"And the earth was without form, and void."}]}]}"#,
    )
    .unwrap();

    let s = store().await;
    s.put_translation(kjv()).await.unwrap();
    s.replace_verses("KJV", "Exodus", vec![verse("Exodus", 1, 1, "Now these are the names.")])
      .await
      .unwrap();

    let books = [book("Genesis"), book("Exodus"), book("John")];
    let summary = verses(&s, &fetcher(), "http://unused", kjv(), &books, Some(dir.path()))
      .await
      .unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.fetch_failures, 2);
    assert_eq!(summary.malformed, 0);
    assert_eq!(s.chapter_verses("KJV", "Genesis", 1).await.unwrap().len(), 2);
    // Books that could not be read keep what the store already held.
    assert_eq!(s.chapter_verses("KJV", "Exodus", 1).await.unwrap().len(), 1);
    assert!(s.chapter_verses("KJV", "John", 1).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unreadable_step_file_does_not_discard_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("TAHOT Gen-Deu.txt");
    std::fs::write(
      &good,
      "Gen.1.1#01=L\tבְּ/רֵאשִׁ֖ית\tbe./re.Shit\tin/ beginning\tH9003/{H7225G}\tHR/Ncfsa\n",
    )
    .unwrap();
    let missing = dir.path().join("TAHOT Jos-Est.txt");

    let s = store().await;
    let summary = source_words(&s, &[good, missing], None).await.unwrap();

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.fetch_failures, 1);
    let words = s.source_words("Genesis", 1, 1).await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].gloss.as_deref(), Some("in beginning"));
  }

  #[tokio::test]
  async fn missing_cross_reference_file_keeps_existing_links() {
    let s = store().await;
    s.replace_cross_references(vec![CrossReference {
      source_book:       "John".into(),
      source_chapter:    3,
      source_verse:      16,
      target_book:       "Romans".into(),
      target_chapter:    5,
      target_verse:      8,
      target_book_order: 45,
      relationship_type: None,
      votes:             Some(120),
    }])
    .await
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let summary = cross_references(&s, &dir.path().join("cross_references.txt"), 10)
      .await
      .unwrap();

    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.imported, 0);
    let links = s.cross_references("John", 3, VerseScope::Chapter).await.unwrap();
    assert_eq!(links.len(), 1);
  }

  #[tokio::test]
  async fn unreadable_lexicon_document_keeps_existing_entries() {
    let strong = StrongsNumber::new(Language::Hebrew, 430);
    let s = store().await;
    s.replace_lexicon(Language::Hebrew, vec![LexiconEntry {
      strong_number:       strong,
      language:            Language::Hebrew,
      original:            "אֱלֹהִים".into(),
      transliteration:     None,
      pronunciation:       None,
      definition:          "God".into(),
      extended_definition: None,
      derivation:          None,
    }])
    .await
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("strongs-hebrew.json");
    std::fs::write(&file, "var strongsHebrewDictionary = {").unwrap();

    let summary = lexicon(&s, &fetcher(), &Sources::default(), &[Language::Hebrew], Some(&file))
      .await
      .unwrap();

    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.imported, 0);
    assert!(s.lexicon_entry(strong).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn commentary_book_with_no_fetched_chapter_is_left_alone() {
    let s = store().await;
    s.replace_commentary("Matthew Henry", "John", vec![CommentaryEntry {
      source:          "Matthew Henry".into(),
      book:            "John".into(),
      chapter:         3,
      reference_start: 16,
      reference_end:   16,
      content:         "God so loved the world.".into(),
    }])
    .await
    .unwrap();

    let base = serve(vec![(
      "/matthew-henry/books.json".to_string(),
      r#"{"books":[{"id":"JHN","commonName":"John","numberOfChapters":2}]}"#.to_string(),
    )])
    .await;

    let summary = commentary(&s, &fetcher(), &base, &["matthew-henry".to_string()], None)
      .await
      .unwrap();

    assert_eq!(summary.fetch_failures, 2);
    assert_eq!(summary.imported, 0);
    assert_eq!(s.commentary("John", 3, VerseScope::Chapter).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn commentary_chapters_replace_the_book() {
    let s = store().await;
    let chapter = r#"{"chapter":{"content":[
      {"type":"heading","content":["Introduction"]},
      {"type":"verse","number":1,"content":["In the beginning was the Word."]},
      {"type":"verse","number":"2-3","content":["The same was in the beginning with God."]}]}}"#;
    let base = serve(vec![
      (
        "/matthew-henry/books.json".to_string(),
        r#"{"books":[{"id":"JHN","commonName":"John","numberOfChapters":2}]}"#.to_string(),
      ),
      ("/matthew-henry/JHN/1.json".to_string(), chapter.to_string()),
    ])
    .await;

    let summary = commentary(&s, &fetcher(), &base, &["matthew-henry".to_string()], None)
      .await
      .unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.fetch_failures, 1);
    let notes = s.commentary("John", 1, VerseScope::Chapter).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!((notes[1].reference_start, notes[1].reference_end), (2, 3));
  }

  #[tokio::test]
  async fn unreachable_commentary_api_is_a_counted_failure() {
    let s = store().await;
    let summary = commentary(&s, &fetcher(), "http://127.0.0.1:1", &["john-gill".to_string()], None)
      .await
      .unwrap();
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.imported, 0);
  }
}
