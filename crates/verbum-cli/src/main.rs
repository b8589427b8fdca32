//! `verbum`: import Scripture corpora, build alignments and query them.
//!
//! # Usage
//!
//! ```text
//! verbum import verses --translation KJV
//! verbum import source-words TAHOT_Gen-Deu.txt TAGNT_Mat-Jhn.txt
//! verbum import cross-refs cross_references.txt --min-votes 10
//! verbum import lexicon
//! verbum import commentary --commentary matthew-henry --book John
//! verbum align --book Genesis
//! verbum passage "John 3:16"
//! verbum search "love one another" --scope nt
//! verbum word G26
//! ```
//!
//! Settings come from `verbum.toml` (or `--config`) and `VERBUM_*`
//! environment variables; see [`settings::Settings`].

mod fetch;
mod import;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use fetch::Fetcher;
use serde::Serialize;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use verbum_core::{
  Language,
  StrongsNumber,
  align::Aligner,
  canon::{self, BOOKS, Book},
  canonicalize,
  pipeline::AlignmentBuilder,
  record::Translation,
  resolve::{self, SearchScope},
};
use verbum_corpus::{helloao, openbible};
use verbum_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "verbum", version, about = "Scripture references, alignments and study data")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "verbum.toml", global = true)]
  config: PathBuf,

  /// SQLite store to use instead of the configured `store_path`.
  #[arg(long, value_name = "FILE", global = true)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load a corpus into the store, replacing what it held before.
  #[command(subcommand)]
  Import(ImportCommand),

  /// Build gloss-based word alignments for a translation.
  Align {
    #[arg(short, long)]
    translation: Option<String>,
    /// Restrict the build to one book.
    #[arg(short, long)]
    book:        Option<String>,
    /// Stop after this many verses.
    #[arg(long)]
    limit:       Option<usize>,
    #[arg(long)]
    batch_size:  Option<usize>,
  },

  /// Parse a reference and print its canonical form.
  Resolve { reference: String },

  /// Normalize a raw Strong's identifier.
  Canonicalize {
    raw:      String,
    /// Language assumed for bare digits.
    #[arg(short, long, default_value = "hebrew")]
    language: Language,
  },

  /// Print a chapter around a reference with cross references and commentary.
  Passage {
    reference:   String,
    #[arg(short, long)]
    translation: Option<String>,
  },

  /// Print the first verse of a reference.
  Verse {
    reference:   String,
    #[arg(short, long)]
    translation: Option<String>,
  },

  /// Print the tagged source words of a reference with their lexicon entries.
  Interlinear { reference: String },

  /// Full-text search, or a word lookup for a Strong's number such as `G26`.
  Search {
    query:       String,
    /// all, bible, commentary, ot, nt or book:<Name>.
    #[arg(short, long, default_value = "all")]
    scope:       SearchScope,
    #[arg(short, long, default_value_t = 20)]
    limit:       usize,
    #[arg(short, long)]
    translation: Option<String>,
  },

  /// Lexicon entry and every occurrence of a Strong's number.
  Word { strong_number: StrongsNumber },
}

#[derive(Subcommand, Debug)]
enum ImportCommand {
  /// Chapters-JSON translation files, one per book.
  Verses {
    #[arg(short, long)]
    translation: Option<String>,
    /// Display name of the translation.
    #[arg(long)]
    name:        Option<String>,
    /// ISO 639-1 code of the translation language.
    #[arg(long, default_value = "en")]
    language:    String,
    /// Import only these books (repeatable).
    #[arg(short, long)]
    book:        Vec<String>,
    /// Read `<Book>.json` files from this directory instead of fetching.
    #[arg(long, value_name = "DIR")]
    dir:         Option<PathBuf>,
  },

  /// STEPBible TAHOT/TAGNT tagged text files.
  SourceWords {
    #[arg(required = true)]
    files: Vec<PathBuf>,
    #[arg(short, long)]
    book:  Option<String>,
  },

  /// OpenBible.info cross-reference TSV.
  CrossRefs {
    file:      PathBuf,
    #[arg(long, default_value_t = openbible::DEFAULT_MIN_VOTES, allow_negative_numbers = true)]
    min_votes: i64,
  },

  /// Strong's Hebrew and Greek dictionaries.
  Lexicon {
    /// Import one language only.
    #[arg(short, long)]
    language: Option<Language>,
    /// Read the dictionary from a local file.
    #[arg(long, value_name = "FILE", requires = "language")]
    file:     Option<PathBuf>,
  },

  /// HelloAO commentaries.
  Commentary {
    /// Commentary id (repeatable).
    #[arg(long, default_value = "matthew-henry")]
    commentary: Vec<String>,
    #[arg(short, long)]
    book:       Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = cli.store {
    settings.store_path = store;
  }

  // Commands that never touch the store.
  match &cli.command {
    Command::Resolve { reference } => {
      let reference = verbum_core::parse(reference)?;
      if !reference.is_canonical() {
        tracing::warn!(book = %reference.book, "book is not in the canon");
      }
      return print_json(&reference);
    }
    Command::Canonicalize { raw, language } => {
      let strong_number =
        canonicalize(raw, *language).ok_or_else(|| anyhow!("{raw:?} is not a lexical Strong's number"))?;
      println!("{strong_number}");
      return Ok(());
    }
    _ => {}
  }

  let store = open_store(&settings).await?;
  run(cli.command, &settings, &store).await
}

async fn open_store(settings: &Settings) -> Result<SqliteStore> {
  let path = &settings.store_path;
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

async fn run(command: Command, settings: &Settings, store: &SqliteStore) -> Result<()> {
  let translation_or_default =
    |t: Option<String>| t.unwrap_or_else(|| settings.default_translation.clone());

  match command {
    Command::Import(cmd) => run_import(cmd, settings, store).await,

    Command::Align { translation, book, limit, batch_size } => {
      let translation = translation_or_default(translation);
      let book = book.as_deref().map(lookup_book).transpose()?;
      let builder =
        AlignmentBuilder::new(batch_size.unwrap_or(settings.batch_size), Aligner::default());

      let summary = builder
        .build(store, &translation, book.map(|b| b.name), limit)
        .await?;
      print_json(&summary)
    }

    Command::Passage { reference, translation } => {
      let translation = translation_or_default(translation);
      let reference = verbum_core::parse(&reference)?;
      match resolve::resolve_passage(store, &translation, &reference).await? {
        Some(passage) => print_json(&passage),
        None => bail!("{reference} not found in {translation}"),
      }
    }

    Command::Verse { reference, translation } => {
      let translation = translation_or_default(translation);
      let reference = verbum_core::parse(&reference)?;
      match resolve::verse_text(store, &translation, &reference).await? {
        Some(verse) => print_json(&verse),
        None => bail!("{reference} not found in {translation}"),
      }
    }

    Command::Interlinear { reference } => {
      let reference = verbum_core::parse(&reference)?;
      print_json(&resolve::interlinear(store, &reference).await?)
    }

    Command::Search { query, scope, limit, translation } => {
      let translation = translation_or_default(translation);
      let results = resolve::route_search(store, &translation, &query, scope, limit).await?;
      print_json(&results)
    }

    Command::Word { strong_number } => {
      print_json(&resolve::word_info(store, strong_number).await?)
    }

    Command::Resolve { .. } | Command::Canonicalize { .. } => Ok(()),
  }
}

async fn run_import(command: ImportCommand, settings: &Settings, store: &SqliteStore) -> Result<()> {
  let fetcher = Fetcher::new(
    Duration::from_secs(settings.fetch_timeout_secs),
    Duration::from_millis(settings.request_delay_ms),
  )?;

  let (corpus, summary) = match command {
    ImportCommand::Verses { translation, name, language, book, dir } => {
      let id = translation.unwrap_or_else(|| settings.default_translation.clone());
      let meta = Translation {
        name: name.unwrap_or_else(|| default_translation_name(&id)),
        id,
        language,
        is_public_domain: true,
        license_info: None,
      };
      let books = if book.is_empty() {
        BOOKS.iter().collect()
      } else {
        book.iter().map(|b| lookup_book(b)).collect::<Result<Vec<_>>>()?
      };
      let summary = import::verses(
        store,
        &fetcher,
        &settings.sources.kjv_base_url,
        meta,
        &books,
        dir.as_deref(),
      )
      .await?;
      ("verses", summary)
    }

    ImportCommand::SourceWords { files, book } => {
      let book = book.as_deref().map(lookup_book).transpose()?;
      ("source words", import::source_words(store, &files, book).await?)
    }

    ImportCommand::CrossRefs { file, min_votes } => {
      ("cross references", import::cross_references(store, &file, min_votes).await?)
    }

    ImportCommand::Lexicon { language, file } => {
      let languages = match language {
        Some(language) => vec![language],
        None => vec![Language::Hebrew, Language::Greek],
      };
      let summary =
        import::lexicon(store, &fetcher, &settings.sources, &languages, file.as_deref()).await?;
      ("lexicon", summary)
    }

    ImportCommand::Commentary { commentary, book } => {
      let book = book.as_deref().map(lookup_book).transpose()?;
      for id in &commentary {
        if helloao::COMMENTARIES.iter().all(|(known, _)| known != id) {
          tracing::warn!(id = %id, "commentary id is not in the known list, trying anyway");
        }
      }
      let summary = import::commentary(
        store,
        &fetcher,
        &settings.sources.commentary_api_base,
        &commentary,
        book,
      )
      .await?;
      ("commentary", summary)
    }
  };

  summary.log(corpus);
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn lookup_book(name: &str) -> Result<&'static Book> {
  canon::lookup(name).ok_or_else(|| anyhow!("unknown book {name:?}"))
}

fn default_translation_name(id: &str) -> String {
  match id {
    "KJV" => "King James Version".to_string(),
    other => other.to_string(),
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let out = serde_json::to_string_pretty(value).context("serialising output")?;
  println!("{out}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_is_well_formed() { Cli::command().debug_assert(); }

  #[test]
  fn parses_search_scope_and_strongs_arguments() {
    let cli = Cli::parse_from(["verbum", "search", "love", "--scope", "book:jn", "-l", "5"]);
    let Command::Search { query, scope, limit, .. } = cli.command else {
      panic!("expected search");
    };
    assert_eq!(query, "love");
    assert_eq!(scope, SearchScope::Book("John".into()));
    assert_eq!(limit, 5);

    let cli = Cli::parse_from(["verbum", "word", "g0025"]);
    let Command::Word { strong_number } = cli.command else {
      panic!("expected word");
    };
    assert_eq!(strong_number.to_string(), "G25");

    assert!(Cli::try_parse_from(["verbum", "search", "x", "--scope", "book:nowhere"]).is_err());
  }

  #[test]
  fn import_arguments() {
    let cli = Cli::parse_from(["verbum", "import", "cross-refs", "refs.txt", "--min-votes", "-5"]);
    let Command::Import(ImportCommand::CrossRefs { min_votes, .. }) = cli.command else {
      panic!("expected cross-refs");
    };
    assert_eq!(min_votes, -5);

    assert!(Cli::try_parse_from(["verbum", "import", "lexicon", "--file", "h.json"]).is_err());
  }
}
