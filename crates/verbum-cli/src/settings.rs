//! Layered configuration: built-in defaults, an optional TOML file, then
//! `VERBUM_*` environment variables (`VERBUM_SOURCES__KJV_BASE_URL` for
//! nested keys).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use verbum_core::pipeline::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path:          PathBuf,
  pub default_translation: String,
  pub batch_size:          usize,
  pub fetch_timeout_secs:  u64,
  /// Pause between commentary chapter requests.
  pub request_delay_ms:    u64,
  pub sources:             Sources,
}

/// Where the network importers fetch from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sources {
  pub lexicon_greek_url:   String,
  pub lexicon_hebrew_url:  String,
  pub commentary_api_base: String,
  /// Chapters-JSON translation files, one `<Book>.json` per book.
  pub kjv_base_url:        String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:          PathBuf::from("~/.local/share/verbum/verbum.db"),
      default_translation: "KJV".to_string(),
      batch_size:          DEFAULT_BATCH_SIZE,
      fetch_timeout_secs:  30,
      request_delay_ms:    100,
      sources:             Sources::default(),
    }
  }
}

impl Default for Sources {
  fn default() -> Self {
    Self {
      lexicon_greek_url:   "https://raw.githubusercontent.com/openscriptures/strongs/master/greek/strongs-greek-dictionary.json".to_string(),
      lexicon_hebrew_url:  "https://raw.githubusercontent.com/openscriptures/strongs/master/hebrew/strongs-hebrew-dictionary.json".to_string(),
      commentary_api_base: "https://bible.helloao.org/api/c".to_string(),
      kjv_base_url:        "https://raw.githubusercontent.com/aruljohn/Bible-kjv/master".to_string(),
    }
  }
}

impl Settings {
  /// Load settings, reading `file` if it exists.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let mut settings: Self = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix("VERBUM")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
