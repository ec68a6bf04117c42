//! Configuration for slug cleaning, alias formatting and cascade behavior.
//!
//! Every section is `#[serde(default)]`, so an empty TOML document yields [PathConfig::default].
//!
//! ```toml
//! [slug]
//! case = "lower"
//! separator = "-"
//! max_length = 100
//!
//! [alias]
//! leading_slash = true
//!
//! [cascade]
//! descend_past_skipped = false
//! ```
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use crate::error::PathError;

/// Compiled ignore-word patterns, keyed by the normalized word list. Cleaning runs once per hop of
/// every walk, so each distinct list is compiled only the first time it is seen.
static IGNORE_WORD_PATTERNS: Lazy<Mutex<HashMap<Vec<String>, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Case transformation applied while cleaning a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugCase {
    #[default]
    Lower,
    Upper,
    /// Title Case each word before separators are inserted.
    Title,
    Preserve,
}

/// Cleaning rules handed to a [crate::paths::SlugCleaner].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugOptions {
    pub case: SlugCase,
    pub separator: char,
    /// Fold accented characters to ASCII and drop what cannot be folded.
    pub transliterate: bool,
    /// Characters removed outright (they do not become separators).
    pub strip_chars: String,
    /// Whole words removed before joining, matched case-insensitively.
    pub ignore_words: Vec<String>,
    /// Zero disables truncation.
    pub max_length: usize,
}

impl Default for SlugOptions {
    fn default() -> Self {
        SlugOptions {
            case: SlugCase::Lower,
            separator: '-',
            transliterate: true,
            strip_chars: "'\"`’‘“”".to_string(),
            ignore_words: Vec::new(),
            max_length: 100,
        }
    }
}

impl SlugOptions {
    /// Regex matching any of [SlugOptions::ignore_words] as a whole word, if any are set.
    ///
    /// The pattern is compiled once per distinct word list and shared afterwards.
    pub fn ignore_words_regex(&self) -> Result<Option<Regex>, PathError> {
        let words = self
            .ignore_words
            .iter()
            .map(|word| word.trim())
            .filter(|word| !word.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>();
        if words.is_empty() {
            return Ok(None);
        }

        let mut patterns = IGNORE_WORD_PATTERNS.lock();
        if let Some(re) = patterns.get(&words) {
            return Ok(Some(re.clone()));
        }
        let re = Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|")))?;
        tracing::debug!("compiled ignore-word pattern {}", re.as_str());
        patterns.insert(words, re.clone());
        Ok(Some(re))
    }
}

/// How full paths are written to the alias store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasOptions {
    /// Prefix stored aliases with `/`.
    pub leading_slash: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeOptions {
    /// Keep descending below children that were skipped (manual path, no alias, empty ancestry).
    pub descend_past_skipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub slug: SlugOptions,
    pub alias: AliasOptions,
    pub cascade: CascadeOptions,
}

impl PathConfig {
    pub fn from_toml_str(content: &str) -> Result<PathConfig, PathError> {
        let config: PathConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, PathError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), PathError> {
        if self.slug.separator == '/' || self.slug.separator.is_alphanumeric() {
            return Err(PathError::Config(format!(
                "slug separator '{}' must be a non-alphanumeric character other than '/'",
                self.slug.separator
            )));
        }
        self.slug.ignore_words_regex()?;
        Ok(())
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_config(&self) -> Result<PathConfig, PathError>;
    fn set_config(&self, config: &PathConfig) -> Result<(), PathError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TomlConfigProvider {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<PathConfig, PathError> {
        tracing::debug!("Attempting to read path config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(PathConfig::default());
        }
        let content = read_to_string(&self.path)?;
        PathConfig::from_toml_str(&content)
    }

    fn set_config(&self, config: &PathConfig) -> Result<(), PathError> {
        tracing::debug!("Attempting to write path config to: {:?}", &self.path);
        config.validate()?;
        write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }
}
