use std::path::PathBuf;

use reelsync_core::{LanguageError, LanguageTable};
use thiserror::Error;

pub const NOTION_API_KEY: &str = "NOTION_API_KEY";
pub const DATABASE_ID: &str = "DATABASE_ID";
pub const TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const TITLE_PROPERTY: &str = "REELSYNC_TITLE_PROPERTY";
pub const LANGUAGES_PATH: &str = "REELSYNC_LANGUAGES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub notion_api_key: String,
    pub database_id: String,
    pub tmdb_api_key: String,
    pub title_property: String,
    pub languages_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset, and
    /// every missing required key is reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let notion_api_key = required(NOTION_API_KEY);
        let database_id = required(DATABASE_ID);
        let tmdb_api_key = required(TMDB_API_KEY);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            notion_api_key,
            database_id,
            tmdb_api_key,
            title_property: get(TITLE_PROPERTY).unwrap_or_else(|| "Title".to_string()),
            languages_path: get(LANGUAGES_PATH).map(PathBuf::from),
        })
    }

    /// The override table if configured, otherwise the bundled one.
    pub fn language_table(&self) -> Result<LanguageTable, LanguageError> {
        match &self.languages_path {
            Some(path) => LanguageTable::from_path(path),
            None => LanguageTable::bundled(),
        }
    }
}
