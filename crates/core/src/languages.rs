//! ISO 639-1 code to display name table.

use std::collections::HashMap;
use std::path::Path;

use crate::error::LanguageError;

const BUNDLED: &str = include_str!("../assets/iso_639_1_languages.json");

/// Read-only lookup table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    names: HashMap<String, String>,
}

impl LanguageTable {
    /// The table shipped with the binary.
    pub fn bundled() -> Result<Self, LanguageError> {
        Self::from_json(BUNDLED)
    }

    /// Load a `{"code": "Name", ...}` JSON object from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LanguageError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LanguageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, LanguageError> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self {
            names: entries
                .into_iter()
                .map(|(code, name)| (code.to_ascii_lowercase(), name))
                .collect(),
        })
    }

    /// Display name for a two-letter code. Unknown codes yield `None`.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names
            .get(&code.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
