use thiserror::Error;

/// Failure loading the language code table.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("failed to read language table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid language table: {0}")]
    Parse(#[from] serde_json::Error),
}
