use serde::{Deserialize, Serialize};

/// Trailing marker a user appends to a page title to request a sync.
pub const PENDING_SENTINEL: char = ';';

/// Media kind as reported by the catalog's `media_type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    Movie,
    Tv,
    /// Anything else the catalog returns (`person`, `collection`, ...).
    Unsupported(String),
}

impl MediaKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "movie" => Self::Movie,
            "tv" => Self::Tv,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Unsupported(tag) => tag,
        }
    }

    /// Capitalised tag, used for the `type` select value (`Movie`, `Tv`).
    pub fn display_name(&self) -> String {
        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for MediaKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<MediaKind> for String {
    fn from(kind: MediaKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A database page flagged for sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub page_id: String,
    /// Title exactly as stored, sentinel included.
    pub raw_title: String,
}

impl PendingEntry {
    pub fn new(page_id: impl Into<String>, raw_title: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            raw_title: raw_title.into(),
        }
    }

    /// Title with every trailing sentinel and surrounding whitespace removed,
    /// including whitespace between sentinels (`"Heat; ;"` is `"Heat"`).
    pub fn search_title(&self) -> &str {
        self.raw_title
            .trim()
            .trim_end_matches(|c: char| c == PENDING_SENTINEL || c.is_whitespace())
    }
}

/// One candidate returned by a catalog title search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchResult {
    pub catalog_id: u64,
    pub kind: MediaKind,
    pub title: String,
}
