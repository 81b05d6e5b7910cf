//! Flat, whitelist-constrained record produced by normalization.
//!
//! Every key in a [`NormalizedRecord`] carries a present, non-empty value.
//! Absent values are never written as blanks, so a partial update cannot
//! overwrite existing data with emptiness.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// The fixed set of fields a normalized record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Type,
    Tagline,
    TmdbRating,
    Directors,
    Producers,
    Genres,
    Runtime,
    Streaming,
    WatchFree,
    TrailerUrl,
    ImdbUrl,
    Synopsis,
    ReleaseDate,
    Cast,
    CountryOfOrigin,
    ContentRating,
    PosterPath,
    Status,
    OriginalLanguage,
    OriginalTitle,
    BackdropPath,
}

impl Field {
    pub const ALL: [Field; 22] = [
        Self::Title,
        Self::Type,
        Self::Tagline,
        Self::TmdbRating,
        Self::Directors,
        Self::Producers,
        Self::Genres,
        Self::Runtime,
        Self::Streaming,
        Self::WatchFree,
        Self::TrailerUrl,
        Self::ImdbUrl,
        Self::Synopsis,
        Self::ReleaseDate,
        Self::Cast,
        Self::CountryOfOrigin,
        Self::ContentRating,
        Self::PosterPath,
        Self::Status,
        Self::OriginalLanguage,
        Self::OriginalTitle,
        Self::BackdropPath,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::Tagline => "tagline",
            Self::TmdbRating => "tmdb_rating",
            Self::Directors => "directors",
            Self::Producers => "producers",
            Self::Genres => "genres",
            Self::Runtime => "runtime",
            Self::Streaming => "streaming",
            Self::WatchFree => "watch_free",
            Self::TrailerUrl => "trailer_url",
            Self::ImdbUrl => "imdb_url",
            Self::Synopsis => "synopsis",
            Self::ReleaseDate => "release_date",
            Self::Cast => "cast",
            Self::CountryOfOrigin => "country_of_origin",
            Self::ContentRating => "content_rating",
            Self::PosterPath => "poster_path",
            Self::Status => "status",
            Self::OriginalLanguage => "original_language",
            Self::OriginalTitle => "original_title",
            Self::BackdropPath => "backdrop_path",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Url(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Url(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: BTreeMap<Field, FieldValue>,
}

impl NormalizedRecord {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Text or URL value of `field`, if present.
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in whitelist order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.keys().map(|f| f.as_str()).collect()
    }
}

/// Inserts a field only once its value is confirmed present and non-empty.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: BTreeMap<Field, FieldValue>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank or whitespace-only text is dropped.
    pub fn text(self, field: Field, value: Option<impl Into<String>>) -> Self {
        self.string_value(field, value, FieldValue::Text)
    }

    pub fn url(self, field: Field, value: Option<impl Into<String>>) -> Self {
        self.string_value(field, value, FieldValue::Url)
    }

    /// Non-finite numbers are dropped.
    pub fn number(mut self, field: Field, value: Option<f64>) -> Self {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.fields.insert(field, FieldValue::Number(v));
        }
        self
    }

    pub fn integer(mut self, field: Field, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.fields.insert(field, FieldValue::Integer(v));
        }
        self
    }

    pub fn date(mut self, field: Field, value: Option<NaiveDate>) -> Self {
        if let Some(v) = value {
            self.fields.insert(field, FieldValue::Date(v));
        }
        self
    }

    /// Blank items are dropped; an empty list leaves the field out.
    pub fn list<I, S>(mut self, field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !items.is_empty() {
            self.fields.insert(field, FieldValue::List(items));
        }
        self
    }

    pub fn build(self) -> NormalizedRecord {
        NormalizedRecord {
            fields: self.fields,
        }
    }

    fn string_value(
        mut self,
        field: Field,
        value: Option<impl Into<String>>,
        wrap: fn(String) -> FieldValue,
    ) -> Self {
        if let Some(v) = value.map(Into::into).filter(|s| !s.trim().is_empty()) {
            self.fields.insert(field, wrap(v));
        }
        self
    }
}
