//! Encoding of normalized fields into Notion page property values.

use reelsync_core::{Field, FieldValue, NormalizedRecord};
use serde_json::{Map, Value, json};

/// Notion caps each rich text object at 2000 characters.
const RICH_TEXT_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Url,
    Date,
    Files,
}

/// Maps record fields to the database's property names and types.
#[derive(Debug, Clone)]
pub struct PropertySchema {
    title_property: String,
}

impl Default for PropertySchema {
    fn default() -> Self {
        Self::new("Title")
    }
}

impl PropertySchema {
    pub fn new(title_property: impl Into<String>) -> Self {
        Self {
            title_property: title_property.into(),
        }
    }

    pub fn title_property(&self) -> &str {
        &self.title_property
    }

    pub fn property_name(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title_property,
            other => column(other).0,
        }
    }

    pub fn kind(&self, field: Field) -> PropertyKind {
        column(field).1
    }

    /// Build the `properties` object for a page update. Values that cannot
    /// be expressed in the target type are left out.
    pub fn encode(&self, record: &NormalizedRecord) -> Map<String, Value> {
        record
            .iter()
            .filter_map(|(field, value)| {
                let name = self.property_name(field);
                encode_value(self.kind(field), value, name)
                    .map(|encoded| (name.to_string(), encoded))
            })
            .collect()
    }
}

fn column(field: Field) -> (&'static str, PropertyKind) {
    use PropertyKind::*;
    match field {
        Field::Title => ("Title", Title),
        Field::Type => ("Type", Select),
        Field::Tagline => ("Tagline", RichText),
        Field::TmdbRating => ("TMDB Rating", Number),
        Field::Directors => ("Director", RichText),
        Field::Producers => ("Producer", RichText),
        Field::Genres => ("Genre", MultiSelect),
        Field::Runtime => ("Runtime", Number),
        Field::Streaming => ("Streaming", MultiSelect),
        Field::WatchFree => ("Watch Free", MultiSelect),
        Field::TrailerUrl => ("Trailer", Url),
        Field::ImdbUrl => ("IMDb Page", Url),
        Field::Synopsis => ("Synopsis", RichText),
        Field::ReleaseDate => ("Release Date", Date),
        Field::Cast => ("Cast", RichText),
        Field::CountryOfOrigin => ("Country of Origin", RichText),
        Field::ContentRating => ("Content Rating", Select),
        Field::PosterPath => ("Poster", Files),
        Field::Status => ("Status", Select),
        Field::OriginalLanguage => ("Original Language", Select),
        Field::OriginalTitle => ("Original Title", RichText),
        Field::BackdropPath => ("Backdrop", Files),
    }
}

fn encode_value(kind: PropertyKind, value: &FieldValue, name: &str) -> Option<Value> {
    let encoded = match kind {
        PropertyKind::Title => json!({ "title": rich_text(&as_string(value)) }),
        PropertyKind::RichText => json!({ "rich_text": rich_text(&as_string(value)) }),
        PropertyKind::Number => match value {
            FieldValue::Number(n) => json!({ "number": n }),
            FieldValue::Integer(n) => json!({ "number": n }),
            _ => return None,
        },
        PropertyKind::Select => json!({ "select": { "name": option_name(&as_string(value)) } }),
        PropertyKind::MultiSelect => {
            let options: Vec<Value> = match value {
                FieldValue::List(items) => items
                    .iter()
                    .map(|item| json!({ "name": option_name(item) }))
                    .collect(),
                other => vec![json!({ "name": option_name(&as_string(other)) })],
            };
            json!({ "multi_select": options })
        }
        PropertyKind::Url => json!({ "url": value.as_text()? }),
        PropertyKind::Date => match value {
            FieldValue::Date(d) => json!({ "date": { "start": d.format("%Y-%m-%d").to_string() } }),
            _ => return None,
        },
        PropertyKind::Files => json!({
            "files": [{
                "type": "external",
                "name": name,
                "external": { "url": value.as_text()? },
            }]
        }),
    };
    Some(encoded)
}

fn as_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) | FieldValue::Url(s) => s.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        FieldValue::List(items) => items.join(", "),
    }
}

/// Split text into rich text objects that respect the per-object limit.
fn rich_text(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({ "type": "text", "text": { "content": content } })
        })
        .collect()
}

/// Select option names may not contain commas.
fn option_name(name: &str) -> String {
    name.replace(',', "")
}
