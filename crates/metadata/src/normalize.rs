//! Flattens a raw catalog detail payload into a [`NormalizedRecord`].
//!
//! Pure and deterministic: the same input always yields the same record.
//! Each field is inserted only when its value is present, so omission is
//! decided per field rather than by a final sweep.

use chrono::NaiveDate;
use reelsync_core::{Field, LanguageTable, MediaKind, NormalizedRecord, RecordBuilder};
use serde::Deserialize;

use crate::MetadataError;
use crate::raw::MovieDetails;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";
const IMDB_TITLE: &str = "https://www.imdb.com/title";

const REGION: &str = "US";
const TRAILER_SITE: &str = "YouTube";
const CAST_LIMIT: usize = 10;

/// Normalize one detail payload of the given kind.
///
/// Movies are fully mapped. TV payloads produce an empty record until a
/// series mapping exists; other kinds are rejected.
pub fn normalize(
    raw: &serde_json::Value,
    kind: &MediaKind,
    languages: &LanguageTable,
) -> Result<NormalizedRecord, MetadataError> {
    match kind {
        MediaKind::Movie => {
            let details = MovieDetails::deserialize(raw)
                .map_err(|e| MetadataError::Malformed(e.to_string()))?;
            Ok(normalize_movie(&details, kind, languages))
        }
        MediaKind::Tv => Ok(NormalizedRecord::default()),
        MediaKind::Unsupported(tag) => Err(MetadataError::UnsupportedKind(tag.clone())),
    }
}

fn normalize_movie(
    movie: &MovieDetails,
    kind: &MediaKind,
    languages: &LanguageTable,
) -> NormalizedRecord {
    let title = non_empty(movie.title.as_deref());
    let original_title =
        non_empty(movie.original_title.as_deref()).filter(|original| Some(*original) != title);

    let us_providers = movie.watch_providers.region(REGION);

    RecordBuilder::new()
        .text(Field::Title, title)
        .text(Field::Type, Some(kind.display_name()))
        .text(Field::Tagline, movie.tagline.as_deref())
        .number(Field::TmdbRating, rating(movie.vote_average))
        .text(Field::Directors, joined(movie.credits.crew_names("Director")))
        .text(Field::Producers, joined(movie.credits.crew_names("Producer")))
        .list(Field::Genres, movie.genres.iter().map(|g| g.name.as_str()))
        .integer(Field::Runtime, movie.runtime.filter(|r| *r > 0))
        .list(
            Field::Streaming,
            us_providers.map(|p| p.flatrate_names()).unwrap_or_default(),
        )
        .list(
            Field::WatchFree,
            us_providers.map(|p| p.free_names()).unwrap_or_default(),
        )
        .url(
            Field::TrailerUrl,
            movie
                .videos
                .best_trailer(REGION, TRAILER_SITE)
                .map(|v| format!("{YOUTUBE_WATCH}{}", v.key)),
        )
        .url(
            Field::ImdbUrl,
            non_empty(movie.imdb_id.as_deref()).map(|id| format!("{IMDB_TITLE}/{id}/")),
        )
        .text(Field::Synopsis, movie.overview.as_deref())
        .date(Field::ReleaseDate, release_date(movie.release_date.as_deref()))
        .text(
            Field::Cast,
            joined(movie.credits.credited_cast(CAST_LIMIT)),
        )
        // Production countries stand in for origin countries; the two can differ.
        .text(
            Field::CountryOfOrigin,
            movie.production_countries.first().map(|c| c.name.as_str()),
        )
        .text(
            Field::ContentRating,
            movie.release_dates.certification(REGION),
        )
        .url(Field::PosterPath, image_url(movie.poster_path.as_deref()))
        .text(Field::Status, movie.status.as_deref())
        .text(
            Field::OriginalLanguage,
            movie
                .original_language
                .as_deref()
                .and_then(|code| languages.name(code)),
        )
        .text(Field::OriginalTitle, original_title)
        .url(Field::BackdropPath, image_url(movie.backdrop_path.as_deref()))
        .build()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// One decimal place, rounded on the exact binary value with ties to even.
/// Zero is the catalog's "no votes" placeholder.
fn rating(vote_average: Option<f64>) -> Option<f64> {
    vote_average
        .filter(|v| *v > 0.0)
        .and_then(|v| format!("{v:.1}").parse().ok())
}

fn joined(names: Vec<&str>) -> Option<String> {
    let names: Vec<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

fn release_date(value: Option<&str>) -> Option<NaiveDate> {
    non_empty(value).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn image_url(path: Option<&str>) -> Option<String> {
    non_empty(path).map(|p| format!("{IMAGE_BASE}{p}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsync_core::FieldValue;
    use serde_json::{Value, json};

    fn languages() -> LanguageTable {
        LanguageTable::bundled().unwrap()
    }

    fn movie_fixture() -> Value {
        json!({
            "id": 949,
            "title": "Heat",
            "original_title": "Heat",
            "tagline": "A Los Angeles crime saga",
            "vote_average": 7.94,
            "runtime": 170,
            "imdb_id": "tt0113277",
            "overview": "Obsessive master thief Neil McCauley leads a crew...",
            "release_date": "1995-12-15",
            "status": "Released",
            "original_language": "en",
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.jpg",
            "budget": 60000000,
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 80, "name": "Crime" },
                { "id": 18, "name": "Drama" }
            ],
            "production_countries": [
                { "iso_3166_1": "US", "name": "United States of America" }
            ],
            "credits": {
                "cast": [
                    { "name": "Al Pacino", "character": "Vincent Hanna", "known_for_department": "Acting" },
                    { "name": "Robert De Niro", "character": "Neil McCauley", "known_for_department": "Acting" }
                ],
                "crew": [
                    { "name": "Michael Mann", "job": "Director" },
                    { "name": "Art Linson", "job": "Producer" },
                    { "name": "Dante Spinotti", "job": "Director of Photography" }
                ]
            },
            "release_dates": {
                "results": [
                    { "iso_3166_1": "US", "release_dates": [{ "certification": "R" }] }
                ]
            },
            "videos": {
                "results": [
                    { "key": "abc123", "site": "YouTube", "type": "Trailer", "iso_3166_1": "US", "size": 1080 }
                ]
            },
            "watch/providers": {
                "results": {
                    "US": {
                        "flatrate": [{ "provider_name": "Max" }],
                        "rent": [{ "provider_name": "Apple TV" }]
                    }
                }
            }
        })
    }

    fn normalize_movie_json(raw: &Value) -> NormalizedRecord {
        normalize(raw, &MediaKind::Movie, &languages()).unwrap()
    }

    fn text(record: &NormalizedRecord, field: Field) -> Option<&str> {
        record.text(field)
    }

    #[test]
    fn maps_full_movie_record() {
        let record = normalize_movie_json(&movie_fixture());

        assert_eq!(text(&record, Field::Title), Some("Heat"));
        assert_eq!(text(&record, Field::Type), Some("Movie"));
        assert_eq!(
            record.get(Field::TmdbRating),
            Some(&FieldValue::Number(7.9))
        );
        assert_eq!(text(&record, Field::Directors), Some("Michael Mann"));
        assert_eq!(text(&record, Field::Producers), Some("Art Linson"));
        assert_eq!(
            record.get(Field::Genres),
            Some(&FieldValue::List(vec![
                "Action".into(),
                "Crime".into(),
                "Drama".into()
            ]))
        );
        assert_eq!(record.get(Field::Runtime), Some(&FieldValue::Integer(170)));
        assert_eq!(
            record.get(Field::Streaming),
            Some(&FieldValue::List(vec!["Max".into()]))
        );
        assert!(!record.contains(Field::WatchFree));
        assert_eq!(
            text(&record, Field::TrailerUrl),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(
            text(&record, Field::ImdbUrl),
            Some("https://www.imdb.com/title/tt0113277/")
        );
        assert_eq!(
            record.get(Field::ReleaseDate),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(1995, 12, 15).unwrap()))
        );
        assert_eq!(
            text(&record, Field::Cast),
            Some("Al Pacino, Robert De Niro")
        );
        assert_eq!(
            text(&record, Field::CountryOfOrigin),
            Some("United States of America")
        );
        assert_eq!(text(&record, Field::ContentRating), Some("R"));
        assert_eq!(
            text(&record, Field::PosterPath),
            Some("https://image.tmdb.org/t/p/original/poster.jpg")
        );
        assert_eq!(
            text(&record, Field::BackdropPath),
            Some("https://image.tmdb.org/t/p/original/backdrop.jpg")
        );
        assert_eq!(text(&record, Field::Status), Some("Released"));
        assert_eq!(text(&record, Field::OriginalLanguage), Some("English"));
        // Same as title, so left out.
        assert!(!record.contains(Field::OriginalTitle));
    }

    #[test]
    fn sparse_record_omits_missing_fields() {
        let raw = json!({
            "title": "Untitled",
            "tagline": "",
            "vote_average": 0.0,
            "runtime": 0,
            "overview": "",
            "release_date": "",
            "imdb_id": null,
            "poster_path": null,
            "backdrop_path": null,
            "original_language": "xx",
            "genres": [],
            "production_countries": [],
            "credits": { "cast": [], "crew": [] },
            "release_dates": { "results": [] },
            "videos": { "results": [] },
            "watch/providers": { "results": {} }
        });

        let record = normalize_movie_json(&raw);
        assert_eq!(record.field_names(), vec!["title", "type"]);
    }

    #[test]
    fn never_emits_empty_values() {
        let raw = json!({
            "title": "Sparse",
            "credits": {
                "cast": [{ "name": "", "character": "Extra", "known_for_department": "Acting" }],
                "crew": [{ "name": "", "job": "Director" }]
            },
            "genres": [{ "name": "" }],
            "watch/providers": { "results": { "US": { "flatrate": [], "free": [] } } }
        });

        let record = normalize_movie_json(&raw);
        for (field, value) in record.iter() {
            match value {
                FieldValue::Text(s) | FieldValue::Url(s) => {
                    assert!(!s.trim().is_empty(), "{field} is blank")
                }
                FieldValue::List(items) => assert!(!items.is_empty(), "{field} is empty"),
                _ => {}
            }
        }
        assert_eq!(record.field_names(), vec!["title", "type"]);
    }

    #[test]
    fn only_whitelisted_fields_are_emitted() {
        let record = normalize_movie_json(&movie_fixture());
        let json = serde_json::to_value(&record).unwrap();
        let whitelist: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        for key in json.as_object().unwrap().keys() {
            assert!(whitelist.contains(&key.as_str()), "unexpected key {key}");
        }
        assert!(json.get("budget").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn directors_and_producers_join_in_source_order() {
        let mut raw = movie_fixture();
        raw["credits"]["crew"] = json!([
            { "job": "Director", "name": "A" },
            { "job": "Producer", "name": "B" },
            { "job": "Director", "name": "C" }
        ]);

        let record = normalize_movie_json(&raw);
        assert_eq!(text(&record, Field::Directors), Some("A, C"));
        assert_eq!(text(&record, Field::Producers), Some("B"));
    }

    #[test]
    fn cast_skips_uncredited_and_caps_at_ten() {
        let cast: Vec<Value> = (1..=12)
            .map(|i| {
                let character = if i == 3 {
                    "Guard (uncredited)".to_string()
                } else {
                    format!("Role {i}")
                };
                json!({
                    "name": format!("Actor {i}"),
                    "character": character,
                    "known_for_department": "Acting"
                })
            })
            .collect();
        let mut raw = movie_fixture();
        raw["credits"]["cast"] = Value::Array(cast);

        let record = normalize_movie_json(&raw);
        let expected: Vec<String> = [1, 2, 4, 5, 6, 7, 8, 9, 10, 11]
            .iter()
            .map(|i| format!("Actor {i}"))
            .collect();
        assert_eq!(text(&record, Field::Cast), Some(expected.join(", ").as_str()));
    }

    #[test]
    fn cast_excludes_non_acting_departments() {
        let mut raw = movie_fixture();
        raw["credits"]["cast"] = json!([
            { "name": "Stunt Person", "character": "Driver", "known_for_department": "Crew" },
            { "name": "Lead", "character": "Hero", "known_for_department": "Acting" }
        ]);

        let record = normalize_movie_json(&raw);
        assert_eq!(text(&record, Field::Cast), Some("Lead"));
    }

    #[test]
    fn last_non_empty_certification_wins() {
        let mut raw = movie_fixture();
        raw["release_dates"] = json!({
            "results": [
                { "iso_3166_1": "GB", "release_dates": [{ "certification": "18" }] },
                {
                    "iso_3166_1": "US",
                    "release_dates": [
                        { "certification": "" },
                        { "certification": "PG-13" },
                        { "certification": "" },
                        { "certification": "R" }
                    ]
                }
            ]
        });

        let record = normalize_movie_json(&raw);
        assert_eq!(text(&record, Field::ContentRating), Some("R"));
    }

    #[test]
    fn certification_omitted_without_us_region() {
        let mut raw = movie_fixture();
        raw["release_dates"] = json!({
            "results": [{ "iso_3166_1": "FR", "release_dates": [{ "certification": "U" }] }]
        });

        let record = normalize_movie_json(&raw);
        assert!(!record.contains(Field::ContentRating));
    }

    #[test]
    fn trailer_picks_largest_us_youtube_video() {
        let mut raw = movie_fixture();
        raw["videos"] = json!({
            "results": [
                { "key": "sd", "site": "YouTube", "type": "Trailer", "iso_3166_1": "US", "size": 480 },
                { "key": "hd", "site": "YouTube", "type": "Trailer", "iso_3166_1": "US", "size": 1080 },
                { "key": "mid", "site": "YouTube", "type": "Trailer", "iso_3166_1": "US", "size": 720 },
                { "key": "uk", "site": "YouTube", "type": "Trailer", "iso_3166_1": "GB", "size": 2160 }
            ]
        });

        let record = normalize_movie_json(&raw);
        assert_eq!(
            text(&record, Field::TrailerUrl),
            Some("https://www.youtube.com/watch?v=hd")
        );
    }

    #[test]
    fn trailer_omitted_without_match() {
        let mut raw = movie_fixture();
        raw["videos"] = json!({
            "results": [
                { "key": "x", "site": "YouTube", "type": "Featurette", "iso_3166_1": "US", "size": 1080 }
            ]
        });

        let record = normalize_movie_json(&raw);
        assert!(!record.contains(Field::TrailerUrl));
    }

    #[test]
    fn providers_have_no_region_fallback() {
        let mut raw = movie_fixture();
        raw["watch/providers"] = json!({
            "results": {
                "GB": { "flatrate": [{ "provider_name": "Netflix" }] }
            }
        });

        let record = normalize_movie_json(&raw);
        assert!(!record.contains(Field::Streaming));
        assert!(!record.contains(Field::WatchFree));
    }

    #[test]
    fn free_providers_become_watch_free() {
        let mut raw = movie_fixture();
        raw["watch/providers"] = json!({
            "results": {
                "US": {
                    "free": [{ "provider_name": "Tubi" }, { "provider_name": "Pluto TV" }]
                }
            }
        });

        let record = normalize_movie_json(&raw);
        assert_eq!(
            record.get(Field::WatchFree),
            Some(&FieldValue::List(vec!["Tubi".into(), "Pluto TV".into()]))
        );
        assert!(!record.contains(Field::Streaming));
    }

    #[test]
    fn original_title_kept_when_different() {
        let mut raw = movie_fixture();
        raw["title"] = json!("Spirited Away");
        raw["original_title"] = json!("千と千尋の神隠し");
        raw["original_language"] = json!("ja");

        let record = normalize_movie_json(&raw);
        assert_eq!(text(&record, Field::OriginalTitle), Some("千と千尋の神隠し"));
        assert_eq!(text(&record, Field::OriginalLanguage), Some("Japanese"));
    }

    #[test]
    fn rating_rounds_to_one_decimal() {
        let mut raw = movie_fixture();
        raw["vote_average"] = json!(6.25);
        let record = normalize_movie_json(&raw);
        assert_eq!(record.get(Field::TmdbRating), Some(&FieldValue::Number(6.2)));

        raw["vote_average"] = json!(7.94);
        let record = normalize_movie_json(&raw);
        assert_eq!(record.get(Field::TmdbRating), Some(&FieldValue::Number(7.9)));

        raw["vote_average"] = Value::Null;
        let record = normalize_movie_json(&raw);
        assert!(!record.contains(Field::TmdbRating));
    }

    #[test]
    fn rating_ties_follow_binary_value() {
        assert_eq!(rating(Some(6.25)), Some(6.2));
        assert_eq!(rating(Some(0.15)), Some(0.1));
        assert_eq!(rating(Some(7.35)), Some(7.3));
        assert_eq!(rating(Some(8.45)), Some(8.4));
        assert_eq!(rating(Some(8.46)), Some(8.5));
        assert_eq!(rating(Some(0.0)), None);
    }

    #[test]
    fn null_strings_in_sub_resources_do_not_drop_record() {
        let mut raw = movie_fixture();
        raw["videos"]["results"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "key": "clip", "site": "YouTube", "type": "Clip", "iso_3166_1": null, "size": 720 }));
        raw["credits"]["cast"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "name": null, "character": "Extra", "known_for_department": "Acting" }));
        raw["genres"].as_array_mut().unwrap().push(json!({ "name": null }));

        let record = normalize_movie_json(&raw);
        assert_eq!(
            text(&record, Field::TrailerUrl),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(
            text(&record, Field::Cast),
            Some("Al Pacino, Robert De Niro")
        );
        assert_eq!(
            record.get(Field::Genres),
            Some(&FieldValue::List(vec![
                "Action".into(),
                "Crime".into(),
                "Drama".into()
            ]))
        );
        assert_eq!(text(&record, Field::ContentRating), Some("R"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = movie_fixture();
        let first = serde_json::to_vec(&normalize_movie_json(&raw)).unwrap();
        let second = serde_json::to_vec(&normalize_movie_json(&raw)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tv_kind_yields_empty_record() {
        let raw = json!({ "name": "Breaking Bad" });
        let record = normalize(&raw, &MediaKind::Tv, &languages()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn unsupported_kind_is_rejected() {
        let raw = json!({ "name": "Someone" });
        let err = normalize(&raw, &MediaKind::Unsupported("person".into()), &languages())
            .unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedKind(k) if k == "person"));
    }

    #[test]
    fn wrongly_typed_payload_is_malformed() {
        let raw = json!({ "title": 42 });
        let err = normalize(&raw, &MediaKind::Movie, &languages()).unwrap_err();
        assert!(matches!(err, MetadataError::Malformed(_)));
    }
}
