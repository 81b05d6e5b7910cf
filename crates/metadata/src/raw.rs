//! Typed views over a TMDB movie detail payload and its appended
//! sub-resources.
//!
//! Every field defaults when missing or `null`: absent lists and strings
//! are empty, absent scalars are `None`. Accessors never fail; they return `None` or an
//! empty list when the data they look for is not there.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    pub vote_average: Option<f64>,
    pub runtime: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub genres: Vec<NamedItem>,
    pub imdb_id: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub production_countries: Vec<NamedItem>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub credits: Credits,
    #[serde(deserialize_with = "null_default")]
    pub release_dates: ReleaseDates,
    #[serde(deserialize_with = "null_default")]
    pub videos: Videos,
    #[serde(rename = "watch/providers", deserialize_with = "null_default")]
    pub watch_providers: WatchProviders,
}

/// Any `{ "name": ... }` object (genre, country, company).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedItem {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credits {
    #[serde(deserialize_with = "null_default")]
    pub cast: Vec<CastCredit>,
    #[serde(deserialize_with = "null_default")]
    pub crew: Vec<CrewCredit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CastCredit {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub character: Option<String>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrewCredit {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub job: Option<String>,
}

impl Credits {
    /// Names of crew members whose job equals `job`, in source order.
    pub fn crew_names(&self, job: &str) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job.as_deref() == Some(job))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Credited acting roles in billing order, capped at `limit`.
    ///
    /// A missing department counts as non-acting; a missing character
    /// counts as credited.
    pub fn credited_cast(&self, limit: usize) -> Vec<&str> {
        self.cast
            .iter()
            .filter(|c| c.known_for_department.as_deref() == Some("Acting"))
            .filter(|c| {
                !c.character
                    .as_deref()
                    .unwrap_or_default()
                    .contains("(uncredited)")
            })
            .map(|c| c.name.as_str())
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseDates {
    #[serde(deserialize_with = "null_default")]
    pub results: Vec<RegionReleases>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionReleases {
    #[serde(deserialize_with = "null_default")]
    pub iso_3166_1: String,
    #[serde(deserialize_with = "null_default")]
    pub release_dates: Vec<ReleaseEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseEntry {
    pub certification: Option<String>,
}

impl ReleaseDates {
    /// Certification for `region`: the last non-empty value across all of
    /// that region's release entries, or `None`.
    pub fn certification(&self, region: &str) -> Option<&str> {
        self.results
            .iter()
            .filter(|r| r.iso_3166_1 == region)
            .flat_map(|r| r.release_dates.iter())
            .filter_map(|d| d.certification.as_deref())
            .filter(|c| !c.trim().is_empty())
            .last()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Videos {
    #[serde(deserialize_with = "null_default")]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Video {
    #[serde(deserialize_with = "null_default")]
    pub key: String,
    #[serde(deserialize_with = "null_default")]
    pub site: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub video_type: String,
    #[serde(deserialize_with = "null_default")]
    pub iso_3166_1: String,
    /// Declared vertical resolution (360, 480, 720, 1080, ...).
    pub size: Option<u32>,
}

impl Videos {
    /// Highest-resolution trailer for `region` hosted on `site`.
    ///
    /// Equal sizes keep the earliest listed video; a missing size ranks
    /// below any declared one.
    pub fn best_trailer(&self, region: &str, site: &str) -> Option<&Video> {
        self.results
            .iter()
            .filter(|v| v.video_type == "Trailer" && v.site == site && v.iso_3166_1 == region)
            .filter(|v| !v.key.is_empty())
            .reduce(|best, v| {
                if v.size.unwrap_or(0) > best.size.unwrap_or(0) {
                    v
                } else {
                    best
                }
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WatchProviders {
    #[serde(deserialize_with = "null_default")]
    pub results: HashMap<String, RegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegionProviders {
    #[serde(deserialize_with = "null_default")]
    pub flatrate: Vec<Provider>,
    #[serde(deserialize_with = "null_default")]
    pub free: Vec<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Provider {
    #[serde(deserialize_with = "null_default")]
    pub provider_name: String,
}

impl WatchProviders {
    /// Provider buckets for `region`. No fallback to other regions.
    pub fn region(&self, region: &str) -> Option<&RegionProviders> {
        self.results.get(region)
    }
}

impl RegionProviders {
    /// Subscription streaming services.
    pub fn flatrate_names(&self) -> Vec<&str> {
        names(&self.flatrate)
    }

    /// Free, ad-supported services.
    pub fn free_names(&self) -> Vec<&str> {
        names(&self.free)
    }
}

fn names(providers: &[Provider]) -> Vec<&str> {
    providers.iter().map(|p| p.provider_name.as_str()).collect()
}
