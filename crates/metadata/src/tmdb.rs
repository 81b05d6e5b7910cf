//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use reelsync_core::{CatalogSearchResult, MediaKind};
use tracing::{debug, info};

use crate::MetadataError;
use crate::provider::{CatalogProvider, RawDetailRecord};

const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Sub-resources appended to every movie detail request.
const MOVIE_APPEND: &str = "credits,release_dates,videos,watch/providers";
const TV_APPEND: &str = "credits,content_ratings,videos,watch/providers";

pub struct TmdbClient {
    api_key: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Verify the API key against the authentication endpoint.
    pub async fn authenticate(&self) -> Result<(), MetadataError> {
        let data = self.get_json("/authentication", &[]).await?;
        if data["success"].as_bool() == Some(true) {
            info!("TMDB API key accepted");
            Ok(())
        } else {
            Err(MetadataError::Unavailable(
                "TMDB rejected the API key".to_string(),
            ))
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{BASE_URL}{path}");
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?;

        if let Some(err) = status_error(resp.status()) {
            return Err(err);
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Malformed(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, title: &str) -> Result<Vec<CatalogSearchResult>, MetadataError> {
        let data = self
            .get_json(
                "/search/multi",
                &[("query", title), ("include_adult", "false")],
            )
            .await?;

        let results = parse_search_results(&data);
        debug!(title, count = results.len(), "TMDB search complete");
        Ok(results)
    }

    async fn fetch_details(
        &self,
        catalog_id: u64,
        kind: &MediaKind,
    ) -> Result<RawDetailRecord, MetadataError> {
        let (path, append) = match kind {
            MediaKind::Movie => (format!("/movie/{catalog_id}"), MOVIE_APPEND),
            MediaKind::Tv => (format!("/tv/{catalog_id}"), TV_APPEND),
            MediaKind::Unsupported(tag) => {
                return Err(MetadataError::UnsupportedKind(tag.clone()));
            }
        };

        let body = self
            .get_json(&path, &[("append_to_response", append)])
            .await?;
        info!(catalog_id, kind = %kind, "fetched TMDB details");

        Ok(RawDetailRecord {
            catalog_id,
            kind: kind.clone(),
            body,
        })
    }
}

/// Map a non-success response status to an error.
///
/// 404 means the item does not exist; every other failure, auth included,
/// means the catalog cannot be used right now.
fn status_error(status: reqwest::StatusCode) -> Option<MetadataError> {
    use reqwest::StatusCode;

    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::NOT_FOUND => MetadataError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            MetadataError::Unavailable(format!("TMDB authentication failed ({status})"))
        }
        _ => MetadataError::Unavailable(format!("TMDB returned {status}")),
    })
}

/// Parse a `/search/multi` response, keeping catalog order.
///
/// Entries without a numeric id are dropped. Movies carry `title`, series
/// and people carry `name`.
pub fn parse_search_results(data: &serde_json::Value) -> Vec<CatalogSearchResult> {
    let results = data["results"].as_array().cloned().unwrap_or_default();

    results
        .iter()
        .filter_map(|r| {
            let catalog_id = r["id"].as_u64()?;
            let kind = MediaKind::from_tag(r["media_type"].as_str().unwrap_or_default());
            let title = r["title"]
                .as_str()
                .or_else(|| r["name"].as_str())
                .unwrap_or("Unknown")
                .to_string();
            Some(CatalogSearchResult {
                catalog_id,
                kind,
                title,
            })
        })
        .collect()
}
