//! API client for the TVMaze REST service.
//!
//! This module provides the [`Catalog`] abstraction over the two read-only
//! endpoints the browser consumes, and [`TvMazeClient`], its HTTP
//! implementation.

use crate::config::{expand_episodes_url, Config};
use crate::error::{AppError, Result};
use crate::types::{Episode, Show};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Source of show and episode data.
pub trait Catalog: Send + Sync + 'static {
    /// Fetch the full show catalog, in upstream order.
    fn fetch_shows(&self) -> impl Future<Output = Result<Vec<Show>>> + Send;

    /// Fetch every episode of one show.
    fn fetch_episodes(&self, show_id: u32) -> impl Future<Output = Result<Vec<Episode>>> + Send;
}

/// Sort shows case-insensitively by name.
///
/// The sort is stable, so shows whose names differ only by case keep their
/// upstream order.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by_cached_key(|s| s.name.to_lowercase());
}

/// HTTP client for TVMaze.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: reqwest::Client,
    shows_url: String,
    episodes_url: String,
}

impl TvMazeClient {
    /// Build a client from the endpoint templates and timeouts in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            shows_url: config.shows_url.clone(),
            episodes_url: config.episodes_url.clone(),
        })
    }

    fn episodes_url_for(&self, show_id: u32) -> String {
        expand_episodes_url(&self.episodes_url, show_id)
    }

    /// GET `url` and decode the JSON body.
    ///
    /// Transport failures and non-success statuses surface as different
    /// [`AppError`] variants and are logged as such.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!("Request to {} failed before a response: {}", url, e);
            AppError::Network(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                "Request to {} returned HTTP {} {}",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(AppError::Status(status.as_u16()));
        }

        resp.json::<T>().await.map_err(|e| {
            warn!("Response from {} could not be decoded: {}", url, e);
            AppError::Parse(e.to_string())
        })
    }
}

impl Catalog for TvMazeClient {
    async fn fetch_shows(&self) -> Result<Vec<Show>> {
        let shows: Vec<Show> = self.get_json(&self.shows_url).await?;
        debug!("Fetched {} shows", shows.len());
        Ok(shows)
    }

    async fn fetch_episodes(&self, show_id: u32) -> Result<Vec<Episode>> {
        let url = self.episodes_url_for(show_id);
        let episodes: Vec<Episode> = self.get_json(&url).await?;
        debug!("Fetched {} episodes for show {}", episodes.len(), show_id);
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(id: u32, name: &str) -> Show {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    #[test]
    fn test_sort_shows_case_insensitive() {
        let mut shows = vec![show(1, "Zeta"), show(2, "alpha"), show(3, "Beta")];
        sort_shows(&mut shows);
        let names: Vec<_> = shows.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn test_sort_shows_is_stable_for_equal_keys() {
        let mut shows = vec![show(1, "Lost"), show(2, "LOST"), show(3, "lost")];
        sort_shows(&mut shows);
        let ids: Vec<_> = shows.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_client_substitutes_show_id() {
        let client = TvMazeClient::new(&Config::new()).unwrap();
        assert_eq!(
            client.episodes_url_for(82),
            "https://api.tvmaze.com/shows/82/episodes"
        );
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let mut config = Config::new();
        config.episodes_url = "https://api.tvmaze.com/episodes".to_string();
        assert!(matches!(TvMazeClient::new(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_catalog_payload_decodes() {
        let body = r#"[
            {"id": 1, "name": "Under the Dome", "genres": ["Drama"], "rating": {"average": 6.5}},
            {"id": 2, "name": "Person of Interest", "rating": {"average": null}}
        ]"#;
        let shows: Vec<Show> = serde_json::from_str(body).unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[1].rating.average, None);
    }
}
