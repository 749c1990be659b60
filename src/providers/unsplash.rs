//! Destination photos via the Unsplash search API

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::ImageSearch;
use crate::config::ImageConfig;
use crate::{Error, Result};

/// Unsplash photo search endpoint
const SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// Unsplash caps `per_page` at this value
pub const MAX_PER_PAGE: usize = 30;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Image search backed by Unsplash
pub struct UnsplashClient {
    client: reqwest::Client,
    access_key: SecretString,
    orientation: String,
}

impl UnsplashClient {
    /// Create a client from the image configuration
    ///
    /// # Errors
    ///
    /// Returns error if the access key is empty or the HTTP client cannot be built
    pub fn new(access_key: SecretString, images: &ImageConfig) -> Result<Self> {
        if access_key.expose_secret().is_empty() {
            return Err(Error::Config("Unsplash access key required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(images.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            access_key,
            orientation: images.orientation.clone(),
        })
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<Url>> {
        let per_page = count.clamp(1, MAX_PER_PAGE).to_string();

        let response = self
            .client
            .get(SEARCH_URL)
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key.expose_secret()),
            )
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", self.orientation.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ImageSearch(format!(
                "Unsplash error {status}: {body}"
            )));
        }

        let result: SearchResponse = response.json().await?;
        let urls = collect_urls(result, count);

        tracing::debug!(query, found = urls.len(), "image search complete");
        Ok(urls)
    }
}

/// Image search used when no provider key is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageSearch;

#[async_trait]
impl ImageSearch for DisabledImageSearch {
    async fn search_images(&self, query: &str, _count: usize) -> Result<Vec<Url>> {
        tracing::debug!(query, "image search disabled");
        Ok(Vec::new())
    }
}

fn collect_urls(response: SearchResponse, count: usize) -> Vec<Url> {
    response
        .results
        .into_iter()
        .filter_map(|photo| match Url::parse(&photo.urls.regular) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(url = %photo.urls.regular, error = %e, "skipping bad image url");
                None
            }
        })
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        let result = UnsplashClient::new(SecretString::from(String::new()), &ImageConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn keeps_regular_urls_in_order() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"results":[
                {"urls":{"regular":"https://images.example/1.jpg","small":"x"}},
                {"urls":{"regular":"not a url"}},
                {"urls":{"regular":"https://images.example/2.jpg"}},
                {"urls":{"regular":"https://images.example/3.jpg"}}
            ]}"#,
        )
        .unwrap();

        let urls = collect_urls(response, 2);
        assert_eq!(
            urls.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec!["https://images.example/1.jpg", "https://images.example/2.jpg"]
        );
    }

    #[test]
    fn disabled_search_returns_nothing() {
        let urls = tokio_test::block_on(DisabledImageSearch.search_images("goa", 6)).unwrap();
        assert!(urls.is_empty());
    }
}
