//! Web + image search aggregation backed by Serper
//!
//! One organic search and one image search are issued for the same query.
//! The first organic hit is returned together with the first image whose URL
//! looks displayable.

use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::SearchConfig;
use crate::models::SearchResult;
use crate::upstream::read_json;
use crate::{Result, VoiceRelayError};

pub mod serper;

use serper::{ImageResult, ImageSearchRequest, ImagesResponse, OrganicResponse, SearchRequest};

/// Suffixes accepted as image files. Matched case-sensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Serper API client
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerperClient {
    pub fn new(client: Client, config: &SearchConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run both searches for `query` and reduce them to a single result
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let start_time = Instant::now();

        // Independent calls; either failing fails the whole search.
        let (organic, images) = tokio::try_join!(self.organic(query), self.images(query))?;
        let result = build_result(organic, images)?;

        info!(
            "Search for '{}' answered with '{}' (image: {}) in {:.3}s",
            query,
            result.source,
            result.image_url.is_some(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn organic(&self, query: &str) -> Result<OrganicResponse> {
        let url = format!("{}/search", self.base_url);
        debug!("Serper organic search request URL: {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", self.api_key.as_str())
            .json(&SearchRequest { q: query })
            .send()
            .await?;
        read_json(response, "Serper search").await
    }

    #[instrument(skip(self))]
    async fn images(&self, query: &str) -> Result<ImagesResponse> {
        let url = format!("{}/images", self.base_url);
        debug!("Serper image search request URL: {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", self.api_key.as_str())
            .json(&ImageSearchRequest::new(query))
            .send()
            .await?;
        read_json(response, "Serper images").await
    }
}

/// Take the first organic hit and pair it with the first displayable image
pub fn build_result(organic: OrganicResponse, images: ImagesResponse) -> Result<SearchResult> {
    let Some(first) = organic.organic.and_then(|hits| hits.into_iter().next()) else {
        return Err(VoiceRelayError::not_found("No results found"));
    };

    let images = images.images.unwrap_or_default();
    let image = select_image(&images);
    if let Some(img) = image {
        debug!(
            "Selected image '{}' out of {} candidates",
            img.title.as_deref().unwrap_or("untitled"),
            images.len()
        );
    }

    Ok(SearchResult {
        title: first.title,
        snippet: first.snippet,
        source: first.link,
        image_url: image.and_then(|img| img.image_url.clone()),
        image_source: image.and_then(|img| img.source.clone()),
    })
}

/// First image, in provider order, whose URL passes [`looks_like_image`]
pub fn select_image(images: &[ImageResult]) -> Option<&ImageResult> {
    images.iter().find(|img| {
        img.image_url
            .as_deref()
            .is_some_and(|url| !url.is_empty() && looks_like_image(url))
    })
}

/// Loose displayability check: a known extension at the very end of the URL
/// (case-sensitive) or `images` anywhere in it (case-insensitive).
pub fn looks_like_image(url: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
        || url.to_lowercase().contains("images")
}
