//! Serper API request and response structures

use serde::{Deserialize, Serialize};

/// Body of `POST /search`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
}

/// Body of `POST /images`, pinned to US English with autocorrect on
#[derive(Debug, Serialize)]
pub struct ImageSearchRequest<'a> {
    pub q: &'a str,
    pub gl: &'static str,
    pub hl: &'static str,
    pub autocorrect: bool,
}

impl<'a> ImageSearchRequest<'a> {
    pub fn new(q: &'a str) -> Self {
        Self {
            q,
            gl: "us",
            hl: "en",
            autocorrect: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganicResponse {
    pub organic: Option<Vec<OrganicResult>>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagesResponse {
    pub images: Option<Vec<ImageResult>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub image_url: Option<String>,
    /// Page the image was found on
    pub source: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_body() {
        let body = serde_json::to_value(ImageSearchRequest::new("rust crab")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"q": "rust crab", "gl": "us", "hl": "en", "autocorrect": true})
        );
    }

    #[test]
    fn test_organic_defaults_missing_fields() {
        let response: OrganicResponse =
            serde_json::from_str(r#"{"organic": [{"link": "https://www.rust-lang.org/"}]}"#)
                .unwrap();
        let first = &response.organic.unwrap()[0];
        assert_eq!(first.title, "");
        assert_eq!(first.snippet, "");
        assert_eq!(first.link, "https://www.rust-lang.org/");
    }

    #[test]
    fn test_image_result_uses_camel_case() {
        let response: ImagesResponse = serde_json::from_str(
            r#"{"images": [{"title": "Ferris", "imageUrl": "https://x/ferris.png",
                "source": "rustacean.net"}]}"#,
        )
        .unwrap();
        let image = &response.images.unwrap()[0];
        assert_eq!(image.image_url.as_deref(), Some("https://x/ferris.png"));
        assert_eq!(image.source.as_deref(), Some("rustacean.net"));
        assert_eq!(image.title.as_deref(), Some("Ferris"));
    }
}
