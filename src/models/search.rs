//! Search answer returned by `/search/{query}`

use serde::{Deserialize, Serialize};

/// The first organic hit, optionally paired with a representative image.
///
/// `image_url` and `image_source` are serialized as `null` when no image
/// passed the filter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    /// Link of the organic result
    pub source: String,
    pub image_url: Option<String>,
    /// Page the image was found on, as reported by the provider
    pub image_source: Option<String>,
}
