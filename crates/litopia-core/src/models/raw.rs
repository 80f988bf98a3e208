//! Wire shapes of the Google Books volumes API. Every field is optional.

use serde::{Deserialize, Serialize};

/// Top-level search response. `items` is omitted by the API when nothing matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub items: Option<Vec<RawVolume>>,
}

impl VolumesResponse {
    pub fn into_items(self) -> Vec<RawVolume> {
        self.items.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVolume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub average_rating: Option<f64>,
    pub image_links: Option<ImageLinks>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sparse_response() {
        let json = r#"{
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {"id": "abc", "volumeInfo": {"title": "Laskar Pelangi", "pageCount": 529,
                  "imageLinks": {"thumbnail": "http://books.google.com/x?id=abc&zoom=1"}}},
                {"id": "def"}
            ]
        }"#;
        let resp: VolumesResponse = serde_json::from_str(json).unwrap();
        let items = resp.into_items();
        assert_eq!(items.len(), 2);
        let info = items[0].volume_info.as_ref().unwrap();
        assert_eq!(info.page_count, Some(529));
        assert!(info.image_links.as_ref().unwrap().thumbnail.is_some());
        assert!(items[1].volume_info.is_none());
    }

    #[test]
    fn test_missing_items_is_empty() {
        let resp: VolumesResponse = serde_json::from_str(r#"{"totalItems": 0}"#).unwrap();
        assert!(resp.into_items().is_empty());
    }
}
