use std::time::Duration;

use async_trait::async_trait;
use litopia_core::{ApiConfig, RawVolume, SearchRequest, VolumesResponse};
use reqwest::Url;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::http::RateLimitedClient;
use crate::sources::BookSource;

pub struct GoogleBooksSource {
    client: RateLimitedClient,
    base_url: String,
}

impl GoogleBooksSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_params(
            &config.base_url,
            Duration::from_millis(config.min_interval_ms),
            config.max_retries,
            &config.user_agent,
        )
    }

    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        max_retries: u32,
        user_agent: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new(min_interval, max_retries, user_agent)?,
            base_url: base_url.to_string(),
        })
    }

    /// `{base}/volumes?q=..&maxResults=..&langRestrict=..&printType=..`
    pub fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let mut url = self.volumes_url(&[])?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    fn volumes_url(&self, extra: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Parse(format!("invalid URL {}: {e}", self.base_url)))?;
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| SourceError::Parse("invalid Google Books base URL".to_string()))?;
            segs.pop_if_empty().push("volumes").extend(extra);
        }
        Ok(url)
    }
}

#[async_trait]
impl BookSource for GoogleBooksSource {
    fn name(&self) -> &str {
        "googlebooks"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawVolume>> {
        let url = self.search_url(request)?;
        debug!(url = %url, "fetching from Google Books");
        let response: VolumesResponse = self.client.get_json(url.as_str()).await?;
        let items = response.into_items();
        debug!(count = items.len(), "Google Books response");
        Ok(items)
    }

    async fn fetch_volume(&self, id: &str) -> Result<RawVolume> {
        let url = self.volumes_url(&[id])?;
        let volume: RawVolume = self.client.get_json(url.as_str()).await?;
        if volume.id.is_empty() {
            return Err(SourceError::NotFound(id.to_string()));
        }
        Ok(volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litopia_core::{FilterState, QueryBuilder};
    use mockito::{Matcher, Server};

    fn source(base_url: &str) -> GoogleBooksSource {
        GoogleBooksSource::with_params(base_url, Duration::from_millis(1), 0, "litopia-test").unwrap()
    }

    #[test]
    fn test_search_url_shape() {
        let source = source("https://www.googleapis.com/books/v1");
        let filters = FilterState {
            keyword: "bumi manusia".into(),
            genres: vec!["fiksi".into()],
            ..Default::default()
        };
        let url = source.search_url(&QueryBuilder::default().build(&filters)).unwrap();
        assert_eq!(url.path(), "/books/v1/volumes");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "bumi manusia fiction".to_string()),
                ("maxResults".to_string(), "40".to_string()),
                ("langRestrict".to_string(), "id,en".to_string()),
                ("printType".to_string(), "books".to_string()),
            ]
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let source = source("https://example.test/books/v1/");
        let url = source.volumes_url(&["abc"]).unwrap();
        assert_eq!(url.path(), "/books/v1/volumes/abc");
    }

    #[tokio::test]
    async fn test_search_parses_items() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "bestseller".into()),
                Matcher::UrlEncoded("maxResults".into(), "40".into()),
                Matcher::UrlEncoded("printType".into(), "books".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "kind": "books#volumes",
                "totalItems": 2,
                "items": [
                    {"id": "zyTCAlFPjgYC", "volumeInfo": {
                        "title": "The Google Story",
                        "authors": ["David A. Vise", "Mark Malseed"],
                        "publishedDate": "2005-11-15",
                        "pageCount": 207,
                        "categories": ["Browsers (Computer programs)"],
                        "averageRating": 3.5
                    }},
                    {"id": "bare"}
                ]
            }"#,
            )
            .create_async()
            .await;

        let source = source(&server.url());
        let request = QueryBuilder::default().build(&FilterState::default());
        let items = source.search(&request).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "zyTCAlFPjgYC");
        let info = items[0].volume_info.as_ref().unwrap();
        assert_eq!(info.page_count, Some(207));
        assert_eq!(info.average_rating, Some(3.5));
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "books#volumes", "totalItems": 0}"#)
            .create_async()
            .await;

        let request = QueryBuilder::default().build(&FilterState::default());
        let items = source(&server.url()).search(&request).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_volume() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes/abc123")
            .with_status(200)
            .with_body(r#"{"id": "abc123", "volumeInfo": {"title": "Negeri 5 Menara"}}"#)
            .create_async()
            .await;

        let volume = source(&server.url()).fetch_volume("abc123").await.unwrap();
        assert_eq!(volume.id, "abc123");
        assert_eq!(
            volume.volume_info.unwrap().title.as_deref(),
            Some("Negeri 5 Menara")
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_volume() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = source(&server.url()).fetch_volume("missing").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
