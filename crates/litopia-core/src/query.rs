//! FilterState → search request.

use serde::Serialize;

use crate::config::{ApiConfig, CatalogConfig};
use crate::models::FilterState;

/// Genre checkbox values and the English search terms they stand for.
const GENRE_SYNONYMS: &[(&str, &str)] = &[
    ("fiksi", "fiction"),
    ("nonfiksi", "nonfiction"),
    ("romance", "romance"),
    ("thriller", "thriller"),
    ("selfhelp", "self-help"),
    ("bisnis", "business"),
];

/// A fully formed volumes search, independent of any HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub lang_restrict: String,
    pub print_type: String,
}

impl SearchRequest {
    /// Query-string pairs in the order the API documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("maxResults", self.max_results.to_string()),
            ("langRestrict", self.lang_restrict.clone()),
            ("printType", self.print_type.clone()),
        ]
    }
}

/// Builds requests with fixed parameters taken from config.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    fallback_query: String,
    max_results: u32,
    lang_restrict: String,
    print_type: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default(), &CatalogConfig::default())
    }
}

impl QueryBuilder {
    pub fn from_config(api: &ApiConfig, catalog: &CatalogConfig) -> Self {
        Self {
            fallback_query: catalog.fallback_query.clone(),
            max_results: api.max_results,
            lang_restrict: api.lang_restrict.clone(),
            print_type: api.print_type.clone(),
        }
    }

    pub fn build(&self, filters: &FilterState) -> SearchRequest {
        let mut query = if filters.keyword.is_empty() {
            self.fallback_query.clone()
        } else {
            filters.keyword.clone()
        };

        if !filters.genres.is_empty() {
            let terms: Vec<&str> = filters.genres.iter().map(|g| genre_term(g)).collect();
            query.push(' ');
            query.push_str(&terms.join(" OR "));
        }

        SearchRequest {
            query,
            max_results: self.max_results,
            lang_restrict: self.lang_restrict.clone(),
            print_type: self.print_type.clone(),
        }
    }
}

fn genre_term(genre: &str) -> &str {
    GENRE_SYNONYMS
        .iter()
        .find(|(value, _)| *value == genre)
        .map_or(genre, |&(_, term)| term)
}
