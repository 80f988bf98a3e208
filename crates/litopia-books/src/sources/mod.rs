use async_trait::async_trait;
use litopia_core::{RawVolume, SearchRequest};

use crate::error::Result;

pub mod google_books;

/// A remote catalog of book records.
#[async_trait]
pub trait BookSource: Send + Sync {
    fn name(&self) -> &str;

    /// Run a search and return the raw records, in API order.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawVolume>>;

    /// Fetch one record by its id.
    async fn fetch_volume(&self, id: &str) -> Result<RawVolume>;
}
