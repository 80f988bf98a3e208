pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod paginate;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod storage;

pub use catalog::{Catalog, FETCH_FAILED_MESSAGE, FetchStatus, FetchTicket};
pub use config::{ApiConfig, AppConfig, CatalogConfig, StorageConfig};
pub use error::{LitopiaError, Result};
pub use models::*;

pub use normalize::{Normalizer, RatingPlaceholder};
pub use paginate::{PageView, Paginator};
pub use pipeline::{ResultSet, recompute};
pub use query::{QueryBuilder, SearchRequest};
pub use render::{CatalogView, RenderSink};
pub use storage::{JsonFileStore, KeyValueStore, LibraryStore, MemoryStore};
