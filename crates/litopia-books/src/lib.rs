//! Google Books client and the catalog session that drives it.

pub mod error;
pub mod http;
pub mod session;
pub mod sources;

pub use error::{Result, SourceError};
pub use session::Session;
pub use sources::BookSource;
pub use sources::google_books::GoogleBooksSource;
