pub mod kv;
pub mod library_store;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use library_store::LibraryStore;
