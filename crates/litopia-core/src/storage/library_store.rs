//! The user's saved books, kept as one JSON array under a fixed key.

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::models::{AddOutcome, Book, LibraryEntry};
use crate::storage::kv::KeyValueStore;

pub const LIBRARY_KEY: &str = "litopiaLibrary";

/// Append-only, one entry per book id. Every call re-reads and rewrites the
/// whole collection.
pub struct LibraryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> LibraryStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, LIBRARY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored entries. Unreadable or malformed data reads as an empty library.
    pub fn entries(&self) -> Vec<LibraryEntry> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, error = %e, "library unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries().iter().any(|entry| entry.id == id)
    }

    pub fn add(&mut self, book: &Book) -> AddOutcome {
        self.add_at(book, Utc::now())
    }

    /// Save `book` unless an entry with its id already exists. A failed write
    /// is logged and otherwise ignored.
    pub fn add_at(&mut self, book: &Book, timestamp: DateTime<Utc>) -> AddOutcome {
        let mut entries = self.entries();
        if entries.iter().any(|entry| entry.id == book.id) {
            debug!(id = %book.id, "already in library");
            return AddOutcome::AlreadyPresent;
        }

        entries.push(LibraryEntry::from_book(book, timestamp));
        if let Err(e) = self.write(&entries) {
            error!(id = %book.id, error = %e, "failed to save library");
        } else {
            debug!(id = %book.id, title = %book.title, total = entries.len(), "added to library");
        }
        AddOutcome::Added
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> Result<Vec<LibraryEntry>> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&mut self, entries: &[LibraryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(&self.key, &json)
    }
}
