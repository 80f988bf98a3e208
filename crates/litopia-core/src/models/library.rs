use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Book, Genre};

/// A book the user saved to their library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub image: String,
    pub timestamp: DateTime<Utc>,
    pub status: LibraryStatus,
}

impl LibraryEntry {
    pub fn from_book(book: &Book, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre,
            image: book.image.clone(),
            timestamp,
            status: LibraryStatus::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryStatus {
    #[default]
    WantToRead,
}

/// Result of trying to save a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}
