use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Book ───────────────────────────────────────────────────

/// Display model for one search result. Built once per fetch and replaced
/// wholesale by the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub year: i32,
    pub pages: u32,
    pub rating: f64,
    /// True when the API had no rating and `rating` is a stand-in.
    #[serde(default)]
    pub rating_is_placeholder: bool,
    pub image: String,
    pub description: String,
    pub publisher: String,
    pub language: String,
}

impl Book {
    /// Number of stars shown on a card.
    pub fn stars(&self) -> usize {
        self.rating.round().clamp(0.0, 5.0) as usize
    }
}

// ─── Genre ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "Fiksi")]
    Fiction,
    #[serde(rename = "Romance")]
    Romance,
    #[serde(rename = "Thriller")]
    Thriller,
    #[serde(rename = "Self Help")]
    SelfHelp,
    #[serde(rename = "Bisnis")]
    Business,
    #[serde(rename = "Non-Fiksi")]
    NonFiction,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl Genre {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fiction => "Fiksi",
            Self::Romance => "Romance",
            Self::Thriller => "Thriller",
            Self::SelfHelp => "Self Help",
            Self::Business => "Bisnis",
            Self::NonFiction => "Non-Fiksi",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
