//! Raw API record → [`Book`].

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Book, Genre, ImageLinks, RawVolume, VolumeInfo};

pub const UNKNOWN_TITLE: &str = "Judul Tidak Tersedia";
pub const UNKNOWN_AUTHOR: &str = "Penulis Tidak Diketahui";
pub const UNKNOWN_PUBLISHER: &str = "Penerbit tidak diketahui";
pub const MISSING_DESCRIPTION: &str = "Deskripsi tidak tersedia";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x400?text=No+Image";

static ZOOM_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"&zoom=\d+").expect("static regex"));

/// How a rating is invented for records the API left unrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingPlaceholder {
    /// Fresh random value on every fetch; the same book may show a different
    /// rating after a refetch.
    #[default]
    PerFetch,
    /// Derived from the record id, so a book keeps its rating across fetches.
    StableById,
}

pub struct Normalizer {
    policy: RatingPlaceholder,
    rng: StdRng,
}

impl Normalizer {
    pub fn new(policy: RatingPlaceholder) -> Self {
        Self {
            policy,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(policy: RatingPlaceholder, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn normalize_all(&mut self, items: &[RawVolume]) -> Vec<Book> {
        items.iter().map(|item| self.normalize(item)).collect()
    }

    pub fn normalize(&mut self, item: &RawVolume) -> Book {
        let empty = VolumeInfo::default();
        let info = item.volume_info.as_ref().unwrap_or(&empty);

        let (rating, rating_is_placeholder) = match info.average_rating {
            Some(r) if r.is_finite() && r > 0.0 => (r.clamp(0.0, 5.0), false),
            _ => (self.placeholder_rating(&item.id), true),
        };

        Book {
            id: item.id.clone(),
            title: text_or(&info.title, UNKNOWN_TITLE),
            author: info
                .authors
                .as_ref()
                .filter(|authors| !authors.is_empty())
                .map(|authors| authors.join(", "))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            genre: infer_genre(info.categories.as_deref().unwrap_or_default()),
            year: info.published_date.as_deref().map_or(0, parse_year),
            pages: info.page_count.unwrap_or(0),
            rating,
            rating_is_placeholder,
            image: resolve_image(info.image_links.as_ref()),
            description: text_or(&info.description, MISSING_DESCRIPTION),
            publisher: text_or(&info.publisher, UNKNOWN_PUBLISHER),
            language: text_or(&info.language, DEFAULT_LANGUAGE),
        }
    }

    /// A value in [3.0, 5.0] with one decimal.
    fn placeholder_rating(&mut self, id: &str) -> f64 {
        let raw: f64 = match self.policy {
            RatingPlaceholder::PerFetch => self.rng.gen_range(3.0..=5.0),
            RatingPlaceholder::StableById => {
                StdRng::seed_from_u64(fnv1a(id.as_bytes())).gen_range(3.0..=5.0)
            }
        };
        (raw * 10.0).round() / 10.0
    }
}

/// 64-bit FNV-1a, stable across toolchains.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

/// Map the first category onto the fixed genre vocabulary. First rule wins.
pub fn infer_genre(categories: &[String]) -> Genre {
    let Some(first) = categories.first() else {
        return Genre::Uncategorized;
    };
    let category = first.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| category.contains(n));

    if has(&["fiction", "novel"]) {
        Genre::Fiction
    } else if has(&["romance", "love"]) {
        Genre::Romance
    } else if has(&["thriller", "mystery", "suspense"]) {
        Genre::Thriller
    } else if has(&["self", "help", "motivat"]) {
        Genre::SelfHelp
    } else if has(&["business", "economics", "finance"]) {
        Genre::Business
    } else {
        // history, biography, science and everything unmatched
        Genre::NonFiction
    }
}

/// Year from the leading digits of the first four characters; 0 if none.
pub fn parse_year(date: &str) -> i32 {
    let digits: String = date
        .chars()
        .take(4)
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Best available cover, upgraded to https with the zoom parameter removed.
pub fn resolve_image(links: Option<&ImageLinks>) -> String {
    let Some(links) = links else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    let candidate = [&links.medium, &links.small, &links.thumbnail, &links.small_thumbnail]
        .into_iter()
        .find_map(|link| link.as_deref().filter(|s| !s.is_empty()));

    match candidate {
        Some(url) => {
            let secure = url.replacen("http://", "https://", 1);
            ZOOM_PARAM.replacen(&secure, 1, "").into_owned()
        }
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
