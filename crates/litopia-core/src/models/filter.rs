use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─── SortKey ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "titleAZ")]
    TitleAz,
    #[serde(rename = "titleZA")]
    TitleZa,
    #[serde(rename = "ratingHighLow")]
    RatingHighLow,
    #[serde(rename = "ratingLowHigh")]
    RatingLowHigh,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        Self::Newest,
        Self::Oldest,
        Self::TitleAz,
        Self::TitleZa,
        Self::RatingHighLow,
        Self::RatingLowHigh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::TitleAz => "titleAZ",
            Self::TitleZa => "titleZA",
            Self::RatingHighLow => "ratingHighLow",
            Self::RatingLowHigh => "ratingLowHigh",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown sort key '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

// ─── FilterState ────────────────────────────────────────────

/// Everything the user chose: search text, genres, ranges, sort, page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub keyword: String,
    pub sort: Option<SortKey>,
    /// Selected genre checkbox values, e.g. `fiksi`, `selfhelp`.
    pub genres: Vec<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub page_from: Option<u32>,
    pub page_to: Option<u32>,
    /// 1-based.
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            sort: None,
            genres: Vec::new(),
            year_from: None,
            year_to: None,
            page_from: None,
            page_to: None,
            current_page: 1,
        }
    }
}

impl FilterState {
    /// Genre selection as it travels on the wire: comma-joined.
    pub fn genre_param(&self) -> String {
        self.genres.join(",")
    }

    pub fn has_year_range(&self) -> bool {
        self.year_from.is_some() || self.year_to.is_some()
    }

    pub fn has_page_range(&self) -> bool {
        self.page_from.is_some() || self.page_to.is_some()
    }

    /// Parse a submitted filter form. The page is reset to 1.
    pub fn from_form(form: &FilterForm) -> Self {
        Self {
            keyword: form.keyword.trim().to_string(),
            sort: form.sort.parse().ok(),
            genres: split_genres(&form.genres.join(",")),
            year_from: parse_form_int(&form.year_from).and_then(|v| i32::try_from(v).ok()),
            year_to: parse_form_int(&form.year_to).and_then(|v| i32::try_from(v).ok()),
            page_from: parse_form_int(&form.page_from).and_then(|v| u32::try_from(v).ok()),
            page_to: parse_form_int(&form.page_to).and_then(|v| u32::try_from(v).ok()),
            current_page: 1,
        }
    }
}

// ─── FilterForm ─────────────────────────────────────────────

/// Raw text of the filter inputs, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterForm {
    pub keyword: String,
    pub sort: String,
    pub genres: Vec<String>,
    pub year_from: String,
    pub year_to: String,
    pub page_from: String,
    pub page_to: String,
}

/// Split a comma-joined genre selection, dropping blanks.
pub fn split_genres(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Integer prefix of a form field. Blank, non-numeric and zero all mean "unset".
fn parse_form_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    let value = digits[..end].parse::<i64>().ok()? * sign;
    (value != 0).then_some(value)
}
