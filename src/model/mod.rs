use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Slug the Books API uses for a bestseller category, e.g. `hardcover-fiction`.
pub type ListId = String;

/// Normalised projection of a single book entry returned by the Books API.
///
/// Only the fields the printed sheet needs are kept; everything else in the
/// raw payload is discarded during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub rank: u32,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Cover art location. The API sends `null` for books without artwork.
    pub cover_image_url: Option<String>,
}

/// One entry of the `[lists]` settings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub identifier: ListId,
    pub enabled: bool,
}

impl ListConfig {
    pub fn new(identifier: impl Into<ListId>, enabled: bool) -> Self {
        Self {
            identifier: identifier.into(),
            enabled,
        }
    }
}

/// A bestseller list as fetched from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestsellerList {
    pub identifier: ListId,
    /// Date the list was published by the API, used in the sheet header.
    pub published_date: NaiveDate,
    /// Books in the order the API ranked them.
    pub books: Vec<BookRecord>,
}

impl BestsellerList {
    /// Human readable name of the list, e.g. `Hardcover Fiction`.
    pub fn title(&self) -> String {
        list_title(&self.identifier)
    }
}

/// Turns a list slug into a display title by replacing every `-` with a
/// space and capitalising each word.
pub fn list_title(identifier: &str) -> String {
    identifier
        .split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
