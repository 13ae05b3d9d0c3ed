//! Lays fetched bestseller lists out as printable sheets.
//!
//! A [`SheetLayout`] captures everything that ends up in one worksheet: the
//! two header blocks, one row per book and its decoded cover art. The
//! [`excel_write`](crate::io::excel_write) module turns layouts into styled
//! cells.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_xlsxwriter::Image;
use tracing::{debug, instrument, warn};

use crate::error::{Result, ToolError};
use crate::io::http::Transport;
use crate::model::{BestsellerList, BookRecord};

/// Bold lead-in of the title block.
pub const TITLE_LEAD: &str = "BEST SELLERS";
/// Value written to the status column; staff fill in "Have"/"On Order" by hand.
pub const STATUS_PLACEHOLDER: &str = "-";
/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Every sheet that goes into the output workbook, in order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub sheets: Vec<SheetLayout>,
}

/// Content of a single worksheet.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Worksheet tab name, already valid for Excel.
    pub sheet_name: String,
    /// Plain part of the title block following [`TITLE_LEAD`].
    pub title_suffix: String,
    pub date_header: String,
    pub rows: Vec<BookRow>,
}

impl SheetLayout {
    /// Full text of the title block.
    pub fn title_text(&self) -> String {
        format!("{TITLE_LEAD}{}", self.title_suffix)
    }
}

/// One book line of a sheet.
#[derive(Debug, Clone)]
pub struct BookRow {
    pub status: String,
    pub rank: u32,
    /// Rendered bold.
    pub title: String,
    /// `" by {author}\n{description}"`, rendered plain after the title.
    pub details: String,
    pub cover: Option<CoverImage>,
}

impl BookRow {
    /// Text of the merged description cell, title included.
    pub fn text(&self) -> String {
        format!("{}{}", self.title, self.details)
    }
}

/// Downloaded cover art for a row, already decoded for embedding.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub url: String,
    pub image: Image,
}

/// Fetches cover art, applying the configured failure policy.
pub struct CoverLoader<'a> {
    transport: &'a dyn Transport,
    strict: bool,
}

impl<'a> CoverLoader<'a> {
    /// With `strict` set, a failed download or an undecodable image aborts
    /// the run; otherwise the row is kept without artwork.
    pub fn new(transport: &'a dyn Transport, strict: bool) -> Self {
        Self { transport, strict }
    }

    /// Downloads the cover of `book`, if it has one.
    pub fn load(&self, book: &BookRecord) -> Result<Option<CoverImage>> {
        let Some(url) = book.cover_image_url.as_deref() else {
            debug!(rank = book.rank, "no cover image, skipping");
            return Ok(None);
        };

        match self.download(url) {
            Ok(cover) => Ok(Some(cover)),
            Err(err) if !self.strict => {
                warn!(rank = book.rank, error = %err, "leaving row without cover image");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn download(&self, url: &str) -> Result<CoverImage> {
        let bytes = self.transport.get(url).map_err(|err| ToolError::Image {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        let image = Image::new_from_buffer(&bytes).map_err(|err| ToolError::Image {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(CoverImage {
            url: url.to_string(),
            image,
        })
    }
}

/// Builds the layout of one list. Rows keep the order of `list.books`.
#[instrument(level = "debug", skip_all, fields(list = %list.identifier))]
pub fn build_sheet(
    list: &BestsellerList,
    sheet_name: String,
    organization: &str,
    covers: &CoverLoader<'_>,
) -> Result<SheetLayout> {
    let rows = list
        .books
        .iter()
        .map(|book| book_row(book, covers))
        .collect::<Result<Vec<_>>>()?;

    Ok(SheetLayout {
        sheet_name,
        title_suffix: title_suffix(organization),
        date_header: date_header(&list.title(), list.published_date),
        rows,
    })
}

fn book_row(book: &BookRecord, covers: &CoverLoader<'_>) -> Result<BookRow> {
    Ok(BookRow {
        status: STATUS_PLACEHOLDER.to_string(),
        rank: book.rank,
        title: book.title.clone(),
        details: book_details(book),
        cover: covers.load(book)?,
    })
}

/// Plain text following the bold title: author on the first line, blurb below.
pub fn book_details(book: &BookRecord) -> String {
    format!(" by {}\n{}", book.author, book.description)
}

pub fn title_suffix(organization: &str) -> String {
    format!(" In the {organization} Collection")
}

/// Second header line, dated with the list's publication date.
pub fn date_header(list_title: &str, published: NaiveDate) -> String {
    format!(
        "The New York Times - {list_title} - {}",
        published.format("%B %d, %Y")
    )
}

/// Hands out unique, Excel-safe worksheet names.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix: String = base
                .chars()
                .take(MAX_SHEET_NAME_LEN - suffix.len())
                .collect();
            let candidate = format!("{prefix}{suffix}");
            // Excel compares sheet names case-insensitively.
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim().trim_matches('\'');
    if sanitized.is_empty() {
        return "Sheet".to_string();
    }

    sanitized
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect::<String>()
        .trim_end()
        .to_string()
}
