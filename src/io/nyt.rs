//! Client for the `lists/current` endpoint of the New York Times Books API.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::config::ApiConfig;
use crate::error::{Result, ToolError};
use crate::io::http::Transport;
use crate::model::{BestsellerList, BookRecord};

/// Builds the URL of the current edition of `identifier`.
pub fn list_url(api: &ApiConfig, identifier: &str) -> String {
    format!(
        "{}/lists/current/{identifier}.json?api-key={}",
        api.base_url.trim_end_matches('/'),
        api.key
    )
}

/// Downloads the current edition of a bestseller list.
#[instrument(level = "info", skip(transport, api))]
pub fn fetch_list(
    transport: &dyn Transport,
    api: &ApiConfig,
    identifier: &str,
) -> Result<BestsellerList> {
    let body = transport.get(&list_url(api, identifier))?;
    let list = parse_list_response(identifier, &body)?;
    info!(
        book_count = list.books.len(),
        published = %list.published_date,
        "fetched bestseller list"
    );
    Ok(list)
}

/// Decodes a `lists/current` response body.
///
/// The envelope must contain `results.books` and `results.published_date`;
/// each book must carry the five fields kept in a [`BookRecord`].
pub fn parse_list_response(identifier: &str, body: &[u8]) -> Result<BestsellerList> {
    let document: Value = serde_json::from_slice(body)?;

    let results = document
        .get("results")
        .and_then(Value::as_object)
        .ok_or_else(|| ToolError::schema(identifier, "results"))?;

    let books = results
        .get("books")
        .and_then(Value::as_array)
        .ok_or_else(|| ToolError::schema(identifier, "results.books"))?;

    let published_date = results
        .get("published_date")
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .ok_or_else(|| ToolError::schema(identifier, "results.published_date"))?;

    let books = books
        .iter()
        .enumerate()
        .map(|(index, book)| extract_book(identifier, index, book))
        .collect::<Result<Vec<_>>>()?;

    Ok(BestsellerList {
        identifier: identifier.to_string(),
        published_date,
        books,
    })
}

fn extract_book(identifier: &str, index: usize, book: &Value) -> Result<BookRecord> {
    let path = |field: &str| format!("results.books[{index}].{field}");
    let object = book
        .as_object()
        .ok_or_else(|| ToolError::schema(identifier, format!("results.books[{index}]")))?;

    let rank = object
        .get("rank")
        .and_then(Value::as_u64)
        .and_then(|rank| u32::try_from(rank).ok())
        .ok_or_else(|| ToolError::schema(identifier, path("rank")))?;

    let text = |field: &str| -> Result<String> {
        string_field(object, field).ok_or_else(|| ToolError::schema(identifier, path(field)))
    };

    let cover_image_url = match object.get("book_image") {
        Some(Value::String(url)) if !url.trim().is_empty() => Some(url.clone()),
        Some(Value::String(_)) | Some(Value::Null) => None,
        _ => return Err(ToolError::schema(identifier, path("book_image"))),
    };

    Ok(BookRecord {
        rank,
        title: text("title")?,
        author: text("author")?,
        description: text("description")?,
        cover_image_url,
    })
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_string)
}
