#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use nyt_bestsellers::config::Config;
use nyt_bestsellers::io::http::Transport;
use nyt_bestsellers::{Result, ToolError};
use serde_json::{Value, json};

pub const API_BASE: &str = "https://books.test/svc/books/v3";

/// Smallest valid PNG: a single transparent pixel.
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// Serves canned bodies and remembers every URL requested.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Canned>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Body(body.into()));
        self
    }

    pub fn with_json(self, url: &str, body: &Value) -> Self {
        let bytes = serde_json::to_vec(body).expect("fixture serialises");
        self.with_body(url, bytes)
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn requested(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|seen| seen == url)
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(ToolError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(ToolError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub fn list_endpoint(identifier: &str) -> String {
    format!("{API_BASE}/lists/current/{identifier}.json?api-key=test-key")
}

pub fn cover_url(rank: u32) -> String {
    format!("https://covers.test/{rank}.png")
}

/// A raw API book entry carrying the usual noise fields.
pub fn raw_book(rank: u32, title: &str, author: &str, with_cover: bool) -> Value {
    json!({
        "rank": rank,
        "rank_last_week": 0,
        "weeks_on_list": 3,
        "primary_isbn13": "9780000000000",
        "publisher": "Some House",
        "description": format!("Description of {title}."),
        "title": title,
        "author": author,
        "contributor": format!("by {author}"),
        "book_image": if with_cover { Value::String(cover_url(rank)) } else { Value::Null },
        "amazon_product_url": "https://example.test/buy",
        "buy_links": []
    })
}

pub fn list_response(published_date: &str, books: Vec<Value>) -> Value {
    json!({
        "status": "OK",
        "copyright": "Copyright (c) The New York Times Company.",
        "num_results": books.len(),
        "last_modified": "2021-09-01T22:19:52-04:00",
        "results": {
            "list_name": "Hardcover Fiction",
            "bestsellers_date": "2021-08-28",
            "published_date": published_date,
            "books": books
        }
    })
}

/// Settings enabling `lists` and writing into `output_dir`.
pub fn config_for(lists: &[(&str, &str)], output_dir: &Path) -> Config {
    let mut source = format!(
        "[api]\nkey = \"test-key\"\nbase_url = \"{API_BASE}/\"\n\n\
         [general]\norganization = \"Anacortes Public Library\"\n\n[lists]\n"
    );
    for (identifier, flag) in lists {
        source.push_str(&format!("{identifier} = \"{flag}\"\n"));
    }
    let mut config = Config::from_toml_str(&source).expect("test config parses");
    config.output_dir = output_dir.to_path_buf();
    config
}
