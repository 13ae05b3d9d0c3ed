use reqwest::blocking::Client;
use tracing::trace;

use crate::error::{Result, ToolError};

/// Blocking GET abstraction used for both list and cover-image downloads.
///
/// Every network call of a run goes through one `Transport`, which keeps the
/// fetch and layout code independent of the HTTP stack.
pub trait Transport {
    /// Fetches `url` and returns the response body. Non-success statuses are
    /// reported as [`ToolError::HttpStatus`].
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`Transport`] backed by a `reqwest` blocking client.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().map_err(strip_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::HttpStatus {
                url: redact_api_key(url),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(strip_url)?;
        trace!(bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

// reqwest embeds the request URL in its errors, which would leak the API key.
fn strip_url(err: reqwest::Error) -> ToolError {
    ToolError::Http(err.without_url())
}

/// Replaces the value of an `api-key` query parameter with `***`.
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("api-key", _)) => "api-key=***".to_string(),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}
