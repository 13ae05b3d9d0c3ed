//! Settings file handling.
//!
//! The tool is driven by a small TOML document holding the API key, the
//! organization shown in every sheet title, and the bestseller lists to
//! include. List order in the file is the sheet order in the workbook.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::ListConfig;

/// Location of the settings file when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
/// Root of the Books API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.nytimes.com/svc/books/v3";
/// Directory the workbook is written to unless overridden.
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub organization: String,
    pub output_dir: PathBuf,
    pub render: RenderConfig,
    pub lists: Vec<ListConfig>,
}

/// Connection details for the Books API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub key: String,
    pub base_url: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Options affecting how sheets are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Abort the run when a cover image cannot be fetched or decoded instead
    /// of leaving that row without artwork.
    pub strict_images: bool,
}

#[derive(Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    general: Option<RawGeneral>,
    #[serde(default)]
    render: RenderConfig,
    #[serde(default)]
    lists: toml::Table,
}

#[derive(Deserialize)]
struct RawApi {
    key: Option<String>,
    base_url: Option<String>,
}

#[derive(Deserialize)]
struct RawGeneral {
    organization: Option<String>,
    output_dir: Option<PathBuf>,
}

impl Config {
    /// Reads and validates the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        debug!(
            path = %path.display(),
            lists = config.lists.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(source).map_err(|err| ToolError::Config(err.to_string()))?;

        let api = raw.api.unwrap_or(RawApi {
            key: None,
            base_url: None,
        });
        let key = required(api.key, "api.key")?;
        let base_url = api
            .base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let general = raw.general.unwrap_or(RawGeneral {
            organization: None,
            output_dir: None,
        });
        let organization = required(general.organization, "general.organization")?;
        let output_dir = general
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let lists = raw
            .lists
            .into_iter()
            .map(|(identifier, flag)| ListConfig::new(identifier, is_enabled(&flag)))
            .collect();

        Ok(Self {
            api: ApiConfig { key, base_url },
            organization,
            output_dir,
            render: raw.render,
            lists,
        })
    }

    /// Identifiers of the lists switched on, in file order.
    pub fn enabled_lists(&self) -> impl Iterator<Item = &str> {
        self.lists
            .iter()
            .filter(|list| list.enabled)
            .map(|list| list.identifier.as_str())
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ToolError::Config(format!("missing required setting '{key}'"))),
    }
}

/// A list is included when flagged `true` or `"Yes"`; any other value turns
/// it off.
fn is_enabled(flag: &toml::Value) -> bool {
    match flag {
        toml::Value::Boolean(value) => *value,
        toml::Value::String(value) => value.trim().eq_ignore_ascii_case("yes"),
        _ => false,
    }
}
