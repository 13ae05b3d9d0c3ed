use std::fs;
use std::path::PathBuf;

use nyt_bestsellers::ToolError;
use nyt_bestsellers::config::{Config, DEFAULT_API_BASE_URL, DEFAULT_OUTPUT_DIR};
use nyt_bestsellers::model::ListConfig;
use tempfile::tempdir;

const SETTINGS: &str = r#"
[api]
key = "secret"

[general]
organization = "Anacortes Public Library"

[lists]
hardcover-nonfiction = "Yes"
hardcover-fiction = true
paperback-nonfiction = "No"
combined-print-and-e-book-fiction = "yes"
young-adult-hardcover = false
"#;

#[test]
fn lists_keep_file_order_and_flags() {
    let config = Config::from_toml_str(SETTINGS).expect("settings parsed");

    assert_eq!(
        config.lists,
        vec![
            ListConfig::new("hardcover-nonfiction", true),
            ListConfig::new("hardcover-fiction", true),
            ListConfig::new("paperback-nonfiction", false),
            ListConfig::new("combined-print-and-e-book-fiction", true),
            ListConfig::new("young-adult-hardcover", false),
        ]
    );
    assert_eq!(
        config.enabled_lists().collect::<Vec<_>>(),
        vec![
            "hardcover-nonfiction",
            "hardcover-fiction",
            "combined-print-and-e-book-fiction"
        ]
    );
}

#[test]
fn optional_settings_fall_back_to_defaults() {
    let config = Config::from_toml_str(SETTINGS).expect("settings parsed");

    assert_eq!(config.api.key, "secret");
    assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.organization, "Anacortes Public Library");
    assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    assert!(!config.render.strict_images);
}

#[test]
fn explicit_settings_override_defaults() {
    let source = r#"
[api]
key = "secret"
base_url = "http://localhost:8080/books/"

[general]
organization = "Town Library"
output_dir = "prints"

[render]
strict_images = true

[lists]
hardcover-fiction = "Yes"
"#;
    let config = Config::from_toml_str(source).expect("settings parsed");

    assert_eq!(config.api.base_url, "http://localhost:8080/books");
    assert_eq!(config.output_dir, PathBuf::from("prints"));
    assert!(config.render.strict_images);
}

#[test]
fn missing_api_key_is_rejected() {
    let source = "[general]\norganization = \"Town Library\"\n[lists]\nhardcover-fiction = \"Yes\"\n";

    let error = Config::from_toml_str(source).expect_err("key is required");
    assert!(matches!(error, ToolError::Config(message) if message.contains("api.key")));
}

#[test]
fn blank_organization_is_rejected() {
    let source = "[api]\nkey = \"secret\"\n[general]\norganization = \"  \"\n";

    let error = Config::from_toml_str(source).expect_err("organization is required");
    assert!(matches!(error, ToolError::Config(message) if message.contains("general.organization")));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let error = Config::from_toml_str("[api\nkey = ").expect_err("invalid TOML");
    assert!(matches!(error, ToolError::Config(_)));
}

#[test]
fn api_key_is_not_printed_in_debug_output() {
    let config = Config::from_toml_str(SETTINGS).expect("settings parsed");
    let rendered = format!("{config:?}");

    assert!(!rendered.contains("secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn load_reads_settings_from_disk() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, SETTINGS).expect("settings written");

    let config = Config::load(&path).expect("settings loaded");
    assert_eq!(config.enabled_lists().count(), 3);
}

#[test]
fn load_reports_missing_file() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("absent.toml");

    let error = Config::load(&path).expect_err("file does not exist");
    assert!(matches!(error, ToolError::MissingInput(missing) if missing == path));
}
