//! Notion workspace configuration.
//!
//! Loads the `.notion-config.json` file that records the ids of the academic
//! databases, and derives page URLs from those ids.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("No '{0}' database id in academicDatabases")]
    MissingDatabase(String),
}

/// Contents of `.notion-config.json`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionConfig {
    #[serde(default)]
    pub academic_databases: AcademicDatabases,
}

/// Database ids keyed by role. Only `articles` is typed; the other roles
/// (`bibliographies`, `assignments`, ...) are kept as raw values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AcademicDatabases {
    #[serde(default)]
    pub articles: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl NotionConfig {
    /// Id of the Articles database.
    pub fn articles_database(&self) -> Result<&str, ConfigError> {
        self.academic_databases
            .articles
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingDatabase("articles".to_string()))
    }
}

/// Loads the configuration from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_config(path: &Path) -> Result<NotionConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration JSON.
pub fn parse_config(json: &str) -> Result<NotionConfig, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Builds the notion.so URL of a page or database from its id.
///
/// Dashes are stripped, so both the dashed and compact forms of an id give
/// the same URL.
///
/// # Examples
///
/// ```
/// use bib_blocks::database_url;
///
/// assert_eq!(
///     database_url("2becd2a6-5422-8153-beed-ecb6a87892fd"),
///     "https://www.notion.so/2becd2a654228153beedecb6a87892fd"
/// );
/// ```
pub fn database_url(id: &str) -> String {
    format!("https://www.notion.so/{}", id.trim().replace('-', ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Helper to create a temporary file with content
    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        // Given: a config file with both academic databases
        let content = r#"{
            "academicDatabases": {
                "articles": "aaaa-bbbb",
                "bibliographies": "cccc-dddd",
                "assignments": "eeee"
            },
            "hubPageId": "ffff"
        }"#;
        let file = create_temp_file(content);

        // When: we load it
        let config = load_config(file.path()).unwrap();

        // Then: known ids are typed and the rest is kept aside
        assert_eq!(config.articles_database().unwrap(), "aaaa-bbbb");
        let other = &config.academic_databases.other;
        assert_eq!(other.get("bibliographies"), Some(&serde_json::json!("cccc-dddd")));
        assert!(other.contains_key("assignments"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/.notion-config.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config("{ not json");
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_articles_database_missing() {
        // Given: a config without the articles id
        let config = parse_config(r#"{"academicDatabases": {"bibliographies": "x"}}"#).unwrap();

        // When: we ask for the articles database
        let err = config.articles_database().unwrap_err();

        // Then: the error names the missing role
        assert!(matches!(err, ConfigError::MissingDatabase(ref name) if name == "articles"));
        assert!(err.to_string().contains("articles"));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, NotionConfig::default());
        assert!(config.articles_database().is_err());
    }

    #[test]
    fn test_database_url_compact_id() {
        assert_eq!(database_url("abc123"), "https://www.notion.so/abc123");
    }

    #[test]
    fn test_database_url_dashed_id() {
        assert_eq!(database_url(" ab-cd-ef "), "https://www.notion.so/abcdef");
    }
}
