//! Configuration types for the `Tablegate` store.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Output format for the tracing subscriber installed by
/// [`init_tracing`](crate::logging::init_tracing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database name, used in log fields.
    pub name: String,
    /// Tables created by [`Database::open`](crate::Database::open).
    pub tables: Vec<String>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "tablegate".to_string(),
            tables: Vec::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl DatabaseConfig {
    /// Reads a JSON configuration file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this structure.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_has_no_tables() {
        let config = DatabaseConfig::default();
        assert_eq!(config.name, "tablegate");
        assert!(config.tables.is_empty());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"tables": ["users"], "log_format": "json"}"#).unwrap();

        assert_eq!(config.name, "tablegate");
        assert_eq!(config.tables, vec!["users"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "app", "tables": ["users", "orders"]}}"#).unwrap();

        let config = DatabaseConfig::from_path(file.path()).unwrap();
        assert_eq!(config.name, "app");
        assert_eq!(config.tables.len(), 2);
    }

    #[test]
    fn bad_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DatabaseConfig::from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
    }
}
