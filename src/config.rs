//! Explorer configuration.
//!
//! Bundles the CSV parsing options with the report settings. Every field has
//! a default, so a config file only needs the values it changes:
//!
//! ```toml
//! [csv]
//! separator = ";"
//! encoding = "cp1252"
//!
//! [report]
//! preview_rows = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::CsvReadOptions;

/// Settings of the generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Decimal places used when rendering statistics as text.
    pub decimals: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            decimals: 3,
        }
    }
}

/// Complete configuration of one exploration run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub csv: CsvReadOptions,
    pub report: ReportOptions,
}

impl ExplorerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.toml`, `.yaml` or `.yml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(Error::Io)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(Error::Config(format!(
                "unsupported config file type: {}",
                path.display()
            ))),
        }
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Checks the separator and report settings.
    pub fn validate(&self) -> Result<()> {
        self.csv
            .validate()
            .map_err(|e| Error::Config(format!("csv.separator: {}", e)))?;
        if self.report.preview_rows == 0 {
            return Err(Error::Config(
                "report.preview_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::TextEncoding;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.csv.separator, ",");
        assert!(config.csv.has_header);
        assert_eq!(config.csv.encoding, TextEncoding::Utf8);
        assert_eq!(config.report.preview_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = ExplorerConfig::from_toml_str(
            "[csv]\nseparator = \";\"\nencoding = \"cp1252\"\n\n[report]\npreview_rows = 10\n",
        )
        .unwrap();
        assert_eq!(config.csv.separator, ";");
        assert_eq!(config.csv.encoding, TextEncoding::Cp1252);
        assert!(config.csv.has_header);
        assert!(!config.csv.na_values.is_empty());
        assert_eq!(config.report.preview_rows, 10);
        assert_eq!(config.report.decimals, 3);
    }

    #[test]
    fn test_from_yaml() {
        let config =
            ExplorerConfig::from_yaml_str("csv:\n  has_header: false\n  encoding: latin1\n").unwrap();
        assert!(!config.csv.has_header);
        assert_eq!(config.csv.encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ExplorerConfig::from_toml_str("[csv]\nencoding = \"ebcdic\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ExplorerConfig::from_toml_str("[csv]\nseparator = \"\"\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ExplorerConfig::from_toml_str("[report]\npreview_rows = 0\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExplorerConfig::default();
        config.csv.separator = "|".to_string();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ExplorerConfig::from_toml_str(&text).unwrap(), config);
    }
}
