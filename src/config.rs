use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ExtractError, Result};
use crate::export::CsvCommaMode;
use crate::patterns::{custom, ExtractionType};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input files larger than this are skipped.
    pub max_file_bytes: u64,
    pub csv_commas: CsvCommaMode,
    /// Compiled-size budget for a custom pattern.
    pub custom_size_limit: usize,
    #[serde(deserialize_with = "parse_types")]
    pub default_types: Vec<ExtractionType>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            csv_commas: CsvCommaMode::default(),
            custom_size_limit: custom::DEFAULT_SIZE_LIMIT,
            default_types: ExtractionType::BUILT_IN.to_vec(),
        }
    }
}

impl Config {
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ExtractError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ExtractError::Config(e.to_string()))
    }

    /// `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

fn parse_types<'de, D>(deserializer: D) -> std::result::Result<Vec<ExtractionType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    names
        .iter()
        .map(|name| name.parse::<ExtractionType>().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.csv_commas, CsvCommaMode::Backslash);
        assert_eq!(config.default_types.len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("csv_commas = \"strict\"\ndefault_types = [\"email\", \"URL\"]\n").unwrap();
        assert_eq!(config.csv_commas, CsvCommaMode::Strict);
        assert_eq!(config.default_types, vec![ExtractionType::Email, ExtractionType::Url]);
        assert_eq!(config.max_file_bytes, Config::DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_invalid_toml() {
        let invalid = vec![
            "default_types = [\"ssn\"]",
            "csv_commas = \"tabs\"",
            "max_file_bytes = \"big\"",
        ];

        for raw in invalid {
            assert!(matches!(Config::from_toml(raw), Err(ExtractError::Config(_))), "Should reject: {}", raw);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/nonexistent/text-extractor.toml"));
        assert!(matches!(result, Err(ExtractError::Config(_))));
    }
}
