use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::directory::{DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub rows_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            auth_token: None,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file in the user's home directory
    pub fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".clientdesk").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from file, creating default if file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: AppConfig = serde_json::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
            Ok(config.normalized())
        } else {
            let default_config = AppConfig::default();
            default_config.save_to(path)?;
            Ok(default_config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        if !ROWS_PER_PAGE_OPTIONS.contains(&self.rows_per_page) {
            log::warn!(
                "Unsupported rows_per_page {} in config, using {}",
                self.rows_per_page,
                DEFAULT_ROWS_PER_PAGE
            );
            self.rows_per_page = DEFAULT_ROWS_PER_PAGE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_creates_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            api_base_url: "https://crm.example.com".to_string(),
            auth_token: Some("token".to_string()),
            rows_per_page: 20,
        };
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_and_bad_page_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "http://10.0.0.5:9000", "rows_per_page": 7}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.rows_per_page, DEFAULT_ROWS_PER_PAGE);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
