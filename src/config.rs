use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ai: AiConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub provider: String,
    pub model: String,
    pub api_url: String,
    pub api_key: String,
}

/// Catalog endpoint plus the opaque credential material the signer attaches
/// to every request. None of it is interpreted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub api_url: String,
    pub consumer_id: String,
    pub key_version: String,
    pub auth_signature: String,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".aisle").join("config.yaml")
    }

    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::config_path();

        // Try to load existing config
        if config_path.exists() {
            if let Ok(config) = Self::load_from_file(&config_path) {
                return Ok(config);
            }
        }

        // Return default config if loading fails
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_file(Self::config_path())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig {
                provider: "gemini".to_string(),
                model: "gemini-1.5-pro".to_string(),
                api_url: "https://generativelanguage.googleapis.com".to_string(),
                api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            },
            catalog: CatalogConfig {
                api_url: "https://developer.api.walmart.com".to_string(),
                consumer_id: std::env::var("CATALOG_CONSUMER_ID").unwrap_or_default(),
                key_version: std::env::var("CATALOG_KEY_VERSION")
                    .unwrap_or_else(|_| "1".to_string()),
                auth_signature: std::env::var("CATALOG_AUTH_SIGNATURE").unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_config_round_trips_through_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.ai.provider = "openai".to_string();
        config.ai.model = "gpt-4o-mini".to_string();
        config.catalog.consumer_id = "consumer-123".to_string();

        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();

        assert_eq!(loaded.ai.provider, "openai");
        assert_eq!(loaded.ai.model, "gpt-4o-mini");
        assert_eq!(loaded.catalog.consumer_id, "consumer-123");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "ai: [not, a, mapping").unwrap();

        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_default_reads_api_key_from_environment() {
        std::env::set_var("GEMINI_API_KEY", "test-key-123");
        let config = Config::default();
        std::env::remove_var("GEMINI_API_KEY");

        assert_eq!(config.ai.api_key, "test-key-123");
        assert_eq!(config.ai.provider, "gemini");
        assert_eq!(config.catalog.api_url, "https://developer.api.walmart.com");
    }
}
