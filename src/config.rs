use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            max_tokens: 2500,
            timeout_secs: 150,
        }
    }

    /// Load from the config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let config = Self::load_from(&config_path)?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Write `api_key` into the file at `path`, keeping the file's other
    /// settings. Environment overrides are not written back.
    pub fn store_api_key(path: &Path, api_key: &str) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.api_key = Some(api_key.to_string());
        config.save_to(path)
    }

    /// Environment variables win over the file. `lookup` is injected so tests
    /// don't have to touch the process environment.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("PROMPTSMITH_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty("PROMPTSMITH_API_URL") {
            self.api_url = url;
        }
        if let Some(model) = non_empty("PROMPTSMITH_MODEL") {
            self.model = model;
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("promptsmith").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.timeout(), Duration::from_secs(150));
        assert!(!config.has_api_key());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"model": "gpt-4o", "timeout_secs": 30}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_tokens, 2500);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::new();
        config.api_key = Some("sk-test".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn storing_key_keeps_other_file_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"model": "gpt-4o", "api_key": "sk-old"}"#).unwrap();

        Config::store_api_key(&path, "sk-new").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-new"));
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-openai"),
            ("PROMPTSMITH_API_URL", "http://localhost:9999/v1/chat/completions"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::new();
        config.api_key = Some("sk-file".to_string());
        let config = config.with_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.api_url, "http://localhost:9999/v1/chat/completions");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn promptsmith_key_beats_openai_key() {
        let config = Config::new().with_env_overrides(|k| match k {
            "PROMPTSMITH_API_KEY" => Some("sk-own".to_string()),
            "OPENAI_API_KEY" => Some("sk-openai".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("sk-own"));
    }

    #[test]
    fn blank_key_is_not_configured() {
        let mut config = Config::new();
        config.api_key = Some("   ".to_string());
        assert!(!config.has_api_key());
        let config = config.with_env_overrides(|_| Some(String::new()));
        assert!(!config.has_api_key());
    }
}
