use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend root, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    /// Minimum time between two fetches of the same resource
    pub refresh_interval_ms: u64,
    /// Automatic refresh period; 0 disables
    pub auto_refresh_secs: u64,
    /// Cap on shown rows per table
    pub max_visible: usize,
    pub tick_rate_ms: u64,
    /// HTTP request timeout
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            refresh_interval_ms: 1000,
            auto_refresh_secs: 10,
            max_visible: 100,
            tick_rate_ms: 100,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".didery-dash"))
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load from `path`, or the default location; defaults when absent
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()
                .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?,
        };

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn auto_refresh(&self) -> Option<Duration> {
        (self.auto_refresh_secs > 0).then(|| Duration::from_secs(self.auto_refresh_secs))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("didery-dash-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Some(&temp_path("absent.json"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{"base_url": "http://relay:9000", "auto_refresh_secs": 0}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://relay:9000");
        assert_eq!(config.auto_refresh(), None);
        assert_eq!(config.max_visible, 100);
        assert_eq!(config.refresh_interval(), Duration::from_millis(1000));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_round_trip() {
        let path = temp_path("saved.json");
        let config = Config {
            max_visible: 25,
            ..Config::default()
        };
        config.save(Some(&path)).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = temp_path("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load(Some(&path)).is_err());
        fs::remove_file(&path).unwrap();
    }
}
