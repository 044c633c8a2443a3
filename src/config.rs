use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP client settings
    pub network: NetworkConfig,

    /// Extraction timing settings
    pub extraction: ExtractionConfig,

    /// Navigation watcher settings
    pub watcher: WatcherConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Transport timeout for page and caption requests (seconds)
    pub request_timeout_seconds: u64,

    /// User agent presented to the host site
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Settling delay for native cue data to populate (milliseconds)
    pub cue_settle_ms: u64,

    /// Settling delay after a forced page reload (milliseconds)
    pub reload_settle_ms: u64,

    /// Settling delay after re-injecting the page context (milliseconds)
    pub reinject_settle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Fallback poll interval for URL changes (milliseconds)
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the downloader writes CSV documents into
    pub output_dir: PathBuf,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cue_settle_ms: 1000,
            reload_settle_ms: 2000,
            reinject_settle_ms: 500,
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            extraction: ExtractionConfig::default(),
            watcher: WatcherConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first file found in the usual locations
    pub fn load() -> Option<Self> {
        let config_paths = [
            "subtidex.toml",
            "config/subtidex.toml",
            "~/.config/subtidex/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Some(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        None
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.request_timeout_seconds)
    }

    pub fn cue_settle_delay(&self) -> Duration {
        Duration::from_millis(self.extraction.cue_settle_ms)
    }

    pub fn reload_settle_delay(&self) -> Duration {
        Duration::from_millis(self.extraction.reload_settle_ms)
    }

    pub fn reinject_settle_delay(&self) -> Duration {
        Duration::from_millis(self.extraction.reinject_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watcher.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cue_settle_delay(), Duration::from_secs(1));
        assert_eq!(config.reload_settle_delay(), Duration::from_secs(2));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.output.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [extraction]
            cue_settle_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.cue_settle_delay(), Duration::from_millis(50));
        assert_eq!(config.reload_settle_delay(), Duration::from_secs(2));
    }
}
