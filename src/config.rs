//! Configuration file support for thumbgrid.
//!
//! Configuration is loaded from `~/.config/thumbgrid/config.toml` with the following precedence:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.config/thumbgrid/config.toml
//! server_url = "http://localhost:7080"
//! page_size = 5000
//! scroll_debounce_ms = 100
//! leading_edge = false
//!
//! # Read thumbnails from disk instead of the server
//! thumbnail_dir = "/tmp/pictures/thumbnails"
//!
//! # Preferred cell size in terminal columns/rows
//! item_width = 24
//! item_height = 10
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::debounce::DEFAULT_QUIET_MS;
use crate::error::GalleryError;
use crate::search::DEFAULT_PAGE_SIZE;
use crate::thumbnail::ThumbnailSource;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:7080";
pub const DEFAULT_ITEM_WIDTH: u16 = 24;
pub const DEFAULT_ITEM_HEIGHT: u16 = 10;

const ENV_SERVER_URL: &str = "THUMBGRID_URL";
const ENV_THUMBNAIL_DIR: &str = "THUMBGRID_THUMBNAIL_DIR";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root URL of the search server
    pub server_url: Option<String>,

    /// Local thumbnail directory (overrides fetching thumbnails over HTTP)
    pub thumbnail_dir: Option<PathBuf>,

    /// Hits requested per search
    pub page_size: Option<usize>,

    /// Quiet period before scroll/resize recompute visibility
    pub scroll_debounce_ms: Option<u64>,

    /// Recompute on the first scroll event of a burst instead of the last
    pub leading_edge: Option<bool>,

    /// Preferred grid cell width in columns
    pub item_width: Option<u16>,

    /// Grid cell height in rows
    pub item_height: Option<u16>,
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default configuration if the file doesn't exist or can't be parsed.
    /// Environment variables are applied on top of whatever the file set.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let config = if !config_path.exists() {
            Self::default()
        } else {
            match Self::load_from(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    crate::log::log(&format!("Warning: {}", e));
                    Self::default()
                }
            }
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &std::path::Path) -> Result<Self, GalleryError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| GalleryError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thumbgrid")
            .join("config.toml")
    }

    /// Apply `THUMBGRID_URL` and `THUMBGRID_THUMBNAIL_DIR`, looked up through `var`.
    ///
    /// Set variables replace config file values.
    pub fn with_env<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_SERVER_URL) {
            self.server_url = Some(url);
        }
        if let Some(dir) = var(ENV_THUMBNAIL_DIR) {
            self.thumbnail_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Merge with CLI overrides.
    ///
    /// CLI arguments take precedence over environment and config file values.
    pub fn with_overrides(
        mut self,
        server_url: Option<String>,
        thumbnail_dir: Option<PathBuf>,
    ) -> Self {
        if server_url.is_some() {
            self.server_url = server_url;
        }
        if thumbnail_dir.is_some() {
            self.thumbnail_dir = thumbnail_dir;
        }
        self
    }

    /// Get the server URL, falling back to the default.
    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Where thumbnails come from: a local directory if one is configured,
    /// otherwise the search server.
    pub fn thumbnail_source(&self) -> ThumbnailSource {
        self.thumbnail_dir
            .clone()
            .map(ThumbnailSource::Dir)
            .unwrap_or_else(|| ThumbnailSource::Http(self.server_url()))
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn scroll_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.scroll_debounce_ms.unwrap_or(DEFAULT_QUIET_MS))
    }

    pub fn leading_edge(&self) -> bool {
        self.leading_edge.unwrap_or(false)
    }

    pub fn item_width(&self) -> u16 {
        self.item_width.unwrap_or(DEFAULT_ITEM_WIDTH).max(4)
    }

    pub fn item_height(&self) -> u16 {
        self.item_height.unwrap_or(DEFAULT_ITEM_HEIGHT).max(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.server_url.is_none());
        assert!(config.thumbnail_dir.is_none());
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.scroll_debounce().as_millis(), 100);
        assert!(!config.leading_edge());
        assert_eq!(config.item_width(), DEFAULT_ITEM_WIDTH);
        assert_eq!(config.item_height(), DEFAULT_ITEM_HEIGHT);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            server_url = "http://photos.lan:7080"
            thumbnail_dir = "/tmp/thumbs"
            page_size = 2000
            scroll_debounce_ms = 50
            leading_edge = true
            item_width = 30
            item_height = 2
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server_url, Some("http://photos.lan:7080".to_string()));
        assert_eq!(
            config.thumbnail_source(),
            ThumbnailSource::Dir(PathBuf::from("/tmp/thumbs"))
        );
        assert_eq!(config.page_size(), 2000);
        assert_eq!(config.scroll_debounce().as_millis(), 50);
        assert!(config.leading_edge());
        assert_eq!(config.item_width(), 30);
        // Too small to draw a cell; raised to the minimum
        assert_eq!(config.item_height(), 3);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config {
            server_url: Some("http://from-file".to_string()),
            ..Config::default()
        }
        .with_overrides(Some("http://from-cli".to_string()), None);

        assert_eq!(config.server_url(), "http://from-cli");
        assert!(config.thumbnail_dir.is_none());
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let file: Config = toml::from_str(
            r#"
            server_url = "http://from-file"
            thumbnail_dir = "/from-file"
            page_size = 3000
        "#,
        )
        .unwrap();
        let env = |key: &str| match key {
            "THUMBGRID_URL" => Some("http://from-env".to_string()),
            "THUMBGRID_THUMBNAIL_DIR" => Some("/from-env".to_string()),
            _ => None,
        };

        let config = file.clone().with_env(env).with_overrides(None, None);
        assert_eq!(config.server_url(), "http://from-env");
        assert_eq!(
            config.thumbnail_source(),
            ThumbnailSource::Dir(PathBuf::from("/from-env"))
        );
        // Settings without an env var keep the file value
        assert_eq!(config.page_size(), 3000);

        let config = file
            .clone()
            .with_env(env)
            .with_overrides(Some("http://from-cli".to_string()), None);
        assert_eq!(config.server_url(), "http://from-cli");
        assert_eq!(
            config.thumbnail_source(),
            ThumbnailSource::Dir(PathBuf::from("/from-env"))
        );

        // Unset variables leave the file alone
        let config = file.with_env(|_| None);
        assert_eq!(config.server_url(), "http://from-file");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = std::env::temp_dir().join("thumbgrid_invalid_config_test.toml");
        std::fs::write(&path, "page_size = \"lots\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, GalleryError::Config { .. }));

        let _ = std::fs::remove_file(&path);
    }
}
