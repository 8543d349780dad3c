use campus_content::MAX_MEDIA_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "campus.config.json";
pub const DEFAULT_BIND: &str = "127.0.0.1:7070";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("campus-server/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Server configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Address the HTTP API listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bearer token required by write endpoints. Without one, writes are refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_token: Option<String>,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Default and maximum media listing size
    #[serde(default = "default_media_page_size")]
    pub media_page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_media_page_size() -> usize {
    MAX_MEDIA_PAGE_SIZE
}

fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Config {
    /// Load `campus.config.json` from a directory; defaults if there is none
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load an explicitly named file, which must exist
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Media page size clamped to what the library will return
    pub fn media_page_size(&self) -> usize {
        self.media_page_size.clamp(1, MAX_MEDIA_PAGE_SIZE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            editor_token: None,
            geocoder: GeocoderConfig::default(),
            media_page_size: default_media_page_size(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "bind": "0.0.0.0:8080",
            "editorToken": "s3cret",
            "geocoder": { "baseUrl": "http://localhost:9000" },
            "mediaPageSize": 20
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.editor_token.as_deref(), Some("s3cret"));
        assert_eq!(config.geocoder.base_url, "http://localhost:9000");
        assert_eq!(config.geocoder.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.media_page_size(), 20);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind, "127.0.0.1:7070");
        assert!(config.editor_token.is_none());
        assert_eq!(config.geocoder.base_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.media_page_size(), 50);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config: Config = serde_json::from_str(r#"{ "mediaPageSize": 500 }"#).unwrap();
        assert_eq!(config.media_page_size(), MAX_MEDIA_PAGE_SIZE);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "editorToken": "abc" }"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.editor_token.as_deref(), Some("abc"));
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(Config::load_file(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(Config::load_file(&broken), Err(ConfigError::Parse { .. })));
    }
}
