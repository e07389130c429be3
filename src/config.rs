use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::map::Viewport;
use crate::profile::Coordinates;
use crate::{
    Result, DEFAULT_CENTER, DEFAULT_ZOOM, FAVORITES_FILE, FOCUSED_ZOOM,
    MAX_FIT_ZOOM, STORAGE_FOLDER,
};

/// Artificial latency of the in-memory store, per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Latency {
    pub read_ms: u64,
    pub write_ms: u64,
    pub delete_ms: u64,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            read_ms: 0,
            write_ms: 0,
            delete_ms: 0,
        }
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }

    pub fn delete(&self) -> Duration {
        Duration::from_millis(self.delete_ms)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            read_ms: 0,
            write_ms: 1000,
            delete_ms: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: Coordinates,
    pub default_zoom: u8,
    pub focused_zoom: u8,
    pub max_fit_zoom: u8,
    pub viewport: Viewport,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            focused_zoom: FOCUSED_ZOOM,
            max_fit_zoom: MAX_FIT_ZOOM,
            viewport: Viewport::default(),
        }
    }
}

/// Application settings, read from a JSON file.
///
/// Every field has a default, so a partial file (or `{}`) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latency: Latency,
    pub favorites_path: PathBuf,
    pub map: MapConfig,
    pub rows_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latency: Latency::default(),
            favorites_path: PathBuf::from(STORAGE_FOLDER).join(FAVORITES_FILE),
            map: MapConfig::default(),
            rows_per_page: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            log::debug!(
                "no configuration at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new("config_test").unwrap();
        let path = dir.path().join("config.json");
        let partial = r#"{"rows_per_page": 10, "latency": {"write_ms": 5}}"#;
        fs::write(&path, partial).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.rows_per_page, 10);
        assert_eq!(config.latency.write_ms, 5);
        assert_eq!(config.latency.delete_ms, 800);
        assert_eq!(config.map.focused_zoom, FOCUSED_ZOOM);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new("config_test").unwrap();
        let config =
            Config::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new("config_test").unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(crate::ProfileError::Parse)
        ));
    }
}
