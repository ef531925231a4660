use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use anyhow::Context;

use crate::core::reorganize::{ReorganizeRequest, Split, SplitSource};

const CONFIG_FILE_NAME: &str = "settings.json";

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// No settings file exists yet.
    Defaults,
    /// A settings file exists but could not be used.
    Fallback(String),
}

impl ConfigOrigin {
    /// Report the origin once logging is available.
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded settings from {:?}", path),
            ConfigOrigin::Defaults => info!("No settings file found. Using defaults."),
            ConfigOrigin::Fallback(reason) => warn!("{}. Using defaults.", reason),
        }
    }
}

/// Application configuration: every path and tunable the commands use.
///
/// Missing fields fall back to their defaults, so a settings file only needs
/// the values that differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub train_manifest: PathBuf,
    pub test_manifest: PathBuf,
    /// Directory holding the train images referenced by the manifest.
    pub train_images: PathBuf,
    pub test_images: PathBuf,
    /// Root of the reorganized `<split>/<label>/` tree.
    pub dataset_root: PathBuf,
    pub train_stats_output: PathBuf,
    pub test_stats_output: PathBuf,
    /// Fixed seed for preview sampling; random when unset.
    pub preview_seed: Option<u64>,
    /// Edge length of a preview tile, in points.
    pub tile_size: f32,
    pub log_level: String,
    /// Where log files go; console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            train_manifest: PathBuf::from("train_data.csv"),
            test_manifest: PathBuf::from("test_data.csv"),
            train_images: PathBuf::from("dataset/train"),
            test_images: PathBuf::from("dataset/test"),
            dataset_root: PathBuf::from("dataset"),
            train_stats_output: PathBuf::from("stats_train.csv"),
            test_stats_output: PathBuf::from("stats_test.csv"),
            preview_seed: None,
            tile_size: 140.0,
            log_level: "info".to_string(),
            log_dir: Some(PathBuf::from("logs")),
        }
    }
}

impl AppConfig {
    /// Default settings file location in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "digit-dataset-prep")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Read a settings file, failing if it is missing or invalid.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist and parse. Otherwise the default location
    /// is tried, and a missing or corrupted file falls back to defaults. This
    /// runs before logging is up, so the outcome is returned for the caller
    /// to log.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<(Self, ConfigOrigin)> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)
                .with_context(|| format!("failed to load config file {:?}", path))?;
            return Ok((config, ConfigOrigin::File(path.to_path_buf())));
        }

        let Some(config_path) = Self::default_path() else {
            return Ok((
                Self::default(),
                ConfigOrigin::Fallback("Could not determine config directory".to_string()),
            ));
        };

        let origin = match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => return Ok((config, ConfigOrigin::File(config_path))),
                Err(e) => ConfigOrigin::Fallback(format!(
                    "Failed to parse settings file {:?}: {}",
                    config_path, e
                )),
            },
            // It's normal for the file not to exist on first run
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConfigOrigin::Defaults,
            Err(e) => ConfigOrigin::Fallback(format!(
                "Failed to read settings file {:?}: {}",
                config_path, e
            )),
        };
        Ok((Self::default(), origin))
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Settings saved to {:?}", path);
        Ok(())
    }

    pub fn split_source(&self, split: Split) -> SplitSource {
        match split {
            Split::Train => SplitSource::new(&self.train_manifest, &self.train_images),
            Split::Test => SplitSource::new(&self.test_manifest, &self.test_images),
        }
    }

    pub fn stats_output(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.train_stats_output,
            Split::Test => &self.test_stats_output,
        }
    }

    pub fn reorganize_request(&self) -> ReorganizeRequest {
        ReorganizeRequest {
            train: self.split_source(Split::Train),
            test: self.split_source(Split::Test),
            destination: self.dataset_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.train_manifest, PathBuf::from("train_data.csv"));
        assert_eq!(config.test_images, PathBuf::from("dataset/test"));
        assert_eq!(config.dataset_root, PathBuf::from("dataset"));
        assert!(config.preview_seed.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"dataset_root": "out", "preview_seed": 9}"#).unwrap();
        assert_eq!(config.dataset_root, PathBuf::from("out"));
        assert_eq!(config.preview_seed, Some(9));
        assert_eq!(config.train_manifest, PathBuf::from("train_data.csv"));
    }

    #[test]
    fn test_save_then_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let config = AppConfig {
            train_images: PathBuf::from("raw/train"),
            log_dir: None,
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        let loaded = AppConfig::from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"tile_size": 64.0}"#).unwrap();

        let (config, origin) = AppConfig::resolve(Some(&path)).unwrap();

        assert_eq!(config.tile_size, 64.0);
        assert_eq!(origin, ConfigOrigin::File(path));
    }

    #[test]
    fn test_resolve_explicit_missing_path_fails() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::resolve(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn test_reorganize_request_uses_configured_paths() {
        let config = AppConfig::default();
        let request = config.reorganize_request();
        assert_eq!(request.train.manifest, PathBuf::from("train_data.csv"));
        assert_eq!(request.test.images, PathBuf::from("dataset/test"));
        assert_eq!(request.destination, PathBuf::from("dataset"));
        assert_eq!(config.stats_output(Split::Test), Path::new("stats_test.csv"));
    }
}
