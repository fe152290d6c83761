//! Asset loading with embedded fallbacks
//!
//! The mosaic model and the default config ship inside the binary. Each can
//! be overridden from the filesystem:
//!
//! - `MODEL_SVG` points at a replacement mosaic document
//! - `CONFIG_FILE` points at a replacement config.yaml
//!
//! If the variable is not set, or the file it names does not exist, the
//! embedded copy is used.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded mosaic documents
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.svg"]
struct EmbeddedModels;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// File name of the default mosaic inside the embedded assets.
pub const MODEL_NAME: &str = "model.svg";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Model,
    Config,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Where an asset was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Embedded,
    File(PathBuf),
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External model path (from MODEL_SVG env var)
    model_file: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(model_file: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            model_file,
            config_file,
        }
    }

    /// Create a loader from `MODEL_SVG` and `CONFIG_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("MODEL_SVG").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    fn external(path: &Option<PathBuf>) -> Option<&Path> {
        path.as_deref().filter(|p| p.exists())
    }

    /// Where the model would currently be read from.
    pub fn model_source(&self) -> AssetSource {
        match Self::external(&self.model_file) {
            Some(p) => AssetSource::File(p.to_path_buf()),
            None => AssetSource::Embedded,
        }
    }

    /// Where the config would currently be read from.
    pub fn config_source(&self) -> AssetSource {
        match Self::external(&self.config_file) {
            Some(p) => AssetSource::File(p.to_path_buf()),
            None => AssetSource::Embedded,
        }
    }

    /// Read the mosaic SVG
    pub fn read_model(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = Self::external(&self.model_file) {
            tracing::trace!(path = %path.display(), "Loading model from filesystem");
            return Ok(Cow::Owned(fs::read(path)?));
        }

        EmbeddedModels::get(MODEL_NAME)
            .map(|f| {
                tracing::trace!("Loading model from embedded assets");
                f.data
            })
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded model.svg not found"))
    }

    /// Read the mosaic SVG as a UTF-8 string
    pub fn read_model_string(&self) -> io::Result<String> {
        let bytes = self.read_model()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = Self::external(&self.config_file) {
            tracing::trace!(path = %path.display(), "Loading config from filesystem");
            return Ok(Cow::Owned(fs::read(path)?));
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths, or `./model.svg` and `./config.yaml`.
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            let (path, data) = match category {
                AssetCategory::Model => (
                    self.model_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./model.svg")),
                    EmbeddedModels::get(MODEL_NAME).map(|f| f.data),
                ),
                AssetCategory::Config => (
                    self.config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml")),
                    EmbeddedConfig::get("config.yaml").map(|f| f.data),
                ),
            };

            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            if let Some(data) = data {
                fs::write(&path, &*data)?;
                report.written.push(path.display().to_string());
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Model => EmbeddedModels::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}
