//! Cascade timing and surface-size configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use start_menu_contract::{NodePath, SurfaceSize};
use thiserror::Error;

/// Open delay for every folder other than the root entry.
pub const OPEN_DELAY_NESTED_MS: u64 = 500;
/// Open delay for the root entry ("don't expand on an accidental brush-by").
pub const OPEN_DELAY_ROOT_MS: u64 = 3000;
/// Surface size while the root entry's chain is closed.
pub const COLLAPSED_DIMENSIONS: SurfaceSize = SurfaceSize::new(300, 550);
/// Surface size while the root entry's chain is open.
pub const EXPANDED_DIMENSIONS: SurfaceSize = SurfaceSize::new(800, 550);
/// Identifier of the top-level entry that owns the resize effect.
pub const DEFAULT_ROOT_ENTRY: &str = "programs";

/// Fixed configuration for one cascade controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub open_delay_nested_ms: u64,
    pub open_delay_root_ms: u64,
    pub root_entry: String,
    pub collapsed: SurfaceSize,
    pub expanded: SurfaceSize,
    /// Leaf identifiers whose activation terminates the host instead of launching.
    pub terminate_entries: Vec<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            open_delay_nested_ms: OPEN_DELAY_NESTED_MS,
            open_delay_root_ms: OPEN_DELAY_ROOT_MS,
            root_entry: DEFAULT_ROOT_ENTRY.to_string(),
            collapsed: COLLAPSED_DIMENSIONS,
            expanded: EXPANDED_DIMENSIONS,
            terminate_entries: vec!["logoff".to_string(), "shutdown".to_string()],
        }
    }
}

impl MenuConfig {
    /// Returns whether `path` addresses the root entry.
    pub fn is_root_entry(&self, path: &NodePath) -> bool {
        path.depth() == Some(0) && path.leaf() == Some(self.root_entry.as_str())
    }

    /// Returns the open delay for the folder at `path`.
    pub fn open_delay_for(&self, path: &NodePath) -> u64 {
        if self.is_root_entry(path) {
            self.open_delay_root_ms
        } else {
            self.open_delay_nested_ms
        }
    }

    pub fn is_terminate_entry(&self, identifier: &str) -> bool {
        self.terminate_entries.iter().any(|id| id == identifier)
    }

    /// Checks semantic constraints that deserialization alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty root entry or a zero-area surface size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_entry.trim().is_empty() {
            return Err(ConfigError::Invalid("root_entry must not be empty".into()));
        }
        for (name, size) in [("collapsed", self.collapsed), ("expanded", self.expanded)] {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} size must be non-zero, got {size}"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(body: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(body).map_err(|err| ConfigError::Parse {
            source_name: "<inline>".into(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
    #[error("invalid menu config: {0}")]
    Invalid(String),
}

/// TOML-backed [`MenuConfig`] loader.
///
/// A missing file is not an error: the defaults apply. Unreadable or malformed files are.
#[derive(Clone, Debug)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file exists but cannot be read, parsed, or validated.
    pub fn load(&self) -> Result<MenuConfig, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "menu config missing; using defaults");
            return Ok(MenuConfig::default());
        }
        let body = fs::read_to_string(&self.path).map_err(|err| ConfigError::Read {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })?;
        let config: MenuConfig = toml::from_str(&body).map_err(|err| ConfigError::Parse {
            source_name: self.path.display().to_string(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
