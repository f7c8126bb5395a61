//! Configuration types for the task planning system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlanError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Task store settings.
    pub store: StoreConfig,
    /// Dashboard windows and limits.
    pub dashboard: DashboardConfig,
}

/// Task store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root directory (None = platform data dir).
    pub root_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Effective store root, falling back to the platform data directory.
    #[must_use]
    pub fn effective_root(&self) -> PathBuf {
        self.root_dir
            .clone()
            .unwrap_or_else(crate::farm_dirs::data_dir)
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Days ahead covered by the upcoming-tasks list.
    pub upcoming_window_days: u64,
    /// Maximum rows in the upcoming-tasks list.
    pub upcoming_limit: usize,
    /// Days covered by the "next days" counter.
    pub next_days: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 30,
            upcoming_limit: 15,
            next_days: 7,
        }
    }
}

impl PlannerConfig {
    /// Load from a TOML file; missing files yield the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| PlanError::Config(e.to_string()))
    }

    /// Serialize to TOML and write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| PlanError::Config(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Default config file location (`{config_dir}/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        crate::farm_dirs::config_dir().join("config.toml")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
