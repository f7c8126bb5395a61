//! Centralized application directory paths for farmplan.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Environment Overrides
//!
//! All paths can be overridden for testing or custom deployments:
//! - `FARMPLAN_DATA_DIR` — overrides [`data_dir`]
//! - `FARMPLAN_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Holds the task database. Resolves to `dirs::data_dir()/farmplan/` by
/// default; override with the `FARMPLAN_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FARMPLAN_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("farmplan"))
        .unwrap_or_else(|| PathBuf::from("/tmp/farmplan-data"))
}

/// Application config directory.
///
/// Holds `config.toml`. Resolves to `dirs::config_dir()/farmplan/` by
/// default; override with the `FARMPLAN_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FARMPLAN_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("farmplan"))
        .unwrap_or_else(|| PathBuf::from("/tmp/farmplan-config"))
}
