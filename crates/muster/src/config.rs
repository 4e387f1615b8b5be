// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Launcher configuration using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./muster.toml` > `~/.config/muster/muster.toml` >
//! `/etc/muster/muster.toml` with environment variable overrides via the
//! `MUSTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Launcher-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusterConfig {
    /// Log level for the `muster=` tracing filter.
    pub log_level: String,
    /// Root directory scanned for installed rendezvous plugin packages.
    pub plugin_dir: PathBuf,
}

impl Default for MusterConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            plugin_dir: default_plugin_dir(),
        }
    }
}

/// Default plugins root: `<data dir>/muster/plugins`.
fn default_plugin_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("muster/plugins")
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/muster/muster.toml` (system-wide)
/// 3. `~/.config/muster/muster.toml` (user XDG config)
/// 4. `./muster.toml` (local directory)
/// 5. `MUSTER_*` environment variables
pub fn load_config() -> Result<MusterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MusterConfig::default()))
        .merge(Toml::file("/etc/muster/muster.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("muster/muster.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("muster.toml"))
        .merge(Env::prefixed("MUSTER_"))
        .extract()
}

/// Load configuration from TOML content only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MusterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MusterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}
