// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! An installed plugin package advertises rendezvous backends through the
//! reserved `[rendezvous-handlers]` section of its manifest. Packages whose
//! manifest lacks that section carry no backends and are skipped by
//! discovery.

use serde::Deserialize;

use muster_core::MusterError;

/// Reserved extension-point key under which packages advertise backends.
pub const EXTENSION_POINT: &str = "rendezvous-handlers";

/// Parsed manifest of an installed plugin package.
#[derive(Debug, Clone)]
pub struct PluginManifest {
    /// Unique name of the plugin package (e.g., "etcd-rendezvous").
    pub name: String,
    /// Semantic version string.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Optional author identifier.
    pub author: Option<String>,
    /// The `[rendezvous-handlers]` entry, absent for unrelated packages.
    pub handlers: Option<HandlerEntry>,
}

/// The reserved `[rendezvous-handlers]` extension-point entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerEntry {
    /// Loadable artifact, relative to the package directory.
    pub library: String,
    /// Backend names the plugin declares it will register. Informational;
    /// the registration hook is the source of truth.
    #[serde(default)]
    pub backends: Vec<String>,
}

/// Intermediate TOML deserialization struct for `plugin.toml`.
#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
    #[serde(rename = "rendezvous-handlers")]
    handlers: Option<HandlerEntry>,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
struct PluginSection {
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    author: Option<String>,
}

/// Parse a plugin manifest from TOML content.
///
/// Validates that name and version are non-empty and that the extension-point
/// entry, when present, names a library.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, MusterError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| MusterError::Config(format!("invalid plugin manifest: {e}")))?;

    let section = file.plugin;

    if section.name.is_empty() {
        return Err(MusterError::Config(
            "plugin manifest: name must not be empty".to_string(),
        ));
    }

    if section.version.is_empty() {
        return Err(MusterError::Config(
            "plugin manifest: version must not be empty".to_string(),
        ));
    }

    if let Some(ref handlers) = file.handlers {
        if handlers.library.is_empty() {
            return Err(MusterError::Config(format!(
                "plugin manifest: [{EXTENSION_POINT}] library must not be empty"
            )));
        }
    }

    Ok(PluginManifest {
        name: section.name,
        version: section.version,
        description: section.description,
        author: section.author,
        handlers: file.handlers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_manifest() {
        let toml = r#"
[plugin]
name = "etcd-rendezvous"
version = "0.3.1"
description = "etcd-backed rendezvous backend"
author = "Example Org"

[rendezvous-handlers]
library = "libetcd_rdzv.so"
backends = ["etcd", "etcd-v2"]
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert_eq!(manifest.name, "etcd-rendezvous");
        assert_eq!(manifest.version, "0.3.1");
        assert_eq!(manifest.author.as_deref(), Some("Example Org"));
        let handlers = manifest.handlers.unwrap();
        assert_eq!(handlers.library, "libetcd_rdzv.so");
        assert_eq!(handlers.backends, vec!["etcd", "etcd-v2"]);
    }

    #[test]
    fn parse_manifest_without_extension_point() {
        let toml = r#"
[plugin]
name = "unrelated"
version = "1.0.0"
description = "no rendezvous backends here"
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert!(manifest.handlers.is_none());
    }

    #[test]
    fn parse_missing_name() {
        let toml = r#"
[plugin]
name = ""
version = "0.1.0"

[rendezvous-handlers]
library = "libx.so"
"#;
        let err = parse_plugin_manifest(toml).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn parse_missing_version() {
        let toml = r#"
[plugin]
name = "x"
version = ""
"#;
        let err = parse_plugin_manifest(toml).unwrap_err();
        assert!(err.to_string().contains("version must not be empty"));
    }

    #[test]
    fn parse_empty_library() {
        let toml = r#"
[plugin]
name = "x"
version = "0.1.0"

[rendezvous-handlers]
library = ""
"#;
        let err = parse_plugin_manifest(toml).unwrap_err();
        assert!(err.to_string().contains("library must not be empty"));
    }

    #[test]
    fn parse_garbage_toml() {
        let result = parse_plugin_manifest("not = [valid");
        assert!(result.is_err());
    }

    #[test]
    fn backends_default_to_empty() {
        let toml = r#"
[plugin]
name = "x"
version = "0.1.0"

[rendezvous-handlers]
library = "libx.so"
"#;
        let manifest = parse_plugin_manifest(toml).unwrap();
        assert!(manifest.handlers.unwrap().backends.is_empty());
    }
}
