// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Out-of-tree plugin discovery.
//!
//! Discovery makes rendezvous backends contributed by independently installed
//! packages visible to the [`HandlerRegistry`] without the core knowing their
//! names ahead of time. An installed package is a subdirectory of the plugins
//! root carrying a `plugin.toml` manifest; packages that advertise the
//! reserved `[rendezvous-handlers]` extension point are loaded and their
//! registration hook is invoked against the registry.
//!
//! Every call performs a fresh scan. A package installed after the process
//! started becomes visible on the next scan, so callers may re-run discovery
//! at any time; names already registered from an earlier pass are benign.

use std::fs;
use std::path::{Path, PathBuf};

use libloading::Library;
use muster_core::MusterError;
use tracing::{debug, warn};

use crate::manifest::{parse_plugin_manifest, PluginManifest};
use crate::registry::HandlerRegistry;

/// Symbol every plugin library must export with [`RegisterFn`]'s signature.
pub const REGISTRATION_SYMBOL: &str = "muster_register_rendezvous_handlers";

/// Fixed signature of the plugin registration hook.
///
/// The hook performs one or more `register(name, creator)` calls against the
/// registry it is handed. This is the entire ABI between the core and
/// out-of-tree plugins.
pub type RegisterFn = unsafe fn(&HandlerRegistry) -> Result<(), MusterError>;

/// A loaded registration hook, ready to run against a registry.
pub type RegistrationHook = Box<dyn Fn(&HandlerRegistry) -> Result<(), MusterError>>;

/// Produces a registration hook from an installed plugin package.
///
/// The manifest-scan half of discovery is fixed; the loading half is a seam
/// so the mechanism can differ per deployment (dynamic libraries by default,
/// static tables or test doubles elsewhere) while the reserved-key and
/// fixed-hook contract stays the same.
pub trait PluginLoader: Send + Sync {
    /// Resolves the package's advertised artifact to a registration hook.
    fn load(
        &self,
        package_dir: &Path,
        manifest: &PluginManifest,
    ) -> Result<RegistrationHook, MusterError>;
}

/// Default loader: opens the advertised dynamic library with `libloading` and
/// resolves [`REGISTRATION_SYMBOL`].
pub struct DylibLoader;

impl PluginLoader for DylibLoader {
    fn load(
        &self,
        package_dir: &Path,
        manifest: &PluginManifest,
    ) -> Result<RegistrationHook, MusterError> {
        let entry = manifest.handlers.as_ref().ok_or_else(|| {
            MusterError::Config(format!(
                "plugin '{}' has no rendezvous-handlers entry",
                manifest.name
            ))
        })?;
        let library_path = package_dir.join(&entry.library);

        // SAFETY: loading a plugin library runs third-party initialization
        // code; that is the plugin contract, and failures are isolated by the
        // caller's per-entry error handling.
        let library = unsafe { Library::new(&library_path) }.map_err(|e| {
            MusterError::PluginLoad {
                plugin: manifest.name.clone(),
                source: Box::new(e),
            }
        })?;

        // Registry entries live until process exit, so the code backing the
        // creators must too. The library handle is never dropped.
        let library: &'static Library = Box::leak(Box::new(library));

        // SAFETY: the symbol's signature is fixed by the plugin contract.
        let hook = *unsafe { library.get::<RegisterFn>(REGISTRATION_SYMBOL.as_bytes()) }
            .map_err(|e| MusterError::PluginLoad {
                plugin: manifest.name.clone(),
                source: Box::new(e),
            })?;

        Ok(Box::new(move |registry| {
            // SAFETY: signature guaranteed by the contract above.
            unsafe { hook(registry) }
        }))
    }
}

/// One failed entry from a discovery scan.
#[derive(Debug)]
pub struct PluginLoadFailure {
    /// Plugin package name, or the directory name when the manifest itself
    /// could not be read.
    pub plugin: String,
    /// Package directory the failure occurred in.
    pub path: PathBuf,
    /// What went wrong.
    pub error: MusterError,
}

/// Outcome of one discovery scan.
///
/// A scan never fails as a whole; per-entry failures are collected here and
/// surfaced to the caller as non-fatal warnings.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Plugin packages whose registration hook ran.
    pub loaded: Vec<String>,
    /// Per-entry failures; one broken package never blocks the rest.
    pub failures: Vec<PluginLoadFailure>,
}

impl DiscoveryReport {
    /// Returns true when no entry failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scans a plugins root and registers discovered backends.
pub struct PluginDiscovery {
    root: PathBuf,
    loader: Box<dyn PluginLoader>,
}

impl PluginDiscovery {
    /// Creates a discovery pass over `root` using the default dylib loader.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_loader(root, Box::new(DylibLoader))
    }

    /// Creates a discovery pass with an explicit loader.
    pub fn with_loader(root: impl Into<PathBuf>, loader: Box<dyn PluginLoader>) -> Self {
        Self {
            root: root.into(),
            loader,
        }
    }

    /// The plugins root this pass scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Performs one fresh scan of the plugins root.
    ///
    /// Each subdirectory with a `plugin.toml` advertising the reserved
    /// extension point is loaded and its hook invoked against `registry`.
    /// Failures are recorded per entry and never abort the scan; a
    /// duplicate-backend failure from a hook means the name was already
    /// registered by an earlier pass and is not treated as a failure.
    pub fn discover_and_register(&self, registry: &HandlerRegistry) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    root = %self.root.display(),
                    error = %e,
                    "plugins root not readable, skipping discovery"
                );
                return report;
            }
        };

        // Deterministic scan order.
        let mut package_dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        package_dirs.sort();

        for package_dir in package_dirs {
            self.scan_package(&package_dir, registry, &mut report);
        }

        debug!(
            root = %self.root.display(),
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "plugin discovery scan complete"
        );
        report
    }

    /// Loads one package and runs its hook, recording the outcome in `report`.
    fn scan_package(
        &self,
        package_dir: &Path,
        registry: &HandlerRegistry,
        report: &mut DiscoveryReport,
    ) {
        let manifest_path = package_dir.join("plugin.toml");
        if !manifest_path.is_file() {
            return;
        }

        let dir_name = package_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| package_dir.display().to_string());

        let manifest = match fs::read_to_string(&manifest_path)
            .map_err(|e| MusterError::Config(format!("unreadable plugin manifest: {e}")))
            .and_then(|content| parse_plugin_manifest(&content))
        {
            Ok(manifest) => manifest,
            Err(error) => {
                warn!(plugin = dir_name.as_str(), error = %error, "skipping plugin with bad manifest");
                report.failures.push(PluginLoadFailure {
                    plugin: dir_name,
                    path: package_dir.to_path_buf(),
                    error,
                });
                return;
            }
        };

        if manifest.handlers.is_none() {
            debug!(
                plugin = manifest.name.as_str(),
                "package advertises no rendezvous handlers, skipping"
            );
            return;
        }

        let hook = match self.loader.load(package_dir, &manifest) {
            Ok(hook) => hook,
            Err(error) => {
                warn!(plugin = manifest.name.as_str(), error = %error, "failed to load plugin");
                report.failures.push(PluginLoadFailure {
                    plugin: manifest.name,
                    path: package_dir.to_path_buf(),
                    error,
                });
                return;
            }
        };

        match hook(registry) {
            Ok(()) => {
                debug!(plugin = manifest.name.as_str(), "plugin registered its backends");
                report.loaded.push(manifest.name);
            }
            Err(error) if error.is_duplicate_backend() => {
                // Already satisfied by an earlier scan of the same process.
                debug!(
                    plugin = manifest.name.as_str(),
                    "plugin backends already registered"
                );
                report.loaded.push(manifest.name);
            }
            Err(error) => {
                warn!(plugin = manifest.name.as_str(), error = %error, "plugin registration hook failed");
                report.failures.push(PluginLoadFailure {
                    plugin: manifest.name,
                    path: package_dir.to_path_buf(),
                    error,
                });
            }
        }
    }
}
