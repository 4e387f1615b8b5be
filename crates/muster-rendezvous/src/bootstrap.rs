// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend bootstrap.
//!
//! The launcher calls [`ensure_backends_loaded`] once before resolving any
//! backend by name. It is safe to call again at any time; built-ins register
//! idempotently and discovery re-scans the plugins root, so a plugin package
//! installed after the process started becomes visible on the next call.

use tracing::{info, warn};

use crate::builtin::register_builtins;
use crate::discovery::{DiscoveryReport, PluginDiscovery};
use crate::registry::{handler_registry, HandlerRegistry};

/// Registers built-in backends, then runs one plugin discovery pass.
///
/// Returns the discovery report; per-plugin failures are logged as warnings
/// and surfaced there rather than raised, so one broken out-of-tree package
/// cannot block the built-in or remaining out-of-tree backends.
pub fn ensure_backends_loaded(
    registry: &HandlerRegistry,
    discovery: &PluginDiscovery,
) -> DiscoveryReport {
    register_builtins(registry);

    let report = discovery.discover_and_register(registry);
    for failure in &report.failures {
        warn!(
            plugin = failure.plugin.as_str(),
            path = %failure.path.display(),
            error = %failure.error,
            "rendezvous plugin failed to load"
        );
    }
    info!(
        backends = registry.len(),
        plugins_loaded = report.loaded.len(),
        plugins_failed = report.failures.len(),
        "rendezvous backends loaded"
    );
    report
}

/// [`ensure_backends_loaded`] against the process-wide registry.
pub fn ensure_backends_loaded_global(discovery: &PluginDiscovery) -> DiscoveryReport {
    ensure_backends_loaded(handler_registry(), discovery)
}
