// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `muster backends` command implementation.
//!
//! Loads built-in and out-of-tree backends, then lists what is available.

use muster_rendezvous::{ensure_backends_loaded_global, handler_registry, PluginDiscovery};

use crate::config::MusterConfig;

/// Runs the `muster backends` command.
pub fn run_backends(config: &MusterConfig) {
    let discovery = PluginDiscovery::new(&config.plugin_dir);
    let report = ensure_backends_loaded_global(&discovery);

    println!("available rendezvous backends:");
    for name in handler_registry().names() {
        println!("  {name}");
    }

    if !report.is_clean() {
        eprintln!();
        eprintln!("warning: {} plugin(s) failed to load:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {} ({}): {}", failure.plugin, failure.path.display(), failure.error);
        }
    }
}
