// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `muster launch` command implementation.
//!
//! Resolves the requested rendezvous backend by name and creates its handler.
//! Worker process management hangs off the created handler and is not part of
//! the registry core.

use muster_core::{MusterError, RendezvousParameters};
use muster_rendezvous::{ensure_backends_loaded_global, handler_registry, PluginDiscovery};
use tracing::info;

use crate::config::MusterConfig;

/// Arguments for one launch, already parsed by the CLI layer.
#[derive(Debug)]
pub struct LaunchArgs {
    pub backend: String,
    pub endpoint: String,
    pub run_id: String,
    pub min_nodes: u32,
    pub max_nodes: u32,
    pub conf: Vec<(String, String)>,
}

/// Runs the `muster launch` command.
///
/// An unknown backend name is a user-facing configuration error and is
/// reported together with the names that are available.
pub fn run_launch(config: &MusterConfig, args: LaunchArgs) -> Result<(), MusterError> {
    let discovery = PluginDiscovery::new(&config.plugin_dir);
    ensure_backends_loaded_global(&discovery);
    let registry = handler_registry();

    let mut params = RendezvousParameters::new(
        args.backend.clone(),
        args.endpoint,
        args.run_id,
        args.min_nodes,
        args.max_nodes,
    )?;
    for (key, value) in args.conf {
        params = params.with_config(key, value);
    }

    let handler = registry
        .create_handler(&args.backend, &params)
        .map_err(|e| {
            if matches!(e, MusterError::BackendNotFound { .. }) {
                eprintln!(
                    "error: unknown rendezvous backend '{}'. Available: {}",
                    args.backend,
                    registry.names().join(", ")
                );
            }
            e
        })?;

    info!(
        backend = handler.backend_name(),
        run_id = handler.run_id(),
        min_nodes = params.min_nodes,
        max_nodes = params.max_nodes,
        "rendezvous handler created"
    );
    println!(
        "rendezvous handler ready: backend={} run_id={}",
        handler.backend_name(),
        handler.run_id()
    );
    Ok(())
}

/// Parses one `key=value` override for `--conf`.
pub fn parse_conf_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
