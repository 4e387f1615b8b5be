// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in rendezvous backends.
//!
//! Two backends ship with the launcher: `static`, for fixed-membership jobs
//! whose node count never changes, and `file`, which coordinates through a
//! shared directory. Their handlers carry validated parameters; the
//! coordination protocol behind them lives outside this crate.

use std::sync::Arc;

use muster_core::{HandlerCreator, MusterError, RendezvousHandler, RendezvousParameters};
use tracing::{debug, warn};

use crate::registry::HandlerRegistry;

/// Name of the fixed-membership built-in backend.
pub const STATIC_BACKEND: &str = "static";

/// Name of the directory-coordinated built-in backend.
pub const FILE_BACKEND: &str = "file";

/// Handler for the `static` backend.
///
/// Membership is fixed at `min_nodes == max_nodes`; no node may join or leave
/// after launch.
pub struct StaticRendezvousHandler {
    params: RendezvousParameters,
}

impl StaticRendezvousHandler {
    /// Fixed world size of the job.
    pub fn world_size(&self) -> u32 {
        self.params.max_nodes
    }
}

impl RendezvousHandler for StaticRendezvousHandler {
    fn backend_name(&self) -> &str {
        STATIC_BACKEND
    }

    fn run_id(&self) -> &str {
        &self.params.run_id
    }
}

/// Handler for the `file` backend, coordinating through a shared directory.
pub struct FileRendezvousHandler {
    params: RendezvousParameters,
}

impl FileRendezvousHandler {
    /// Directory the nodes coordinate through.
    pub fn coordination_dir(&self) -> &str {
        &self.params.endpoint
    }
}

impl RendezvousHandler for FileRendezvousHandler {
    fn backend_name(&self) -> &str {
        FILE_BACKEND
    }

    fn run_id(&self) -> &str {
        &self.params.run_id
    }
}

fn create_static_handler(
    params: &RendezvousParameters,
) -> Result<Box<dyn RendezvousHandler>, MusterError> {
    if params.min_nodes != params.max_nodes {
        return Err(MusterError::Config(format!(
            "static rendezvous requires min_nodes == max_nodes, got {} and {}",
            params.min_nodes, params.max_nodes
        )));
    }
    if params.endpoint.is_empty() {
        return Err(MusterError::Config(
            "static rendezvous requires an endpoint (host:port of rank 0)".to_string(),
        ));
    }
    Ok(Box::new(StaticRendezvousHandler {
        params: params.clone(),
    }))
}

fn create_file_handler(
    params: &RendezvousParameters,
) -> Result<Box<dyn RendezvousHandler>, MusterError> {
    if params.endpoint.is_empty() {
        return Err(MusterError::Config(
            "file rendezvous requires an endpoint (shared directory path)".to_string(),
        ));
    }
    Ok(Box::new(FileRendezvousHandler {
        params: params.clone(),
    }))
}

/// Registers the built-in backends with `registry`.
///
/// Idempotent: built-ins are registered once per process and never
/// re-registered, so a name already bound is left alone.
pub fn register_builtins(registry: &HandlerRegistry) {
    let builtins: [(&str, Arc<dyn HandlerCreator>); 2] = [
        (STATIC_BACKEND, Arc::new(create_static_handler)),
        (FILE_BACKEND, Arc::new(create_file_handler)),
    ];

    for (name, creator) in builtins {
        match registry.register(name, creator, false) {
            Ok(()) => debug!(backend = name, "built-in backend registered"),
            Err(e) if e.is_duplicate_backend() => {
                debug!(backend = name, "built-in backend already registered");
            }
            // register only fails on duplicates or empty names; built-in
            // names are static literals.
            Err(e) => warn!(backend = name, error = %e, "built-in registration failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(min: u32, max: u32) -> RendezvousParameters {
        RendezvousParameters::new("static", "10.0.0.1:29400", "job-7", min, max).unwrap()
    }

    #[test]
    fn register_builtins_registers_both_backends() {
        let registry = HandlerRegistry::new();
        register_builtins(&registry);
        assert!(registry.contains(STATIC_BACKEND));
        assert!(registry.contains(FILE_BACKEND));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_builtins_is_idempotent() {
        let registry = HandlerRegistry::new();
        register_builtins(&registry);
        register_builtins(&registry);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn static_handler_requires_fixed_membership() {
        let registry = HandlerRegistry::new();
        register_builtins(&registry);

        let handler = registry
            .create_handler(STATIC_BACKEND, &params(4, 4))
            .unwrap();
        assert_eq!(handler.backend_name(), STATIC_BACKEND);
        assert_eq!(handler.run_id(), "job-7");

        let err = registry
            .create_handler(STATIC_BACKEND, &params(2, 4))
            .unwrap_err();
        assert!(matches!(err, MusterError::CreationFailed { .. }));
        assert!(err.to_string().contains("min_nodes == max_nodes"));
    }

    #[test]
    fn static_handler_exposes_world_size() {
        let handler = StaticRendezvousHandler {
            params: params(4, 4),
        };
        assert_eq!(handler.world_size(), 4);
    }

    #[test]
    fn file_handler_requires_endpoint() {
        let registry = HandlerRegistry::new();
        register_builtins(&registry);

        let mut p = params(1, 2);
        p.backend = FILE_BACKEND.to_string();
        p.endpoint = "/shared/rendezvous".to_string();
        let handler = registry.create_handler(FILE_BACKEND, &p).unwrap();
        assert_eq!(handler.backend_name(), FILE_BACKEND);

        p.endpoint = String::new();
        let err = registry.create_handler(FILE_BACKEND, &p).unwrap_err();
        assert!(err.to_string().contains("shared directory"));
    }
}
