// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Muster launcher.

use thiserror::Error;

/// The primary error type used across the Muster rendezvous crates.
#[derive(Debug, Error)]
pub enum MusterError {
    /// Configuration errors (invalid parameters, invalid manifest, empty names).
    #[error("configuration error: {0}")]
    Config(String),

    /// A backend name is already bound in the registry and overwrite was not requested.
    #[error("rendezvous backend '{backend}' is already registered")]
    DuplicateBackend { backend: String },

    /// No creator is bound for the requested backend name.
    #[error("rendezvous backend '{backend}' is not registered")]
    BackendNotFound { backend: String },

    /// The resolved creator failed while building a handler.
    #[error("failed to create rendezvous handler for backend '{backend}': {source}")]
    CreationFailed {
        backend: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A plugin package could not be loaded during discovery.
    ///
    /// Never raised from a discovery scan itself; collected per entry into
    /// the scan's report instead.
    #[error("failed to load rendezvous plugin '{plugin}': {source}")]
    PluginLoad {
        plugin: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MusterError {
    /// Returns true for the duplicate-registration error.
    ///
    /// Discovery and bootstrap recover from this variant locally: a name
    /// already bound from an earlier pass is an already-satisfied condition,
    /// not a failure.
    pub fn is_duplicate_backend(&self) -> bool {
        matches!(self, MusterError::DuplicateBackend { .. })
    }
}
