// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendezvous configuration parameters.
//!
//! [`RendezvousParameters`] is the immutable configuration bag handed to a
//! handler creator. The registry passes it through by reference and never
//! mutates it; backend-specific settings travel in the `config` map with
//! typed accessors for the common cases.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MusterError;

/// Default time a node waits for the rendezvous to complete.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration for a single rendezvous, consumed by handler creators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendezvousParameters {
    /// Name of the backend that should perform the rendezvous.
    pub backend: String,
    /// Backend-specific endpoint (host:port, directory path, ...).
    pub endpoint: String,
    /// Identifier shared by every node of one training job.
    pub run_id: String,
    /// Minimum number of nodes admitted to the rendezvous.
    pub min_nodes: u32,
    /// Maximum number of nodes admitted to the rendezvous.
    pub max_nodes: u32,
    /// How long a node waits for the group to form.
    pub join_timeout: Duration,
    /// Backend-specific key/value overrides.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl RendezvousParameters {
    /// Builds a validated parameter set.
    ///
    /// Fails with a config error when the run id is empty, `min_nodes` is
    /// zero, or `max_nodes` is below `min_nodes`.
    pub fn new(
        backend: impl Into<String>,
        endpoint: impl Into<String>,
        run_id: impl Into<String>,
        min_nodes: u32,
        max_nodes: u32,
    ) -> Result<Self, MusterError> {
        let run_id = run_id.into();
        if run_id.is_empty() {
            return Err(MusterError::Config(
                "rendezvous run_id must not be empty".to_string(),
            ));
        }
        if min_nodes < 1 {
            return Err(MusterError::Config(format!(
                "rendezvous min_nodes must be at least 1, got {min_nodes}"
            )));
        }
        if max_nodes < min_nodes {
            return Err(MusterError::Config(format!(
                "rendezvous max_nodes ({max_nodes}) must not be less than min_nodes ({min_nodes})"
            )));
        }
        Ok(Self {
            backend: backend.into(),
            endpoint: endpoint.into(),
            run_id,
            min_nodes,
            max_nodes,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            config: BTreeMap::new(),
        })
    }

    /// Sets the join timeout, consuming and returning self.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Adds a backend-specific override, consuming and returning self.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Returns a backend-specific override as a string, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Returns a backend-specific override parsed as a boolean.
    ///
    /// Accepts `true`/`false`, `yes`/`no`, and `1`/`0` (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, MusterError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(MusterError::Config(format!(
                "rendezvous config key '{key}' has non-boolean value '{other}'"
            ))),
        }
    }

    /// Returns a backend-specific override parsed as an unsigned integer.
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>, MusterError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.parse::<u32>().map(Some).map_err(|e| {
            MusterError::Config(format!(
                "rendezvous config key '{key}' has non-integer value '{raw}': {e}"
            ))
        })
    }
}
