// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler and creator traits.
//!
//! A [`RendezvousHandler`] is the opaque capability object a backend hands
//! back to the launcher; the registry never inspects it beyond the identity
//! accessors. A [`HandlerCreator`] builds handlers from parameters and is
//! what plugins and built-ins register by name.

use crate::error::MusterError;
use crate::parameters::RendezvousParameters;

/// Capability object returned by a handler creator.
///
/// The coordination protocol behind a handler is backend-defined and opaque
/// to the registry; only identity accessors are required, so the launcher can
/// report which backend and run it resolved.
pub trait RendezvousHandler: Send + Sync {
    /// Name of the backend that produced this handler.
    fn backend_name(&self) -> &str;

    /// Run identifier this handler coordinates.
    fn run_id(&self) -> &str;
}

// Debug via the identity accessors so `Result<Box<dyn RendezvousHandler>, _>`
// supports `unwrap_err` in tests without a supertrait on implementors.
impl std::fmt::Debug for dyn RendezvousHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendezvousHandler")
            .field("backend", &self.backend_name())
            .field("run_id", &self.run_id())
            .finish()
    }
}

/// Factory for rendezvous handlers, registered in the registry by name.
///
/// Creators must be shareable across threads; the registry hands out clones
/// of an `Arc<dyn HandlerCreator>` and invokes them outside its lock.
pub trait HandlerCreator: Send + Sync {
    /// Builds a handler from the given parameters.
    fn create(
        &self,
        params: &RendezvousParameters,
    ) -> Result<Box<dyn RendezvousHandler>, MusterError>;
}

// Plain closures are creators. Lets built-ins, plugins, and tests register
// `|params| ...` without a named type.
impl<F> HandlerCreator for F
where
    F: Fn(&RendezvousParameters) -> Result<Box<dyn RendezvousHandler>, MusterError>
        + Send
        + Sync,
{
    fn create(
        &self,
        params: &RendezvousParameters,
    ) -> Result<Box<dyn RendezvousHandler>, MusterError> {
        self(params)
    }
}

/// Wraps a closure as a shareable [`HandlerCreator`].
///
/// Pins the closure's signature so call sites can register
/// `creator_fn(|params| ...)` without type annotations.
pub fn creator_fn<F>(f: F) -> std::sync::Arc<dyn HandlerCreator>
where
    F: Fn(&RendezvousParameters) -> Result<Box<dyn RendezvousHandler>, MusterError>
        + Send
        + Sync
        + 'static,
{
    std::sync::Arc::new(f)
}
