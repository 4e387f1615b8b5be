// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Muster elastic-training launcher.
//!
//! This crate provides the foundational error type, the rendezvous parameter
//! bag, and the handler/creator traits that the registry, built-in backends,
//! and out-of-tree plugins all share.

pub mod error;
pub mod handler;
pub mod parameters;

// Re-export key items at crate root for ergonomic imports.
pub use error::MusterError;
pub use handler::{creator_fn, HandlerCreator, RendezvousHandler};
pub use parameters::{RendezvousParameters, DEFAULT_JOIN_TIMEOUT};
