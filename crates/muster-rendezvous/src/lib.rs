// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendezvous backend registry and out-of-tree plugin discovery.
//!
//! Backends are registered by name in a process-wide [`HandlerRegistry`];
//! built-ins register at bootstrap and independently installed plugin
//! packages register through a discovery scan of the plugins root. The
//! launcher calls [`ensure_backends_loaded`] and then resolves a backend with
//! [`HandlerRegistry::create_handler`].

pub mod bootstrap;
pub mod builtin;
pub mod discovery;
pub mod manifest;
pub mod registry;

pub use bootstrap::{ensure_backends_loaded, ensure_backends_loaded_global};
pub use builtin::{register_builtins, FILE_BACKEND, STATIC_BACKEND};
pub use discovery::{
    DiscoveryReport, DylibLoader, PluginDiscovery, PluginLoadFailure, PluginLoader, RegisterFn,
    RegistrationHook, REGISTRATION_SYMBOL,
};
pub use manifest::{parse_plugin_manifest, HandlerEntry, PluginManifest, EXTENSION_POINT};
pub use registry::{handler_registry, HandlerRegistry};
