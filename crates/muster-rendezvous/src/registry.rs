// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-keyed registry of rendezvous handler creators.
//!
//! The [`HandlerRegistry`] maps backend names to [`HandlerCreator`]s. Built-in
//! backends register eagerly at bootstrap; out-of-tree plugins register
//! through the discovery pass. Entries persist for the life of the process --
//! there is no unregister operation.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use muster_core::{HandlerCreator, MusterError, RendezvousHandler, RendezvousParameters};
use tracing::debug;

/// Process-wide mapping of backend name to handler creator.
///
/// All reads and writes go through one `RwLock`; creators are invoked outside
/// the lock so a slow creator cannot block registration or lookup.
pub struct HandlerRegistry {
    creators: RwLock<HashMap<String, Arc<dyn HandlerCreator>>>,
}

impl HandlerRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            creators: RwLock::new(HashMap::new()),
        }
    }

    /// Binds `name` to `creator`.
    ///
    /// With `overwrite` false (the default everywhere outside tooling), a
    /// name that is already bound fails with
    /// [`MusterError::DuplicateBackend`] and the existing binding is left
    /// untouched. With `overwrite` true the binding is replaced atomically.
    pub fn register(
        &self,
        name: &str,
        creator: Arc<dyn HandlerCreator>,
        overwrite: bool,
    ) -> Result<(), MusterError> {
        if name.is_empty() {
            return Err(MusterError::Config(
                "rendezvous backend name must not be empty".to_string(),
            ));
        }

        let mut creators = self.creators.write().unwrap_or_else(|e| e.into_inner());
        if !overwrite && creators.contains_key(name) {
            return Err(MusterError::DuplicateBackend {
                backend: name.to_string(),
            });
        }
        creators.insert(name.to_string(), creator);
        debug!(backend = name, overwrite, "rendezvous backend registered");
        Ok(())
    }

    /// Returns the creator bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn HandlerCreator>> {
        self.creators
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Returns true when `name` has a bound creator.
    pub fn contains(&self, name: &str) -> bool {
        self.creators
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    /// Lists all registered backend names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .creators
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns the number of registered backends.
    pub fn len(&self) -> usize {
        self.creators
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Returns true if no backends are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves `name` and invokes its creator with `params`.
    ///
    /// Fails with [`MusterError::BackendNotFound`] when `name` is unbound. A
    /// failure inside the creator is wrapped as
    /// [`MusterError::CreationFailed`] with the original cause attached.
    pub fn create_handler(
        &self,
        name: &str,
        params: &RendezvousParameters,
    ) -> Result<Box<dyn RendezvousHandler>, MusterError> {
        let creator = self
            .lookup(name)
            .ok_or_else(|| MusterError::BackendNotFound {
                backend: name.to_string(),
            })?;

        // The lock is released; the creator runs unguarded.
        creator.create(params).map_err(|e| match e {
            already @ MusterError::CreationFailed { .. } => already,
            other => MusterError::CreationFailed {
                backend: name.to_string(),
                source: Box::new(other),
            },
        })
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the process-wide registry, creating it on first use.
///
/// The singleton lives until process exit; there is no teardown.
pub fn handler_registry() -> &'static HandlerRegistry {
    static REGISTRY: OnceLock<HandlerRegistry> = OnceLock::new();
    REGISTRY.get_or_init(HandlerRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubHandler {
        backend: String,
        run_id: String,
    }

    impl RendezvousHandler for StubHandler {
        fn backend_name(&self) -> &str {
            &self.backend
        }

        fn run_id(&self) -> &str {
            &self.run_id
        }
    }

    /// Creator that stamps handlers with a label and counts invocations.
    fn counting_creator(label: &str, calls: Arc<AtomicUsize>) -> Arc<dyn HandlerCreator> {
        let label = label.to_string();
        muster_core::creator_fn(move |params| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubHandler {
                backend: label.clone(),
                run_id: params.run_id.clone(),
            }) as Box<dyn RendezvousHandler>)
        })
    }

    fn params() -> RendezvousParameters {
        RendezvousParameters::new("any", "ep", "run-1", 1, 1).unwrap()
    }

    #[test]
    fn distinct_names_dispatch_to_their_own_creator() {
        let registry = HandlerRegistry::new();
        let calls_a = Arc::new(AtomicUsize::new(0));
        let calls_b = Arc::new(AtomicUsize::new(0));
        registry
            .register("alpha", counting_creator("alpha", calls_a.clone()), false)
            .unwrap();
        registry
            .register("beta", counting_creator("beta", calls_b.clone()), false)
            .unwrap();

        assert!(registry.contains("alpha"));
        assert!(registry.contains("beta"));

        let handler = registry.create_handler("alpha", &params()).unwrap();
        assert_eq!(handler.backend_name(), "alpha");
        assert_eq!(calls_a.load(Ordering::SeqCst), 1);
        assert_eq!(calls_b.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_register_fails_and_keeps_existing_binding() {
        let registry = HandlerRegistry::new();
        let calls_first = Arc::new(AtomicUsize::new(0));
        registry
            .register("static", counting_creator("first", calls_first.clone()), false)
            .unwrap();

        let result = registry.register(
            "static",
            counting_creator("second", Arc::new(AtomicUsize::new(0))),
            false,
        );
        assert!(matches!(
            result,
            Err(MusterError::DuplicateBackend { ref backend }) if backend == "static"
        ));

        // The original binding still answers.
        let handler = registry.create_handler("static", &params()).unwrap();
        assert_eq!(handler.backend_name(), "first");
        assert_eq!(calls_first.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn overwrite_replaces_binding() {
        let registry = HandlerRegistry::new();
        registry
            .register(
                "static",
                counting_creator("first", Arc::new(AtomicUsize::new(0))),
                false,
            )
            .unwrap();
        registry
            .register(
                "static",
                counting_creator("second", Arc::new(AtomicUsize::new(0))),
                true,
            )
            .unwrap();

        let handler = registry.create_handler("static", &params()).unwrap();
        assert_eq!(handler.backend_name(), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_handler_unknown_name_is_not_found() {
        let registry = HandlerRegistry::new();
        let result = registry.create_handler("unknown", &params());
        assert!(matches!(
            result,
            Err(MusterError::BackendNotFound { ref backend }) if backend == "unknown"
        ));
    }

    #[test]
    fn create_handler_wraps_creator_failure() {
        let registry = HandlerRegistry::new();
        registry
            .register(
                "broken",
                muster_core::creator_fn(|_| Err(MusterError::Config("bad endpoint".to_string()))),
                false,
            )
            .unwrap();

        let err = registry.create_handler("broken", &params()).unwrap_err();
        match err {
            MusterError::CreationFailed { backend, source } => {
                assert_eq!(backend, "broken");
                assert!(source.to_string().contains("bad endpoint"));
            }
            other => panic!("expected CreationFailed, got {other}"),
        }
    }

    #[test]
    fn register_rejects_empty_name() {
        let registry = HandlerRegistry::new();
        let result = registry.register(
            "",
            counting_creator("x", Arc::new(AtomicUsize::new(0))),
            false,
        );
        assert!(matches!(result, Err(MusterError::Config(_))));
    }

    #[test]
    fn lookup_absent_returns_none() {
        let registry = HandlerRegistry::new();
        assert!(registry.lookup("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let registry = HandlerRegistry::new();
        for name in ["zebra", "alpha", "middle"] {
            registry
                .register(name, counting_creator(name, Arc::new(AtomicUsize::new(0))), false)
                .unwrap();
        }
        assert_eq!(registry.names(), vec!["alpha", "middle", "zebra"]);
    }

    #[test]
    fn concurrent_create_handler_sees_consistent_creators() {
        let registry = Arc::new(HandlerRegistry::new());
        for name in ["one", "two", "three", "four"] {
            registry
                .register(name, counting_creator(name, Arc::new(AtomicUsize::new(0))), false)
                .unwrap();
        }

        let mut threads = Vec::new();
        for name in ["one", "two", "three", "four"] {
            let registry = registry.clone();
            threads.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let handler = registry.create_handler(name, &params()).unwrap();
                    assert_eq!(handler.backend_name(), name);
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }
    }

    #[test]
    fn global_registry_is_a_singleton() {
        let a = handler_registry() as *const HandlerRegistry;
        let b = handler_registry() as *const HandlerRegistry;
        assert_eq!(a, b);
    }
}
