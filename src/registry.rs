//! Index handle registry with lazy provisioning
//!
//! The registry is the single source of truth for which indexes are loaded.
//! It maps index names to handles, creating them lazily on first reference
//! and caching them for the life of the process. The registry is an
//! explicitly constructed object shared by reference; there is no
//! module-level singleton.
//!
//! Provisioning the same name from concurrent callers is serialized through
//! a per-name gate: the first caller performs the load, later callers block
//! on the in-flight load and observe the winner's handle. Callers for
//! different names never block each other. There is no eviction; handles
//! persist until process exit.

use crate::backend::SearchBackend;
use crate::config::{IndexConfig, IndexSettings, SettingsUpdate};
use crate::error::MultidexError;
use crate::resolver::BackendResolver;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-index state bundle
///
/// Exactly one handle exists per distinct index name at any time. The
/// handle is the only owner of its backend reference: the backend is absent
/// until provisioning succeeds and is only ever assigned by the registry.
pub struct IndexHandle {
    name: String,
    state: RwLock<HandleState>,
}

#[derive(Default)]
struct HandleState {
    backend: Option<Arc<dyn SearchBackend>>,
    search_width: Option<usize>,
    encoder: Option<String>,
    query_generator: Option<String>,
}

impl IndexHandle {
    pub(crate) fn from_config(config: &IndexConfig) -> Self {
        Self {
            name: config.name.clone(),
            state: RwLock::new(HandleState {
                backend: None,
                search_width: config.search_width,
                encoder: config.encoder.clone(),
                query_generator: config.query_generator.clone(),
            }),
        }
    }

    /// The index name this handle is keyed by
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loaded backend, None until provisioning succeeds
    pub fn backend(&self) -> Option<Arc<dyn SearchBackend>> {
        self.state.read().backend.clone()
    }

    /// True once the backend load has completed
    pub fn is_loaded(&self) -> bool {
        self.state.read().backend.is_some()
    }

    pub(crate) fn set_backend(&self, backend: Arc<dyn SearchBackend>) {
        self.state.write().backend = Some(backend);
    }

    /// Snapshot of the currently set settings
    pub fn settings(&self) -> IndexSettings {
        let state = self.state.read();
        IndexSettings {
            search_width: state.search_width,
            encoder: state.encoder.clone(),
            query_generator: state.query_generator.clone(),
        }
    }

    /// Apply a partial update: provided fields overwrite, absent fields are
    /// left untouched
    pub fn apply_update(&self, update: &SettingsUpdate) {
        let mut state = self.state.write();
        if let Some(width) = update.search_width {
            state.search_width = Some(width);
        }
        if let Some(encoder) = &update.encoder {
            state.encoder = Some(encoder.clone());
        }
        if let Some(generator) = &update.query_generator {
            state.query_generator = Some(generator.clone());
        }
    }

    /// Currently configured search width
    pub fn search_width(&self) -> Option<usize> {
        self.state.read().search_width
    }

    /// Currently configured encoder
    pub fn encoder(&self) -> Option<String> {
        self.state.read().encoder.clone()
    }

    /// Currently configured query generator
    pub fn query_generator(&self) -> Option<String> {
        self.state.read().query_generator.clone()
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Process-lifetime mapping from index name to handle
pub struct IndexRegistry {
    resolver: BackendResolver,
    handles: RwLock<FxHashMap<String, Arc<IndexHandle>>>,
    gates: Mutex<FxHashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl IndexRegistry {
    /// Create an empty registry backed by the given resolver
    pub fn new(resolver: BackendResolver) -> Self {
        Self {
            resolver,
            handles: RwLock::new(FxHashMap::default()),
            gates: Mutex::new(FxHashMap::default()),
        }
    }

    /// The resolver this registry provisions through
    pub fn resolver(&self) -> &BackendResolver {
        &self.resolver
    }

    /// Pure lookup, no side effects
    pub fn get(&self, name: &str) -> Option<Arc<IndexHandle>> {
        self.handles.read().get(name).cloned()
    }

    /// Names of all currently registered handles, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handles.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the backend for `config`, blocking until the load completes,
    /// and store the resulting handle keyed by name
    ///
    /// Overwrites any prior handle for the same name. On failure the
    /// registry is left unchanged and the error propagates verbatim.
    pub async fn provision(&self, config: IndexConfig) -> Result<Arc<IndexHandle>, MultidexError> {
        let gate = self.gate(&config.name);
        let _permit = gate.lock().await;
        self.provision_gated(config).await
    }

    /// Return the existing handle if it already has a loaded backend,
    /// otherwise provision with `fallback`
    ///
    /// This is the idempotent lazy-init path used by all search operations:
    /// the second caller for an already-loaded name observes the cached
    /// handle with no re-load side effect.
    pub async fn ensure(
        &self,
        name: &str,
        fallback: IndexConfig,
    ) -> Result<Arc<IndexHandle>, MultidexError> {
        if let Some(handle) = self.get(name) {
            if handle.is_loaded() {
                debug!(index = name, "index handle already provisioned");
                return Ok(handle);
            }
        }

        let gate = self.gate(name);
        let _permit = gate.lock().await;

        // Re-check under the gate: a concurrent caller may have finished the
        // load while this one waited.
        if let Some(handle) = self.get(name) {
            if handle.is_loaded() {
                debug!(index = name, "index provisioned by concurrent caller");
                return Ok(handle);
            }
        }

        self.provision_gated(fallback).await
    }

    async fn provision_gated(&self, config: IndexConfig) -> Result<Arc<IndexHandle>, MultidexError> {
        info!(index = %config.name, "provisioning index backend");
        let backend = self.resolver.resolve(&config).await?;

        let handle = Arc::new(IndexHandle::from_config(&config));
        handle.set_backend(backend);
        self.handles
            .write()
            .insert(config.name.clone(), Arc::clone(&handle));

        info!(index = %config.name, "index backend provisioned");
        Ok(handle)
    }

    fn gate(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.gates.lock();
        Arc::clone(
            gates
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}

impl std::fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRegistry")
            .field("handles", &self.names())
            .finish()
    }
}
