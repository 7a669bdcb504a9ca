//! Test utilities for multidex testing
//!
//! This module provides mock backends and a counting provider used across
//! the unit test suite: scripted backends with canned hits and documents, a
//! backend that never completes (for join-barrier assertions), a failing
//! backend, and catalog/config fixtures. Integration tests under `tests/`
//! carry their own copies in `tests/common.rs`.

use crate::backend::{BackendHit, BackendProvider, BackendSpec, SearchBackend};
use crate::catalog::{IndexMetadata, PrebuiltCatalog};
use crate::config::{CoordinatorConfig, IndexConfig};
use crate::coordinator::ShardFailurePolicy;
use crate::error::MultidexError;
use crate::registry::IndexHandle;
use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::time::Duration;

/// Build a backend hit whose raw payload is a well-formed document
pub fn scripted_hit(doc_id: &str, score: f32, contents: &str) -> BackendHit {
    BackendHit {
        doc_id: doc_id.to_string(),
        score,
        raw: format!(r#"{{"contents": "{contents}"}}"#),
    }
}

/// Catalog fixture: one sized lexical index, one unsized lexical index, and
/// a three-shard vector shard set
pub fn test_catalog() -> PrebuiltCatalog {
    let shards = vec![
        "test-shard-a".to_string(),
        "test-shard-b".to_string(),
        "test-shard-c".to_string(),
    ];
    let mut catalog = PrebuiltCatalog::new();
    catalog.insert("test-lexical", IndexMetadata::lexical(Some(1_000_000)));
    catalog.insert("other-lexical", IndexMetadata::lexical(None));
    for shard in &shards {
        catalog.insert(shard, IndexMetadata::vector(None));
    }
    catalog.set_shard_names(shards);
    catalog
}

/// Coordinator config matching the `test_catalog` shard set
pub fn test_coordinator_config() -> CoordinatorConfig {
    CoordinatorConfig::new()
        .shard_names(vec![
            "test-shard-a".to_string(),
            "test-shard-b".to_string(),
            "test-shard-c".to_string(),
        ])
        .default_index("test-lexical")
}

/// Build a handle with an already-loaded backend, bypassing the registry
pub fn loaded_handle(config: IndexConfig, backend: Arc<dyn SearchBackend>) -> IndexHandle {
    let handle = IndexHandle::from_config(&config);
    handle.set_backend(backend);
    handle
}

/// Backend returning a fixed hit list and an in-memory document store
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    hits: Vec<BackendHit>,
    docs: FxHashMap<String, String>,
}

impl ScriptedBackend {
    /// A backend with no hits and no documents
    pub fn empty() -> Self {
        Self::default()
    }

    /// A backend answering every search with the first `k` of these hits
    pub fn with_hits(hits: Vec<BackendHit>) -> Self {
        Self {
            hits,
            docs: FxHashMap::default(),
        }
    }

    /// Register a raw document payload
    pub fn with_document(mut self, doc_id: &str, raw: &str) -> Self {
        self.docs.insert(doc_id.to_string(), raw.to_string());
        self
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<BackendHit>, MultidexError> {
        Ok(self.hits.iter().take(k).cloned().collect())
    }

    async fn document(&self, doc_id: &str) -> Result<Option<String>, MultidexError> {
        Ok(self.docs.get(doc_id).cloned())
    }
}

/// Backend whose operations never complete
#[derive(Debug, Default)]
pub struct PendingBackend;

#[async_trait]
impl SearchBackend for PendingBackend {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<BackendHit>, MultidexError> {
        std::future::pending().await
    }

    async fn document(&self, _doc_id: &str) -> Result<Option<String>, MultidexError> {
        std::future::pending().await
    }
}

/// Backend whose search always fails
#[derive(Debug)]
pub struct FailingBackend {
    pub reason: String,
}

impl FailingBackend {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl SearchBackend for FailingBackend {
    async fn search(&self, _query: &str, _k: usize) -> Result<Vec<BackendHit>, MultidexError> {
        Err(MultidexError::backend("failing-backend", &self.reason))
    }

    async fn document(&self, _doc_id: &str) -> Result<Option<String>, MultidexError> {
        Err(MultidexError::backend("failing-backend", &self.reason))
    }
}

/// Provider tracking per-name load counts
///
/// Loads return the backend registered for the name, or an empty scripted
/// backend when none is registered. An optional artificial load delay makes
/// provisioning races observable in tests.
#[derive(Default)]
pub struct CountingProvider {
    backends: Mutex<FxHashMap<String, Arc<dyn SearchBackend>>>,
    loads: Mutex<FxHashMap<String, usize>>,
    downloaded: Mutex<FxHashSet<String>>,
    delay: Option<Duration>,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artificial delay to every load
    pub fn load_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Register the backend returned for a given index name
    pub fn register(&self, name: &str, backend: Arc<dyn SearchBackend>) {
        self.backends.lock().insert(name.to_string(), backend);
    }

    /// Mark an index as downloaded for status reporting
    pub fn mark_downloaded(&self, name: &str) {
        self.downloaded.lock().insert(name.to_string());
    }

    /// Number of loads performed for one name
    pub fn load_count(&self, name: &str) -> usize {
        self.loads.lock().get(name).copied().unwrap_or(0)
    }

    /// Total loads across all names
    pub fn total_loads(&self) -> usize {
        self.loads.lock().values().sum()
    }
}

#[async_trait]
impl BackendProvider for CountingProvider {
    async fn load(&self, spec: &BackendSpec) -> Result<Arc<dyn SearchBackend>, MultidexError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        *self
            .loads
            .lock()
            .entry(spec.name().to_string())
            .or_insert(0) += 1;
        let backend = self.backends.lock().get(spec.name()).cloned();
        Ok(backend.unwrap_or_else(|| Arc::new(ScriptedBackend::empty())))
    }

    fn is_downloaded(&self, name: &str) -> bool {
        self.downloaded.lock().contains(name)
    }
}
