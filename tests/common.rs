//! Common test utilities for integration tests
//!
//! This module provides shared mock backends and fixtures for integration
//! tests that cannot access the main crate's test_utils module.

use async_trait::async_trait;
use multidex::{
    BackendHit, BackendProvider, BackendSpec, CoordinatorConfig, IndexMetadata, MultidexError,
    PrebuiltCatalog, SearchBackend, SearchController,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Shard names used by the integration fixtures
#[allow(dead_code)]
pub const TEST_SHARDS: [&str; 3] = ["test-shard-a", "test-shard-b", "test-shard-c"];

/// Build a backend hit whose raw payload is a well-formed document
#[allow(dead_code)]
pub fn scripted_hit(doc_id: &str, score: f32, contents: &str) -> BackendHit {
    BackendHit {
        doc_id: doc_id.to_string(),
        score,
        raw: format!(r#"{{"contents": "{contents}"}}"#),
    }
}

/// Build hits with empty raw payloads, for shard searches that never parse
#[allow(dead_code)]
pub fn backend_hits(entries: &[(&str, f32)]) -> Vec<BackendHit> {
    entries
        .iter()
        .map(|(doc_id, score)| BackendHit {
            doc_id: doc_id.to_string(),
            score: *score,
            raw: String::new(),
        })
        .collect()
}

/// Catalog fixture: one sized lexical index, one unsized lexical index, and
/// a three-shard vector shard set
pub fn test_catalog() -> PrebuiltCatalog {
    let mut catalog = PrebuiltCatalog::new();
    catalog.insert("test-lexical", IndexMetadata::lexical(Some(1_000_000)));
    catalog.insert("other-lexical", IndexMetadata::lexical(None));
    for shard in TEST_SHARDS {
        catalog.insert(shard, IndexMetadata::vector(None));
    }
    catalog.set_shard_names(TEST_SHARDS.iter().map(|s| s.to_string()).collect());
    catalog
}

/// Coordinator config matching the `test_catalog` shard set
pub fn test_coordinator_config() -> CoordinatorConfig {
    CoordinatorConfig::new()
        .shard_names(TEST_SHARDS.iter().map(|s| s.to_string()).collect())
        .default_index("test-lexical")
}

/// Build a controller over the test catalog and the given provider
pub fn test_controller(provider: Arc<CountingProvider>) -> SearchController {
    SearchController::new(test_catalog(), provider, test_coordinator_config()).unwrap()
}

/// Backend returning a fixed hit list and an in-memory document store
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    hits: Vec<BackendHit>,
    docs: HashMap<String, String>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_hits(hits: Vec<BackendHit>) -> Self {
        Self {
            hits,
            docs: HashMap::new(),
        }
    }

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
    reason: String,
}

#[allow(dead_code)]
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
#[derive(Default)]
pub struct CountingProvider {
    backends: Mutex<HashMap<String, Arc<dyn SearchBackend>>>,
    loads: Mutex<HashMap<String, usize>>,
    downloaded: Mutex<HashSet<String>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn register(&self, name: &str, backend: Arc<dyn SearchBackend>) {
        self.backends.lock().insert(name.to_string(), backend);
    }

    pub fn mark_downloaded(&self, name: &str) {
        self.downloaded.lock().insert(name.to_string());
    }

    pub fn load_count(&self, name: &str) -> usize {
        self.loads.lock().get(name).copied().unwrap_or(0)
    }

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
