//! Search controller facade
//!
//! The controller wires the catalog, registry, resolver, executor and shard
//! coordinator together and carries the operation surface this layer
//! exposes to its callers. It is an explicitly constructed object, created
//! once at service start and shared by reference into request-handling
//! contexts, never a module-level singleton. No transport is mandated; an
//! HTTP or CLI binding lives outside this crate.

use crate::backend::BackendProvider;
use crate::catalog::{BackendKind, IndexMetadata, PrebuiltCatalog};
use crate::config::{CoordinatorConfig, IndexConfig, IndexSettings, SearchOptions, SettingsUpdate};
use crate::coordinator::ShardCoordinator;
use crate::error::MultidexError;
use crate::executor::QueryExecutor;
use crate::registry::{IndexHandle, IndexRegistry};
use crate::resolver::BackendResolver;
use crate::structures::{Document, IndexStatus, QueryResponse, ShardedResults};
use std::sync::Arc;
use tracing::{debug, info};

/// Core functionality controller for multi-index search
pub struct SearchController {
    catalog: Arc<PrebuiltCatalog>,
    provider: Arc<dyn BackendProvider>,
    registry: Arc<IndexRegistry>,
    executor: QueryExecutor,
    coordinator: ShardCoordinator,
    default_index: String,
}

impl SearchController {
    /// Create a controller over the given catalog, loader and configuration
    pub fn new(
        catalog: PrebuiltCatalog,
        provider: Arc<dyn BackendProvider>,
        config: CoordinatorConfig,
    ) -> Result<Self, MultidexError> {
        config.validate()?;
        let catalog = Arc::new(catalog);
        let resolver = BackendResolver::new(Arc::clone(&catalog), Arc::clone(&provider));
        let registry = Arc::new(IndexRegistry::new(resolver));
        let coordinator = ShardCoordinator::new(Arc::clone(&registry), &config);
        Ok(Self {
            catalog,
            provider,
            registry,
            executor: QueryExecutor::new(),
            coordinator,
            default_index: config.default_index,
        })
    }

    /// Create a controller with the default prebuilt catalog and shard set
    pub fn with_defaults(provider: Arc<dyn BackendProvider>) -> Result<Self, MultidexError> {
        Self::new(
            PrebuiltCatalog::with_defaults(),
            provider,
            CoordinatorConfig::default(),
        )
    }

    /// The registry holding all provisioned handles
    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    /// Provision the configured default index
    pub async fn initialize_default_index(&self) -> Result<Arc<IndexHandle>, MultidexError> {
        info!(index = %self.default_index, "initializing default index");
        self.add_index(IndexConfig::new(&self.default_index)).await
    }

    /// Explicitly provision an index, blocking until the load completes
    ///
    /// Overwrites any prior handle for the same name; unsupported names fail
    /// with `UnsupportedIndex` and leave the registry unchanged.
    pub async fn add_index(&self, config: IndexConfig) -> Result<Arc<IndexHandle>, MultidexError> {
        self.registry.provision(config).await
    }

    /// Catalog listing merged across both families, sorted by name
    pub fn get_indexes(&self) -> Vec<(String, IndexMetadata)> {
        self.catalog.listing()
    }

    /// Search one index, lazily provisioning it on first use
    ///
    /// `options` supplies provisioning settings when the index is not yet
    /// loaded; result order is backend-native.
    pub async fn search(
        &self,
        index_name: &str,
        query: &str,
        k: usize,
        query_id: &str,
        options: SearchOptions,
    ) -> Result<QueryResponse, MultidexError> {
        let handle = self
            .registry
            .ensure(index_name, options.into_index_config(index_name))
            .await?;
        self.executor.execute(&handle, query, k, query_id).await
    }

    /// Search the shard set concurrently and merge into the global top-k
    pub async fn sharded_search(
        &self,
        query: &str,
        k: usize,
        search_width: Option<usize>,
        encoder: Option<&str>,
    ) -> Result<ShardedResults, MultidexError> {
        self.coordinator
            .sharded_search(query, k, search_width, encoder)
            .await
    }

    /// Fetch one document by id from a lexical index
    ///
    /// Lazily provisions the index on first use. By-id retrieval is defined
    /// only for lexical backends; vector index names are rejected.
    pub async fn get_document(
        &self,
        index_name: &str,
        doc_id: &str,
    ) -> Result<Document, MultidexError> {
        match self.catalog.classify(index_name) {
            Some(BackendKind::Lexical) => {}
            Some(BackendKind::Vector) => {
                return Err(MultidexError::invalid_input(
                    "index_name",
                    format!("document retrieval by id is only defined for lexical indexes; '{index_name}' is a vector index"),
                ));
            }
            None => return Err(MultidexError::unsupported_index(index_name)),
        }

        let handle = self
            .registry
            .ensure(index_name, IndexConfig::new(index_name))
            .await?;
        self.executor.fetch_document(&handle, doc_id).await
    }

    /// Status report for one index name
    ///
    /// Combines the download tracker with catalog metadata; the size is
    /// absent when the catalog has no entry for the name. Never triggers a
    /// download.
    pub fn get_status(&self, index_name: &str) -> IndexStatus {
        IndexStatus {
            downloaded: self.provider.is_downloaded(index_name),
            size_compressed_bytes: self
                .catalog
                .metadata(index_name)
                .and_then(|metadata| metadata.size_compressed_bytes),
        }
    }

    /// Apply a partial settings update to an existing handle
    pub fn update_settings(
        &self,
        index_name: &str,
        update: SettingsUpdate,
    ) -> Result<(), MultidexError> {
        let handle = self
            .registry
            .get(index_name)
            .ok_or_else(|| MultidexError::unknown_index(index_name))?;
        debug!(index = index_name, "updating index settings");
        handle.apply_update(&update);
        Ok(())
    }

    /// Snapshot of the settings currently set on a handle
    pub fn get_settings(&self, index_name: &str) -> Result<IndexSettings, MultidexError> {
        let handle = self
            .registry
            .get(index_name)
            .ok_or_else(|| MultidexError::unknown_index(index_name))?;
        Ok(handle.settings())
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("default_index", &self.default_index)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
