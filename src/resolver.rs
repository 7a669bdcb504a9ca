//! Backend family resolution and loading
//!
//! The resolver turns a provisioning request into a loaded backend: it
//! classifies the index name against the catalog into one of the two
//! backend families, builds the family's construction parameters, and
//! drives the provider's expensive load. Unknown names fail with
//! `UnsupportedIndex` before any load is attempted.

use crate::backend::{BackendProvider, BackendSpec, SearchBackend};
use crate::catalog::{BackendKind, PrebuiltCatalog};
use crate::config::IndexConfig;
use crate::error::MultidexError;
use std::sync::Arc;
use tracing::info;

/// Two-way dispatch from index name to backend instance
pub struct BackendResolver {
    catalog: Arc<PrebuiltCatalog>,
    provider: Arc<dyn BackendProvider>,
}

impl BackendResolver {
    /// Create a resolver over the given catalog and loader
    pub fn new(catalog: Arc<PrebuiltCatalog>, provider: Arc<dyn BackendProvider>) -> Self {
        Self { catalog, provider }
    }

    /// The catalog this resolver classifies against
    pub fn catalog(&self) -> &PrebuiltCatalog {
        &self.catalog
    }

    /// The loader collaborator
    pub fn provider(&self) -> &Arc<dyn BackendProvider> {
        &self.provider
    }

    /// Build the construction parameters for `config`
    ///
    /// Vector backends take the search width and encoder from the config;
    /// lexical backends are loaded by name alone. Settings for the other
    /// family are ignored, not errors.
    pub fn spec_for(&self, config: &IndexConfig) -> Result<BackendSpec, MultidexError> {
        match self.catalog.classify(&config.name) {
            Some(BackendKind::Vector) => Ok(BackendSpec::Vector {
                name: config.name.clone(),
                search_width: config.search_width,
                encoder: config.encoder.clone(),
            }),
            Some(BackendKind::Lexical) => Ok(BackendSpec::Lexical {
                name: config.name.clone(),
            }),
            None => Err(MultidexError::unsupported_index(&config.name)),
        }
    }

    /// Resolve and load the backend for `config`
    ///
    /// This is the expensive blocking path; it completes only when the
    /// underlying index load has finished or failed.
    pub async fn resolve(
        &self,
        config: &IndexConfig,
    ) -> Result<Arc<dyn SearchBackend>, MultidexError> {
        let spec = self.spec_for(config)?;
        info!(index = %config.name, kind = ?spec.kind(), "loading backend");
        self.provider.load(&spec).await
    }
}

impl std::fmt::Debug for BackendResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendResolver").finish_non_exhaustive()
    }
}
