//! Retrieval-engine interface boundary
//!
//! multidex coordinates searches but never implements retrieval itself.
//! This module defines the seam: the hit shape backends return, the tagged
//! construction parameters for the two backend families, and the traits the
//! external retrieval engine and its loader must provide.

use crate::catalog::BackendKind;
use crate::error::MultidexError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One hit as returned by a retrieval engine, before normalization
///
/// `raw` is the stored serialized payload; it must contain at least a
/// `contents` string field for the projection in the query executor to
/// succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHit {
    pub doc_id: String,
    pub score: f32,
    pub raw: String,
}

/// Construction parameters for one backend instance
///
/// Exactly two families exist; each kind carries its own parameters so the
/// loader never inspects names to decide what to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSpec {
    /// Lexical inverted-index backend, loaded by name alone
    Lexical { name: String },
    /// Vector/HNSW backend with tunable search quality
    Vector {
        name: String,
        search_width: Option<usize>,
        encoder: Option<String>,
    },
}

impl BackendSpec {
    /// The index name this backend is built for
    pub fn name(&self) -> &str {
        match self {
            Self::Lexical { name } => name,
            Self::Vector { name, .. } => name,
        }
    }

    /// The backend family of this spec
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Lexical { .. } => BackendKind::Lexical,
            Self::Vector { .. } => BackendKind::Vector,
        }
    }
}

/// A loaded retrieval engine instance
///
/// Both operations are opaque calls into the external engine; search hits
/// arrive in backend-native rank order, best first.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Retrieve up to `k` hits for the query
    async fn search(&self, query: &str, k: usize) -> Result<Vec<BackendHit>, MultidexError>;

    /// Fetch one stored raw payload by document id, None when absent
    async fn document(&self, doc_id: &str) -> Result<Option<String>, MultidexError>;
}

/// Loader collaborator that materializes backend instances
///
/// `load` is the expensive path (multi-second index load from storage).
/// `is_downloaded` is used only for status reporting; this layer never
/// triggers a download itself.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    /// Load a backend instance for the given construction parameters
    async fn load(&self, spec: &BackendSpec) -> Result<Arc<dyn SearchBackend>, MultidexError>;

    /// Whether the prebuilt index is materialized on local storage
    fn is_downloaded(&self, name: &str) -> bool;
}
