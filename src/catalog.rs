//! Prebuilt-index catalog and backend-family classification
//!
//! The catalog is the read-only mapping from index name to metadata for the
//! two supported backend families, plus the fixed shard set of the logical
//! sharded index. Family selection is a closed two-way classification over
//! catalog membership; the decision of which backend family a name belongs
//! to is made here and nowhere else.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Default index provisioned at service start
pub const DEFAULT_INDEX: &str = "msmarco-v1-passage";

/// The fixed shard set of the default logical sharded index
pub fn default_shard_names() -> Vec<String> {
    (0..10)
        .map(|i| format!("msmarco-v2.1-doc-segmented-shard0{i}.arctic-embed-l.hnsw-int8"))
        .collect()
}

/// The two supported backend families
///
/// This is a closed set: selection happens by catalog membership, never by
/// content inspection, and no third family can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Inverted-index full-text retrieval
    Lexical,
    /// Approximate nearest-neighbor retrieval over an HNSW graph
    Vector,
}

/// Catalog metadata for one prebuilt index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Backend family the index belongs to
    pub kind: BackendKind,
    /// Compressed size in bytes, absent when not published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_compressed_bytes: Option<u64>,
}

impl IndexMetadata {
    /// Metadata for a lexical prebuilt index
    pub fn lexical(size_compressed_bytes: Option<u64>) -> Self {
        Self {
            kind: BackendKind::Lexical,
            size_compressed_bytes,
        }
    }

    /// Metadata for a vector prebuilt index
    pub fn vector(size_compressed_bytes: Option<u64>) -> Self {
        Self {
            kind: BackendKind::Vector,
            size_compressed_bytes,
        }
    }
}

/// Read-only prebuilt-index catalog for both backend families
///
/// The catalog is injected into the resolver and controller rather than
/// living as module-level state; `with_defaults` seeds the known prebuilt
/// entries.
#[derive(Debug, Clone, Default)]
pub struct PrebuiltCatalog {
    entries: FxHashMap<String, IndexMetadata>,
    shard_names: Vec<String>,
}

impl PrebuiltCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the catalog of known prebuilt indexes
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            DEFAULT_INDEX,
            IndexMetadata::lexical(Some(2_170_758_745)),
        );
        for shard in default_shard_names() {
            catalog.insert(&shard, IndexMetadata::vector(None));
        }
        catalog.shard_names = default_shard_names();
        catalog
    }

    /// Register one catalog entry
    pub fn insert(&mut self, name: &str, metadata: IndexMetadata) {
        self.entries.insert(name.to_string(), metadata);
    }

    /// Replace the shard set of the logical sharded index
    ///
    /// Shard names classify as vector regardless of whether they also carry
    /// a catalog entry.
    pub fn set_shard_names(&mut self, names: Vec<String>) {
        self.shard_names = names;
    }

    /// The fixed shard set
    pub fn shard_names(&self) -> &[String] {
        &self.shard_names
    }

    /// Classify an index name into its backend family
    ///
    /// Shard-set membership wins over catalog entries; unknown names return
    /// None and must surface as `UnsupportedIndex` upstream.
    pub fn classify(&self, name: &str) -> Option<BackendKind> {
        if self.shard_names.iter().any(|shard| shard == name) {
            return Some(BackendKind::Vector);
        }
        self.entries.get(name).map(|metadata| metadata.kind)
    }

    /// Metadata lookup, read-only
    pub fn metadata(&self, name: &str) -> Option<&IndexMetadata> {
        self.entries.get(name)
    }

    /// Merged listing across both families, sorted by name for stable output
    pub fn listing(&self) -> Vec<(String, IndexMetadata)> {
        let mut entries: Vec<(String, IndexMetadata)> = self
            .entries
            .iter()
            .map(|(name, metadata)| (name.clone(), metadata.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
