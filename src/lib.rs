//! multidex - A multi-index search coordination layer
//!
//! multidex sits in front of one or more retrieval backends (inverted-index
//! lexical and approximate-nearest-neighbor vector indexes). It accepts a
//! query plus an index selector, resolves or lazily provisions the backend
//! handle for that index, executes the query, and normalizes heterogeneous
//! backend results into a uniform response shape. A single logical index
//! may be physically partitioned across many shard indexes that are queried
//! in parallel and merged into one globally ranked top-k list.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod registry;
pub mod resolver;
pub mod structures;

#[cfg(test)]
pub mod test_utils;

pub use backend::{BackendHit, BackendProvider, BackendSpec, SearchBackend};
pub use catalog::{
    default_shard_names, BackendKind, IndexMetadata, PrebuiltCatalog, DEFAULT_INDEX,
};
pub use config::{CoordinatorConfig, IndexConfig, IndexSettings, SearchOptions, SettingsUpdate};
pub use controller::SearchController;
pub use coordinator::{ShardCoordinator, ShardFailurePolicy};
pub use error::MultidexError;
pub use executor::QueryExecutor;
pub use registry::{IndexHandle, IndexRegistry};
pub use resolver::BackendResolver;
pub use structures::{
    Document, DocumentSnippet, IndexStatus, Query, QueryResponse, SearchResult, ShardHit,
    ShardedResults,
};

/// Type alias for Results using MultidexError
pub type Result<T> = std::result::Result<T, MultidexError>;
