//! Error types for multidex operations
//!
//! This module defines the error types used throughout multidex, providing
//! clear error messages with enough context (index name, document id,
//! operation) to diagnose failures at the caller.

use thiserror::Error;

/// Main error type for all multidex operations
#[derive(Debug, Error)]
pub enum MultidexError {
    /// Index name not present in any known prebuilt catalog
    #[error("Unsupported index: '{name}' is not present in any prebuilt catalog")]
    UnsupportedIndex { name: String },

    /// Settings operation referencing a name with no provisioned handle
    #[error("Unknown index: '{name}' has no provisioned handle")]
    UnknownIndex { name: String },

    /// Valid index, but the requested document id is not present
    #[error("Document '{doc_id}' not found in index '{index}'")]
    DocumentNotFound { doc_id: String, index: String },

    /// Stored document payload could not be parsed as the expected structure
    #[error("Malformed document payload in index '{index}' for document '{doc_id}': {reason}")]
    DocumentPayload {
        index: String,
        doc_id: String,
        reason: String,
    },

    /// Input validation failed
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// The underlying retrieval engine reported a failure
    #[error("Backend error on index '{index}': {reason}")]
    Backend { index: String, reason: String },

    /// A shard task could not be joined (panicked or was cancelled)
    #[error("Shard task '{shard}' failed to join: {reason}")]
    ShardJoin { shard: String, reason: String },

    /// Best-effort sharded search where every shard failed
    #[error("Sharded search failed: all {} shards failed ({})", failed.len(), failed.join(", "))]
    AllShardsFailed { failed: Vec<String> },
}

impl MultidexError {
    /// Create an unsupported index error
    pub fn unsupported_index(name: impl Into<String>) -> Self {
        Self::UnsupportedIndex { name: name.into() }
    }

    /// Create an unknown index error
    pub fn unknown_index(name: impl Into<String>) -> Self {
        Self::UnknownIndex { name: name.into() }
    }

    /// Create a document not found error
    pub fn document_not_found(doc_id: impl Into<String>, index: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            doc_id: doc_id.into(),
            index: index.into(),
        }
    }

    /// Create a malformed payload error
    pub fn document_payload(
        index: impl Into<String>,
        doc_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DocumentPayload {
            index: index.into(),
            doc_id: doc_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error with index context
    pub fn backend(index: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Backend {
            index: index.into(),
            reason: reason.into(),
        }
    }

    /// Create a shard join error
    pub fn shard_join(shard: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShardJoin {
            shard: shard.into(),
            reason: reason.into(),
        }
    }

    /// Create an all-shards-failed error
    pub fn all_shards_failed(failed: Vec<String>) -> Self {
        Self::AllShardsFailed { failed }
    }
}
