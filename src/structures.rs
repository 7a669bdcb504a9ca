//! Core data structures for normalized search responses
//!
//! This module defines the uniform response shapes multidex produces from
//! heterogeneous backend results: normalized hits, query responses, shard
//! partial results, single-document fetches, and index status reports.
//!
//! The serialized field names (`qid`, `docid`, camelCase settings keys)
//! match the wire shape callers of the original service expect, but no
//! transport is mandated here.

use serde::{Deserialize, Serialize};

/// The query echo carried in every search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Caller-supplied query identifier, may be empty
    #[serde(rename = "qid")]
    pub id: String,
    /// Query text as executed
    pub text: String,
}

/// Projected document payload carried with each normalized hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnippet {
    /// The `contents` field extracted from the stored raw payload
    pub contents: String,
}

/// One normalized search hit
///
/// Scores are comparable across handles of the same backend family; cross
/// family comparability is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Backend-assigned document identifier
    #[serde(rename = "docid")]
    pub doc_id: String,
    /// Retrieval score, higher means better
    pub score: f32,
    /// Projected document payload
    pub doc: DocumentSnippet,
}

/// Response for a single (non-sharded) query
///
/// Candidates preserve backend-native rank order; this layer never re-sorts
/// non-sharded results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: Query,
    pub candidates: Vec<SearchResult>,
}

/// One scored hit from a single shard, and the element type of the merged
/// global top-k list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardHit {
    #[serde(rename = "docid")]
    pub doc_id: String,
    pub score: f32,
}

/// Result of a sharded search: the globally ranked top-k plus any shards
/// that failed under the best-effort policy
///
/// `failed_shards` is always empty under the fail-fast policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardedResults {
    pub hits: Vec<ShardHit>,
    pub failed_shards: Vec<String>,
}

impl ShardedResults {
    /// True when at least one shard failed and the hits are a partial view
    pub fn is_degraded(&self) -> bool {
        !self.failed_shards.is_empty()
    }
}

/// A single document fetched by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "docid")]
    pub doc_id: String,
    /// The `contents` field of the stored payload
    pub text: String,
}

/// Status report for one index name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Whether the prebuilt index has been materialized onto local storage
    pub downloaded: bool,
    /// Compressed size from the catalog, absent when the catalog has no
    /// metadata for the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_compressed_bytes: Option<u64>,
}
