//! Query execution and result normalization
//!
//! The executor runs one query against one resolved handle and projects the
//! backend's heterogeneous hits into the uniform response shape. Stored raw
//! payloads are expected to be JSON objects with at least a `contents`
//! string field; a hit whose payload does not parse fails the whole call
//! rather than being silently dropped.

use crate::error::MultidexError;
use crate::registry::IndexHandle;
use crate::structures::{Document, DocumentSnippet, Query, QueryResponse, SearchResult, ShardHit};
use serde::Deserialize;
use tracing::debug;

/// Expected shape of a stored raw payload
#[derive(Debug, Deserialize)]
struct RawPayload {
    contents: String,
}

/// Executes queries against resolved handles and normalizes the output
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    /// Create a new executor
    pub fn new() -> Self {
        Self
    }

    /// Execute one query and project every hit into the normalized shape
    ///
    /// Hits keep backend-native rank order; non-sharded results are never
    /// re-sorted here. `k` must be positive; an empty query string is valid
    /// and delegated to the backend.
    pub async fn execute(
        &self,
        handle: &IndexHandle,
        query: &str,
        k: usize,
        query_id: &str,
    ) -> Result<QueryResponse, MultidexError> {
        let hits = self.raw_hits(handle, query, k).await?;
        debug!(index = handle.name(), hits = hits.len(), "normalizing hits");

        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            let contents = parse_contents(handle.name(), &hit.doc_id, &hit.raw)?;
            candidates.push(SearchResult {
                doc_id: hit.doc_id,
                score: hit.score,
                doc: DocumentSnippet { contents },
            });
        }

        Ok(QueryResponse {
            query: Query {
                id: query_id.to_string(),
                text: query.to_string(),
            },
            candidates,
        })
    }

    /// Per-shard projection: document id and score only, no payload parse
    pub async fn shard_search(
        &self,
        handle: &IndexHandle,
        query: &str,
        k: usize,
    ) -> Result<Vec<ShardHit>, MultidexError> {
        let hits = self.raw_hits(handle, query, k).await?;
        Ok(hits
            .into_iter()
            .map(|hit| ShardHit {
                doc_id: hit.doc_id,
                score: hit.score,
            })
            .collect())
    }

    /// Fetch one document by id and project its `contents` field
    pub async fn fetch_document(
        &self,
        handle: &IndexHandle,
        doc_id: &str,
    ) -> Result<Document, MultidexError> {
        let backend = handle
            .backend()
            .ok_or_else(|| MultidexError::backend(handle.name(), "backend not provisioned"))?;

        let raw = backend
            .document(doc_id)
            .await?
            .ok_or_else(|| MultidexError::document_not_found(doc_id, handle.name()))?;
        let text = parse_contents(handle.name(), doc_id, &raw)?;

        Ok(Document {
            doc_id: doc_id.to_string(),
            text,
        })
    }

    async fn raw_hits(
        &self,
        handle: &IndexHandle,
        query: &str,
        k: usize,
    ) -> Result<Vec<crate::backend::BackendHit>, MultidexError> {
        if k == 0 {
            return Err(MultidexError::invalid_input(
                "k",
                "must be a positive integer",
            ));
        }
        let backend = handle
            .backend()
            .ok_or_else(|| MultidexError::backend(handle.name(), "backend not provisioned"))?;
        backend.search(query, k).await
    }
}

fn parse_contents(index: &str, doc_id: &str, raw: &str) -> Result<String, MultidexError> {
    let payload: RawPayload = serde_json::from_str(raw)
        .map_err(|err| MultidexError::document_payload(index, doc_id, err.to_string()))?;
    Ok(payload.contents)
}
