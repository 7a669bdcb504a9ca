//! Concurrent shard fan-out and global top-k merge
//!
//! A logical sharded index is physically partitioned across N independent
//! shard indexes. The coordinator launches one task per shard, waits for
//! every task to finish (full join barrier with no streaming and no
//! timeout, so a hung shard hangs the whole search), concatenates the
//! per-shard top-k lists and imposes a fresh global order.
//!
//! Each shard is queried for exactly `k` candidates: the global top-k must
//! be a subset of the union of per-shard top-k lists, so the merge always
//! has enough material. Equal scores order by document id ascending, making
//! the merge deterministic regardless of task completion order.

use crate::config::{CoordinatorConfig, IndexConfig};
use crate::error::MultidexError;
use crate::executor::QueryExecutor;
use crate::registry::IndexRegistry;
use crate::structures::{ShardHit, ShardedResults};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Policy for per-shard failures during the fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShardFailurePolicy {
    /// Any shard failure aborts the whole sharded search
    #[default]
    FailFast,
    /// Failed shards are dropped and annotated in the response; the call
    /// errors only when every shard failed
    BestEffort,
}

/// Fans one logical query out across the shard set and merges the results
pub struct ShardCoordinator {
    registry: Arc<IndexRegistry>,
    shard_names: Vec<String>,
    failure_policy: ShardFailurePolicy,
    executor: QueryExecutor,
}

impl ShardCoordinator {
    /// Create a coordinator over the given registry and configuration
    pub fn new(registry: Arc<IndexRegistry>, config: &CoordinatorConfig) -> Self {
        Self {
            registry,
            shard_names: config.shard_names.clone(),
            failure_policy: config.failure_policy,
            executor: QueryExecutor::new(),
        }
    }

    /// The shard set this coordinator fans out to
    pub fn shard_names(&self) -> &[String] {
        &self.shard_names
    }

    /// Search every shard concurrently and merge into the global top-k
    ///
    /// `search_width` and `encoder` are used as provisioning settings for
    /// shards that are not yet loaded; already-loaded shards keep their
    /// settings.
    pub async fn sharded_search(
        &self,
        query: &str,
        k: usize,
        search_width: Option<usize>,
        encoder: Option<&str>,
    ) -> Result<ShardedResults, MultidexError> {
        if k == 0 {
            return Err(MultidexError::invalid_input(
                "k",
                "must be a positive integer",
            ));
        }

        debug!(
            shards = self.shard_names.len(),
            k, "starting sharded search"
        );

        let mut tasks = JoinSet::new();
        let mut task_shards: FxHashMap<tokio::task::Id, String> = FxHashMap::default();
        for shard in &self.shard_names {
            let registry = Arc::clone(&self.registry);
            let executor = self.executor;
            let shard = shard.clone();
            let shard_for_map = shard.clone();
            let query = query.to_string();
            let encoder = encoder.map(str::to_string);
            let spawned = tasks.spawn(async move {
                let config = IndexConfig::new(&shard)
                    .maybe_search_width(search_width)
                    .maybe_encoder(encoder.as_deref());
                let handle = registry.ensure(&shard, config).await?;
                executor.shard_search(&handle, &query, k).await
            });
            task_shards.insert(spawned.id(), shard_for_map);
        }

        // Full join barrier: every task outcome is collected before any
        // policy decision or merge happens.
        let mut pool: Vec<ShardHit> = Vec::new();
        let mut failures: Vec<(String, MultidexError)> = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, Ok(hits))) => {
                    debug!(shard = task_shards[&id].as_str(), hits = hits.len(), "shard returned");
                    pool.extend(hits);
                }
                Ok((id, Err(err))) => {
                    let shard = task_shards[&id].clone();
                    warn!(shard = shard.as_str(), error = %err, "shard search failed");
                    failures.push((shard, err));
                }
                Err(join_err) => {
                    let shard = task_shards
                        .get(&join_err.id())
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string());
                    warn!(shard = shard.as_str(), error = %join_err, "shard task did not join");
                    let err = MultidexError::shard_join(&shard, join_err.to_string());
                    failures.push((shard, err));
                }
            }
        }

        failures.sort_by(|a, b| a.0.cmp(&b.0));

        match self.failure_policy {
            ShardFailurePolicy::FailFast => {
                if let Some((_, err)) = failures.into_iter().next() {
                    return Err(err);
                }
                Ok(ShardedResults {
                    hits: merge_top_k(pool, k),
                    failed_shards: Vec::new(),
                })
            }
            ShardFailurePolicy::BestEffort => {
                let failed_shards: Vec<String> =
                    failures.into_iter().map(|(shard, _)| shard).collect();
                if failed_shards.len() == self.shard_names.len() {
                    return Err(MultidexError::all_shards_failed(failed_shards));
                }
                Ok(ShardedResults {
                    hits: merge_top_k(pool, k),
                    failed_shards,
                })
            }
        }
    }
}

impl std::fmt::Debug for ShardCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardCoordinator")
            .field("shard_names", &self.shard_names)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

/// Sort the concatenated candidate pool score-descending and truncate
///
/// Ties order by document id ascending so the merge is independent of the
/// order shard tasks happened to complete in.
fn merge_top_k(mut pool: Vec<ShardHit>, k: usize) -> Vec<ShardHit> {
    pool.sort_unstable_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    pool.truncate(k);
    pool
}
