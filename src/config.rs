//! Configuration structures for multidex
//!
//! This module provides provisioning requests, per-index settings with
//! partial-update semantics, per-query options, and the shard coordinator
//! configuration, with builder pattern implementations.

use crate::catalog::{default_shard_names, DEFAULT_INDEX};
use crate::coordinator::ShardFailurePolicy;
use crate::error::MultidexError;
use serde::{Deserialize, Serialize};

/// Provisioning request for one index
///
/// `search_width` and `encoder` are meaningful only for vector backends,
/// `query_generator` only for lexical backends. Fields for the other family
/// are ignored during provisioning, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Unique index name, the registry key
    pub name: String,
    /// Candidate-list size for approximate nearest-neighbor search
    pub search_width: Option<usize>,
    /// Query-encoding strategy for vector backends
    pub encoder: Option<String>,
    /// Query-expansion strategy for lexical backends
    pub query_generator: Option<String>,
}

impl IndexConfig {
    /// Create a provisioning request with no optional settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            search_width: None,
            encoder: None,
            query_generator: None,
        }
    }

    /// Set the search width
    pub fn search_width(mut self, width: usize) -> Self {
        self.search_width = Some(width);
        self
    }

    /// Set the query encoder
    pub fn encoder(mut self, encoder: impl Into<String>) -> Self {
        self.encoder = Some(encoder.into());
        self
    }

    /// Set the query generator
    pub fn query_generator(mut self, generator: impl Into<String>) -> Self {
        self.query_generator = Some(generator.into());
        self
    }

    /// Carry over an optional search width without overwriting with None
    pub fn maybe_search_width(mut self, width: Option<usize>) -> Self {
        if let Some(width) = width {
            self.search_width = Some(width);
        }
        self
    }

    /// Carry over an optional encoder without overwriting with None
    pub fn maybe_encoder(mut self, encoder: Option<&str>) -> Self {
        if let Some(encoder) = encoder {
            self.encoder = Some(encoder.to_string());
        }
        self
    }
}

/// Snapshot of the settings currently set on a handle
///
/// Fields left at their absent state are omitted from serialized output so
/// callers can distinguish "not configured" from "configured to a falsy
/// value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_generator: Option<String>,
}

impl IndexSettings {
    /// True when no setting has ever been applied
    pub fn is_empty(&self) -> bool {
        self.search_width.is_none() && self.encoder.is_none() && self.query_generator.is_none()
    }
}

/// Partial settings update
///
/// Each provided field overwrites the corresponding handle field; absent
/// fields are left untouched, never reset to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub search_width: Option<usize>,
    pub encoder: Option<String>,
    pub query_generator: Option<String>,
}

impl SettingsUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the search width
    pub fn search_width(mut self, width: usize) -> Self {
        self.search_width = Some(width);
        self
    }

    /// Update the query encoder
    pub fn encoder(mut self, encoder: impl Into<String>) -> Self {
        self.encoder = Some(encoder.into());
        self
    }

    /// Update the query generator
    pub fn query_generator(mut self, generator: impl Into<String>) -> Self {
        self.query_generator = Some(generator.into());
        self
    }
}

/// Per-query options applied when a search lazily provisions its index
///
/// Ignored when the handle already has a loaded backend; settings on a live
/// handle change through `update_settings` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub search_width: Option<usize>,
    pub encoder: Option<String>,
    pub query_generator: Option<String>,
}

impl SearchOptions {
    /// Create options with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search width used for lazy provisioning
    pub fn search_width(mut self, width: usize) -> Self {
        self.search_width = Some(width);
        self
    }

    /// Set the encoder used for lazy provisioning
    pub fn encoder(mut self, encoder: impl Into<String>) -> Self {
        self.encoder = Some(encoder.into());
        self
    }

    /// Set the query generator used for lazy provisioning
    pub fn query_generator(mut self, generator: impl Into<String>) -> Self {
        self.query_generator = Some(generator.into());
        self
    }

    pub(crate) fn into_index_config(self, name: &str) -> IndexConfig {
        IndexConfig {
            name: name.to_string(),
            search_width: self.search_width,
            encoder: self.encoder,
            query_generator: self.query_generator,
        }
    }
}

/// Configuration for the shard coordinator and controller defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Fixed, statically known shard set of the logical sharded index
    pub shard_names: Vec<String>,
    /// Policy for per-shard failures during the fan-out
    pub failure_policy: ShardFailurePolicy,
    /// Index provisioned by `initialize_default_index`
    pub default_index: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            shard_names: default_shard_names(),
            failure_policy: ShardFailurePolicy::default(),
            default_index: DEFAULT_INDEX.to_string(),
        }
    }
}

impl CoordinatorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shard set
    pub fn shard_names(mut self, names: Vec<String>) -> Self {
        self.shard_names = names;
        self
    }

    /// Set the shard failure policy
    pub fn failure_policy(mut self, policy: ShardFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the default index name
    pub fn default_index(mut self, name: impl Into<String>) -> Self {
        self.default_index = name.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MultidexError> {
        if self.shard_names.is_empty() {
            return Err(MultidexError::invalid_input(
                "shard_names",
                "shard set must contain at least one shard",
            ));
        }
        if self.default_index.is_empty() {
            return Err(MultidexError::invalid_input(
                "default_index",
                "default index name must not be empty",
            ));
        }
        Ok(())
    }

    /// Build the configuration after validation
    pub fn build(self) -> Result<Self, MultidexError> {
        self.validate()?;
        Ok(self)
    }
}
