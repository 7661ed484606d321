// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Layered chain tag index.
//!
//! Three layers merge into one effective chain → tags map, lowest
//! precedence first:
//!
//! 1. compiled-in defaults
//! 2. remotely-fetched authoritative snapshot
//! 3. user overrides persisted through the storage adapter
//!
//! Precedence is by layer, not by timestamp: whatever the user set wins,
//! whatever the remote snapshot says beats the defaults. Because the
//! defaults are a true bottom layer of every merge, a chain the remote
//! snapshot drops keeps its builtin tags.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::WalletscanConfig;
use crate::errors::{PersistError, QueryError};
use crate::query::{CachedQuery, QueryFetcher};
use crate::transport::{KeyValueStore, RestClient};
use crate::types::tags::{ChainTagsResponse, TagMap};

/// Storage key the user layer persists under.
const OVERRIDES_STORAGE_KEY: &str = "chain-tag-overrides";

/// Overlay `layers` left-to-right into one map.
///
/// Later layers win per key; a key absent from every later layer falls
/// through to the earliest layer that has it. Kept as a standalone function
/// so the precedence rule is testable in isolation.
pub fn merge_layers(layers: &[&TagMap]) -> TagMap {
    let mut merged = TagMap::new();
    for layer in layers {
        for (chain, tags) in layer.iter() {
            merged.insert(chain.clone(), tags.clone());
        }
    }
    merged
}

/// Compiled-in default tags, the bottom layer of every merge.
pub fn builtin_tags() -> TagMap {
    TagMap::from([
        ("cosmoshub".to_string(), vec!["Staking".to_string()]),
        ("osmosis".to_string(), vec!["DeFi".to_string()]),
        ("akash".to_string(), vec!["Infrastructure".to_string()]),
    ])
}

struct ChainTagsFetcher {
    client: Arc<dyn RestClient>,
    url: String,
}

#[async_trait]
impl QueryFetcher for ChainTagsFetcher {
    type Output = TagMap;

    async fn fetch(&self) -> Result<TagMap, QueryError> {
        let body = self.client.get_json(&self.url).await?;
        let response: ChainTagsResponse =
            serde_json::from_value(body).map_err(|e| QueryError::decode(&self.url, e))?;
        Ok(response.tags)
    }
}

/// The effective chain → tags view and its user-override editor.
pub struct ChainTagIndex {
    builtin: TagMap,
    remote: CachedQuery<TagMap>,
    user: Mutex<TagMap>,
    store: Arc<dyn KeyValueStore>,
}

impl ChainTagIndex {
    /// Create an index fetching its remote layer from the aggregation API.
    pub fn new(
        client: Arc<dyn RestClient>,
        store: Arc<dyn KeyValueStore>,
        config: &WalletscanConfig,
    ) -> Self {
        let remote = CachedQuery::new(ChainTagsFetcher {
            client,
            url: config.api_url("v1/chain-tags"),
        });
        remote.set_coalescing(config.coalesce_fetches);
        Self {
            builtin: builtin_tags(),
            remote,
            user: Mutex::new(TagMap::new()),
            store,
        }
    }

    /// Load the persisted user layer and attempt the one remote fetch.
    ///
    /// The remote layer is never retried automatically: if this first fetch
    /// fails, merges proceed from the remaining layers until someone
    /// explicitly refetches.
    pub async fn bootstrap(&self) {
        match self.store.get(OVERRIDES_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<TagMap>(&raw) {
                Ok(overrides) => {
                    debug!(chains = overrides.len(), "loaded tag overrides");
                    *self.user.lock() = overrides;
                }
                Err(error) => {
                    warn!(error = %error, "stored tag overrides are unreadable, starting empty");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(error = %error, "could not read tag overrides, starting empty");
            }
        }

        self.remote.await_ready().await;
        if let Some(error) = self.remote.error() {
            warn!(error = %error, "remote chain tags unavailable, merging without them");
        }
    }

    /// The merged chain → tags map, recomputed from the current layers.
    pub fn all_tags(&self) -> TagMap {
        let remote = self.remote.data().unwrap_or_default();
        let user = self.user.lock();
        merge_layers(&[&self.builtin, &remote, &user])
    }

    /// Tags for one chain after merging.
    pub fn tags_for(&self, chain_key: &str) -> Vec<String> {
        self.all_tags().get(chain_key).cloned().unwrap_or_default()
    }

    /// Set the user-layer tags for a chain.
    ///
    /// The in-memory layer updates immediately; the whole user layer is
    /// then persisted. A persist failure is returned to the caller but the
    /// in-memory update stands; the next successful persist writes it out.
    pub async fn set_override(
        &self,
        chain_key: &str,
        tags: Vec<String>,
    ) -> Result<(), PersistError> {
        let snapshot = {
            let mut user = self.user.lock();
            user.insert(chain_key.to_string(), tags);
            user.clone()
        };
        self.persist(snapshot).await
    }

    /// Remove a chain's user-layer override, revealing the layers beneath.
    pub async fn remove_override(&self, chain_key: &str) -> Result<(), PersistError> {
        let snapshot = {
            let mut user = self.user.lock();
            user.remove(chain_key);
            user.clone()
        };
        self.persist(snapshot).await
    }

    async fn persist(&self, snapshot: TagMap) -> Result<(), PersistError> {
        let document = serde_json::to_string(&snapshot)
            .map_err(|e| PersistError::new(OVERRIDES_STORAGE_KEY, e))?;
        match self.store.set(OVERRIDES_STORAGE_KEY, &document).await {
            Ok(()) => Ok(()),
            Err(error) => {
                warn!(error = %error, "tag override persist failed; in-memory state kept");
                Err(error)
            }
        }
    }
}
