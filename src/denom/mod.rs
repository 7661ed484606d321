// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tiered denomination resolution.
//!
//! Maps a raw on-chain denomination (possibly an IBC-routed `ibc/…` hash)
//! to canonical display metadata through three tiers, strictly in order:
//!
//! 1. the local denom registry, consulted synchronously; a hit here means
//!    no network access of any kind
//! 2. the process-wide bulk denom trace snapshot (one shared fetch)
//! 3. a live per-denom trace query against the chain's REST endpoint
//!
//! Trace data from tiers 2 and 3 is never returned directly: the traced
//! base denomination is resolved back through tier 1 only, and an unknown
//! traced denom resolves to `None`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::config::WalletscanConfig;
use crate::errors::QueryError;
use crate::query::{CachedQuery, QueryFetcher};
use crate::transport::RestClient;
use crate::types::denom::{
    DenomRecord, DenomRegistryResponse, DenomTraceEntry, DenomTraceResponse, DenomTracesResponse,
};

/// Canonical cache key for a denomination on a chain.
///
/// The same function keys the local registry when it is populated and every
/// lookup against it, and [`split_denom_cache_key`] inverts it.
pub fn denom_cache_key(denom: &str, chain_id: &str) -> String {
    format!("{chain_id}:{denom}")
}

/// Invert [`denom_cache_key`].
pub fn split_denom_cache_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(':')
}

/// The hashed denomination a token takes after an IBC transfer:
/// `ibc/{SHA256(path/base_denom)}` in uppercase hex.
pub fn ibc_denom_hash(path: &str, base_denom: &str) -> String {
    let digest = Sha256::digest(format!("{path}/{base_denom}").as_bytes());
    format!("ibc/{}", hex::encode_upper(digest))
}

struct DenomRegistryFetcher {
    client: Arc<dyn RestClient>,
    url: String,
}

#[async_trait]
impl QueryFetcher for DenomRegistryFetcher {
    type Output = HashMap<String, DenomRecord>;

    async fn fetch(&self) -> Result<Self::Output, QueryError> {
        let body = self.client.get_json(&self.url).await?;
        let response: DenomRegistryResponse =
            serde_json::from_value(body).map_err(|e| QueryError::decode(&self.url, e))?;
        Ok(response
            .denoms
            .into_iter()
            .map(|row| {
                (
                    denom_cache_key(&row.record.coin_minimal_denom, &row.chain_id),
                    row.record,
                )
            })
            .collect())
    }
}

/// Local denomination registry: canonical key → [`DenomRecord`].
///
/// Loaded once through a [`CachedQuery`]; after [`await_ready`] every
/// lookup is synchronous against the cached map.
///
/// [`await_ready`]: CurrencyRegistry::await_ready
pub struct CurrencyRegistry {
    query: CachedQuery<HashMap<String, DenomRecord>>,
}

impl CurrencyRegistry {
    /// Create a registry loading from the aggregation API.
    pub fn new(client: Arc<dyn RestClient>, config: &WalletscanConfig) -> Self {
        let query = CachedQuery::new(DenomRegistryFetcher {
            client,
            url: config.api_url("v1/denoms"),
        });
        query.set_coalescing(config.coalesce_fetches);
        Self { query }
    }

    /// Resolve once the first load attempt has settled.
    pub async fn await_ready(&self) {
        self.query.await_ready().await;
    }

    /// Look up by canonical key.
    pub fn lookup(&self, key: &str) -> Option<DenomRecord> {
        self.query.data().and_then(|map| map.get(key).cloned())
    }

    /// Look up a denomination registered under a chain.
    pub fn lookup_denom(&self, denom: &str, chain_id: &str) -> Option<DenomRecord> {
        self.lookup(&denom_cache_key(denom, chain_id))
    }

    /// The backing query, for invalidation wiring.
    pub fn query(&self) -> &CachedQuery<HashMap<String, DenomRecord>> {
        &self.query
    }
}

struct TraceSnapshotFetcher {
    client: Arc<dyn RestClient>,
    url: String,
}

#[async_trait]
impl QueryFetcher for TraceSnapshotFetcher {
    type Output = HashMap<String, DenomTraceEntry>;

    async fn fetch(&self) -> Result<Self::Output, QueryError> {
        let body = self.client.get_json(&self.url).await?;
        let response: DenomTracesResponse =
            serde_json::from_value(body).map_err(|e| QueryError::decode(&self.url, e))?;
        Ok(response
            .denom_traces
            .into_iter()
            .map(|keyed| (keyed.denom, keyed.trace))
            .collect())
    }
}

/// Tiered resolver from raw denomination to display metadata.
pub struct DenomResolver {
    registry: CurrencyRegistry,
    traces: CachedQuery<HashMap<String, DenomTraceEntry>>,
    client: Arc<dyn RestClient>,
}

impl DenomResolver {
    /// Create a resolver sharing one bulk trace snapshot across all
    /// resolutions.
    pub fn new(client: Arc<dyn RestClient>, config: &WalletscanConfig) -> Self {
        let traces = CachedQuery::new(TraceSnapshotFetcher {
            client: Arc::clone(&client),
            url: config.api_url("v1/ibc/denom-traces"),
        });
        traces.set_coalescing(config.coalesce_fetches);
        Self {
            registry: CurrencyRegistry::new(Arc::clone(&client), config),
            traces,
            client,
        }
    }

    /// Gate the local registry before first use.
    pub async fn bootstrap(&self) {
        self.registry.await_ready().await;
    }

    /// The local registry, for direct lookups and invalidation wiring.
    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Resolve a raw denomination observed on `chain_id` to display
    /// metadata, or `None` if it is unknown everywhere.
    ///
    /// If the local registry has the answer, neither the bulk snapshot nor
    /// the live query is consulted.
    pub async fn resolve(
        &self,
        raw_denom: &str,
        rest_endpoint: &str,
        chain_id: &str,
    ) -> Option<DenomRecord> {
        // Tier 1: local registry, no network.
        if let Some(record) = self.registry.lookup_denom(raw_denom, chain_id) {
            trace!(denom = raw_denom, chain_id = chain_id, "local registry hit");
            return Some(record);
        }

        // Tier 2: shared bulk snapshot. A snapshot fetch failure is not an
        // error here, just a miss that falls through to the live query.
        if let Ok(snapshot) = self.traces.get().await {
            if let Some(entry) = snapshot.get(raw_denom) {
                debug!(denom = raw_denom, "resolved via bulk trace snapshot");
                return self.resolve_traced(entry);
            }
        }

        // Tier 3: live per-denom trace query. Only hashed denoms are
        // traceable; anything else is simply unknown.
        let hash = raw_denom.strip_prefix("ibc/")?;
        let url = format!(
            "{}/ibc/apps/transfer/v1/denom_traces/{hash}",
            rest_endpoint.trim_end_matches('/')
        );
        match self.client.get_json(&url).await {
            Ok(body) => {
                let response: DenomTraceResponse = serde_json::from_value(body).ok()?;
                debug!(denom = raw_denom, "resolved via live trace query");
                self.resolve_traced(&response.denom_trace)
            }
            Err(error) => {
                debug!(denom = raw_denom, error = %error, "live trace query failed");
                None
            }
        }
    }

    /// Resolve a trace's base denomination against the local registry only,
    /// never recursively against the network.
    fn resolve_traced(&self, trace: &DenomTraceEntry) -> Option<DenomRecord> {
        let chain_id = trace.resolution_chain_id()?;
        self.registry.lookup_denom(&trace.base_denom, chain_id)
    }
}
