// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Aggregated multi-chain governance view.
//!
//! Proposals are fetched independently per chain: each chain gets its own
//! [`CachedQuery`], so one chain loading or failing never blocks, clears,
//! or mutates another chain's data. The primary source is the
//! `cosmos/gov/v1` endpoint; when it fails the legacy `v1beta1` endpoint is
//! tried, and a chain served that way carries a visible fallback flag until
//! the next successful primary fetch.
//!
//! The merged view concatenates every chain that currently has data,
//! filters by a case-insensitive substring, and sorts by chain display name
//! ascending with newest proposals first within a chain.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::WalletscanConfig;
use crate::errors::QueryError;
use crate::query::{CachedQuery, QueryFetcher, QueryStatus, QueryStore};
use crate::registry::ChainRegistry;
use crate::types::proposal::{
    ChainProposals, ChainSyncState, GovV1Beta1Response, GovV1Response, Proposal,
};

/// Upstream page size for proposal listings.
const PROPOSALS_PAGE_LIMIT: u32 = 500;

struct GovEndpoints {
    primary: String,
    fallback: String,
}

struct GovProposalsFetcher {
    client: Arc<dyn crate::transport::RestClient>,
    chain_key: String,
    endpoints: Option<GovEndpoints>,
}

impl GovProposalsFetcher {
    async fn fetch_primary(&self, endpoints: &GovEndpoints) -> Result<Vec<Proposal>, QueryError> {
        let body = self.client.get_json(&endpoints.primary).await?;
        let response: GovV1Response =
            serde_json::from_value(body).map_err(|e| QueryError::decode(&endpoints.primary, e))?;
        Ok(response.proposals.into_iter().map(Proposal::from).collect())
    }

    async fn fetch_fallback(&self, endpoints: &GovEndpoints) -> Result<Vec<Proposal>, QueryError> {
        let body = self.client.get_json(&endpoints.fallback).await?;
        let response: GovV1Beta1Response =
            serde_json::from_value(body).map_err(|e| QueryError::decode(&endpoints.fallback, e))?;
        Ok(response.proposals.into_iter().map(Proposal::from).collect())
    }
}

#[async_trait]
impl QueryFetcher for GovProposalsFetcher {
    type Output = ChainProposals;

    async fn fetch(&self) -> Result<ChainProposals, QueryError> {
        let Some(endpoints) = &self.endpoints else {
            return Err(QueryError::Network {
                url: String::new(),
                message: format!("chain {} is not registered on this network", self.chain_key),
            });
        };

        match self.fetch_primary(endpoints).await {
            Ok(proposals) => Ok(ChainProposals {
                proposals,
                via_fallback: false,
            }),
            Err(primary_error) => {
                warn!(
                    chain = %self.chain_key,
                    error = %primary_error,
                    "primary governance source failed, trying legacy endpoint"
                );
                match self.fetch_fallback(endpoints).await {
                    Ok(proposals) => Ok(ChainProposals {
                        proposals,
                        via_fallback: true,
                    }),
                    Err(fallback_error) => {
                        warn!(
                            chain = %self.chain_key,
                            error = %fallback_error,
                            "legacy governance source failed too"
                        );
                        Err(fallback_error)
                    }
                }
            }
        }
    }
}

/// One row of the merged view: a proposal together with its chain context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedProposal {
    /// Registry key of the chain this proposal belongs to
    pub chain_key: String,
    /// Display name of that chain
    pub chain_name: String,
    /// Whether this chain's data came from the secondary source
    pub via_fallback: bool,
    /// The proposal itself
    pub proposal: Proposal,
}

impl AggregatedProposal {
    /// Case-insensitive substring match over chain name, title, id, and
    /// status label. `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.chain_name.to_lowercase().contains(needle)
            || self.proposal.title.to_lowercase().contains(needle)
            || self.proposal.id.to_lowercase().contains(needle)
            || self.proposal.status.label().to_lowercase().contains(needle)
    }
}

/// Detail-mode context carried by a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSelection {
    /// Registry key of the selected proposal's chain
    pub chain_key: String,
    /// Selected proposal id
    pub proposal_id: String,
    /// The chain's fallback flag at the time of selection
    pub via_fallback: bool,
}

/// Per-chain governance fetch orchestration and the merged view over it.
pub struct AggregatedProposalStore {
    registry: Arc<ChainRegistry>,
    config: WalletscanConfig,
    queries: QueryStore<String, ChainProposals>,
    selection: Mutex<Option<ProposalSelection>>,
}

impl AggregatedProposalStore {
    /// Create a store over the given registry. Per-chain queries are
    /// created lazily on first refresh and live for the process lifetime.
    pub fn new(
        registry: Arc<ChainRegistry>,
        client: Arc<dyn crate::transport::RestClient>,
        config: WalletscanConfig,
    ) -> Self {
        let factory_registry = Arc::clone(&registry);
        let factory_config = config.clone();
        let queries = QueryStore::new(move |chain_key: &String| {
            let endpoints = factory_registry
                .by_key(chain_key)
                .and_then(|chain| chain.active_chain_id(factory_config.network))
                .map(|chain_id| GovEndpoints {
                    primary: factory_config.chain_rest_url(
                        chain_id,
                        &format!(
                            "cosmos/gov/v1/proposals?pagination.limit={PROPOSALS_PAGE_LIMIT}"
                        ),
                    ),
                    fallback: factory_config.chain_rest_url(
                        chain_id,
                        &format!(
                            "cosmos/gov/v1beta1/proposals?pagination.limit={PROPOSALS_PAGE_LIMIT}"
                        ),
                    ),
                });
            let query = CachedQuery::new(GovProposalsFetcher {
                client: Arc::clone(&client),
                chain_key: chain_key.clone(),
                endpoints,
            });
            query.set_coalescing(factory_config.coalesce_fetches);
            query
        });

        Self {
            registry,
            config,
            queries,
            selection: Mutex::new(None),
        }
    }

    /// Refresh every chain on the active network concurrently.
    ///
    /// Failures stay per-chain: a chain whose sources are down records its
    /// error on its own query and contributes nothing to the merged view,
    /// while every other chain proceeds normally.
    pub async fn refresh(&self) {
        let refreshes: Vec<_> = self
            .registry
            .on_network(self.config.network)
            .map(|chain| {
                let query = self.queries.entry(&chain.key);
                let chain_key = chain.key.clone();
                async move {
                    if let Err(error) = query.refetch(false).await {
                        debug!(chain = %chain_key, error = %error, "chain refresh failed");
                    }
                }
            })
            .collect();
        join_all(refreshes).await;
    }

    /// Refresh a single chain, leaving all others untouched.
    pub async fn refresh_chain(&self, chain_key: &str) {
        let Some(chain) = self.registry.by_key(chain_key) else {
            return;
        };
        if chain.active_chain_id(self.config.network).is_none() {
            return;
        }
        let query = self.queries.entry(&chain.key);
        if let Err(error) = query.refetch(false).await {
            debug!(chain = %chain_key, error = %error, "chain refresh failed");
        }
    }

    /// Current synchronization state of one chain.
    pub fn sync_state(&self, chain_key: &str) -> ChainSyncState {
        let Some(query) = self.queries.peek(&chain_key.to_string()) else {
            return ChainSyncState::NotStarted;
        };
        match query.data() {
            // Data stays visible (and keeps its fallback flag) even while a
            // refetch is in flight or after one failed.
            Some(data) if data.via_fallback => ChainSyncState::Fallback,
            Some(_) => ChainSyncState::Ready,
            None => match query.status() {
                QueryStatus::Loading => ChainSyncState::Loading,
                QueryStatus::Error => ChainSyncState::Failed,
                QueryStatus::Idle | QueryStatus::Ready => ChainSyncState::NotStarted,
            },
        }
    }

    /// The merged, filtered, sorted view.
    ///
    /// Chains still loading or never started contribute nothing. An empty
    /// filter matches every proposal. Sort order: chain display name
    /// ascending (case-insensitive), then proposal id numerically
    /// descending within a chain.
    pub fn merged(&self, filter: &str) -> Vec<AggregatedProposal> {
        let needle = filter.trim().to_lowercase();
        let mut rows = Vec::new();

        for chain in self.registry.on_network(self.config.network) {
            let Some(query) = self.queries.peek(&chain.key) else {
                continue;
            };
            let Some(data) = query.data() else {
                continue;
            };
            rows.extend(data.proposals.iter().map(|proposal| AggregatedProposal {
                chain_key: chain.key.clone(),
                chain_name: chain.display_name.clone(),
                via_fallback: data.via_fallback,
                proposal: proposal.clone(),
            }));
        }

        if !needle.is_empty() {
            rows.retain(|row| row.matches(&needle));
        }

        rows.sort_by(compare_rows);
        rows
    }

    /// Enter detail mode on one proposal.
    ///
    /// Returns `None` (and leaves any previous selection standing) if the
    /// chain has no data or no proposal with that id.
    pub fn select(&self, chain_key: &str, proposal_id: &str) -> Option<ProposalSelection> {
        let query = self.queries.peek(&chain_key.to_string())?;
        let data = query.data()?;
        if !data.proposals.iter().any(|p| p.id == proposal_id) {
            return None;
        }

        let selection = ProposalSelection {
            chain_key: chain_key.to_string(),
            proposal_id: proposal_id.to_string(),
            via_fallback: data.via_fallback,
        };
        *self.selection.lock() = Some(selection.clone());
        Some(selection)
    }

    /// The current detail-mode selection, if any.
    pub fn selection(&self) -> Option<ProposalSelection> {
        self.selection.lock().clone()
    }

    /// Leave detail mode. Clears the selection without re-fetching
    /// anything.
    pub fn clear_selection(&self) {
        *self.selection.lock() = None;
    }
}

fn compare_rows(a: &AggregatedProposal, b: &AggregatedProposal) -> Ordering {
    let by_chain = a
        .chain_name
        .to_lowercase()
        .cmp(&b.chain_name.to_lowercase());
    if by_chain != Ordering::Equal {
        return by_chain;
    }
    match (numeric_id(&a.proposal.id), numeric_id(&b.proposal.id)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.proposal.id.cmp(&b.proposal.id),
    }
}

fn numeric_id(id: &str) -> Option<u64> {
    id.parse().ok()
}
