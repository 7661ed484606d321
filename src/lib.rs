// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-chain data aggregation and resolution for multi-chain wallets.
//!
//! walletscan is the data layer a Cosmos-family wallet reads from: it
//! caches and coordinates refresh of per-chain and cross-chain query
//! results without duplicate concurrent fetches, derives a wallet's
//! equivalent addresses across every chain sharing its derivation path,
//! resolves raw (possibly IBC-routed) denominations to display metadata,
//! and merges independently-fetched per-chain proposal sets into one
//! sorted, searchable view that isolates any single chain's failure.
//!
//! # Components
//!
//! - [`CachedQuery`] / [`QueryStore`]: coalesced async caching, the sole
//!   synchronization point for all network work
//! - [`related_addresses`]: cross-chain address derivation over a
//!   [`ChainRegistry`]
//! - [`ChainTagIndex`]: layered chain tag map with persisted user
//!   overrides
//! - [`DenomResolver`]: tiered denomination resolution (local registry,
//!   bulk trace snapshot, live trace query)
//! - [`AggregatedProposalStore`]: per-chain governance fetches with
//!   fallback tracking and a merged view
//!
//! Rendering, key management, durable storage, and transport policy live
//! in the host: this crate consumes them through the [`transport`] traits
//! and exposes plain in-memory structures.

mod address;
mod config;
mod denom;
mod errors;
mod governance;
mod query;
mod registry;
mod tags;
pub mod transport;
mod types;

pub use address::{related_addresses, EVM_DEFAULT_CHAIN_KEY, EXCLUSIVE_PREFIXES};
pub use config::{WalletscanConfig, WalletscanConfigBuilder, DEFAULT_BASE_API_URL};
pub use denom::{
    denom_cache_key, ibc_denom_hash, split_denom_cache_key, CurrencyRegistry, DenomResolver,
};
pub use errors::{PersistError, QueryError, WalletscanError};
pub use governance::{AggregatedProposal, AggregatedProposalStore, ProposalSelection};
pub use query::{
    CachedQuery, Observable, QueryFetcher, QueryStatus, QueryStore, SubscriptionId,
};
pub use registry::ChainRegistry;
pub use tags::{builtin_tags, merge_layers, ChainTagIndex};
pub use types::chain::{Bip44, ChainDescriptor, NetworkKind};
pub use types::denom::{DenomRecord, DenomTraceEntry};
pub use types::proposal::{ChainProposals, ChainSyncState, Proposal, ProposalStatus};
pub use types::tags::TagMap;
