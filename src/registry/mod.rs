// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only chain registry lookups.
//!
//! The registry is a list of [`ChainDescriptor`] supplied at startup (the
//! host loads it from its packaged registry or a remote refresh elsewhere)
//! and never mutated afterwards. Everything here is a lookup over that
//! list.

use crate::types::chain::{ChainDescriptor, NetworkKind};

/// The set of chains this wallet knows about.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
}

impl ChainRegistry {
    /// Wrap a descriptor list. Order is preserved and is the order merged
    /// views iterate chains in.
    pub fn new(chains: Vec<ChainDescriptor>) -> Self {
        Self { chains }
    }

    /// Parse a registry JSON document (an array of descriptors).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// All registered chains, in registry order.
    pub fn chains(&self) -> &[ChainDescriptor] {
        &self.chains
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// The chain with the given registry key.
    pub fn by_key(&self, key: &str) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| c.key == key)
    }

    /// The chain whose bech32 address prefix matches exactly.
    pub fn by_address_prefix(&self, prefix: &str) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| c.address_prefix == prefix)
    }

    /// The chain whose mainnet or testnet id matches.
    pub fn by_chain_id(&self, chain_id: &str) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| {
            c.chain_id == chain_id || c.testnet_chain_id.as_deref() == Some(chain_id)
        })
    }

    /// Every chain sharing the given BIP-44 coin type, in registry order.
    pub fn sharing_coin_type(&self, coin_type: u32) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains
            .iter()
            .filter(move |c| c.bip44.coin_type == coin_type)
    }

    /// Chains that exist on the given network, in registry order.
    pub fn on_network(&self, network: NetworkKind) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains
            .iter()
            .filter(move |c| c.active_chain_id(network).is_some())
    }
}
