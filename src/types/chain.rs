// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain descriptor types loaded from the external chain registry.

use serde::{Deserialize, Serialize};

/// Which network family endpoints and chain ids should resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Production networks
    Mainnet,
    /// Test networks
    Testnet,
}

/// BIP-44 derivation parameters for a chain.
///
/// Chains sharing a `coin_type` derive the same key material, so one
/// private key produces a valid address on each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bip44 {
    /// The coin type segment of the derivation path
    #[serde(rename = "coinType")]
    pub coin_type: u32,
}

/// Static description of one supported chain.
///
/// Loaded once from the external chain registry at startup and treated as
/// immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// Stable registry key, e.g. `cosmoshub`
    pub key: String,
    /// bech32 human-readable prefix for addresses on this chain
    #[serde(rename = "addressPrefix")]
    pub address_prefix: String,
    /// BIP-44 derivation parameters
    pub bip44: Bip44,
    /// Mainnet chain id, e.g. `cosmoshub-4`
    #[serde(rename = "chainId")]
    pub chain_id: String,
    /// Testnet chain id, if the chain runs one
    #[serde(rename = "testnetChainId", default)]
    pub testnet_chain_id: Option<String>,
    /// Human-readable name shown in UIs and used for merged-view sorting
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl ChainDescriptor {
    /// The chain id to use for the given network, or `None` when the chain
    /// has no presence there.
    pub fn active_chain_id(&self, network: NetworkKind) -> Option<&str> {
        match network {
            NetworkKind::Mainnet => Some(&self.chain_id),
            NetworkKind::Testnet => self.testnet_chain_id.as_deref(),
        }
    }
}
