// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-chain address derivation.
//!
//! Chains sharing a BIP-44 coin type derive addresses from the same key
//! material, so one address determines the wallet's address on every chain
//! in its coin-type group: decode the bech32 payload, re-encode it under
//! each sibling chain's prefix.
//!
//! The entry point is total: malformed input, unknown prefixes, and
//! unregistered chains all produce an empty map, never an error.

use std::collections::BTreeMap;

use bech32::{Bech32, Hrp};

use crate::registry::ChainRegistry;

/// Prefixes whose chains manage keys their own way; an address carrying one
/// of these never derives siblings, it only maps back to its own chain.
pub const EXCLUSIVE_PREFIXES: [&str; 2] = ["secret", "terra"];

/// Registry key of the chain whose prefix EVM-style hex addresses are
/// normalized through before derivation.
pub const EVM_DEFAULT_CHAIN_KEY: &str = "evmos";

/// Derive the wallet's equivalent address on every chain sharing the input
/// address's coin type.
///
/// The result maps chain key → address and always contains the input's own
/// chain mapped to the input string exactly. Re-deriving from any address
/// in the result reproduces the same result (the coin-type group is
/// closed). Any decode or lookup failure yields an empty map.
///
/// # Examples
///
/// ```rust,ignore
/// let related = related_addresses(&registry, "cosmos1qy352eufqy352eufqy352eufqy35qqqz9ayrkz");
/// assert!(related.contains_key("cosmoshub"));
/// assert!(related.contains_key("osmosis")); // same coin type 118
/// ```
pub fn related_addresses(registry: &ChainRegistry, address: &str) -> BTreeMap<String, String> {
    derive(registry, address).unwrap_or_default()
}

fn derive(registry: &ChainRegistry, address: &str) -> Option<BTreeMap<String, String>> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return None;
    }

    // EVM-style hex input normalizes to bech32 under the designated default
    // chain's prefix, then derives like any other bech32 address.
    let bech32_address = if looks_like_hex_address(trimmed) {
        let payload = hex::decode(&trimmed[2..]).ok()?;
        let default_chain = registry.by_key(EVM_DEFAULT_CHAIN_KEY)?;
        let hrp = Hrp::parse(&default_chain.address_prefix).ok()?;
        bech32::encode::<Bech32>(hrp, &payload).ok()?
    } else {
        trimmed.to_string()
    };

    let (hrp, payload) = bech32::decode(&bech32_address).ok()?;
    let prefix = hrp.to_lowercase();

    if EXCLUSIVE_PREFIXES.contains(&prefix.as_str()) {
        let mut related = BTreeMap::new();
        if let Some(chain) = registry.by_address_prefix(&prefix) {
            related.insert(chain.key.clone(), bech32_address);
        }
        return Some(related);
    }

    let origin = registry.by_address_prefix(&prefix)?;

    let mut related = BTreeMap::new();
    for chain in registry.sharing_coin_type(origin.bip44.coin_type) {
        let hrp = Hrp::parse(&chain.address_prefix).ok()?;
        let encoded = bech32::encode::<Bech32>(hrp, &payload).ok()?;
        related.insert(chain.key.clone(), encoded);
    }
    // The origin chain maps back to the address exactly as given.
    related.insert(origin.key.clone(), bech32_address);
    Some(related)
}

fn looks_like_hex_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}
