// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Denomination metadata and IBC denom trace types.

use serde::{Deserialize, Serialize};

/// Canonical display metadata for one token denomination.
///
/// Produced either directly by the local denom registry or by resolving an
/// IBC denom trace back through it. This is the shape the rendering layer
/// consumes; raw trace data never reaches it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomRecord {
    /// On-chain minimal denomination, e.g. `uatom`
    #[serde(rename = "coinMinimalDenom")]
    pub coin_minimal_denom: String,
    /// Display denomination, e.g. `ATOM`
    #[serde(rename = "coinDenom")]
    pub coin_denom: String,
    /// Exponent between minimal and display units
    #[serde(rename = "coinDecimals")]
    pub coin_decimals: u8,
    /// Icon URL, if the registry carries one
    #[serde(default)]
    pub icon: Option<String>,
    /// Chain id the denomination originates from
    #[serde(rename = "originChainId")]
    pub origin_chain_id: String,
}

/// One entry of the IBC denom trace snapshot.
///
/// Raw remote metadata describing where an `ibc/…` denomination came from.
/// Never shown to the user directly; always resolved back through the
/// local denom registry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomTraceEntry {
    /// Transfer path, e.g. `transfer/channel-0`
    pub path: String,
    /// The denomination on its origin chain
    #[serde(rename = "baseDenom")]
    pub base_denom: String,
    /// Chain id the base denomination originates from
    #[serde(rename = "originChainId", default)]
    pub origin_chain_id: Option<String>,
    /// Chain id of the hop the token arrived from, when it differs from the
    /// origin (multi-hop transfers)
    #[serde(rename = "sourceChainId", default)]
    pub source_chain_id: Option<String>,
    /// Channel the token arrived through
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
}

impl DenomTraceEntry {
    /// The chain id to resolve the base denomination against: the source
    /// hop when known, otherwise the origin.
    pub fn resolution_chain_id(&self) -> Option<&str> {
        self.source_chain_id
            .as_deref()
            .or(self.origin_chain_id.as_deref())
    }
}

/// Wire shape of the bulk denom trace snapshot endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DenomTracesResponse {
    #[serde(rename = "denomTraces", alias = "denom_traces", default)]
    pub denom_traces: Vec<KeyedDenomTrace>,
}

/// One snapshot entry together with the hashed denomination it describes.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KeyedDenomTrace {
    /// Full hashed denom, e.g. `ibc/27394FB0…`
    pub denom: String,
    #[serde(flatten)]
    pub trace: DenomTraceEntry,
}

/// Wire shape of the per-denom live trace endpoint
/// (`/ibc/apps/transfer/v1/denom_traces/{hash}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DenomTraceResponse {
    #[serde(rename = "denomTrace", alias = "denom_trace")]
    pub denom_trace: DenomTraceEntry,
}

/// Wire shape of the local denom registry endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DenomRegistryResponse {
    #[serde(default)]
    pub denoms: Vec<RegistryDenom>,
}

/// One registry row: the record plus the chain it is registered under.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegistryDenom {
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(flatten)]
    pub record: DenomRecord,
}
