// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Governance proposal types and the wire shapes they are normalized from.
//!
//! Two upstream shapes exist: the `cosmos/gov/v1` endpoint (primary) and the
//! legacy `cosmos/gov/v1beta1` endpoint (secondary, used when the primary
//! fails). Both normalize into [`Proposal`] so the rest of the crate never
//! sees which source supplied a chain's data; only the per-chain fallback
//! flag records that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tally status of a governance proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Still collecting the minimum deposit
    #[serde(rename = "PROPOSAL_STATUS_DEPOSIT_PERIOD")]
    DepositPeriod,
    /// Open for votes
    #[serde(rename = "PROPOSAL_STATUS_VOTING_PERIOD")]
    VotingPeriod,
    /// Passed
    #[serde(rename = "PROPOSAL_STATUS_PASSED")]
    Passed,
    /// Rejected by vote
    #[serde(rename = "PROPOSAL_STATUS_REJECTED")]
    Rejected,
    /// Passed the vote but failed on execution
    #[serde(rename = "PROPOSAL_STATUS_FAILED")]
    Failed,
    /// Anything the endpoint reports that we do not model
    #[serde(rename = "PROPOSAL_STATUS_UNSPECIFIED")]
    Unspecified,
}

impl ProposalStatus {
    /// Normalize the raw status string the gov endpoints serve. Statuses
    /// newer than this crate map to `Unspecified` rather than failing the
    /// whole response.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "PROPOSAL_STATUS_DEPOSIT_PERIOD" => ProposalStatus::DepositPeriod,
            "PROPOSAL_STATUS_VOTING_PERIOD" => ProposalStatus::VotingPeriod,
            "PROPOSAL_STATUS_PASSED" => ProposalStatus::Passed,
            "PROPOSAL_STATUS_REJECTED" => ProposalStatus::Rejected,
            "PROPOSAL_STATUS_FAILED" => ProposalStatus::Failed,
            _ => ProposalStatus::Unspecified,
        }
    }

    /// Short human-readable label, also the text the merged-view filter
    /// matches against.
    pub fn label(&self) -> &'static str {
        match self {
            ProposalStatus::DepositPeriod => "Deposit Period",
            ProposalStatus::VotingPeriod => "Voting Period",
            ProposalStatus::Passed => "Passed",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Failed => "Failed",
            ProposalStatus::Unspecified => "Unspecified",
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One governance proposal, normalized from either upstream shape.
///
/// The id stays a string: the endpoints serve decimal strings, and the
/// merged-view filter matches against the literal digits. Sorting parses it
/// numerically instead of comparing lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal id as served by the chain
    pub id: String,
    /// Proposal title; empty when the upstream document carries none
    pub title: String,
    /// Current tally status
    pub status: ProposalStatus,
    /// End of the voting period, when known
    #[serde(default)]
    pub voting_end_time: Option<DateTime<Utc>>,
}

/// A chain's current proposal set plus how it was obtained.
///
/// `via_fallback` is sticky for the lifetime of this value: it is only
/// cleared by the next successful primary fetch replacing the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProposals {
    /// Proposals for the chain, replaced wholesale on successful refetch
    pub proposals: Vec<Proposal>,
    /// Whether the secondary source supplied this data
    pub via_fallback: bool,
}

/// Per-chain synchronization state exposed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainSyncState {
    /// No fetch has been started for this chain
    NotStarted,
    /// A fetch is in flight and no previous data exists
    Loading,
    /// Data supplied by the primary source
    Ready,
    /// Primary failed; data supplied by the secondary source
    Fallback,
    /// Both sources failed and no previous data exists
    Failed,
}

// ---- cosmos/gov/v1 wire shapes -------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GovV1Response {
    #[serde(default)]
    pub proposals: Vec<GovV1Proposal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GovV1Proposal {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub status: String,
    #[serde(default)]
    pub voting_end_time: Option<DateTime<Utc>>,
}

impl From<GovV1Proposal> for Proposal {
    fn from(raw: GovV1Proposal) -> Self {
        Proposal {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            status: ProposalStatus::from_wire(&raw.status),
            voting_end_time: raw.voting_end_time,
        }
    }
}

// ---- cosmos/gov/v1beta1 wire shapes --------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GovV1Beta1Response {
    #[serde(default)]
    pub proposals: Vec<GovV1Beta1Proposal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GovV1Beta1Proposal {
    pub proposal_id: String,
    #[serde(default)]
    pub content: Option<GovV1Beta1Content>,
    pub status: String,
    #[serde(default)]
    pub voting_end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GovV1Beta1Content {
    #[serde(default)]
    pub title: Option<String>,
}

impl From<GovV1Beta1Proposal> for Proposal {
    fn from(raw: GovV1Beta1Proposal) -> Self {
        Proposal {
            id: raw.proposal_id,
            title: raw.content.and_then(|c| c.title).unwrap_or_default(),
            status: ProposalStatus::from_wire(&raw.status),
            voting_end_time: raw.voting_end_time,
        }
    }
}
