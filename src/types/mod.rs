// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Domain types shared across walletscan.
//!
//! This module provides the entities the crate aggregates and exposes:
//! - Chain descriptors loaded from the external registry
//! - Denomination metadata and IBC denom traces
//! - Governance proposals and per-chain synchronization state
//! - Layered chain tag maps

pub mod chain;
pub mod denom;
pub mod proposal;
pub mod tags;

// Note: Public types are re-exported from lib.rs, not here
