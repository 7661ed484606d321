// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the walletscan library.
//!
//! This module provides strongly-typed errors for the fallible edges of
//! walletscan. It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`QueryError`], [`PersistError`])
//! - **Unified error type** ([`WalletscanError`]) for convenience when you
//!   don't need to distinguish between error sources
//!
//! Note that the core components contain failures at their boundary: a
//! lookup that finds nothing is `None` or an empty map, never an error, and
//! a failed background fetch is only visible through the owning query's
//! recorded error. The types here exist for the seams where a typed failure
//! is owed to someone: transports, fetchers, and storage writes.

mod persist;
mod query;

pub use persist::PersistError;
pub use query::QueryError;

/// Unified error type for all walletscan operations.
///
/// Wraps the module-specific error types, providing a convenient way to
/// handle errors when you don't need to distinguish between sources. All
/// module-specific error types convert to `WalletscanError` via `From`
/// implementations, so `?` propagates them naturally.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletscanError {
    /// Error from a cached query fetch.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Error from a durable-storage write.
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}
