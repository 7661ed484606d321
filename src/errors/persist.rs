// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error type for durable-storage writes.

/// A write through the [`KeyValueStore`](crate::transport::KeyValueStore)
/// adapter failed.
///
/// Reported to the caller of the mutating operation; the in-memory state
/// that triggered the write is deliberately not rolled back (see
/// [`ChainTagIndex::set_override`](crate::ChainTagIndex::set_override)).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("storage write for key {key} failed: {message}")]
pub struct PersistError {
    /// The storage key that was being written
    pub key: String,
    /// Description of the underlying storage failure
    pub message: String,
}

impl PersistError {
    /// Helper to create a `PersistError` from any error type.
    pub fn new(key: impl Into<String>, source: impl std::fmt::Display) -> Self {
        PersistError {
            key: key.into(),
            message: source.to_string(),
        }
    }
}
