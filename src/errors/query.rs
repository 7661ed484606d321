// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for cached query fetches.

/// Errors produced by the fetch behind a [`CachedQuery`](crate::CachedQuery).
///
/// The error is stored on the owning query (stale data, if any, stays
/// visible) and shared between every caller awaiting the same in-flight
/// fetch, so the type is `Clone` and carries owned strings rather than
/// boxed sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The request never produced a response (connect failure, DNS, reset).
    #[error("network request to {url} failed: {message}")]
    Network {
        /// The URL that was requested
        url: String,
        /// Description of the transport failure
        message: String,
    },

    /// The endpoint answered with a non-success status code.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// The URL that was requested
        url: String,
        /// Description of the parse failure
        message: String,
    },
}

impl QueryError {
    /// Helper to create a `Network` error from any error type.
    pub fn network(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        QueryError::Network {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Helper to create a `Decode` error from any error type.
    pub fn decode(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        QueryError::Decode {
            url: url.into(),
            message: source.to_string(),
        }
    }
}
