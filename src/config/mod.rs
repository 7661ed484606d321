// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for walletscan operations
//!
//! This module provides the configuration surface for controlling
//! walletscan's endpoints and fetch behavior.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use walletscan::WalletscanConfig;
//!
//! // Mainnet against the default aggregation API, coalescing on
//! let config = WalletscanConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use walletscan::{NetworkKind, WalletscanConfigBuilder};
//!
//! let config = WalletscanConfigBuilder::with_defaults()
//!     .base_api_url("https://api.staging.example.org/")
//!     .network(NetworkKind::Testnet)
//!     .build();
//! ```

use url::Url;

use crate::types::chain::NetworkKind;

/// Default aggregation API endpoint.
pub const DEFAULT_BASE_API_URL: &str = "https://api.walletscan.dev/";

/// Configuration for walletscan operations
///
/// Controls the aggregation API base URL, the active network, and whether
/// concurrent fetches for the same query coalesce into one request. There is
/// no built-in cache TTL: cached values live until someone calls `refetch`.
#[derive(Debug, Clone)]
pub struct WalletscanConfig {
    /// Base URL of the aggregation API all registry-level queries derive from
    pub base_api_url: Url,

    /// Which network family chain ids and endpoints resolve against
    pub network: NetworkKind,

    /// Coalesce concurrent fetches of the same query into a single request
    /// Default: true
    pub coalesce_fetches: bool,
}

impl Default for WalletscanConfig {
    fn default() -> Self {
        Self {
            base_api_url: Url::parse(DEFAULT_BASE_API_URL).expect("default base URL is valid"),
            network: NetworkKind::Mainnet,
            coalesce_fetches: true,
        }
    }
}

impl WalletscanConfig {
    /// Join a path onto the base API URL.
    ///
    /// Falls back to simple string concatenation if the path cannot be
    /// joined, which only happens for malformed caller-supplied segments.
    pub(crate) fn api_url(&self, path: &str) -> String {
        match self.base_api_url.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{path}", self.base_api_url),
        }
    }

    /// REST endpoint for a specific chain, routed through the aggregation
    /// API: `{base}/{chain_id}`.
    pub(crate) fn chain_rest_url(&self, chain_id: &str, path: &str) -> String {
        self.api_url(&format!("{chain_id}/{path}"))
    }
}

/// Fluent builder for [`WalletscanConfig`]
///
/// # Example
///
/// ```rust
/// use walletscan::WalletscanConfigBuilder;
///
/// let config = WalletscanConfigBuilder::with_defaults()
///     .coalesce_fetches(false)
///     .build();
/// assert!(!config.coalesce_fetches);
/// ```
#[derive(Debug, Clone)]
pub struct WalletscanConfigBuilder {
    config: WalletscanConfig,
}

impl WalletscanConfigBuilder {
    /// Start from the default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: WalletscanConfig::default(),
        }
    }

    /// Set the aggregation API base URL
    ///
    /// An unparseable URL leaves the previous value in place; the default
    /// base URL is always valid.
    pub fn base_api_url(mut self, url: &str) -> Self {
        if let Ok(parsed) = Url::parse(url) {
            self.config.base_api_url = parsed;
        }
        self
    }

    /// Set the active network
    pub fn network(mut self, network: NetworkKind) -> Self {
        self.config.network = network;
        self
    }

    /// Enable or disable fetch coalescing
    pub fn coalesce_fetches(mut self, enabled: bool) -> Self {
        self.config.coalesce_fetches = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> WalletscanConfig {
        self.config
    }
}
