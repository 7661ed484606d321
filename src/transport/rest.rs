// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client seam.

use async_trait::async_trait;
use tracing::trace;

use crate::errors::QueryError;

/// Minimal JSON-over-HTTP client interface.
///
/// Walletscan issues plain GET requests and decodes JSON bodies itself; the
/// implementation owns connection pooling and any transport policy.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Fetch `url` and return the decoded JSON body.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, QueryError>;
}

/// Default [`RestClient`] backed by [`reqwest`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestRestClient {
    client: reqwest::Client,
}

impl ReqwestRestClient {
    /// Create a client with reqwest's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a caller-configured [`reqwest::Client`] (proxies, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RestClient for ReqwestRestClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, QueryError> {
        trace!(url = url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QueryError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| QueryError::decode(url, e))
    }
}
