// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for walletscan integration tests
//!
//! Provides mock implementations of the transport traits so tests can
//! script endpoint behavior, count network calls, and inject storage
//! failures without any real I/O.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use walletscan::transport::{KeyValueStore, RestClient};
use walletscan::{Bip44, ChainDescriptor, ChainRegistry, PersistError, QueryError};

type RouteResponse = Result<Value, QueryError>;

/// Mock [`RestClient`] with scripted routes and a call log.
///
/// Routes match by substring of the requested URL; when several match, the
/// most recently added wins, so tests can override a route mid-scenario
/// (e.g. a failing primary endpoint that later recovers). Unmatched URLs
/// answer 404.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockRestClient::new();
/// client.route("gov/v1/proposals", Ok(json!({ "proposals": [] })));
/// client.route_error("gov/v1beta1", QueryError::Status { status: 502, url: "…".into() });
/// assert_eq!(client.call_count(), 0);
/// ```
#[derive(Default)]
pub struct MockRestClient {
    routes: Mutex<Vec<(String, RouteResponse)>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockRestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for URLs containing `pattern`.
    pub fn route(&self, pattern: &str, response: RouteResponse) {
        self.routes.lock().push((pattern.to_string(), response));
    }

    /// Script a failure for URLs containing `pattern`.
    pub fn route_error(&self, pattern: &str, error: QueryError) {
        self.route(pattern, Err(error));
    }

    /// Total GET calls issued.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// GET calls whose URL contains `pattern`.
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }
}

#[async_trait]
impl RestClient for MockRestClient {
    async fn get_json(&self, url: &str) -> Result<Value, QueryError> {
        self.calls.lock().push(url.to_string());

        let routes = self.routes.lock();
        match routes
            .iter()
            .rev()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
        {
            Some((_, response)) => response.clone(),
            None => Err(QueryError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// [`KeyValueStore`] whose writes always fail; reads come up empty.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::new(key, "disk full"))
    }
}

/// A small registry covering the scenarios the tests exercise: two chains
/// sharing coin type 118, one coin-type-60 chain, and one exclusive-prefix
/// chain.
#[allow(dead_code)]
pub fn test_registry() -> ChainRegistry {
    ChainRegistry::new(vec![
        descriptor("cosmoshub", "cosmos", 118, "cosmoshub-4", "Cosmos Hub"),
        descriptor("osmosis", "osmo", 118, "osmosis-1", "Osmosis"),
        descriptor("akash", "akash", 118, "akashnet-2", "Akash"),
        descriptor("evmos", "evmos", 60, "evmos_9001-2", "Evmos"),
        descriptor("secret", "secret", 529, "secret-4", "Secret Network"),
    ])
}

#[allow(dead_code)]
pub fn descriptor(
    key: &str,
    prefix: &str,
    coin_type: u32,
    chain_id: &str,
    display_name: &str,
) -> ChainDescriptor {
    ChainDescriptor {
        key: key.to_string(),
        address_prefix: prefix.to_string(),
        bip44: Bip44 { coin_type },
        chain_id: chain_id.to_string(),
        testnet_chain_id: None,
        display_name: display_name.to_string(),
    }
}

/// Body of a `cosmos/gov/v1` proposals response.
#[allow(dead_code)]
pub fn gov_v1_body(proposals: &[(&str, &str, &str)]) -> Value {
    json!({
        "proposals": proposals
            .iter()
            .map(|(id, title, status)| json!({
                "id": id,
                "title": title,
                "status": status,
            }))
            .collect::<Vec<_>>()
    })
}

/// Body of a legacy `cosmos/gov/v1beta1` proposals response.
#[allow(dead_code)]
pub fn gov_v1beta1_body(proposals: &[(&str, &str, &str)]) -> Value {
    json!({
        "proposals": proposals
            .iter()
            .map(|(id, title, status)| json!({
                "proposal_id": id,
                "content": { "title": title },
                "status": status,
            }))
            .collect::<Vec<_>>()
    })
}

/// Convenience wrapper: the mock client behind an `Arc<dyn RestClient>`
/// plus the concrete handle for scripting and assertions.
#[allow(dead_code)]
pub fn mock_client() -> (Arc<MockRestClient>, Arc<dyn RestClient>) {
    let client = Arc::new(MockRestClient::new());
    let as_trait: Arc<dyn RestClient> = client.clone();
    (client, as_trait)
}
