// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for tiered denomination resolution
//!
//! The strict tier ordering is asserted through network-call counts on the
//! mock client: a local registry hit must issue zero trace traffic, and the
//! live query must only fire when both earlier tiers miss.

mod helpers;

use helpers::mock_client;
use serde_json::json;
use walletscan::{ibc_denom_hash, DenomResolver, QueryError, WalletscanConfigBuilder};

const REST: &str = "https://rest.osmosis.example.org";

fn config() -> walletscan::WalletscanConfig {
    WalletscanConfigBuilder::with_defaults()
        .base_api_url("https://api.example.org/")
        .build()
}

fn registry_body() -> serde_json::Value {
    json!({
        "denoms": [
            {
                "chainId": "cosmoshub-4",
                "coinMinimalDenom": "uatom",
                "coinDenom": "ATOM",
                "coinDecimals": 6,
                "originChainId": "cosmoshub-4"
            },
            {
                "chainId": "osmosis-1",
                "coinMinimalDenom": "uosmo",
                "coinDenom": "OSMO",
                "coinDecimals": 6,
                "originChainId": "osmosis-1"
            }
        ]
    })
}

fn atom_on_osmosis() -> String {
    ibc_denom_hash("transfer/channel-0", "uatom")
}

#[tokio::test]
async fn test_local_registry_hit_issues_no_trace_traffic() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;
    assert_eq!(mock.call_count(), 1); // the registry load itself

    let record = resolver.resolve("uatom", REST, "cosmoshub-4").await.unwrap();
    assert_eq!(record.coin_denom, "ATOM");

    // Neither the bulk snapshot nor the live endpoint was consulted.
    assert_eq!(mock.calls_matching("denom-traces"), 0);
    assert_eq!(mock.calls_matching("denom_traces"), 0);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_snapshot_resolves_hashed_denom_without_live_query() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));
    mock.route(
        "v1/ibc/denom-traces",
        Ok(json!({
            "denomTraces": [{
                "denom": atom_on_osmosis(),
                "path": "transfer/channel-0",
                "baseDenom": "uatom",
                "originChainId": "cosmoshub-4",
                "channelId": "channel-0"
            }]
        })),
    );

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    let record = resolver
        .resolve(&atom_on_osmosis(), REST, "osmosis-1")
        .await
        .unwrap();
    // The traced base denom resolved back through the local registry.
    assert_eq!(record.coin_denom, "ATOM");
    assert_eq!(record.origin_chain_id, "cosmoshub-4");

    assert_eq!(mock.calls_matching("v1/ibc/denom-traces"), 1);
    assert_eq!(mock.calls_matching("denom_traces/"), 0);

    // The snapshot is shared: a second resolution refetches nothing.
    resolver
        .resolve(&atom_on_osmosis(), REST, "osmosis-1")
        .await
        .unwrap();
    assert_eq!(mock.calls_matching("v1/ibc/denom-traces"), 1);
}

#[tokio::test]
async fn test_live_query_is_the_last_tier() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));
    mock.route("v1/ibc/denom-traces", Ok(json!({ "denomTraces": [] })));
    mock.route(
        "denom_traces/",
        Ok(json!({
            "denom_trace": {
                "path": "transfer/channel-0",
                "baseDenom": "uatom",
                "originChainId": "cosmoshub-4"
            }
        })),
    );

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    let record = resolver
        .resolve(&atom_on_osmosis(), REST, "osmosis-1")
        .await
        .unwrap();
    assert_eq!(record.coin_denom, "ATOM");
    assert_eq!(mock.calls_matching("denom_traces/"), 1);
}

#[tokio::test]
async fn test_live_query_failure_resolves_to_none() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));
    mock.route("v1/ibc/denom-traces", Ok(json!({ "denomTraces": [] })));
    mock.route_error(
        "denom_traces/",
        QueryError::Status {
            status: 500,
            url: format!("{REST}/ibc/apps/transfer/v1/denom_traces/X"),
        },
    );

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    let resolved = resolver.resolve(&atom_on_osmosis(), REST, "osmosis-1").await;
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_unhashed_unknown_denom_never_queries_live() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));
    mock.route("v1/ibc/denom-traces", Ok(json!({ "denomTraces": [] })));

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    let resolved = resolver.resolve("unotregistered", REST, "osmosis-1").await;
    assert!(resolved.is_none());
    assert_eq!(mock.calls_matching("denom_traces/"), 0);
}

#[tokio::test]
async fn test_traced_base_denom_unknown_locally_is_none() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));
    let hashed = ibc_denom_hash("transfer/channel-99", "ufoo");
    mock.route(
        "v1/ibc/denom-traces",
        Ok(json!({
            "denomTraces": [{
                "denom": hashed,
                "path": "transfer/channel-99",
                "baseDenom": "ufoo",
                "originChainId": "foochain-1"
            }]
        })),
    );

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    // The trace is known but its base denom is not in the local registry;
    // tier 2 answers definitively and no live query follows.
    let resolved = resolver.resolve(&hashed, REST, "osmosis-1").await;
    assert!(resolved.is_none());
    assert_eq!(mock.calls_matching("denom_traces/"), 0);
}

#[tokio::test]
async fn test_resolution_is_deterministic() {
    let (mock, client) = mock_client();
    mock.route("v1/denoms", Ok(registry_body()));

    let resolver = DenomResolver::new(client, &config());
    resolver.bootstrap().await;

    let first = resolver.resolve("uosmo", REST, "osmosis-1").await;
    let second = resolver.resolve("uosmo", REST, "osmosis-1").await;
    assert_eq!(first, second);
    assert!(first.is_some());
}
