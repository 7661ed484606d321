// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain tag map types.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Chain key → tags. `BTreeMap` keeps merge output deterministic.
pub type TagMap = BTreeMap<String, Vec<String>>;

/// Wire shape of the remote chain-tags endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChainTagsResponse {
    #[serde(default)]
    pub tags: TagMap,
}
