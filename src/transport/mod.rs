// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport seams: HTTP client and durable key-value storage.
//!
//! Both collaborators are consumed through object-safe traits so hosts can
//! supply their own implementations (and tests can count calls or inject
//! failures). Default implementations ship alongside: [`ReqwestRestClient`]
//! for HTTP and [`MemoryStore`] for storage.
//!
//! Retry, backoff, and timeouts are deliberately not implemented here; a
//! caller-supplied client may impose them, this crate never does.

mod rest;
mod store;

pub use rest::{ReqwestRestClient, RestClient};
pub use store::{KeyValueStore, MemoryStore};
