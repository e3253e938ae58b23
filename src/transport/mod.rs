// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for chain adapters.
//!
//! - [`JsonClient`] is the single outbound request helper: JSON headers,
//!   timeout, optional proxy forwarding and error classification.
//! - [`first_success`] walks an ordered provider list and stops at the first
//!   provider that answers with a well-formed payload.
//! - [`live_or_synthetic`] turns the final outcome into a [`crate::Sourced`]
//!   record, calling the fallback synthesizer when every provider failed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sbtcscan::transport::{first_success, live_or_synthetic};
//!
//! let result = first_success("transaction", &descriptor.providers, |provider| {
//!     self.fetch_transaction(provider, id)
//! })
//! .await;
//! let tx = live_or_synthetic(Chain::Bitcoin, "transaction", result, || {
//!     self.synth.transaction(id)
//! });
//! ```

mod client;
mod fallback;

pub use client::JsonClient;
pub use fallback::{first_success, live_or_synthetic};
