// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical record shapes and strong types shared across sbtcscan.
//!
//! - Chain and network identifiers
//! - Canonical block, transaction, address and stats records
//! - sBTC operations and fee-tier analysis
//! - Minor-unit amounts and their display formatting
//! - The live/synthetic provenance tag

pub mod address;
pub mod amount;
pub mod block;
pub mod chain;
pub mod fees;
pub mod sbtc;
pub mod sourced;
pub mod transaction;

// Note: Public types are re-exported from lib.rs, not here
