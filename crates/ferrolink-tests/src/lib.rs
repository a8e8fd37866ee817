//! FerroLink Testing Suite
//!
//! This crate provides end-to-end integration tests and benchmarks for the
//! FerroLink sync engine, together with the fixtures they share.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// This module provides the temporary tree fixtures used by the integration
/// tests and the benchmarks.
pub mod test_utils;
