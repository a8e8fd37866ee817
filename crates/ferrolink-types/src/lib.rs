//! Core type system and error handling for FerroLink
//!
//! This crate provides the foundational types shared by the FerroLink crates:
//!
//! - **Error handling**: Error types with kinds and severity levels
//! - **Core types**: Sync pairs, walked files, link outcomes and run summaries
//! - **Traits**: Progress reporting hooks for the presentation layer
//! - **Configuration**: Validated configuration value types
//!
//! # Features
//!
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use ferrolink_types::{LinkOutcome, RunSummary};
//! use std::path::PathBuf;
//!
//! let mut summary = RunSummary::new();
//! summary.record(&LinkOutcome::Skipped { source: PathBuf::from("/src/a.txt") });
//! assert_eq!(summary.skipped(), 1);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::ThreadCount;
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
pub use traits::*;
pub use types::*;
