//! Idempotent hard-link mirroring for FerroLink
//!
//! This crate mirrors source directory trees into destination trees made of
//! hard links, and remembers which source files it has already handled:
//!
//! - **History**: An append-only log of processed source paths, loaded once
//!   and appended once per run
//! - **Walking**: Iterative enumeration of the regular files under a source root
//! - **Planning**: Pure skip/link decisions against the loaded history
//! - **Linking**: Hard link creation with per-file failure isolation
//! - **Engine**: Ordered processing of sync pairs with an optional worker pool
//!
//! # Examples
//!
//! ```rust,no_run
//! use ferrolink_sync::SyncEngine;
//! use ferrolink_types::SyncPair;
//!
//! let pairs = vec![SyncPair::new("/data/incoming", "/data/library")];
//! match SyncEngine::new().run(&pairs, "/var/lib/ferrolink/history.txt") {
//!     Ok(summary) => println!(
//!         "Linked {} files, skipped {}, {} failed",
//!         summary.linked(),
//!         summary.skipped(),
//!         summary.failed()
//!     ),
//!     Err(aborted) => eprintln!("{} ({} linked before abort)", aborted, aborted.summary.linked()),
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod executor;
pub mod history;
pub mod planner;
pub mod walker;

pub use engine::{RunAborted, SyncEngine, SyncOptions};
pub use executor::LinkExecutor;
pub use history::{is_recordable, HistorySet, HistoryStore};
pub use planner::{LinkPlan, LinkPlanner};
pub use walker::{TreeWalker, Walk};
