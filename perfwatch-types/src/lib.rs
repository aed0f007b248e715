//! # perfwatch-types
//!
//! Core types for performance counter probes. This crate defines the data
//! model shared between the remote adapters, the local cache, and the
//! threshold evaluation in `perfwatch`.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to persist snapshots
//! - **Wire agnostic**: Both known PerfmonPort response shapes normalize into these types
//! - **Versioned schema**: Snapshots include version info so stale cache files are detected
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use perfwatch_types::{CounterPath, CounterSnapshot};
//!
//! let snapshot = CounterSnapshot::builder()
//!     .captured_at_ms(1703160000000)
//!     .sample(r"\\10.0.0.1\Memory\UsedMB", "512", "1")
//!     .sample(r"\\10.0.0.1\Memory\FreeMB", "1536", "1")
//!     .build();
//!
//! let path = CounterPath::qualify("10.0.0.1", "Memory", "UsedMB");
//! let sample = snapshot.find(&path).unwrap();
//! assert_eq!(sample.value, "512");
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in serialized
//! snapshots so that cache files written by an older build are treated as a
//! miss instead of being misread.

mod catalog;
mod counter;
mod snapshot;
mod version;

pub use catalog::*;
pub use counter::*;
pub use snapshot::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const SCHEMA_VERSION: u32 = 1;
