//! # perfwatch
//!
//! A Nagios-compatible probe for Cisco Unified Communications Manager
//! performance counters.
//!
//! The probe asks the PerfmonPort SOAP service for every counter of one
//! performance object on one or more nodes, keeps the answer in a short-lived
//! local cache, picks out the requested counter, classifies it against
//! Nagios warning and critical ranges, and prints one plugin line per node.
//! The process exit code is the worst status across nodes.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          perfwatch                             │
//! │                                                                │
//! │  ┌──────────────┐   ┌─────────────┐   ┌──────────┐            │
//! │  │ orchestrator │──▶│    probe    │──▶│   data   │            │
//! │  │ (all nodes)  │   │ (one node)  │   │(verdicts)│            │
//! │  └──────┬───────┘   └──────┬──────┘   └──────────┘            │
//! │         │                  │                                   │
//! │         ▼                  ▼                                   │
//! │  ┌──────────────┐   ┌─────────────┐                            │
//! │  │    output    │   │   source    │◀── PerfmonAdapter          │
//! │  │ (plugin text)│   │ (+ cache)   │◀── MemorySource            │
//! │  └──────────────┘   └─────────────┘                            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: Layered settings and the validated [`ProbeConfig`]
//! - **[`source`]**: The [`CounterSource`] seam and the on-disk [`CounterCache`]
//! - **[`probe`]**: Cache check, remote fetch, counter lookup and classification
//!   for a single node ([`SingleTargetProbe`])
//! - **[`orchestrator`]**: Runs every node in order and reduces the results
//!   ([`MultiTargetOrchestrator`])
//! - **[`data`]**: Threshold ranges, statuses and verdicts
//! - **[`output`]**: Plugin output lines
//!
//! ## Usage
//!
//! ### As a Nagios plugin
//!
//! ```bash
//! # Memory usage on one node
//! perfwatch -H cucm-pub -N 10.0.0.1 -u perfmon -p secret -n UsedMB -w 600 -c 800
//!
//! # CPU on two nodes, instance-qualified object
//! perfwatch -H cucm-pub -N 10.0.0.1,10.0.0.2 -o "Processor(_Total)" -n "% CPU Time" -w 80 -c 90
//!
//! # Everything a node exposes
//! perfwatch -H cucm-pub -N 10.0.0.1 -l
//! ```
//!
//! ### As a library
//!
//! ```
//! use perfwatch::data::{Status, Thresholds};
//! use perfwatch::output::render_report;
//! use perfwatch::{CounterCache, MemorySource, MultiTargetOrchestrator, ProbeConfig};
//! use perfwatch_types::CounterSnapshot;
//!
//! # tokio_test::block_on(async {
//! let source = MemorySource::new().with_snapshot(
//!     "10.0.0.1",
//!     "Memory",
//!     CounterSnapshot::builder()
//!         .sample(r"\\10.0.0.1\Memory\UsedMB", "512", "1")
//!         .build(),
//! );
//! let dir = tempfile::tempdir().unwrap();
//! let cache = CounterCache::new(dir.path());
//! let config = ProbeConfig {
//!     server: "cucm-pub".to_string(),
//!     nodes: vec!["10.0.0.1".to_string()],
//!     counter: "UsedMB".to_string(),
//!     thresholds: Thresholds::parse("600", "800"),
//!     ..ProbeConfig::default()
//! };
//!
//! let report = MultiTargetOrchestrator::new(&source, &cache, &config).run().await;
//! assert_eq!(report.status(), Status::Ok);
//! assert_eq!(
//!     render_report(&report, &config.output_prefix),
//!     vec!["OK - CUCM Perfmon,Memory,UsedMB=512|UsedMB=512;600;800;;"]
//! );
//! # });
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod probe;
pub mod source;

// Re-export main types for convenience
pub use config::ProbeConfig;
pub use data::{Status, ThresholdRange, Thresholds, Verdict};
pub use error::{ConfigError, ProbeError};
pub use orchestrator::{MultiTargetOrchestrator, RunReport, TargetResult};
pub use probe::{ProbeOutcome, SingleTargetProbe};
pub use source::{CacheError, CounterCache, CounterSource, MemorySource};
