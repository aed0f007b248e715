//! # perfwatch-adapters
//!
//! Adapters for collecting performance counters from Cisco Unified
//! Communications platforms.
//!
//! The SOAP request envelopes and the response normalizer are always
//! available; the HTTPS transport sits behind the `perfmon` feature.
//!
//! ## Supported Systems
//!
//! - **CUCM PerfmonPort** (`perfmon` feature) - Collects counter values and
//!   counter catalogs via the PerfmonPort SOAP service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "perfmon")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use perfwatch_adapters::perfmon::PerfmonAdapter;
//! use std::time::Duration;
//!
//! let adapter = PerfmonAdapter::builder()
//!     .server("cucm-pub.example.com")
//!     .credentials("perfmon", "secret")
//!     .timeout(Duration::from_secs(5))
//!     .build()?;
//!
//! let catalog = adapter.list_counters("10.0.0.1").await?;
//! println!("{} objects", catalog.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod normalize;
pub mod soap;

#[cfg(feature = "perfmon")]
pub mod perfmon;

pub use error::AdapterError;
pub use normalize::{fault_message, normalize_counter_data, normalize_counter_list};

// Re-export types for convenience
pub use perfwatch_types::{CatalogEntry, CounterPath, CounterSample, CounterSnapshot};
