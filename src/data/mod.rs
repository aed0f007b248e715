//! Threshold evaluation and verdicts.
//!
//! ## Submodules
//!
//! - [`threshold`]: Nagios range grammar ([`ThresholdRange`]) and the
//!   warning/critical pair ([`Thresholds`])
//! - [`verdict`]: Plugin status codes ([`Status`]) and per-target results ([`Verdict`])
//!
//! ## Data Flow
//!
//! ```text
//! CounterSample (string value)
//!        │
//!        ▼
//! CounterSample::parse_value()
//!        │
//!        ▼
//! Thresholds::classify() ──▶ Status ──▶ Verdict
//! ```

pub mod threshold;
pub mod verdict;

pub use threshold::{classify, evaluate, ThresholdRange, Thresholds};
pub use verdict::{Status, Verdict};
