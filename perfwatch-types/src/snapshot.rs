//! CounterSnapshot - a point-in-time view of one object's counters.

use crate::{CounterPath, CounterSample, SchemaVersion};

/// A point-in-time snapshot of every counter in one performance object on
/// one node.
///
/// Samples keep the order the remote side reported them in. This is the
/// unit the probe caches between invocations.
///
/// # Example
///
/// ```rust
/// use perfwatch_types::CounterSnapshot;
///
/// let snapshot = CounterSnapshot::builder()
///     .sample(r"\\cucm1\Memory\% Mem Used", "24", "1")
///     .build();
///
/// assert_eq!(snapshot.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSnapshot {
    /// Schema version for forward compatibility.
    pub version: SchemaVersion,

    /// Unix timestamp in milliseconds when this snapshot was captured.
    pub captured_at_ms: u64,

    /// Counter samples in wire order.
    pub samples: Vec<CounterSample>,
}

impl CounterSnapshot {
    /// Create an empty snapshot stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create an empty snapshot with a specific timestamp.
    pub fn with_timestamp(captured_at_ms: u64) -> Self {
        Self {
            version: SchemaVersion::current(),
            captured_at_ms,
            samples: Vec::new(),
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> CounterSnapshotBuilder {
        CounterSnapshotBuilder::new()
    }

    /// Check if the snapshot is empty (no samples).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples in the snapshot.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Iterate over all samples in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &CounterSample> {
        self.samples.iter()
    }

    /// Find the first sample whose name matches `path` exactly.
    pub fn find(&self, path: &CounterPath) -> Option<&CounterSample> {
        self.samples.iter().find(|s| &s.name == path)
    }

    /// Samples sorted by counter name.
    pub fn sorted_by_name(&self) -> Vec<&CounterSample> {
        let mut sorted: Vec<&CounterSample> = self.samples.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Age of the snapshot in milliseconds relative to `now_ms`.
    ///
    /// A snapshot stamped in the future (clock skew between writers) has
    /// age zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.captured_at_ms)
    }
}

impl Default for CounterSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `CounterSnapshot` instances.
#[derive(Debug)]
pub struct CounterSnapshotBuilder {
    captured_at_ms: Option<u64>,
    samples: Vec<CounterSample>,
}

impl CounterSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            captured_at_ms: None,
            samples: Vec::new(),
        }
    }

    /// Set a specific capture time (milliseconds since Unix epoch).
    pub fn captured_at_ms(mut self, ts: u64) -> Self {
        self.captured_at_ms = Some(ts);
        self
    }

    /// Append a sample.
    pub fn sample(
        mut self,
        name: impl Into<CounterPath>,
        value: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        self.samples.push(CounterSample::new(name, value, status));
        self
    }

    /// Append a pre-built sample.
    pub fn push(mut self, sample: CounterSample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> CounterSnapshot {
        CounterSnapshot {
            version: SchemaVersion::current(),
            captured_at_ms: self.captured_at_ms.unwrap_or_else(current_timestamp_ms),
            samples: self.samples,
        }
    }
}

impl Default for CounterSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
