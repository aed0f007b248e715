//! Counter sources and the local snapshot cache.
//!
//! The probe reads counters through the [`CounterSource`] trait so the
//! decision logic can run against the live PerfmonPort service or an
//! in-memory source in tests. [`CounterCache`] keeps the last snapshot per
//! target and object between invocations.

mod cache;
mod memory;
mod perfmon;

pub use cache::{cache_key, CacheEntry, CacheError, CounterCache};
pub use memory::MemorySource;

use async_trait::async_trait;
use perfwatch_adapters::{AdapterError, CatalogEntry, CounterSnapshot};

/// Anything that can answer the two PerfmonPort questions for a node.
///
/// # Example
///
/// ```
/// use perfwatch::{CounterSource, MemorySource};
/// use perfwatch_types::CounterSnapshot;
///
/// # tokio_test::block_on(async {
/// let source = MemorySource::new().with_snapshot(
///     "10.0.0.1",
///     "Memory",
///     CounterSnapshot::builder()
///         .sample(r"\\10.0.0.1\Memory\UsedMB", "512", "1")
///         .build(),
/// );
///
/// let snapshot = source.collect_counter_data("10.0.0.1", "Memory").await.unwrap();
/// assert_eq!(snapshot.len(), 1);
/// # });
/// ```
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Current values of every counter of `object` on `node`.
    async fn collect_counter_data(
        &self,
        node: &str,
        object: &str,
    ) -> Result<CounterSnapshot, AdapterError>;

    /// Every object and counter name `node` exposes.
    async fn list_counters(&self, node: &str) -> Result<Vec<CatalogEntry>, AdapterError>;
}
