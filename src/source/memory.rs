//! In-memory counter source.
//!
//! Serves canned snapshots and catalogs. Useful for dry runs and for
//! exercising the probe without a PerfmonPort service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use perfwatch_adapters::{AdapterError, CatalogEntry, CounterSnapshot};

use super::CounterSource;

/// A counter source backed by fixed data.
///
/// Nodes registered with [`MemorySource::with_unreachable`] fail every
/// request with a connection error. Unknown node/object pairs yield an
/// empty snapshot, which is what the service returns for an object with
/// no counters.
#[derive(Debug, Default)]
pub struct MemorySource {
    snapshots: HashMap<(String, String), CounterSnapshot>,
    catalogs: HashMap<String, Vec<CatalogEntry>>,
    unreachable: HashMap<String, String>,
    requests: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `snapshot` for `object` on `node`.
    pub fn with_snapshot(
        mut self,
        node: impl Into<String>,
        object: impl Into<String>,
        snapshot: CounterSnapshot,
    ) -> Self {
        self.snapshots.insert((node.into(), object.into()), snapshot);
        self
    }

    /// Serve `catalog` for `node`.
    pub fn with_catalog(mut self, node: impl Into<String>, catalog: Vec<CatalogEntry>) -> Self {
        self.catalogs.insert(node.into(), catalog);
        self
    }

    /// Fail every request for `node` with a connection error.
    pub fn with_unreachable(mut self, node: impl Into<String>, reason: impl Into<String>) -> Self {
        self.unreachable.insert(node.into(), reason.into());
        self
    }

    /// Number of requests answered so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn check_reachable(&self, node: &str) -> Result<(), AdapterError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        match self.unreachable.get(node) {
            Some(reason) => Err(AdapterError::Connection(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CounterSource for MemorySource {
    async fn collect_counter_data(
        &self,
        node: &str,
        object: &str,
    ) -> Result<CounterSnapshot, AdapterError> {
        self.check_reachable(node)?;
        Ok(self
            .snapshots
            .get(&(node.to_string(), object.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_counters(&self, node: &str) -> Result<Vec<CatalogEntry>, AdapterError> {
        self.check_reachable(node)?;
        Ok(self.catalogs.get(node).cloned().unwrap_or_default())
    }
}
