//! PerfmonPort-backed counter source.

use async_trait::async_trait;
use perfwatch_adapters::perfmon::PerfmonAdapter;
use perfwatch_adapters::{AdapterError, CatalogEntry, CounterSnapshot};

use super::CounterSource;

#[async_trait]
impl CounterSource for PerfmonAdapter {
    async fn collect_counter_data(
        &self,
        node: &str,
        object: &str,
    ) -> Result<CounterSnapshot, AdapterError> {
        PerfmonAdapter::collect_counter_data(self, node, object).await
    }

    async fn list_counters(&self, node: &str) -> Result<Vec<CatalogEntry>, AdapterError> {
        PerfmonAdapter::list_counters(self, node).await
    }
}
