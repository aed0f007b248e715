//! Probe of a single target.
//!
//! ```text
//! list mode? ──yes──▶ list_counters ──▶ Catalog
//!     │ no
//!     ▼
//! cache hit? ──no──▶ collect_counter_data ──▶ save
//!     │ yes                    │
//!     ▼                        ▼
//! no counter requested? ──yes──▶ Listing
//!     │ no
//!     ▼
//! lookup ──▶ parse ──▶ classify ──▶ Verdict
//! ```

use perfwatch_adapters::AdapterError;
use perfwatch_types::{CatalogEntry, CounterPath, CounterSnapshot};
use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::data::{Status, Verdict};
use crate::error::ProbeError;
use crate::source::{CounterCache, CounterSource};

/// What a successful probe produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// A counter was found and classified.
    Verdict(Verdict),
    /// No counter was requested; every counter of the object.
    Listing(CounterSnapshot),
    /// List mode; every object and counter the node exposes.
    Catalog(Vec<CatalogEntry>),
}

impl ProbeOutcome {
    /// Listings and catalogs are informational and always OK.
    pub fn status(&self) -> Status {
        match self {
            ProbeOutcome::Verdict(verdict) => verdict.status,
            ProbeOutcome::Listing(_) | ProbeOutcome::Catalog(_) => Status::Ok,
        }
    }
}

/// Runs the check for one node against a source and a cache.
pub struct SingleTargetProbe<'a, S: CounterSource + ?Sized> {
    source: &'a S,
    cache: &'a CounterCache,
    config: &'a ProbeConfig,
}

impl<'a, S: CounterSource + ?Sized> SingleTargetProbe<'a, S> {
    pub fn new(source: &'a S, cache: &'a CounterCache, config: &'a ProbeConfig) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    pub async fn run(&self, node: &str) -> Result<ProbeOutcome, ProbeError> {
        if self.config.list_counters {
            debug!(node, "listing counters");
            let catalog = self
                .source
                .list_counters(node)
                .await
                .map_err(|source| self.fetch_failed(node, source))?;
            return Ok(ProbeOutcome::Catalog(catalog));
        }

        let (snapshot, from_cache) = self.snapshot(node).await?;

        if self.config.counter.is_empty() {
            debug!(node, samples = snapshot.len(), from_cache, "listing object counters");
            return Ok(ProbeOutcome::Listing(snapshot));
        }

        let verdict = self.evaluate(node, &snapshot, from_cache)?;
        info!(
            node,
            counter = %verdict.path,
            value = %verdict.value,
            status = %verdict.status,
            from_cache,
            "counter evaluated"
        );
        Ok(ProbeOutcome::Verdict(verdict))
    }

    /// Cached snapshot if fresh enough, otherwise a fresh one from the
    /// source. A failed cache write is logged and otherwise ignored.
    async fn snapshot(&self, node: &str) -> Result<(CounterSnapshot, bool), ProbeError> {
        let object = self.config.object();

        if let Some(snapshot) = self.cache.load(node, object, self.config.max_cache_age) {
            debug!(node, object, "using cached snapshot");
            return Ok((snapshot, true));
        }

        let snapshot = self
            .source
            .collect_counter_data(node, object)
            .await
            .map_err(|source| self.fetch_failed(node, source))?;
        debug!(node, object, samples = snapshot.len(), "collected counter data");

        if let Err(e) = self.cache.save(node, object, &snapshot) {
            warn!(node, object, error = %e, "failed to save snapshot to cache");
        }

        Ok((snapshot, false))
    }

    fn evaluate(
        &self,
        node: &str,
        snapshot: &CounterSnapshot,
        from_cache: bool,
    ) -> Result<Verdict, ProbeError> {
        let config = self.config;
        let path = CounterPath::qualify(node, &config.object_instance, &config.counter);

        let sample = snapshot.find(&path).ok_or_else(|| {
            warn!(node, path = %path, "counter not found");
            ProbeError::CounterNotFound { path: path.clone() }
        })?;

        let value = sample.parse_value().ok_or_else(|| {
            warn!(node, path = %path, value = %sample.value, "counter value is not a number");
            ProbeError::InvalidValue {
                path: path.clone(),
                value: sample.value.clone(),
            }
        })?;

        Ok(Verdict {
            status: config.thresholds.classify(value),
            node: node.to_string(),
            object_instance: config.object_instance.clone(),
            counter_name: config.counter.clone(),
            path,
            value: sample.value.clone(),
            warning_spec: config.thresholds.warning_spec.clone(),
            critical_spec: config.thresholds.critical_spec.clone(),
            from_cache,
        })
    }

    fn fetch_failed(&self, node: &str, source: AdapterError) -> ProbeError {
        warn!(
            node,
            object = self.config.object(),
            counter = %self.config.counter,
            error = %source,
            "remote exchange failed"
        );
        ProbeError::Fetch {
            node: node.to_string(),
            source,
        }
    }
}
