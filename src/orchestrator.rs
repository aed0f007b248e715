//! Runs the probe over every configured node and combines the results.

use tracing::{debug, info};

use crate::config::ProbeConfig;
use crate::data::Status;
use crate::error::ProbeError;
use crate::probe::{ProbeOutcome, SingleTargetProbe};
use crate::source::{CounterCache, CounterSource};

/// Result of probing one node.
#[derive(Debug)]
pub struct TargetResult {
    pub node: String,
    pub outcome: Result<ProbeOutcome, ProbeError>,
}

impl TargetResult {
    /// Any probe error is UNKNOWN.
    pub fn status(&self) -> Status {
        match &self.outcome {
            Ok(outcome) => outcome.status(),
            Err(_) => Status::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.is_not_found())
    }
}

/// Results for every node, in configuration order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<TargetResult>,
}

impl RunReport {
    /// Most severe status across all nodes; UNKNOWN if nothing ran.
    pub fn status(&self) -> Status {
        self.worst()
            .map(TargetResult::status)
            .unwrap_or(Status::Unknown)
    }

    pub fn exit_code(&self) -> u8 {
        self.status().code()
    }

    /// Index of the most severe result, first in node order among equals.
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<(usize, Status)> = None;
        for (i, result) in self.results.iter().enumerate() {
            let status = result.status();
            match worst {
                Some((_, current)) if current.worst(status) == current => {}
                _ => worst = Some((i, status)),
            }
        }
        worst.map(|(i, _)| i)
    }

    pub fn worst(&self) -> Option<&TargetResult> {
        self.worst_index().map(|i| &self.results[i])
    }

    pub fn is_multi_target(&self) -> bool {
        self.results.len() > 1
    }
}

/// Probes nodes one after another. A failing node never stops the rest.
pub struct MultiTargetOrchestrator<'a, S: CounterSource + ?Sized> {
    source: &'a S,
    cache: &'a CounterCache,
    config: &'a ProbeConfig,
}

impl<'a, S: CounterSource + ?Sized> MultiTargetOrchestrator<'a, S> {
    pub fn new(source: &'a S, cache: &'a CounterCache, config: &'a ProbeConfig) -> Self {
        Self {
            source,
            cache,
            config,
        }
    }

    pub async fn run(&self) -> RunReport {
        let probe = SingleTargetProbe::new(self.source, self.cache, self.config);
        let mut report = RunReport::default();

        for node in &self.config.nodes {
            debug!(node = %node, object = %self.config.object_instance, "probing node");
            let outcome = probe.run(node).await;
            report.results.push(TargetResult {
                node: node.clone(),
                outcome,
            });
        }

        info!(
            nodes = report.results.len(),
            status = %report.status(),
            "probe run complete"
        );
        report
    }
}
