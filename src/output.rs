//! Plugin output.
//!
//! Everything printed on stdout is built here. The first line is the one
//! the monitoring supervisor shows as the service status, so it always
//! belongs to the most severe node.

use perfwatch_types::{CatalogEntry, CounterSnapshot};
use quick_xml::escape::escape;

use crate::data::{Status, Verdict};
use crate::error::ProbeError;
use crate::orchestrator::{RunReport, TargetResult};
use crate::probe::ProbeOutcome;

/// Gap between the longest name and the value column in listings.
const LISTING_GAP: usize = 3;

/// Escape a status line for the supervisor: HTML special characters
/// (quotes as numeric references), then `%` to `Percent`, then `\` to `\\`.
pub fn escape_line(line: &str) -> String {
    escape(line)
        .replace("&apos;", "&#39;")
        .replace("&quot;", "&#34;")
        .replace('%', "Percent")
        .replace('\\', r"\\")
}

/// `<STATUS> - <prefix>,<object>,<counter>=<value>|<counter>=<value>;<warn>;<crit>;;`
///
/// With `with_node` the node follows the prefix and labels the perfdata,
/// `<STATUS> - <prefix>,<node>,<object>,<counter>=<value>|<node>:<counter>=<value>;...`,
/// so lines and graphs from different nodes stay apart.
pub fn format_verdict(verdict: &Verdict, prefix: &str, with_node: bool) -> String {
    let (text_prefix, label) = if with_node {
        (
            format!("{},{}", prefix, verdict.node),
            format!("{}:{}", verdict.node, verdict.counter_name),
        )
    } else {
        (prefix.to_string(), verdict.counter_name.clone())
    };

    let line = format!(
        "{} - {},{},{}={}|{}={};{};{};;",
        verdict.status,
        text_prefix,
        verdict.object_instance,
        verdict.counter_name,
        verdict.value,
        label,
        verdict.value,
        verdict.warning_spec,
        verdict.critical_spec,
    );
    escape_line(&line)
}

pub fn format_error(error: &ProbeError) -> String {
    format!("{} - {}", Status::Unknown, error)
}

/// One line per counter, sorted by name, values aligned.
pub fn render_listing(snapshot: &CounterSnapshot) -> Vec<String> {
    let samples = snapshot.sorted_by_name();
    let width = samples
        .iter()
        .map(|s| s.name.as_str().chars().count())
        .max()
        .unwrap_or(0);

    samples
        .iter()
        .map(|s| {
            let name = s.name.as_str();
            let pad = width + LISTING_GAP - name.chars().count();
            format!("Name: {}{}Value: {}", name, " ".repeat(pad), s.value)
        })
        .collect()
}

/// `<n> items`, then each object with its counters indented by a tab.
pub fn render_catalog(catalog: &[CatalogEntry]) -> Vec<String> {
    let mut lines = vec![format!("{} items", catalog.len())];
    for entry in catalog {
        lines.push(entry.object.clone());
        lines.extend(entry.counters.iter().map(|c| format!("\t{}", c)));
    }
    lines
}

/// Lines for one node. When more than one node was checked, verdicts name
/// the node and listings and catalogs get a `Node <address>:` header.
pub fn render_result(result: &TargetResult, prefix: &str, multi_target: bool) -> Vec<String> {
    let block = |body: Vec<String>| {
        if multi_target {
            let mut lines = vec![format!("Node {}:", result.node)];
            lines.extend(body);
            lines
        } else {
            body
        }
    };

    match &result.outcome {
        Ok(ProbeOutcome::Verdict(verdict)) => {
            vec![format_verdict(verdict, prefix, multi_target)]
        }
        Ok(ProbeOutcome::Listing(snapshot)) => block(render_listing(snapshot)),
        Ok(ProbeOutcome::Catalog(catalog)) => block(render_catalog(catalog)),
        Err(error) => vec![format_error(error)],
    }
}

/// All output lines for a run.
///
/// The most severe node comes first (first in node order among equals),
/// the remaining nodes follow in order, and counter-not-found lines that
/// were not already printed first come last.
pub fn render_report(report: &RunReport, prefix: &str) -> Vec<String> {
    let multi_target = report.is_multi_target();
    let Some(first) = report.worst_index() else {
        return Vec::new();
    };

    let rest = report
        .results
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != first)
        .map(|(_, r)| r);
    let (not_found, found): (Vec<&TargetResult>, Vec<&TargetResult>) =
        rest.partition(|r| r.is_not_found());

    std::iter::once(&report.results[first])
        .chain(found)
        .chain(not_found)
        .flat_map(|r| render_result(r, prefix, multi_target))
        .collect()
}
