//! Plugin status and per-target verdicts.

use std::fmt;

use perfwatch_types::CounterPath;

/// Plugin status reported to the monitoring supervisor.
///
/// The numeric codes are the process exit codes the supervisor expects and
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Exit code for this status.
    pub fn code(&self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Status line label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Rank used when several targets are combined:
    /// CRITICAL > WARNING > UNKNOWN > OK.
    ///
    /// This differs from the exit code order, where UNKNOWN is 3.
    pub fn severity(&self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Unknown => 1,
            Status::Warning => 2,
            Status::Critical => 3,
        }
    }

    /// The more severe of two statuses; `self` wins ties.
    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of evaluating one counter on one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: Status,
    /// Node the counter was read from.
    pub node: String,
    /// Object with optional instance suffix, as configured.
    pub object_instance: String,
    /// Counter name as configured (may itself be fully qualified).
    pub counter_name: String,
    /// Resolved fully-qualified path that matched.
    pub path: CounterPath,
    /// Raw counter value as reported.
    pub value: String,
    pub warning_spec: String,
    pub critical_spec: String,
    /// True if the value came from the local cache.
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::Warning.code(), 1);
        assert_eq!(Status::Critical.code(), 2);
        assert_eq!(Status::Unknown.code(), 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Critical.label(), "CRITICAL");
    }

    #[test]
    fn test_worst_ordering() {
        assert_eq!(Status::Ok.worst(Status::Unknown), Status::Unknown);
        assert_eq!(Status::Unknown.worst(Status::Warning), Status::Warning);
        assert_eq!(Status::Warning.worst(Status::Critical), Status::Critical);
        assert_eq!(Status::Critical.worst(Status::Unknown), Status::Critical);
        assert_eq!(Status::Warning.worst(Status::Unknown), Status::Warning);
        assert_eq!(Status::Ok.worst(Status::Ok), Status::Ok);
    }
}
