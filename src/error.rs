//! Error types for the probe.

use perfwatch_adapters::AdapterError;
use perfwatch_types::CounterPath;
use thiserror::Error;

/// Why a probe of one target produced no threshold verdict.
///
/// Every variant maps to UNKNOWN.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The remote exchange failed or its response could not be used.
    #[error("{node}: {source}")]
    Fetch {
        node: String,
        #[source]
        source: AdapterError,
    },

    /// The requested counter is absent from the snapshot.
    #[error("Counter not found: {path}")]
    CounterNotFound { path: CounterPath },

    /// The counter exists but its value is not a finite number.
    #[error("Counter value is not a number: {path} = {value:?}")]
    InvalidValue { path: CounterPath, value: String },
}

impl ProbeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProbeError::CounterNotFound { .. })
    }
}

/// Invalid or incomplete configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = ProbeError::CounterNotFound {
            path: CounterPath::new(r"\\10.0.0.1\Memory\Nope"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), r"Counter not found: \\10.0.0.1\Memory\Nope");
    }

    #[test]
    fn test_fetch_message_names_node() {
        let err = ProbeError::Fetch {
            node: "10.0.0.1".to_string(),
            source: AdapterError::Timeout,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "10.0.0.1: Request timed out");
    }
}
