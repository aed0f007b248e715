//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when collecting counters from a remote service.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The service answered with a SOAP fault.
    #[error("SOAP fault: {0}")]
    Fault(String),
}

impl AdapterError {
    /// True for failures of the exchange itself, as opposed to a response
    /// that arrived but could not be understood.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AdapterError::Http(_)
                | AdapterError::Auth(_)
                | AdapterError::Connection(_)
                | AdapterError::Timeout
        )
    }
}

#[cfg(feature = "perfmon")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

impl From<quick_xml::DeError> for AdapterError {
    fn from(err: quick_xml::DeError) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(AdapterError::Timeout.is_transport());
        assert!(AdapterError::Connection("refused".into()).is_transport());
        assert!(AdapterError::Auth("bad password".into()).is_transport());
        assert!(!AdapterError::Parse("eof".into()).is_transport());
        assert!(!AdapterError::Fault("Server.Exception".into()).is_transport());
    }

    #[test]
    fn test_display() {
        assert_eq!(AdapterError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            AdapterError::Fault("Invalid object".into()).to_string(),
            "SOAP fault: Invalid object"
        );
    }
}
