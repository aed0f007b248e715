//! Cisco UC PerfmonPort adapter.
//!
//! Talks to the PerfmonPort SOAP service that CUCM publishes on port 8443
//! and returns normalized counter data.
//!
//! ## Operations
//!
//! - **perfmonCollectCounterData**: Current values for every counter of one
//!   object on one node
//! - **perfmonListCounter**: Every object and counter name a node exposes
//!
//! ## Example
//!
//! ```rust,no_run
//! use perfwatch_adapters::perfmon::PerfmonAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = PerfmonAdapter::builder()
//!         .server("cucm-pub.example.com")
//!         .credentials("perfmon", "secret")
//!         .build()?;
//!
//!     let snapshot = adapter.collect_counter_data("10.0.0.1", "Memory").await?;
//!
//!     for sample in snapshot.iter() {
//!         println!("{} = {}", sample.name, sample.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use perfwatch_types::{current_timestamp_ms, CatalogEntry, CounterSnapshot};

use crate::normalize::{fault_message, normalize_counter_data, normalize_counter_list};
use crate::soap::{PerfmonRequest, SOAP_ACTION};
use crate::AdapterError;

/// Port the PerfmonPort service listens on.
pub const DEFAULT_PORT: u16 = 8443;

/// Service path below the server root.
pub const SERVICE_PATH: &str = "/perfmonservice/services/PerfmonPort";

/// PerfmonPort adapter for collecting counters.
#[derive(Debug, Clone)]
pub struct PerfmonAdapter {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl PerfmonAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> PerfmonAdapterBuilder {
        PerfmonAdapterBuilder::default()
    }

    /// The service URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Collect every counter of `object` on node `host`.
    pub async fn collect_counter_data(
        &self,
        host: &str,
        object: &str,
    ) -> Result<CounterSnapshot, AdapterError> {
        let body = self
            .exchange(PerfmonRequest::CollectCounterData { host, object })
            .await?;
        normalize_counter_data(&body, current_timestamp_ms())
    }

    /// List every object and counter on node `host`.
    pub async fn list_counters(&self, host: &str) -> Result<Vec<CatalogEntry>, AdapterError> {
        let body = self.exchange(PerfmonRequest::ListCounter { host }).await?;
        normalize_counter_list(&body)
    }

    async fn exchange(&self, request: PerfmonRequest<'_>) -> Result<String, AdapterError> {
        let envelope = request.to_envelope();
        debug!(
            endpoint = %self.endpoint,
            operation = request.operation(),
            "SOAP request: {}",
            envelope
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .header("SOAPAction", SOAP_ACTION)
            .basic_auth(&self.username, Some(&self.password))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdapterError::Auth("Invalid credentials".to_string()));
        }

        let body = response.text().await?;
        debug!(status = %status, "SOAP response: {}", body);

        if !status.is_success() {
            // Faults arrive with HTTP 500.
            if let Some(fault) = fault_message(&body) {
                return Err(AdapterError::Fault(fault));
            }
            return Err(AdapterError::Http(format!("API returned status {}", status)));
        }

        Ok(body)
    }
}

/// Builder for PerfmonAdapter.
#[derive(Debug, Default)]
pub struct PerfmonAdapterBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl PerfmonAdapterBuilder {
    /// Set the server by host name or address; the endpoint becomes
    /// `https://<server>:8443/perfmonservice/services/PerfmonPort`.
    pub fn server(mut self, server: impl AsRef<str>) -> Self {
        self.endpoint = Some(format!(
            "https://{}:{}{}",
            server.as_ref(),
            DEFAULT_PORT,
            SERVICE_PATH
        ));
        self
    }

    /// Set the full service URL (overrides `server`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the username and password for authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept self-signed or otherwise unverifiable server certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<PerfmonAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| AdapterError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(PerfmonAdapter {
            client,
            endpoint: self.endpoint.unwrap_or_else(|| {
                format!("https://localhost:{}{}", DEFAULT_PORT, SERVICE_PATH)
            }),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const COLLECT_RESPONSE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
      <soapenv:Body><ns1:perfmonCollectCounterDataResponse xmlns:ns1="http://schemas.cisco.com/ast/soap">
        <ArrayOfCounterInfo>
          <item><Name>\\10.0.0.1\Memory\UsedMB</Name><Value>512</Value><CStatus>1</CStatus></item>
        </ArrayOfCounterInfo>
      </ns1:perfmonCollectCounterDataResponse></soapenv:Body></soapenv:Envelope>"#;

    const FAULT_RESPONSE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
      <soapenv:Body><soapenv:Fault>
        <faultcode>soapenv:Server</faultcode>
        <faultstring>Exceeded allowed rate for Perfmon information</faultstring>
      </soapenv:Fault></soapenv:Body></soapenv:Envelope>"#;

    /// Accept one connection, answer it with `status` and `body`, and hand
    /// back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });

        (format!("http://{}{}", addr, SERVICE_PATH), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = header(&text[..end], "content-length")
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn header(request: &str, name: &str) -> Option<String> {
        request.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    fn adapter(endpoint: String) -> PerfmonAdapter {
        PerfmonAdapter::builder()
            .endpoint(endpoint)
            .credentials("perfmon", "secret")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_collect_sends_soap_request() {
        let (endpoint, server) = serve_once("200 OK", COLLECT_RESPONSE).await;

        let snapshot = adapter(endpoint)
            .collect_counter_data("10.0.0.1", "Memory")
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.samples[0].value, "512");
        assert!(snapshot.captured_at_ms > 0);

        assert!(request.starts_with(&format!("POST {} HTTP/1.1", SERVICE_PATH)));
        assert_eq!(header(&request, "content-type").as_deref(), Some("text/xml"));
        assert_eq!(header(&request, "soapaction").as_deref(), Some(SOAP_ACTION));
        assert_eq!(
            header(&request, "authorization").as_deref(),
            Some("Basic cGVyZm1vbjpzZWNyZXQ=")
        );
        assert!(request.contains("<soap:Object>Memory</soap:Object>"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let (endpoint, server) = serve_once("401 Unauthorized", "").await;

        let err = adapter(endpoint).list_counters("10.0.0.1").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, AdapterError::Auth(ref msg) if msg == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_server_fault_is_fault_error() {
        let (endpoint, server) = serve_once("500 Internal Server Error", FAULT_RESPONSE).await;

        let err = adapter(endpoint)
            .collect_counter_data("10.0.0.1", "Memory")
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            AdapterError::Fault(msg) => {
                assert_eq!(msg, "Exceeded allowed rate for Perfmon information")
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_status_is_http_error() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "busy").await;

        let err = adapter(endpoint)
            .collect_counter_data("10.0.0.1", "Memory")
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            AdapterError::Http(msg) => assert!(msg.contains("503"), "message was {:?}", msg),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let adapter = PerfmonAdapter::builder().build().unwrap();
        assert_eq!(
            adapter.endpoint(),
            "https://localhost:8443/perfmonservice/services/PerfmonPort"
        );
        assert_eq!(adapter.username, "");
        assert_eq!(adapter.password, "");
    }

    #[test]
    fn test_builder_server() {
        let adapter = PerfmonAdapter::builder()
            .server("10.1.1.10")
            .credentials("admin", "secret")
            .timeout(Duration::from_secs(3))
            .accept_invalid_certs(true)
            .build()
            .unwrap();

        assert_eq!(
            adapter.endpoint(),
            "https://10.1.1.10:8443/perfmonservice/services/PerfmonPort"
        );
        assert_eq!(adapter.username, "admin");
        assert_eq!(adapter.password, "secret");
    }

    #[test]
    fn test_builder_endpoint_overrides_server() {
        let adapter = PerfmonAdapter::builder()
            .server("ignored")
            .endpoint("http://127.0.0.1:9999/perfmon")
            .build()
            .unwrap();
        assert_eq!(adapter.endpoint(), "http://127.0.0.1:9999/perfmon");
    }
}
