//! PerfmonPort SOAP request envelopes.

use quick_xml::escape::escape;

/// Namespace of the PerfmonPort operations.
pub const PERFMON_NAMESPACE: &str = "http://schemas.cisco.com/ast/soap";

/// SOAPAction header value expected by the service.
pub const SOAP_ACTION: &str = "CUCM:DB ver=9.0";

/// SOAP 1.1 envelope namespace.
pub const ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8" ?>"#;

const ENVELOPE_TAIL: &str = "</soapenv:Body></soapenv:Envelope>";

/// A single PerfmonPort operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfmonRequest<'a> {
    /// List every object and counter the node exposes.
    ListCounter { host: &'a str },
    /// Collect current values for every counter in `object` on `host`.
    CollectCounterData { host: &'a str, object: &'a str },
}

impl PerfmonRequest<'_> {
    /// Operation name as it appears in the request body.
    pub fn operation(&self) -> &'static str {
        match self {
            PerfmonRequest::ListCounter { .. } => "perfmonListCounter",
            PerfmonRequest::CollectCounterData { .. } => "perfmonCollectCounterData",
        }
    }

    /// Render the complete SOAP envelope.
    pub fn to_envelope(&self) -> String {
        let op = self.operation();
        let body = match self {
            PerfmonRequest::ListCounter { host } => {
                format!("<soap:Host>{}</soap:Host>", escape(*host))
            }
            PerfmonRequest::CollectCounterData { host, object } => format!(
                "<soap:Host>{}</soap:Host><soap:Object>{}</soap:Object>",
                escape(*host),
                escape(*object)
            ),
        };
        format!(
            "{XML_DECLARATION}<soapenv:Envelope xmlns:soapenv=\"{ENVELOPE_NAMESPACE}\" \
             xmlns:soap=\"{PERFMON_NAMESPACE}\"><soapenv:Header/><soapenv:Body>\
             <soap:{op}>{body}</soap:{op}>{ENVELOPE_TAIL}"
        )
    }
}
