//! Normalization of PerfmonPort responses.
//!
//! Servers in the field answer with one of two shapes for the same data.
//! Older releases send bare fields:
//!
//! ```xml
//! <item><Name>\\cucm1\Memory\UsedMB</Name><Value>512</Value><CStatus>1</CStatus></item>
//! ```
//!
//! Newer releases wrap every field in SOAP-encoding type attributes and may
//! mark empty fields as nil:
//!
//! ```xml
//! <item xsi:type="ns1:CounterInfoType">
//!   <Name xsi:type="ns1:CounterNameType">\\cucm1\Memory\UsedMB</Name>
//!   <Value xsi:type="xsd:long">512</Value>
//!   <CStatus xsi:type="xsd:unsignedInt">1</CStatus>
//! </item>
//! ```
//!
//! Both reduce to the same [`CounterSnapshot`] / [`CatalogEntry`] values.
//! Attributes and elements that are not listed here are ignored.

use perfwatch_types::{CatalogEntry, CounterSample, CounterSnapshot};
use serde::Deserialize;

use crate::AdapterError;

const COLLECT_RESPONSE: &str = "perfmonCollectCounterDataResponse";
const LIST_RESPONSE: &str = "perfmonListCounterResponse";

/// SOAP envelope. Element names match on their local part, so any
/// namespace prefix the server picks is accepted.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Body")]
    body: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default, rename = "Fault")]
    fault: Option<Fault>,
    #[serde(default, rename = "perfmonCollectCounterDataResponse")]
    collect: Option<CollectResponse>,
    #[serde(default, rename = "perfmonListCounterResponse")]
    list: Option<ListResponse>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(default)]
    faultstring: Option<Field>,
}

#[derive(Debug, Deserialize)]
struct CollectResponse {
    #[serde(default, rename = "ArrayOfCounterInfo")]
    counters: Option<ItemArray<CounterItem>>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default, rename = "ArrayOfObjectInfo")]
    objects: Option<ItemArray<ObjectItem>>,
}

/// SOAP-encoded array: repeated `item` children.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ItemArray<T> {
    #[serde(default, rename = "item")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CounterItem {
    #[serde(default, rename = "@type")]
    xsi_type: Option<String>,
    #[serde(default, rename = "Name")]
    name: Option<Field>,
    #[serde(default, rename = "Value")]
    value: Option<Field>,
    #[serde(default, rename = "CStatus")]
    status: Option<Field>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    #[serde(default, rename = "@type")]
    xsi_type: Option<String>,
    #[serde(default, rename = "Name")]
    name: Option<Field>,
    #[serde(default, rename = "MultiInstance")]
    multi_instance: Option<Field>,
    #[serde(default, rename = "ArrayOfCounter")]
    counters: Option<ItemArray<CounterNameItem>>,
}

#[derive(Debug, Deserialize)]
struct CounterNameItem {
    #[serde(default, rename = "@type")]
    xsi_type: Option<String>,
    #[serde(default, rename = "Name")]
    name: Option<Field>,
}

/// One text field, bare or wrapped in `xsi:type` / `xsi:nil`.
#[derive(Debug, Deserialize)]
struct Field {
    #[serde(default, rename = "@type")]
    xsi_type: Option<String>,
    #[serde(default, rename = "@nil")]
    nil: Option<String>,
    #[serde(default, rename = "$text")]
    text: String,
}

impl Field {
    fn is_typed(&self) -> bool {
        self.xsi_type.is_some() || self.nil.is_some()
    }

    fn is_nil(&self) -> bool {
        self.nil
            .as_deref()
            .map_or(false, |v| v.eq_ignore_ascii_case("true") || v == "1")
    }
}

/// The wire shape of one `item` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireShape {
    /// Fields are bare text elements.
    Plain,
    /// Fields carry `xsi:type` wrappers and may be `xsi:nil`.
    Typed,
}

impl WireShape {
    fn of<'a>(item_type: Option<&str>, fields: impl IntoIterator<Item = &'a Option<Field>>) -> Self {
        let typed_field = fields
            .into_iter()
            .any(|f| f.as_ref().map_or(false, Field::is_typed));
        if item_type.is_some() || typed_field {
            WireShape::Typed
        } else {
            WireShape::Plain
        }
    }

    /// Text of a field, `None` if absent (or nil in the typed shape).
    fn field(self, field: &Option<Field>) -> Option<&str> {
        let field = field.as_ref()?;
        match self {
            WireShape::Plain => Some(field.text.trim()),
            WireShape::Typed if field.is_nil() => None,
            WireShape::Typed => Some(field.text.trim()),
        }
    }
}

impl CounterItem {
    fn shape(&self) -> WireShape {
        WireShape::of(
            self.xsi_type.as_deref(),
            [&self.name, &self.value, &self.status],
        )
    }
}

impl ObjectItem {
    fn shape(&self) -> WireShape {
        WireShape::of(
            self.xsi_type.as_deref(),
            [&self.name, &self.multi_instance],
        )
    }
}

impl CounterNameItem {
    fn shape(&self) -> WireShape {
        WireShape::of(self.xsi_type.as_deref(), [&self.name])
    }
}

/// Normalize a `perfmonCollectCounterData` response into a snapshot.
pub fn normalize_counter_data(
    xml: &str,
    captured_at_ms: u64,
) -> Result<CounterSnapshot, AdapterError> {
    let body = decode_body(xml)?;
    let response = body.collect.ok_or_else(|| missing(COLLECT_RESPONSE))?;

    let mut builder = CounterSnapshot::builder().captured_at_ms(captured_at_ms);
    for item in response.counters.map(|a| a.items).unwrap_or_default() {
        builder = builder.push(counter_sample(&item)?);
    }

    Ok(builder.build())
}

/// Normalize a `perfmonListCounter` response into catalog entries.
pub fn normalize_counter_list(xml: &str) -> Result<Vec<CatalogEntry>, AdapterError> {
    let body = decode_body(xml)?;
    let response = body.list.ok_or_else(|| missing(LIST_RESPONSE))?;

    let objects = response.objects.map(|a| a.items).unwrap_or_default();
    objects.iter().map(catalog_entry).collect()
}

/// Extract the fault string if `xml` is a SOAP fault envelope.
pub fn fault_message(xml: &str) -> Option<String> {
    let envelope: Envelope = quick_xml::de::from_str(xml).ok()?;
    envelope.body.fault.as_ref().map(fault_text)
}

fn fault_text(fault: &Fault) -> String {
    fault
        .faultstring
        .as_ref()
        .map(|f| f.text.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or("unspecified fault")
        .to_string()
}

fn decode_body(xml: &str) -> Result<Body, AdapterError> {
    let envelope: Envelope = quick_xml::de::from_str(xml)?;
    if let Some(fault) = &envelope.body.fault {
        return Err(AdapterError::Fault(fault_text(fault)));
    }
    Ok(envelope.body)
}

fn missing(element: &str) -> AdapterError {
    AdapterError::Parse(format!("SOAP Body has no {}", element))
}

fn counter_sample(item: &CounterItem) -> Result<CounterSample, AdapterError> {
    let shape = item.shape();
    let name = shape
        .field(&item.name)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AdapterError::Parse("counter item without Name".to_string()))?;

    Ok(CounterSample::new(
        name,
        shape.field(&item.value).unwrap_or_default(),
        shape.field(&item.status).unwrap_or_default(),
    ))
}

fn catalog_entry(item: &ObjectItem) -> Result<CatalogEntry, AdapterError> {
    let shape = item.shape();
    let object = shape
        .field(&item.name)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AdapterError::Parse("object item without Name".to_string()))?;
    let multi_instance = shape
        .field(&item.multi_instance)
        .map_or(false, |v| v.eq_ignore_ascii_case("true") || v == "1");

    let mut entry = CatalogEntry::new(object, multi_instance);
    for counter in item.counters.iter().flat_map(|a| &a.items) {
        if let Some(name) = counter.shape().field(&counter.name) {
            entry = entry.with_counter(name);
        }
    }
    Ok(entry)
}
