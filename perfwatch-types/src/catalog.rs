//! Counter catalog entries returned by list-counters requests.

/// One performance object and the counters it exposes.
///
/// Catalogs are only shown to the operator; they are never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    /// Object name, e.g. `Memory` or `Processor`.
    pub object: String,

    /// Whether the object has multiple instances (`Processor(0)`, ...).
    pub multi_instance: bool,

    /// Counter names in wire order.
    pub counters: Vec<String>,
}

impl CatalogEntry {
    /// Create an entry with no counters.
    pub fn new(object: impl Into<String>, multi_instance: bool) -> Self {
        Self {
            object: object.into(),
            multi_instance,
            counters: Vec::new(),
        }
    }

    /// Add a counter name.
    pub fn with_counter(mut self, name: impl Into<String>) -> Self {
        self.counters.push(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_builder() {
        let entry = CatalogEntry::new("Processor", true)
            .with_counter("% CPU Time")
            .with_counter("IOwait Percentage");

        assert_eq!(entry.object, "Processor");
        assert!(entry.multi_instance);
        assert_eq!(entry.counters, vec!["% CPU Time", "IOwait Percentage"]);
    }
}
