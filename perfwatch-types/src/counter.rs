//! Counter identities and samples.

use core::fmt;

/// Prefix that marks a counter name as fully qualified.
const UNC_PREFIX: &str = r"\\";

/// A fully-qualified counter name of the form `\\<node>\<object>\<counter>`.
///
/// Qualification is purely syntactic: nothing here checks that the node,
/// object or counter exist on the remote side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CounterPath(String);

impl CounterPath {
    /// Wrap a name as-is, without checking its shape.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build the path for `counter` on `node` within `object`.
    ///
    /// `object` may carry an instance suffix such as `Processor(_Total)`.
    /// A counter name that is already fully qualified passes through
    /// unchanged.
    ///
    /// ```rust
    /// use perfwatch_types::CounterPath;
    ///
    /// let path = CounterPath::qualify("10.0.0.1", "Memory", "Foo");
    /// assert_eq!(path.as_str(), r"\\10.0.0.1\Memory\Foo");
    ///
    /// let path = CounterPath::qualify("10.0.0.1", "Memory", r"\\other\Cpu\Busy");
    /// assert_eq!(path.as_str(), r"\\other\Cpu\Busy");
    /// ```
    pub fn qualify(node: &str, object: &str, counter: &str) -> Self {
        if Self::is_fully_qualified(counter) {
            Self(counter.to_string())
        } else {
            Self(format!(r"\\{}\{}\{}", node, object, counter))
        }
    }

    /// True if `name` starts with `\\` and has at least two more `\`
    /// separators after it.
    pub fn is_fully_qualified(name: &str) -> bool {
        name.strip_prefix(UNC_PREFIX)
            .map_or(false, |rest| rest.matches('\\').count() >= 2)
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CounterPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CounterPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single counter reading as reported by the remote side.
///
/// The value stays in its wire form until something needs the number;
/// see [`CounterSample::parse_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSample {
    /// Fully-qualified counter name.
    pub name: CounterPath,

    /// String-encoded numeric value.
    pub value: String,

    /// Collection status flag (`CStatus` on the wire).
    pub status: String,
}

impl CounterSample {
    /// Create a new sample.
    pub fn new(
        name: impl Into<CounterPath>,
        value: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            status: status.into(),
        }
    }

    /// Parse the value as a finite `f64`.
    ///
    /// Returns `None` for anything that is not a finite number, including
    /// `NaN` and `inf`, which would otherwise compare false against every
    /// threshold.
    pub fn parse_value(&self) -> Option<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_synthesizes_path() {
        let path = CounterPath::qualify("10.0.0.1", "Memory", "Foo");
        assert_eq!(path.as_str(), r"\\10.0.0.1\Memory\Foo");
    }

    #[test]
    fn test_qualify_keeps_instance_suffix() {
        let path = CounterPath::qualify("cucm1", "Processor(_Total)", "% CPU Time");
        assert_eq!(path.as_str(), r"\\cucm1\Processor(_Total)\% CPU Time");
    }

    #[test]
    fn test_qualify_passes_through_qualified_name() {
        let name = r"\\10.0.0.2\Memory\UsedMB";
        let path = CounterPath::qualify("10.0.0.1", "Memory", name);
        assert_eq!(path.as_str(), name);
    }

    #[test]
    fn test_is_fully_qualified() {
        assert!(CounterPath::is_fully_qualified(r"\\a\b\c"));
        assert!(CounterPath::is_fully_qualified(r"\\\\"));
        assert!(!CounterPath::is_fully_qualified(r"\\a\b"));
        assert!(!CounterPath::is_fully_qualified(r"\a\b\c"));
        assert!(!CounterPath::is_fully_qualified("UsedMB"));
        assert!(!CounterPath::is_fully_qualified(""));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(CounterSample::new("x", "512", "1").parse_value(), Some(512.0));
        assert_eq!(CounterSample::new("x", " 0.25 ", "1").parse_value(), Some(0.25));
        assert_eq!(CounterSample::new("x", "-3", "1").parse_value(), Some(-3.0));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(CounterSample::new("x", "", "1").parse_value(), None);
        assert_eq!(CounterSample::new("x", "12MB", "1").parse_value(), None);
        assert_eq!(CounterSample::new("x", "NaN", "1").parse_value(), None);
        assert_eq!(CounterSample::new("x", "inf", "1").parse_value(), None);
    }

    #[test]
    fn test_display_matches_as_str() {
        let path = CounterPath::new(r"\\n\o\c");
        assert_eq!(path.to_string(), path.as_str());
    }
}
