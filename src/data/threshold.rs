//! Nagios threshold ranges.
//!
//! Follows the "Threshold and ranges" section of the Nagios plugin
//! development guidelines. A range is parsed once into a [`ThresholdRange`]
//! and evaluated against counter values; parsing never fails; anything that
//! cannot be read becomes a range that always alerts.

use std::fmt;

use tracing::warn;

use super::Status;

/// A parsed threshold range. `alerts` is true when the value lies outside
/// the range, except for [`ThresholdRange::Inside`], which alerts inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRange {
    /// `N`: alert if `value < 0` or `value > N`.
    Upper(f64),
    /// `N:`: alert if `value < N`.
    AtLeast(f64),
    /// `~:N`: alert if `value > N`.
    AtMost(f64),
    /// `N:M`: alert if `value < N` or `value > M`.
    Outside(f64, f64),
    /// `@N:M`: alert if `N <= value <= M`.
    Inside(f64, f64),
    /// Unrecognized syntax: always alert.
    Malformed,
}

impl ThresholdRange {
    /// Parse a range expression.
    ///
    /// Forms are tried in this order: plain number, trailing colon, leading
    /// `~`, two numbers, leading `@`. Unparsable numbers inside the plain,
    /// trailing-colon, `~` and `@` forms are read as zero.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        let parts: Vec<&str> = spec.split(':').collect();

        if parts.len() == 1 {
            ThresholdRange::Upper(bound(spec, spec))
        } else if spec.ends_with(':') {
            ThresholdRange::AtLeast(bound(spec, parts[0]))
        } else if spec.starts_with('~') {
            ThresholdRange::AtMost(bound(spec, parts[1]))
        } else if let (2, Ok(low), Ok(high)) =
            (parts.len(), parts[0].parse::<f64>(), parts[1].parse::<f64>())
        {
            ThresholdRange::Outside(low, high)
        } else if let Some(low) = parts[0].strip_prefix('@') {
            ThresholdRange::Inside(bound(spec, low), bound(spec, parts[1]))
        } else {
            warn!(range = spec, "unrecognized threshold range, always alerting");
            ThresholdRange::Malformed
        }
    }

    /// True if `value` should raise an alert.
    pub fn alerts(&self, value: f64) -> bool {
        match *self {
            ThresholdRange::Upper(n) => value < 0.0 || value > n,
            ThresholdRange::AtLeast(n) => value < n,
            ThresholdRange::AtMost(n) => value > n,
            ThresholdRange::Outside(low, high) => value < low || value > high,
            ThresholdRange::Inside(low, high) => low <= value && value <= high,
            ThresholdRange::Malformed => true,
        }
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdRange::Upper(n) => write!(f, "{}", n),
            ThresholdRange::AtLeast(n) => write!(f, "{}:", n),
            ThresholdRange::AtMost(n) => write!(f, "~:{}", n),
            ThresholdRange::Outside(low, high) => write!(f, "{}:{}", low, high),
            ThresholdRange::Inside(low, high) => write!(f, "@{}:{}", low, high),
            ThresholdRange::Malformed => f.write_str("<malformed>"),
        }
    }
}

fn bound(spec: &str, component: &str) -> f64 {
    component.trim().parse().unwrap_or_else(|_| {
        warn!(
            range = spec,
            component, "threshold component is not a number, using 0"
        );
        0.0
    })
}

/// Evaluate a range expression against a value. True means alert.
pub fn evaluate(value: f64, range: &str) -> bool {
    ThresholdRange::parse(range).alerts(value)
}

/// Warning and critical ranges for one check, with the text they were
/// parsed from (the text goes into performance data verbatim).
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub warning: ThresholdRange,
    pub critical: ThresholdRange,
    pub warning_spec: String,
    pub critical_spec: String,
}

impl Thresholds {
    pub fn parse(warning: &str, critical: &str) -> Self {
        Self {
            warning: ThresholdRange::parse(warning),
            critical: ThresholdRange::parse(critical),
            warning_spec: warning.to_string(),
            critical_spec: critical.to_string(),
        }
    }

    /// Critical wins over warning; neither firing is OK.
    pub fn classify(&self, value: f64) -> Status {
        if self.critical.alerts(value) {
            Status::Critical
        } else if self.warning.alerts(value) {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::parse("1", "1")
    }
}

/// Classify `value` against textual warning and critical ranges.
pub fn classify(value: f64, warning: &str, critical: &str) -> Status {
    Thresholds::parse(warning, critical).classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(ThresholdRange::parse("10"), ThresholdRange::Upper(10.0));
        assert_eq!(ThresholdRange::parse("10:"), ThresholdRange::AtLeast(10.0));
        assert_eq!(ThresholdRange::parse("~:10"), ThresholdRange::AtMost(10.0));
        assert_eq!(
            ThresholdRange::parse("10:20"),
            ThresholdRange::Outside(10.0, 20.0)
        );
        assert_eq!(
            ThresholdRange::parse("@10:20"),
            ThresholdRange::Inside(10.0, 20.0)
        );
        assert_eq!(
            ThresholdRange::parse("-5:5"),
            ThresholdRange::Outside(-5.0, 5.0)
        );
        assert_eq!(ThresholdRange::parse(" 7.5 "), ThresholdRange::Upper(7.5));
    }

    #[test]
    fn test_plain_upper() {
        let r = ThresholdRange::parse("10");
        assert!(r.alerts(-0.001));
        assert!(!r.alerts(0.0));
        assert!(!r.alerts(10.0));
        assert!(r.alerts(10.0001));
    }

    #[test]
    fn test_at_least() {
        let r = ThresholdRange::parse("10:");
        assert!(r.alerts(9.999));
        assert!(!r.alerts(10.0));
        assert!(!r.alerts(1e9));
    }

    #[test]
    fn test_at_most() {
        let r = ThresholdRange::parse("~:10");
        assert!(!r.alerts(-1e9));
        assert!(!r.alerts(10.0));
        assert!(r.alerts(10.0001));
    }

    #[test]
    fn test_outside_bounds_are_closed() {
        let r = ThresholdRange::parse("10:20");
        assert!(r.alerts(9.999));
        assert!(!r.alerts(10.0));
        assert!(!r.alerts(15.0));
        assert!(!r.alerts(20.0));
        assert!(r.alerts(20.0001));
    }

    #[test]
    fn test_inside_is_inverted() {
        let r = ThresholdRange::parse("@10:20");
        assert!(r.alerts(15.0));
        assert!(r.alerts(10.0));
        assert!(r.alerts(20.0));
        assert!(!r.alerts(9.999));
        assert!(!r.alerts(25.0));
    }

    #[test]
    fn test_malformed_always_alerts() {
        for spec in ["10:abc", "abc:10", "x:y", "1:2:3"] {
            let r = ThresholdRange::parse(spec);
            assert_eq!(r, ThresholdRange::Malformed, "{}", spec);
            assert!(r.alerts(0.0));
            assert!(r.alerts(-100.0));
            assert!(r.alerts(1e12));
        }
    }

    #[test]
    fn test_bad_components_read_as_zero() {
        assert_eq!(ThresholdRange::parse("abc"), ThresholdRange::Upper(0.0));
        assert_eq!(ThresholdRange::parse(""), ThresholdRange::Upper(0.0));
        assert_eq!(ThresholdRange::parse("x:"), ThresholdRange::AtLeast(0.0));
        assert_eq!(ThresholdRange::parse("~:x"), ThresholdRange::AtMost(0.0));
        assert_eq!(
            ThresholdRange::parse("@x:20"),
            ThresholdRange::Inside(0.0, 20.0)
        );
        // "~:" is caught by the trailing-colon form first.
        assert_eq!(ThresholdRange::parse("~:"), ThresholdRange::AtLeast(0.0));
    }

    #[test]
    fn test_evaluate() {
        assert!(evaluate(25.0, "20"));
        assert!(!evaluate(15.0, "20"));
        assert!(evaluate(15.0, "@10:20"));
        assert!(!evaluate(25.0, "@10:20"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(25.0, "10", "20"), Status::Critical);
        assert_eq!(classify(15.0, "10", "20"), Status::Warning);
        assert_eq!(classify(5.0, "10", "20"), Status::Ok);
    }

    #[test]
    fn test_classify_critical_takes_precedence() {
        let t = Thresholds::parse("600", "500");
        assert_eq!(t.classify(512.0), Status::Critical);
        assert_eq!(t.classify(-1.0), Status::Critical);
    }

    #[test]
    fn test_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.warning_spec, "1");
        assert_eq!(t.classify(1.0), Status::Ok);
        assert_eq!(t.classify(2.0), Status::Critical);
    }

    #[test]
    fn test_display() {
        assert_eq!(ThresholdRange::parse("10:20").to_string(), "10:20");
        assert_eq!(ThresholdRange::parse("@1:2").to_string(), "@1:2");
        assert_eq!(ThresholdRange::parse("~:5").to_string(), "~:5");
    }
}
