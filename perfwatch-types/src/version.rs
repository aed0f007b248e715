//! Schema versioning for persisted snapshots.

use core::fmt;

use crate::SCHEMA_VERSION;

/// Version stamp written alongside every cached snapshot.
///
/// Cache files outlive the binary that wrote them. A reader accepts any
/// file with its own major version and treats everything else as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    /// Bumped when an older reader can no longer understand the layout.
    pub major: u32,
    /// Bumped for additive changes.
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// The version this build writes.
    pub const fn current() -> Self {
        Self::new(SCHEMA_VERSION, 0)
    }

    /// True if a reader built with this crate can use data stamped `self`.
    pub fn is_compatible(&self) -> bool {
        self.major == Self::current().major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_compatible() {
        assert!(SchemaVersion::current().is_compatible());
        assert!(SchemaVersion::new(SCHEMA_VERSION, 7).is_compatible());
    }

    #[test]
    fn test_major_mismatch_is_incompatible() {
        assert!(!SchemaVersion::new(SCHEMA_VERSION + 1, 0).is_compatible());
        assert!(!SchemaVersion::new(0, 0).is_compatible());
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaVersion::new(1, 2).to_string(), "1.2");
    }
}
