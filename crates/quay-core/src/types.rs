//! Identifier newtypes for workflows and versions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a workflow, unique within the store's namespace.
///
/// No explicit workflow object is persisted; a workflow exists as long as any
/// object lives under its key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowName(String);

impl WorkflowName {
    /// Create a new workflow name from a string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is usable as a key prefix segment.
    ///
    /// Empty names and names containing `/` would collide with the key
    /// layout, so they are rejected before any store operation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.contains('/')
    }
}

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkflowName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkflowName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a single immutable version of a workflow.
///
/// Either a fixed-width timestamp produced by [`crate::timestamp_version`] or
/// an opaque caller-supplied token such as `v1.0.0`. The store only relies on
/// lexicographic ordering for listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionId(String);

impl VersionId {
    /// Create a new version identifier from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is usable as a key prefix segment.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.contains('/')
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VersionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VersionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_name_validity() {
        assert!(WorkflowName::new("orders").is_valid());
        assert!(WorkflowName::new("order-service_2").is_valid());
        assert!(!WorkflowName::new("").is_valid());
        assert!(!WorkflowName::new("a/b").is_valid());
    }

    #[test]
    fn version_id_sorts_lexicographically() {
        let mut versions = vec![
            VersionId::new("20240101-000000"),
            VersionId::new("20240301-000000"),
            VersionId::new("20240201-000000"),
        ];
        versions.sort();
        versions.reverse();
        assert_eq!(versions[0].as_str(), "20240301-000000");
        assert_eq!(versions[2].as_str(), "20240101-000000");
    }
}
