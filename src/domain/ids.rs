//! Resource identifier types
//!
//! Upstream resources are addressed by an `(id, type)` pair. Only two kinds take
//! part in the export; everything else the upstream returns is carried opaquely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream `type` discriminator for candidate resources
pub const CANDIDATES_TYPE: &str = "candidates";

/// Upstream `type` discriminator for job application resources
pub const JOB_APPLICATIONS_TYPE: &str = "job-applications";

/// Kind of node in the upstream resource graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// The exported entity (a candidate)
    Primary,
    /// A dependent entity referenced by a primary (a job application)
    Related,
}

impl ResourceKind {
    /// The upstream `type` string for this kind
    pub fn as_type_str(&self) -> &'static str {
        match self {
            ResourceKind::Primary => CANDIDATES_TYPE,
            ResourceKind::Related => JOB_APPLICATIONS_TYPE,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_type_str())
    }
}

/// Reference to a node in the upstream resource graph
///
/// Equality is by value over `(id, kind)`.
///
/// # Examples
///
/// ```
/// use candex::domain::ids::{ResourceKind, ResourceRef};
///
/// let a = ResourceRef::related("app-1");
/// let b = ResourceRef::new("app-1", ResourceKind::Related);
/// assert_eq!(a, b);
/// assert_ne!(a, ResourceRef::new("app-1", ResourceKind::Primary));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    id: String,
    kind: ResourceKind,
}

impl ResourceRef {
    /// Creates a new reference
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Reference to a related (job application) resource
    pub fn related(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Related)
    }

    /// Returns the id as a string slice
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resource kind
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}
