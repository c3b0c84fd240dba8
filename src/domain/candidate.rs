//! Resource graph models
//!
//! Validated, typed views of one upstream page: candidates (primary resources),
//! job applications (related resources) and side-table entries of kinds the
//! export does not know about.

use super::ids::ResourceRef;
use serde::{Deserialize, Serialize};

/// A candidate as returned by the upstream, after validation
///
/// `related_ids` keeps upstream order; it decides the order of output rows.
///
/// # Examples
///
/// ```
/// use candex::domain::candidate::Candidate;
/// use candex::domain::ids::ResourceRef;
///
/// let candidate = Candidate::new("42")
///     .with_first_name("Jan")
///     .with_related(ResourceRef::related("app-1"));
/// assert_eq!(candidate.related_ids.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub related_ids: Vec<ResourceRef>,
}

impl Candidate {
    /// Creates a candidate with no attributes and no relationships
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            email: None,
            related_ids: Vec::new(),
        }
    }

    /// Sets the first name
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Appends a relationship reference
    pub fn with_related(mut self, reference: ResourceRef) -> Self {
        self.related_ids.push(reference);
        self
    }
}

/// A job application from the `included` side-table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: String,
    pub created_at: Option<String>,
}

impl JobApplication {
    /// Creates a job application
    pub fn new(id: impl Into<String>, created_at: Option<String>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}

/// A side-table entry whose `type` is not one the export understands
///
/// Kept so the page still describes everything the upstream sent; it never
/// influences normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueResource {
    pub id: String,
    pub resource_type: String,
    pub attributes: Option<serde_json::Value>,
}
