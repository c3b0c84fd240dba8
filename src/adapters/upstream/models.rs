//! Upstream JSON:API models
//!
//! Wire-level shapes of the candidates listing. These are separate from the
//! domain models; the parser converts them after validation.

use serde::Deserialize;

/// `type` discriminator accepted for entries of `data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CandidateType {
    #[serde(rename = "candidates")]
    Candidates,
}

/// `type` discriminator accepted for job application entries and references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum JobApplicationType {
    #[serde(rename = "job-applications")]
    JobApplications,
}

/// Candidate resource as sent by the upstream
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    pub id: String,

    #[serde(rename = "type")]
    pub resource_type: CandidateType,

    pub attributes: RawCandidateAttributes,

    #[serde(default)]
    pub relationships: Option<RawCandidateRelationships>,
}

/// Candidate attributes (dash-cased on the wire)
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidateAttributes {
    #[serde(rename = "first-name", default)]
    pub first_name: Option<String>,

    #[serde(rename = "last-name", default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Candidate relationships block
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidateRelationships {
    #[serde(rename = "job-applications", default)]
    pub job_applications: Option<RawRelationship>,
}

/// A to-many relationship
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationship {
    #[serde(default)]
    pub data: Option<Vec<RawRelationshipData>>,
}

/// Resource identifier object inside a relationship
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelationshipData {
    pub id: String,

    #[serde(rename = "type")]
    pub resource_type: JobApplicationType,
}

/// Minimal shape every `included` entry must have
#[derive(Debug, Clone, Deserialize)]
pub struct RawIncludedHeader {
    pub id: String,

    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

/// Job application resource from `included`
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobApplication {
    pub id: String,

    #[serde(rename = "type")]
    pub resource_type: JobApplicationType,

    pub attributes: RawJobApplicationAttributes,
}

/// Job application attributes
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobApplicationAttributes {
    #[serde(rename = "created-at", default)]
    pub created_at: Option<String>,
}

/// Top-level `links` object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinks {
    #[serde(default)]
    pub next: Option<String>,
}
