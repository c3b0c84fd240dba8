//! Resource graph validation
//!
//! Turns one raw upstream page into a [`ValidatedPage`]. Every problem on the
//! page is collected before failing so the error lists them all.
//!
//! Accepted shape:
//! - `data`: required array of candidates. Unknown fields are ignored.
//! - `included`: optional array; `null` is treated as empty. Entries typed
//!   `job-applications` must match that shape, anything else passes through
//!   as an [`OpaqueResource`].
//! - `links.next`: optional string or `null`.

use crate::adapters::upstream::models::{
    RawCandidate, RawIncludedHeader, RawJobApplication, RawLinks,
};
use crate::domain::ids::{ResourceRef, JOB_APPLICATIONS_TYPE};
use crate::domain::{Candidate, JobApplication, OpaqueResource, SchemaError, SchemaIssue};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One page of the resource graph after validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedPage {
    /// Primary resources in upstream order
    pub candidates: Vec<Candidate>,

    /// Related resources from the side-table, in upstream order
    pub job_applications: Vec<JobApplication>,

    /// Side-table entries of unrecognized types
    pub opaque: Vec<OpaqueResource>,

    /// Continuation pointer; `None` on the last page
    pub next: Option<String>,
}

/// Validate a raw page
///
/// # Errors
///
/// Returns a [`SchemaError`] listing every structural issue found.
///
/// # Example
///
/// ```
/// use candex::core::graph::parse;
/// use serde_json::json;
///
/// let page = parse(&json!({
///     "data": [{"id": "1", "type": "candidates", "attributes": {"first-name": "Jan"}}],
///     "links": {"next": null}
/// }))
/// .unwrap();
/// assert_eq!(page.candidates.len(), 1);
/// assert!(page.next.is_none());
/// ```
pub fn parse(payload: &Value) -> Result<ValidatedPage, SchemaError> {
    let mut issues = Vec::new();
    let mut page = ValidatedPage::default();

    let Some(root) = payload.as_object() else {
        return Err(SchemaError::new(vec![SchemaIssue::new(
            "$",
            format!("expected an object, got {}", kind_of(payload)),
        )]));
    };

    match root.get("data") {
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                if let Some(raw) = decode::<RawCandidate>(entry, format!("data[{i}]"), &mut issues)
                {
                    page.candidates.push(into_candidate(raw));
                }
            }
        }
        Some(other) => issues.push(SchemaIssue::new(
            "data",
            format!("expected an array, got {}", kind_of(other)),
        )),
        None => issues.push(SchemaIssue::new("data", "required field is missing")),
    }

    match root.get("included") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                let path = format!("included[{i}]");
                let Some(header) = decode::<RawIncludedHeader>(entry, path.clone(), &mut issues)
                else {
                    continue;
                };

                if header.resource_type == JOB_APPLICATIONS_TYPE {
                    if let Some(raw) = decode::<RawJobApplication>(entry, path, &mut issues) {
                        page.job_applications
                            .push(JobApplication::new(raw.id, raw.attributes.created_at));
                    }
                } else {
                    page.opaque.push(OpaqueResource {
                        id: header.id,
                        resource_type: header.resource_type,
                        attributes: header.attributes,
                    });
                }
            }
        }
        Some(other) => issues.push(SchemaIssue::new(
            "included",
            format!("expected an array, got {}", kind_of(other)),
        )),
    }

    match root.get("links") {
        None => {}
        Some(value @ Value::Object(_)) => {
            if let Some(links) = decode::<RawLinks>(value, "links".to_string(), &mut issues) {
                page.next = links.next;
            }
        }
        Some(other) => issues.push(SchemaIssue::new(
            "links",
            format!("expected an object, got {}", kind_of(other)),
        )),
    }

    if issues.is_empty() {
        Ok(page)
    } else {
        Err(SchemaError::new(issues))
    }
}

fn decode<T: DeserializeOwned>(
    value: &Value,
    path: String,
    issues: &mut Vec<SchemaIssue>,
) -> Option<T> {
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            issues.push(SchemaIssue::new(path, e.to_string()));
            None
        }
    }
}

fn into_candidate(raw: RawCandidate) -> Candidate {
    let related_ids = raw
        .relationships
        .and_then(|r| r.job_applications)
        .and_then(|r| r.data)
        .unwrap_or_default()
        .into_iter()
        .map(|data| ResourceRef::related(data.id))
        .collect();

    Candidate {
        id: raw.id,
        first_name: raw.attributes.first_name,
        last_name: raw.attributes.last_name,
        email: raw.attributes.email,
        related_ids,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(id: &str, apps: &[&str]) -> Value {
        json!({
            "id": id,
            "type": "candidates",
            "attributes": {"first-name": "Jan", "last-name": "Kowalski", "email": "jan@example.com"},
            "relationships": {
                "job-applications": {
                    "data": apps.iter().map(|a| json!({"id": a, "type": "job-applications"})).collect::<Vec<_>>()
                }
            }
        })
    }

    #[test]
    fn test_parse_full_page() {
        let page = parse(&json!({
            "data": [candidate("1", &["a1", "a2"])],
            "included": [
                {"id": "a1", "type": "job-applications", "attributes": {"created-at": "2024-01-15"}},
                {"id": "a2", "type": "job-applications", "attributes": {}}
            ],
            "links": {"next": "https://api.example.com/v1/candidates?page=2"}
        }))
        .unwrap();

        assert_eq!(page.candidates.len(), 1);
        assert_eq!(
            page.candidates[0].related_ids,
            vec![ResourceRef::related("a1"), ResourceRef::related("a2")]
        );
        assert_eq!(
            page.job_applications,
            vec![
                JobApplication::new("a1", Some("2024-01-15".to_string())),
                JobApplication::new("a2", None),
            ]
        );
        assert_eq!(
            page.next.as_deref(),
            Some("https://api.example.com/v1/candidates?page=2")
        );
    }

    #[test]
    fn test_optional_sections_may_be_absent() {
        let page = parse(&json!({"data": []})).unwrap();
        assert!(page.candidates.is_empty());
        assert!(page.job_applications.is_empty());
        assert!(page.next.is_none());

        let page = parse(&json!({"data": [], "included": null, "links": {}})).unwrap();
        assert!(page.job_applications.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_candidate_without_relationships() {
        let page = parse(&json!({
            "data": [{"id": "7", "type": "candidates", "attributes": {"email": null}}]
        }))
        .unwrap();
        assert!(page.candidates[0].related_ids.is_empty());
        assert!(page.candidates[0].email.is_none());
    }

    #[test]
    fn test_unknown_included_types_pass_through() {
        let page = parse(&json!({
            "data": [],
            "included": [
                {"id": "u1", "type": "users", "attributes": {"name": "Recruiter"}},
                {"id": "l1", "type": "locations"}
            ]
        }))
        .unwrap();

        assert!(page.job_applications.is_empty());
        assert_eq!(page.opaque.len(), 2);
        assert_eq!(page.opaque[0].resource_type, "users");
        assert!(page.opaque[1].attributes.is_none());
    }

    #[test]
    fn test_missing_data_is_an_issue() {
        let err = parse(&json!({"included": []})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "data");
    }

    #[test]
    fn test_non_object_payload() {
        let err = parse(&Value::String("<html>oops</html>".to_string())).unwrap_err();
        assert_eq!(err.issues[0].path, "$");
        assert!(err.issues[0].message.contains("string"));
    }

    #[test]
    fn test_collects_every_issue() {
        let err = parse(&json!({
            "data": [
                {"id": 1, "type": "candidates", "attributes": {}},
                candidate("2", &[]),
                {"id": "3", "type": "candidates"}
            ],
            "included": [
                {"id": "a1", "type": "job-applications", "attributes": {"created-at": 17}}
            ],
            "links": {"next": 5}
        }))
        .unwrap_err();

        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["data[0]", "data[2]", "included[0]", "links"]);
    }

    #[test]
    fn test_wrong_attribute_type() {
        let err = parse(&json!({
            "data": [{"id": "1", "type": "candidates", "attributes": {"first-name": 42}}]
        }))
        .unwrap_err();
        assert_eq!(err.issues[0].path, "data[0]");
    }

    #[test]
    fn test_relationship_with_wrong_type_rejected() {
        let err = parse(&json!({
            "data": [{
                "id": "1",
                "type": "candidates",
                "attributes": {},
                "relationships": {"job-applications": {"data": [{"id": "x", "type": "users"}]}}
            }]
        }))
        .unwrap_err();
        assert_eq!(err.issues.len(), 1);
    }
}
