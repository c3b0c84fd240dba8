//! Flattening of the resource graph into export rows

use super::parser::ValidatedPage;
use crate::domain::{ExportRow, JobApplication};
use std::collections::HashMap;

/// Flatten a validated page into rows
///
/// Each candidate yields one row per job application reference, in reference
/// order, or a single row with empty application fields when it has none. A
/// reference missing from the side-table still yields a row; only its
/// `created_at` is empty.
pub fn normalize(page: &ValidatedPage) -> Vec<ExportRow> {
    let side_table = side_table(&page.job_applications);
    let mut rows = Vec::with_capacity(page.candidates.len());

    for candidate in &page.candidates {
        let row = |job_application_id: Option<String>, created_at: Option<String>| ExportRow {
            candidate_id: candidate.id.clone(),
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            email: candidate.email.clone(),
            job_application_id,
            job_application_created_at: created_at,
        };

        if candidate.related_ids.is_empty() {
            rows.push(row(None, None));
            continue;
        }

        for reference in &candidate.related_ids {
            let created_at = side_table
                .get(reference.id())
                .and_then(|app| app.created_at.clone());
            rows.push(row(Some(reference.id().to_string()), created_at));
        }
    }

    rows
}

/// Job applications keyed by id; the first entry wins on duplicates
fn side_table(applications: &[JobApplication]) -> HashMap<&str, &JobApplication> {
    let mut table = HashMap::with_capacity(applications.len());
    for app in applications {
        table.entry(app.id.as_str()).or_insert(app);
    }
    table
}
