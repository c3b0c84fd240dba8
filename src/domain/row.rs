//! Output rows and pages

use serde::{Deserialize, Serialize};

/// One flat CSV row: a candidate paired with at most one job application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub candidate_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_application_id: Option<String>,
    pub job_application_created_at: Option<String>,
}

impl ExportRow {
    /// Field values in CSV column order
    pub fn fields(&self) -> [Option<&str>; 6] {
        [
            Some(self.candidate_id.as_str()),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
            self.job_application_id.as_deref(),
            self.job_application_created_at.as_deref(),
        ]
    }
}

/// Rows produced from one upstream page plus the pointer to the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<ExportRow>,
    /// Opaque continuation pointer; `None` ends pagination
    pub next_cursor: Option<String>,
}

impl Page {
    /// Whether this is the last page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}
