//! Export summary and reporting

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Summary of one export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Correlation id, also recorded on the `export` span
    pub export_id: Uuid,

    /// Wall-clock start
    pub started_at: DateTime<Utc>,

    /// Pages fetched and written
    pub pages: usize,

    /// Candidates seen across all pages
    pub candidates: usize,

    /// CSV data rows written, header excluded
    pub rows: usize,

    /// Bytes handed to the sink, header included
    pub bytes_written: u64,

    /// Duration of the export
    pub duration: Duration,

    /// Whether the export stopped early because of cancellation
    pub cancelled: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(export_id: Uuid) -> Self {
        Self {
            export_id,
            started_at: Utc::now(),
            pages: 0,
            candidates: 0,
            rows: 0,
            bytes_written: 0,
            duration: Duration::ZERO,
            cancelled: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Account for one written page
    pub fn record_page(&mut self, rows: usize, bytes: usize) {
        self.pages += 1;
        self.rows += rows;
        self.bytes_written += bytes as u64;
    }

    /// Whether every page was written
    pub fn is_complete(&self) -> bool {
        !self.cancelled
    }

    /// Log the summary
    pub fn log_summary(&self) {
        if self.cancelled {
            tracing::warn!(
                export_id = %self.export_id,
                pages = self.pages,
                rows = self.rows,
                bytes_written = self.bytes_written,
                duration_ms = self.duration.as_millis() as u64,
                "Export cancelled; output is incomplete"
            );
            return;
        }

        tracing::info!(
            export_id = %self.export_id,
            started_at = %self.started_at.to_rfc3339(),
            pages = self.pages,
            candidates = self.candidates,
            rows = self.rows,
            bytes_written = self.bytes_written,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );
    }
}
