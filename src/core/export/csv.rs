//! CSV encoding of export rows
//!
//! A field is quoted only when it contains a comma, a double quote or a
//! newline; embedded quotes are doubled. Missing values are empty fields.

use crate::domain::ExportRow;

/// Output columns, in order
pub const COLUMNS: [&str; 6] = [
    "candidate_id",
    "first_name",
    "last_name",
    "email",
    "job_application_id",
    "job_application_created_at",
];

/// Stateless row encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvEncoder;

impl CsvEncoder {
    /// Creates an encoder
    pub fn new() -> Self {
        Self
    }

    /// Header line, newline terminated
    pub fn header_row(&self) -> String {
        let mut out = COLUMNS.join(",");
        out.push('\n');
        out
    }

    /// Encode a batch; each row ends with `\n` and an empty batch is `""`
    ///
    /// ```
    /// use candex::core::export::CsvEncoder;
    /// use candex::domain::ExportRow;
    ///
    /// let row = ExportRow {
    ///     candidate_id: "1".to_string(),
    ///     first_name: Some("Jan,Jr".to_string()),
    ///     last_name: None,
    ///     email: None,
    ///     job_application_id: None,
    ///     job_application_created_at: None,
    /// };
    /// assert_eq!(CsvEncoder::new().encode(&[row]), "1,\"Jan,Jr\",,,,\n");
    /// ```
    pub fn encode(&self, rows: &[ExportRow]) -> String {
        let mut out = String::new();
        for row in rows {
            for (i, field) in row.fields().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if let Some(value) = field {
                    push_field(&mut out, value);
                }
            }
            out.push('\n');
        }
        out
    }
}

fn push_field(out: &mut String, value: &str) {
    if value.contains([',', '"', '\n']) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}
