//! Export orchestration
//!
//! This module provides the core export logic for candex, including:
//! - Page-by-page retrieval of the upstream listing
//! - CSV encoding of flattened rows
//! - The pipeline tying both to an output sink
//! - Summary and reporting

pub mod csv;
pub mod pipeline;
pub mod retriever;
pub mod summary;

pub use csv::{CsvEncoder, COLUMNS};
pub use pipeline::ExportPipeline;
pub use retriever::{PaginatedRetriever, RetrieverState};
pub use summary::ExportSummary;
