//! Domain models and types for candex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Resource references** ([`ResourceRef`], [`ResourceKind`])
//! - **Resource graph models** ([`Candidate`], [`JobApplication`], [`OpaqueResource`])
//! - **Output models** ([`ExportRow`], [`Page`])
//! - **Error types** ([`CandexError`], [`TransportError`], [`SchemaError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CandexError>`]:
//!
//! ```rust
//! use candex::domain::{CandexError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = candex::config::load_config("candex.toml")?;
//!     Ok(())
//! }
//! ```

pub mod candidate;
pub mod context;
pub mod errors;
pub mod ids;
pub mod result;
pub mod row;

pub use candidate::{Candidate, JobApplication, OpaqueResource};
pub use errors::{CandexError, SchemaError, SchemaIssue, TransportError};
pub use ids::{ResourceKind, ResourceRef};
pub use result::Result;
pub use row::{ExportRow, Page};
