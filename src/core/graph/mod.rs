//! Resource graph handling
//!
//! - [`parser`] - validates a raw page into a [`ValidatedPage`]
//! - [`normalizer`] - flattens a [`ValidatedPage`] into export rows

pub mod normalizer;
pub mod parser;

pub use normalizer::normalize;
pub use parser::{parse, ValidatedPage};
