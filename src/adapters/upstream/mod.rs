//! Upstream candidates API integration
//!
//! - [`source`] - the [`CandidateSource`] transport seam and request/response types
//! - [`client`] - [`TeamtailorClient`], the reqwest implementation
//! - [`models`] - JSON:API wire shapes consumed by the resource graph parser

pub mod client;
pub mod models;
pub mod source;

pub use client::TeamtailorClient;
pub use source::{CandidateSource, PageRequest, UpstreamResponse};
