// candex - Candidate CSV export tool
// Copyright (c) 2025 candex Contributors
// Licensed under the MIT License

//! # candex - Candidate CSV export
//!
//! candex exports every candidate from a paginated JSON:API recruiting API
//! (Teamtailor) into a flat CSV stream: one row per candidate and job
//! application pair.
//!
//! ## Overview
//!
//! This library provides:
//! - **Fetching** pages with retries, exponential backoff and `Retry-After` handling
//! - **Validating** each page against the expected resource graph
//! - **Flattening** candidates and their job applications into rows
//! - **Streaming** CSV to any async sink, one page at a time, with cancellation
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export logic (retry, graph, export, cancellation)
//! - [`adapters`] - Upstream API integration
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use candex::adapters::upstream::{PageRequest, TeamtailorClient};
//! use candex::config::load_config;
//! use candex::core::cancel::Cancellation;
//! use candex::core::export::ExportPipeline;
//! use candex::core::retry::{RetryPolicy, RetryingFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("candex.toml")?;
//!
//!     let client = Arc::new(TeamtailorClient::new(&config.upstream)?);
//!     let fetcher = RetryingFetcher::new(client, RetryPolicy::from_config(&config.upstream.retry));
//!     let first = PageRequest::first_page("/candidates", "job-applications", 30);
//!
//!     let mut out = tokio::fs::File::create("candidates.csv").await?;
//!     let summary = ExportPipeline::new(fetcher, first, Cancellation::never())
//!         .write_to(&mut out)
//!         .await?;
//!
//!     println!("Exported {} rows", summary.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::CandexError`]. Each kind aborts the export
//! and maps to an HTTP-style status via [`domain::CandexError::http_status`]:
//!
//! ```rust
//! use candex::domain::{CandexError, SchemaError, SchemaIssue};
//!
//! let err = CandexError::from(SchemaError::new(vec![SchemaIssue::new("data", "missing")]));
//! assert_eq!(err.http_status(), 400);
//! assert_eq!(err.status_class(), "fail");
//! ```
//!
//! ## Logging
//!
//! candex uses structured logging with the `tracing` crate. Every export runs
//! inside an `export` span carrying its `export_id`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
