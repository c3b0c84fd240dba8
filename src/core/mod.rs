//! Core export logic for candex.
//!
//! # Modules
//!
//! - [`cancel`] - Cooperative cancellation shared by every suspension point
//! - [`retry`] - Retry policy and the retrying single-page fetch
//! - [`graph`] - Validation and flattening of one page of the resource graph
//! - [`export`] - Pagination, CSV encoding and the export pipeline
//!
//! # Export Workflow
//!
//! 1. **Fetch**: request the next page, retrying transient upstream failures
//! 2. **Validate**: check the page against the expected resource graph
//! 3. **Normalize**: one row per candidate and job application pair
//! 4. **Encode & write**: CSV for the page, flushed before the next fetch
//! 5. **Report**: export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use candex::adapters::upstream::{PageRequest, TeamtailorClient};
//! use candex::config::load_config;
//! use candex::core::export::ExportPipeline;
//! use candex::core::retry::{RetryPolicy, RetryingFetcher};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("candex.toml")?;
//!
//! // Create shutdown signal
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let client = Arc::new(TeamtailorClient::new(&config.upstream)?);
//! let fetcher = RetryingFetcher::new(client, RetryPolicy::from_config(&config.upstream.retry));
//! let first = PageRequest::first_page(
//!     config.upstream.candidates_path.clone(),
//!     &config.upstream.include,
//!     config.upstream.page_size,
//! );
//!
//! let mut stdout = tokio::io::stdout();
//! let summary = ExportPipeline::new(fetcher, first, shutdown_rx.into())
//!     .write_to(&mut stdout)
//!     .await?;
//!
//! println!("Rows: {}", summary.rows);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod export;
pub mod graph;
pub mod retry;
