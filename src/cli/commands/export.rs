//! Export command implementation
//!
//! This module implements the `export` command, which writes every candidate
//! of the upstream listing as CSV to a file or stdout.

use crate::adapters::upstream::{PageRequest, TeamtailorClient};
use crate::config::load_config;
use crate::core::cancel::Cancellation;
use crate::core::export::{ExportPipeline, ExportSummary};
use crate::core::retry::{RetryPolicy, RetryingFetcher};
use crate::domain::CandexError;
use crate::{log_error_with_context, log_export_complete, log_export_start};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::watch;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for upstream payloads that failed validation
pub const EXIT_SCHEMA: i32 = 3;
/// Exit code for upstream failures
pub const EXIT_UPSTREAM: i32 = 4;
/// Exit code for any other failure
pub const EXIT_FATAL: i32 = 5;
/// Exit code for an interrupted export (SIGINT convention)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Output file, or "-" for stdout (overrides export.output)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Page size requested from the upstream (overrides upstream.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Retries per page after the first attempt (overrides upstream.retry.max_retries)
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        // Apply CLI overrides
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output from CLI");
            config.export.output = output.clone();
        }
        if let Some(page_size) = self.page_size {
            tracing::info!(page_size, "Overriding page size from CLI");
            config.upstream.page_size = page_size;
        }
        if let Some(max_retries) = self.max_retries {
            tracing::info!(max_retries, "Overriding max retries from CLI");
            config.upstream.retry.max_retries = max_retries;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let client = match TeamtailorClient::new(&config.upstream) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log_error_with_context!(&e, "Failed to create upstream client");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let mut sink: Box<dyn AsyncWrite + Unpin + Send> = if config.export.writes_to_stdout() {
            Box::new(tokio::io::stdout())
        } else {
            match tokio::fs::File::create(&config.export.output).await {
                Ok(file) => Box::new(BufWriter::new(file)),
                Err(e) => {
                    tracing::error!(error = %e, output = %config.export.output, "Failed to create output file");
                    eprintln!("❌ Failed to create {}: {e}", config.export.output);
                    return Ok(EXIT_FATAL);
                }
            }
        };

        let fetcher = RetryingFetcher::new(client, RetryPolicy::from_config(&config.upstream.retry));
        let first = PageRequest::first_page(
            config.upstream.candidates_path.clone(),
            &config.upstream.include,
            config.upstream.page_size,
        );
        let cancel = Cancellation::new(shutdown_signal);
        let pipeline = ExportPipeline::new(fetcher, first, cancel.clone());

        log_export_start!(config.upstream.base_url, config.export.output);
        tracing::debug!(export_id = %pipeline.export_id(), "Export pipeline created");

        let shutdown_timeout = Duration::from_secs(config.export.shutdown_timeout_secs);

        // The timeout only applies once a shutdown signal is received
        let result = {
            let export = pipeline.write_to(&mut sink);
            tokio::pin!(export);

            tokio::select! {
                result = &mut export => result,
                _ = cancel.cancelled() => {
                    tracing::info!(
                        timeout_secs = shutdown_timeout.as_secs(),
                        "Shutdown requested, waiting for export to stop"
                    );
                    match tokio::time::timeout(shutdown_timeout, &mut export).await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::warn!("Export did not stop within the shutdown timeout");
                            eprintln!("⚠️  Export did not stop in time; output is incomplete");
                            return Ok(EXIT_INTERRUPTED);
                        }
                    }
                }
            }
        };

        match result {
            Ok(summary) => {
                if let Err(e) = sink.shutdown().await {
                    tracing::warn!(error = %e, "Failed to close output");
                }
                summary.log_summary();
                if summary.is_complete() {
                    log_export_complete!(summary.pages, summary.rows, summary.duration);
                }
                print_summary(&summary, &config.export.output);
                Ok(if summary.cancelled {
                    EXIT_INTERRUPTED
                } else {
                    0
                })
            }
            Err(e) => {
                // Flush what was written so the partial output is inspectable
                let _ = sink.flush().await;
                log_error_with_context!(&e, "Export failed");
                eprintln!(
                    "❌ Export failed ({} {}): {e}",
                    e.status_class(),
                    e.http_status()
                );
                eprintln!("   Any output already written is incomplete.");
                Ok(exit_code_for(&e))
            }
        }
    }
}

/// Process exit code for a failed export
pub fn exit_code_for(error: &CandexError) -> i32 {
    match error {
        CandexError::Configuration(_) => EXIT_CONFIG,
        CandexError::Schema(_) => EXIT_SCHEMA,
        CandexError::Upstream { .. } => EXIT_UPSTREAM,
        _ => EXIT_FATAL,
    }
}

// Stdout may be carrying the CSV, so the report goes to stderr
fn print_summary(summary: &ExportSummary, output: &str) {
    eprintln!();
    eprintln!("📊 Export Summary:");
    eprintln!("  Export ID: {}", summary.export_id);
    eprintln!("  Output: {output}");
    eprintln!("  Pages: {}", summary.pages);
    eprintln!("  Candidates: {}", summary.candidates);
    eprintln!("  Rows: {}", summary.rows);
    eprintln!("  Bytes: {}", summary.bytes_written);
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    eprintln!();

    if summary.cancelled {
        eprintln!("⚠️  Export interrupted. Output is incomplete.");
    } else {
        eprintln!("✅ Export completed successfully!");
    }
}
