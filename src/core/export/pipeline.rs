//! Export pipeline
//!
//! Drives a [`PaginatedRetriever`] and writes each page as CSV before asking
//! for the next one, so at most one encoded batch is ever in memory.

use super::csv::CsvEncoder;
use super::retriever::PaginatedRetriever;
use super::summary::ExportSummary;
use crate::adapters::upstream::PageRequest;
use crate::core::cancel::Cancellation;
use crate::core::retry::RetryingFetcher;
use crate::domain::context::ResultExt;
use crate::domain::{CandexError, Result};
use futures::Stream;
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::Instrument;
use uuid::Uuid;

/// One export run
pub struct ExportPipeline {
    export_id: Uuid,
    retriever: PaginatedRetriever,
    encoder: CsvEncoder,
    cancel: Cancellation,
}

impl ExportPipeline {
    /// Pipeline starting at `first`
    pub fn new(fetcher: RetryingFetcher, first: PageRequest, cancel: Cancellation) -> Self {
        Self {
            export_id: Uuid::new_v4(),
            retriever: PaginatedRetriever::new(fetcher, first, cancel.clone()),
            encoder: CsvEncoder::new(),
            cancel,
        }
    }

    /// Correlation id of this run
    pub fn export_id(&self) -> Uuid {
        self.export_id
    }

    /// Write the whole export to `sink`
    ///
    /// The header goes out together with the first page. Cancellation, or the
    /// sink going away, ends the export early with `cancelled` set in the
    /// summary; whatever was already written stays written.
    ///
    /// # Errors
    ///
    /// Upstream, validation and sink write failures. Output written before the
    /// failure is left in place and must be treated as incomplete.
    pub async fn write_to<W>(self, sink: &mut W) -> Result<ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let span = tracing::info_span!("export", export_id = %self.export_id);
        self.run(sink).instrument(span).await
    }

    async fn run<W>(mut self, sink: &mut W) -> Result<ExportSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let started = Instant::now();
        let mut summary = ExportSummary::new(self.export_id);
        let mut header_pending = true;

        while let Some(page) = self.retriever.next_batch().await? {
            let mut chunk = String::new();
            if header_pending {
                chunk.push_str(&self.encoder.header_row());
            }
            chunk.push_str(&self.encoder.encode(&page.rows));

            if !write_chunk(sink, chunk.as_bytes(), &self.cancel).await? {
                summary.cancelled = true;
                break;
            }

            header_pending = false;
            summary.record_page(page.rows.len(), chunk.len());
        }

        summary.cancelled |= self.retriever.was_cancelled();
        summary.candidates = self.retriever.candidates_seen();
        Ok(summary.with_duration(started.elapsed()))
    }

    /// The export as a stream of CSV text chunks, one per page
    ///
    /// The header is prepended to the first chunk. Dropping the stream
    /// cancels the export, including any in-flight upstream request. Every
    /// step runs inside the same `export` span as [`write_to`](Self::write_to).
    pub fn into_stream(self) -> impl Stream<Item = Result<String>> {
        let encoder = self.encoder;
        let span = tracing::info_span!("export", export_id = %self.export_id);
        futures::stream::try_unfold(
            (self.retriever, true),
            move |(mut retriever, header_pending)| {
                async move {
                    let Some(page) = retriever.next_batch().await? else {
                        return Ok::<_, CandexError>(None);
                    };

                    let mut chunk = String::new();
                    if header_pending {
                        chunk.push_str(&encoder.header_row());
                    }
                    chunk.push_str(&encoder.encode(&page.rows));
                    Ok(Some((chunk, (retriever, false))))
                }
                .instrument(span.clone())
            },
        )
    }
}

/// Write and flush one chunk; `Ok(false)` if cancelled or the reader went away
async fn write_chunk<W>(sink: &mut W, bytes: &[u8], cancel: &Cancellation) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let write = async {
        sink.write_all(bytes).await?;
        sink.flush().await
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(false),
        outcome = write => outcome,
    };

    match outcome {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::info!("Output closed by reader; stopping export");
            Ok(false)
        }
        Err(e) => Err(e).context("Failed to write export output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::upstream::{CandidateSource, UpstreamResponse};
    use crate::core::retry::RetryPolicy;
    use crate::domain::TransportError;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use serde_json::{json, Value};
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll};
    use std::time::Duration;

    struct TwoPages;

    #[async_trait]
    impl CandidateSource for TwoPages {
        async fn get(
            &self,
            request: &PageRequest,
            _cancel: &Cancellation,
        ) -> std::result::Result<UpstreamResponse, TransportError> {
            let body: Value = match request {
                PageRequest::First { .. } => json!({
                    "data": [{
                        "id": "1",
                        "type": "candidates",
                        "attributes": {"first-name": "Jan", "last-name": "Kowalski", "email": "jan@example.com"},
                        "relationships": {"job-applications": {"data": [{"id": "app-1", "type": "job-applications"}]}}
                    }],
                    "included": [{"id": "app-1", "type": "job-applications", "attributes": {"created-at": "2024-01-15"}}],
                    "links": {"next": "https://up/p2"}
                }),
                PageRequest::Next { .. } => json!({
                    "data": [{"id": "2", "type": "candidates", "attributes": {"first-name": "Jan,Jr"}}],
                    "links": {}
                }),
            };
            Ok(UpstreamResponse::new(body))
        }
    }

    fn pipeline(cancel: Cancellation) -> ExportPipeline {
        ExportPipeline::new(
            RetryingFetcher::new(
                Arc::new(TwoPages),
                RetryPolicy::new(0, Duration::from_millis(1)),
            ),
            PageRequest::first_page("/candidates", "job-applications", 30),
            cancel,
        )
    }

    const EXPECTED: &str = "candidate_id,first_name,last_name,email,job_application_id,job_application_created_at\n\
1,Jan,Kowalski,jan@example.com,app-1,2024-01-15\n\
2,\"Jan,Jr\",,,,\n";

    #[tokio::test]
    async fn test_write_to_sink() {
        let mut out: Vec<u8> = Vec::new();
        let summary = pipeline(Cancellation::never())
            .write_to(&mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), EXPECTED);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.bytes_written, EXPECTED.len() as u64);
        assert!(summary.is_complete());
    }

    #[tokio::test]
    async fn test_stream_matches_sink_output() {
        let chunks: Vec<String> = pipeline(Cancellation::never())
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.concat(), EXPECTED);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_writes_nothing() {
        let (tx, rx) = tokio::sync::watch::channel(false);
        tx.send(true).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let summary = pipeline(Cancellation::new(rx))
            .write_to(&mut out)
            .await
            .unwrap();

        assert!(out.is_empty());
        assert!(summary.cancelled);
        assert_eq!(summary.pages, 0);
    }

    #[tokio::test]
    async fn test_broken_pipe_stops_export() {
        struct ClosedSink;

        impl AsyncWrite for ClosedSink {
            fn poll_write(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &[u8],
            ) -> std::task::Poll<std::io::Result<usize>> {
                std::task::Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
            }

            fn poll_flush(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }

            fn poll_shutdown(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Ok(()))
            }
        }

        let summary = pipeline(Cancellation::never())
            .write_to(&mut ClosedSink)
            .await
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.pages, 0);
    }

    /// Pages forever, one candidate per page
    #[derive(Default)]
    struct EndlessSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CandidateSource for EndlessSource {
        async fn get(
            &self,
            _request: &PageRequest,
            _cancel: &Cancellation,
        ) -> std::result::Result<UpstreamResponse, TransportError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(UpstreamResponse::new(json!({
                "data": [{"id": n.to_string(), "type": "candidates", "attributes": {"first-name": "Jan"}}],
                "links": {"next": format!("https://up/p{}", n + 1)}
            })))
        }
    }

    /// Accepts one write, then never becomes ready again
    #[derive(Default)]
    struct StuckSink {
        written: Vec<u8>,
        accepted: bool,
    }

    impl AsyncWrite for StuckSink {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.accepted {
                return Poll::Pending;
            }
            self.accepted = true;
            self.written.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_sink_holds_back_fetching_until_cancelled() {
        let source = Arc::new(EndlessSource::default());
        let (tx, rx) = tokio::sync::watch::channel(false);
        let pipeline = ExportPipeline::new(
            RetryingFetcher::new(source.clone(), RetryPolicy::new(0, Duration::from_millis(1))),
            PageRequest::first_page("/candidates", "job-applications", 30),
            Cancellation::new(rx),
        );

        let export = tokio::spawn(async move {
            let mut sink = StuckSink::default();
            let summary = pipeline.write_to(&mut sink).await;
            (summary, sink)
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        // Page 1 went out; page 2 is fetched and waiting on the sink
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(!export.is_finished());

        tx.send(true).unwrap();
        let (summary, sink) = tokio::time::timeout(Duration::from_secs(1), export)
            .await
            .unwrap()
            .unwrap();
        let summary = summary.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.pages, 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            String::from_utf8(sink.written).unwrap(),
            format!("{}1,Jan,,,,\n", CsvEncoder::new().header_row())
        );
    }

    /// Name of the span active while the upstream is called
    #[derive(Default)]
    struct SpanRecordingSource {
        spans: std::sync::Mutex<Vec<Option<&'static str>>>,
    }

    #[async_trait]
    impl CandidateSource for SpanRecordingSource {
        async fn get(
            &self,
            request: &PageRequest,
            cancel: &Cancellation,
        ) -> std::result::Result<UpstreamResponse, TransportError> {
            let name = tracing::Span::current().metadata().map(|m| m.name());
            self.spans.lock().unwrap().push(name);
            TwoPages.get(request, cancel).await
        }
    }

    #[tokio::test]
    async fn test_stream_runs_inside_export_span() {
        let _subscriber = tracing::subscriber::set_default(tracing_subscriber::registry());
        let source = Arc::new(SpanRecordingSource::default());
        let pipeline = ExportPipeline::new(
            RetryingFetcher::new(source.clone(), RetryPolicy::new(0, Duration::from_millis(1))),
            PageRequest::first_page("/candidates", "job-applications", 30),
            Cancellation::never(),
        );

        let chunks: Vec<String> = pipeline.into_stream().try_collect().await.unwrap();

        assert_eq!(chunks.concat(), EXPECTED);
        assert_eq!(*source.spans.lock().unwrap(), vec![Some("export"), Some("export")]);
    }
}
