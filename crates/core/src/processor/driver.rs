//! Feeds planned jobs into a pipeline and drains it.

use std::future::Future;

use tracing::{info, warn};

use crate::classifier::ContentSniffer;
use crate::library::LibraryEntry;
use crate::metrics;
use crate::transcoder::Transcoder;

use super::error::PipelineError;
use super::pipeline::{PipelineHandle, SyncPipeline};
use super::planner::Planner;
use super::types::{Decision, SyncReport};

/// One sync run: plan every entry, submit, then shut the pipeline down.
pub struct SyncDriver<S: ContentSniffer, T: Transcoder> {
    planner: Planner<S>,
    pipeline: SyncPipeline<T>,
}

impl<S: ContentSniffer, T: Transcoder + 'static> SyncDriver<S, T> {
    pub fn new(planner: Planner<S>, pipeline: SyncPipeline<T>) -> Self {
        Self { planner, pipeline }
    }

    pub fn pipeline(&self) -> &SyncPipeline<T> {
        &self.pipeline
    }

    /// Runs the whole sync. Intake stops at the first fatal error; the
    /// pipeline is always drained before returning.
    pub async fn run<I>(&self, entries: I) -> Result<SyncReport, PipelineError>
    where
        I: IntoIterator<Item = LibraryEntry>,
    {
        self.run_until(entries, std::future::pending()).await
    }

    /// Like [`SyncDriver::run`], but stops when `interrupt` resolves.
    ///
    /// On interrupt, intake stops, running transcodes are cancelled and their
    /// temp files removed, and the pipeline is drained before this returns
    /// [`PipelineError::Interrupted`].
    pub async fn run_until<I, F>(
        &self,
        entries: I,
        interrupt: F,
    ) -> Result<SyncReport, PipelineError>
    where
        I: IntoIterator<Item = LibraryEntry>,
        F: Future<Output = ()>,
    {
        let handle = self.pipeline.start();
        let abort = handle.abort_signal().clone();

        let sync = self.feed_and_drain(handle, entries);
        tokio::pin!(sync);
        tokio::select! {
            result = &mut sync => result,
            _ = interrupt => {
                warn!("Interrupted, stopping pipeline");
                abort.interrupt();
                sync.await
            }
        }
    }

    async fn feed_and_drain<I>(
        &self,
        handle: PipelineHandle,
        entries: I,
    ) -> Result<SyncReport, PipelineError>
    where
        I: IntoIterator<Item = LibraryEntry>,
    {
        let mut report = SyncReport::default();

        for entry in entries {
            if handle.is_aborted() {
                warn!("Pipeline aborted, not submitting further files");
                break;
            }

            let decision = self.planner.plan(&entry);
            report.count(&decision);
            let label = match &decision {
                Decision::Submit(job) => job.action.as_str(),
                Decision::Skip => "skip",
                Decision::Ignore => "ignore",
            };
            metrics::FILES_TOTAL.with_label_values(&[label]).inc();

            if let Decision::Submit(job) = decision {
                if handle.submit(job).await.is_err() {
                    warn!("Pipeline aborted, not submitting further files");
                    break;
                }
            }
        }

        match handle.shutdown().await {
            Ok(stats) => {
                report.bytes_written = stats.bytes_copied;
                info!("Sync finished: {}", report);
                Ok(report)
            }
            Err(e) => {
                metrics::PIPELINE_FAILURES.inc();
                Err(e)
            }
        }
    }
}
