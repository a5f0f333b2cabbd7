//! Copy stage plus transcode worker pool, wired together.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cleanup::CleanupTracker;
use crate::copier::{CopyMessage, CopyRequest, CopyStage, CopyStats};
use crate::transcoder::Transcoder;

use super::abort::AbortSignal;
use super::config::ProcessorConfig;
use super::error::PipelineError;
use super::types::{Job, JobAction};
use super::worker::{TranscodeMessage, TranscodeWorker};

/// Builds running pipelines from a config and a transcoder.
pub struct SyncPipeline<T: Transcoder> {
    config: ProcessorConfig,
    transcoder: Arc<T>,
    tracker: CleanupTracker,
}

impl<T: Transcoder + 'static> SyncPipeline<T> {
    pub fn new(config: ProcessorConfig, transcoder: Arc<T>, tracker: CleanupTracker) -> Self {
        Self {
            config,
            transcoder,
            tracker,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn tracker(&self) -> &CleanupTracker {
        &self.tracker
    }

    /// Spawns the copy stage, then the transcode workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> PipelineHandle {
        let abort = AbortSignal::new();
        let capacity = self.config.queue_capacity.max(1);
        let worker_count = self.config.workers.max(1);

        let (copy_tx, copy_rx) = mpsc::channel(capacity);
        let stage = CopyStage::new(
            self.tracker.clone(),
            abort.clone(),
            self.config.copy_buffer_size,
        );
        let copy_task = tokio::spawn(stage.run(copy_rx));

        let (transcode_tx, transcode_rx) = mpsc::channel(capacity);
        let queue = Arc::new(Mutex::new(transcode_rx));
        let workers = (0..worker_count)
            .map(|id| {
                let worker = TranscodeWorker {
                    id,
                    transcoder: Arc::clone(&self.transcoder),
                    tracker: self.tracker.clone(),
                    abort: abort.clone(),
                    temp_dir: self.config.temp_dir.clone(),
                    queue: Arc::clone(&queue),
                    copy_tx: copy_tx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        debug!(
            "Pipeline started with {} transcode workers using {}",
            worker_count,
            self.transcoder.name()
        );

        PipelineHandle {
            copy_tx,
            transcode_tx,
            copy_task,
            workers,
            abort,
        }
    }
}

/// A running pipeline. Consumed by [`PipelineHandle::shutdown`].
pub struct PipelineHandle {
    copy_tx: mpsc::Sender<CopyMessage>,
    transcode_tx: mpsc::Sender<TranscodeMessage>,
    copy_task: JoinHandle<Result<CopyStats, PipelineError>>,
    workers: Vec<JoinHandle<Result<usize, PipelineError>>>,
    abort: AbortSignal,
}

impl PipelineHandle {
    pub fn is_aborted(&self) -> bool {
        self.abort.is_set()
    }

    pub fn abort_signal(&self) -> &AbortSignal {
        &self.abort
    }

    fn aborted(&self) -> PipelineError {
        if self.abort.is_interrupted() {
            return PipelineError::Interrupted;
        }
        PipelineError::Aborted(
            self.abort
                .reason()
                .unwrap_or("pipeline stopped")
                .to_string(),
        )
    }

    /// Queues a job for the copy stage or the worker pool.
    ///
    /// Waits while the matching queue is full. Fails once the pipeline is
    /// aborting; the actual cause is reported by [`PipelineHandle::shutdown`].
    pub async fn submit(&self, job: Job) -> Result<(), PipelineError> {
        if self.is_aborted() {
            return Err(self.aborted());
        }

        let sent = match job.action {
            JobAction::Copy => self
                .copy_tx
                .send(CopyMessage::Copy(CopyRequest::verbatim(
                    job.local_path,
                    job.remote_path,
                )))
                .await
                .is_ok(),
            JobAction::Transcode => self
                .transcode_tx
                .send(TranscodeMessage::Transcode {
                    local: job.local_path,
                    remote: job.remote_path,
                })
                .await
                .is_ok(),
        };

        if sent {
            Ok(())
        } else {
            Err(self.aborted())
        }
    }

    /// Two-phase drain: stop and join every worker, then stop and join the
    /// copy stage.
    ///
    /// The copy stage's error wins over worker errors, since forwarded worker
    /// failures surface there. A clean drain after an interrupt reports
    /// [`PipelineError::Interrupted`].
    pub async fn shutdown(self) -> Result<CopyStats, PipelineError> {
        let PipelineHandle {
            copy_tx,
            transcode_tx,
            copy_task,
            workers,
            abort,
        } = self;

        for _ in 0..workers.len() {
            // Fails once every worker has exited.
            if transcode_tx.send(TranscodeMessage::Stop).await.is_err() {
                break;
            }
        }
        drop(transcode_tx);

        let mut worker_error = None;
        for result in join_all(workers).await {
            match result {
                Ok(Ok(delivered)) => debug!("Worker delivered {} files", delivered),
                Ok(Err(e)) => {
                    worker_error.get_or_insert(e);
                }
                Err(e) => {
                    warn!("Transcode worker did not finish: {}", e);
                    worker_error.get_or_insert(PipelineError::WorkerPanicked(e.to_string()));
                }
            }
        }

        let _ = copy_tx.send(CopyMessage::Stop).await;
        drop(copy_tx);

        let copy_result = match copy_task.await {
            Ok(result) => result,
            Err(e) => Err(PipelineError::WorkerPanicked(e.to_string())),
        };

        match (copy_result, worker_error) {
            (Err(e), _) => Err(e),
            (Ok(_), Some(e)) => Err(e),
            (Ok(_), None) if abort.is_interrupted() => Err(PipelineError::Interrupted),
            (Ok(stats), None) => match abort.reason() {
                Some(reason) => Err(PipelineError::Aborted(reason.to_string())),
                None => Ok(stats),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTranscoder;
    use tempfile::TempDir;

    fn pipeline(
        temp: &TempDir,
        transcoder: MockTranscoder,
        workers: usize,
    ) -> SyncPipeline<MockTranscoder> {
        let config = ProcessorConfig::default()
            .with_workers(workers)
            .with_temp_dir(temp.path().join("tmp"))
            .with_queue_capacity(4);
        SyncPipeline::new(config, Arc::new(transcoder), CleanupTracker::new())
    }

    #[tokio::test]
    async fn test_shutdown_without_jobs() {
        let temp = TempDir::new().unwrap();
        let handle = pipeline(&temp, MockTranscoder::new("mp3"), 3).start();
        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats, CopyStats::default());
    }

    #[tokio::test]
    async fn test_copy_and_transcode_jobs_land_on_target() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("music");
        let target = temp.path().join("target");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("a.mp3"), b"mp3").unwrap();
        std::fs::write(source.join("b.flac"), b"flac").unwrap();

        let transcoder = MockTranscoder::new("mp3");
        let pipeline = pipeline(&temp, transcoder.clone(), 2);
        let handle = pipeline.start();
        handle
            .submit(Job::copy(source.join("a.mp3"), target.join("a.mp3")))
            .await
            .unwrap();
        handle
            .submit(Job::transcode(source.join("b.flac"), target.join("b.mp3")))
            .await
            .unwrap();

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.files_copied, 2);
        assert!(target.join("a.mp3").exists());
        assert!(target.join("b.mp3").exists());
        assert_eq!(transcoder.transcode_count().await, 1);
        assert!(pipeline.tracker().is_empty());
        assert_eq!(std::fs::read_dir(temp.path().join("tmp")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_transcode_failure_surfaces_from_shutdown() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("b.flac");
        std::fs::write(&source, b"flac").unwrap();

        let transcoder = MockTranscoder::new("mp3");
        transcoder.fail_on(&source).await;
        let pipeline = pipeline(&temp, transcoder, 2);
        let handle = pipeline.start();
        handle
            .submit(Job::transcode(&source, temp.path().join("target/b.mp3")))
            .await
            .unwrap();

        let err = handle.shutdown().await.unwrap_err();
        assert!(matches!(err, PipelineError::Transcode { .. }));
        assert!(!temp.path().join("target/b.mp3").exists());
        assert!(pipeline.tracker().is_empty());
    }

    #[tokio::test]
    async fn test_submit_after_abort_is_refused() {
        let temp = TempDir::new().unwrap();
        let handle = pipeline(&temp, MockTranscoder::new("mp3"), 1).start();
        handle.abort_signal().trigger("test");

        let err = handle
            .submit(Job::copy("/nonexistent/a.mp3", temp.path().join("a.mp3")))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Aborted(ref reason) if reason == "test"));
        assert!(matches!(
            handle.shutdown().await,
            Err(PipelineError::Aborted(_))
        ));
    }

    #[tokio::test]
    async fn test_interrupt_cancels_running_transcode() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("b.flac");
        std::fs::write(&source, b"flac").unwrap();

        let transcoder = MockTranscoder::new("mp3");
        transcoder
            .set_duration(std::time::Duration::from_secs(30))
            .await;
        let pipeline = pipeline(&temp, transcoder.clone(), 1);
        let handle = pipeline.start();
        handle
            .submit(Job::transcode(&source, temp.path().join("target/b.mp3")))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        handle.abort_signal().interrupt();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .unwrap();

        assert!(matches!(result, Err(PipelineError::Interrupted)));
        assert_eq!(transcoder.transcode_count().await, 0);
        assert!(!temp.path().join("target/b.mp3").exists());
        assert!(pipeline.tracker().is_empty());
        let left = std::fs::read_dir(temp.path().join("tmp"))
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(left, 0);
    }
}
