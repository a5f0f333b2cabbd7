//! Transcode worker pool member.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cleanup::CleanupTracker;
use crate::copier::{CopyMessage, CopyRequest};
use crate::metrics;
use crate::transcoder::{TranscodeError, Transcoder};

use super::abort::AbortSignal;
use super::error::PipelineError;

/// Element of the transcode queue.
#[derive(Debug)]
pub(crate) enum TranscodeMessage {
    Transcode { local: PathBuf, remote: PathBuf },
    Stop,
}

/// Queue shared by all workers of a pool.
pub(crate) type SharedQueue = Arc<Mutex<mpsc::Receiver<TranscodeMessage>>>;

/// One worker: transcode to a temp file, hand it to the copy stage, wait for
/// that copy to finish, repeat.
pub(crate) struct TranscodeWorker<T: Transcoder> {
    pub id: usize,
    pub transcoder: Arc<T>,
    pub tracker: CleanupTracker,
    pub abort: AbortSignal,
    pub temp_dir: PathBuf,
    pub queue: SharedQueue,
    pub copy_tx: mpsc::Sender<CopyMessage>,
}

impl<T: Transcoder> TranscodeWorker<T> {
    /// Runs until a stop message, an abort, or the copy stage going away.
    /// An interrupt also cancels the transcode in progress.
    ///
    /// Returns the number of files this worker delivered. An error is only
    /// returned when a transcode failure could not be forwarded to the copy
    /// stage.
    pub async fn run(self) -> Result<usize, PipelineError> {
        let mut delivered = 0;

        loop {
            if self.abort.is_set() {
                debug!("Worker {} exiting after abort", self.id);
                return Ok(delivered);
            }

            let message = {
                let mut queue = self.queue.lock().await;
                queue.recv().await
            };
            let (local, remote) = match message {
                Some(TranscodeMessage::Transcode { local, remote }) => (local, remote),
                Some(TranscodeMessage::Stop) | None => {
                    debug!("Worker {} stopping", self.id);
                    return Ok(delivered);
                }
            };
            if self.abort.is_set() {
                debug!("Worker {} exiting after abort", self.id);
                return Ok(delivered);
            }

            let temp = self.temp_path();
            self.tracker.track(&temp);

            info!("Transcode: {} -> {}", local.display(), remote.display());
            // Dropping the transcode future kills the encoder.
            let result = tokio::select! {
                result = self.transcode(&local, &temp) => result,
                _ = self.abort.interrupted() => {
                    debug!(
                        "Worker {}: transcode of {} interrupted",
                        self.id,
                        local.display()
                    );
                    self.discard(&temp).await;
                    return Ok(delivered);
                }
            };
            if let Err(e) = result {
                error!("Transcoding {} failed: {}", local.display(), e);
                self.discard(&temp).await;

                let err = PipelineError::Transcode {
                    input: local,
                    source: e,
                };
                self.abort.trigger(err.to_string());
                // If the copy stage is gone, nobody else will report this error.
                if let Err(mpsc::error::SendError(CopyMessage::Abort(err))) =
                    self.copy_tx.send(CopyMessage::Abort(err)).await
                {
                    return Err(err);
                }
                return Ok(delivered);
            }

            let (request, done) = CopyRequest::transcoded(&temp, &remote);
            if self.copy_tx.send(CopyMessage::Copy(request)).await.is_err() {
                debug!("Worker {}: copy stage closed", self.id);
                self.discard(&temp).await;
                return Ok(delivered);
            }
            let copied = done.await.is_ok();

            // The copy stage untracks the temp file once it is consumed.
            if self.tracker.contains(&temp) {
                self.discard(&temp).await;
            } else {
                delivered += 1;
            }
            if !copied {
                debug!("Worker {}: copy stage closed", self.id);
                return Ok(delivered);
            }
        }
    }

    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;

        let start = Instant::now();
        let result = self.transcoder.transcode(input, output).await;
        let label = if result.is_ok() { "success" } else { "failed" };
        metrics::TRANSCODE_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        let outcome = result?;
        debug!(
            "Worker {} transcoded {} in {:?}",
            self.id,
            input.display(),
            outcome.elapsed
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.temp_dir.join(format!(
            "tracksync-{}.{}",
            Uuid::new_v4(),
            self.transcoder.extension()
        ))
    }

    /// Removes a temp file that will not be copied.
    async fn discard(&self, temp: &Path) {
        match tokio::fs::remove_file(temp).await {
            Ok(()) => {
                self.tracker.untrack(temp);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.tracker.untrack(temp);
            }
            // Left tracked for the final purge.
            Err(e) => warn!("Failed to remove {}: {}", temp.display(), e),
        }
    }
}
