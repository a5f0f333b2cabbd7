//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::transcoder::{TranscodeError, TranscodeOutcome, Transcoder};

/// A recorded transcode for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTranscode {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Whether the transcode succeeded.
    pub success: bool,
}

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track transcodes for assertions
/// - Fail on chosen inputs
/// - Simulate encoder run time
/// - Record how many temp outputs existed at once
///
/// Successful transcodes copy the input to the output, so the file that ends
/// up on the target is recognisable.
///
/// # Example
///
/// ```rust,ignore
/// use tracksync_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new("mp3");
/// transcoder.set_duration(Duration::from_millis(20)).await;
/// transcoder.fail_on("/music/b.flac").await;
///
/// // ... run a pipeline ...
///
/// assert_eq!(transcoder.transcode_count().await, 3);
/// assert!(transcoder.peak_outputs().await <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    extension: String,
    /// Recorded transcodes.
    transcodes: Arc<RwLock<Vec<RecordedTranscode>>>,
    /// Inputs that fail.
    failing: Arc<RwLock<HashSet<PathBuf>>>,
    /// Simulated encoder run time.
    duration: Arc<RwLock<Duration>>,
    /// Largest number of temp outputs seen in an output directory.
    peak_outputs: Arc<RwLock<usize>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder producing files with `extension`.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            transcodes: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            duration: Arc::new(RwLock::new(Duration::ZERO)),
            peak_outputs: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all recorded transcodes, in completion order.
    pub async fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.transcodes.read().await.clone()
    }

    /// Get the number of transcodes attempted.
    pub async fn transcode_count(&self) -> usize {
        self.transcodes.read().await.len()
    }

    /// Make transcoding `input` fail.
    pub async fn fail_on(&self, input: impl AsRef<Path>) {
        self.failing
            .write()
            .await
            .insert(input.as_ref().to_path_buf());
    }

    /// Set the simulated encoder run time.
    pub async fn set_duration(&self, duration: Duration) {
        *self.duration.write().await = duration;
    }

    /// Largest number of `tracksync-*` files seen in an output directory
    /// right after writing an output.
    pub async fn peak_outputs(&self) -> usize {
        *self.peak_outputs.read().await
    }

    async fn record(&self, input: &Path, output: &Path, success: bool) {
        self.transcodes.write().await.push(RecordedTranscode {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            success,
        });
    }

    fn count_outputs(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().starts_with("tracksync-"))
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let start = Instant::now();
        let duration = *self.duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        if self.failing.read().await.contains(input) {
            self.record(input, output, false).await;
            return Err(TranscodeError::Failed {
                status: Some(1),
                output: format!("{}: Invalid data found when processing input", input.display()),
            });
        }

        if let Err(e) = tokio::fs::copy(input, output).await {
            self.record(input, output, false).await;
            return Err(TranscodeError::Io(e));
        }

        if let Some(dir) = output.parent() {
            let live = Self::count_outputs(dir);
            let mut peak = self.peak_outputs.write().await;
            *peak = (*peak).max(live);
        }

        self.record(input, output, true).await;
        Ok(TranscodeOutcome {
            output_path: output.to_path_buf(),
            elapsed: start.elapsed(),
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        Ok(())
    }
}
