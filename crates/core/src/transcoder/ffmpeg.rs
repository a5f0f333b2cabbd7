//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::TranscoderConfig;
use super::error::TranscodeError;
use super::traits::Transcoder;
use super::types::TranscodeOutcome;

/// Runs `<ffmpeg> -i <input> <args...> <output>` once per file.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Builds the ffmpeg argument list for one file.
    fn build_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.config.args.len() + 3);
        args.push(OsString::from("-i"));
        args.push(input.as_os_str().to_owned());
        args.extend(self.config.args.iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }

    fn spawn_error(&self, e: std::io::Error) -> TranscodeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            TranscodeError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            TranscodeError::Io(e)
        }
    }
}

/// Stdout followed by stderr, lossily decoded.
///
/// The streams are captured separately, so lines are not interleaved in the
/// order the encoder wrote them. ffmpeg reports on stderr only, which keeps
/// its own messages in order.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn extension(&self) -> &str {
        &self.config.extension
    }

    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<TranscodeOutcome, TranscodeError> {
        let start = Instant::now();
        let args = self.build_args(input, output);
        debug!("Running {} {:?}", self.config.ffmpeg_path.display(), args);

        let result = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status.code(),
                output: combined_output(&result),
            });
        }

        Ok(TranscodeOutcome {
            output_path: output.to_path_buf(),
            elapsed: start.elapsed(),
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status.code(),
                output: combined_output(&result),
            });
        }

        Ok(())
    }
}
