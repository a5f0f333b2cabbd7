//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TranscodeError;
use super::types::TranscodeOutcome;

/// Something that turns one source file into a target-compatible file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Extension of the files this transcoder writes, without the dot.
    fn extension(&self) -> &str;

    /// Transcodes `input` into `output`. The output file is created or overwritten.
    async fn transcode(&self, input: &Path, output: &Path)
        -> Result<TranscodeOutcome, TranscodeError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscodeError>;
}
