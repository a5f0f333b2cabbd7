//! Types for the processor module.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What the pipeline does with a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    Copy,
    Transcode,
}

impl JobAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Transcode => "transcode",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified library file with its final destination on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub local_path: PathBuf,
    pub remote_path: PathBuf,
    pub action: JobAction,
}

impl Job {
    pub fn copy(local_path: impl Into<PathBuf>, remote_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            action: JobAction::Copy,
        }
    }

    pub fn transcode(local_path: impl Into<PathBuf>, remote_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            action: JobAction::Transcode,
        }
    }
}

/// Planner verdict for one library entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the job to the pipeline.
    Submit(Job),
    /// The target already has this file, as-is or transcoded.
    Skip,
    /// Not something the target can play.
    Ignore,
}

/// Totals for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub copied: usize,
    pub transcoded: usize,
    pub ignored: usize,
    pub skipped: usize,
    pub bytes_written: u64,
}

impl SyncReport {
    /// Jobs handed to the pipeline.
    pub fn submitted(&self) -> usize {
        self.copied + self.transcoded
    }

    pub(crate) fn count(&mut self, decision: &Decision) {
        match decision {
            Decision::Submit(job) => match job.action {
                JobAction::Copy => self.copied += 1,
                JobAction::Transcode => self.transcoded += 1,
            },
            Decision::Skip => self.skipped += 1,
            Decision::Ignore => self.ignored += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} transcoded, {} skipped, {} ignored, {} bytes written",
            self.copied, self.transcoded, self.skipped, self.ignored, self.bytes_written
        )
    }
}
