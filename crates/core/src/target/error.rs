//! Error types for target resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving the target.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Neither or both of `path` and `mtp` are configured.
    #[error("Exactly one of target.path or target.mtp must be set")]
    NotConfigured,

    /// Configured directory is missing, e.g. an unmounted device.
    #[error("Target path is not available: {0}")]
    PathUnavailable(PathBuf),

    /// `mtp` value is not `SERIAL/path`.
    #[error("Invalid MTP target {0:?}, expected SERIAL/path")]
    InvalidMtpSpec(String),

    /// No USB device with the given serial number.
    #[error("No USB device found with serial number {0}")]
    DeviceNotFound(String),

    /// gvfs mount did not appear after `gio mount`.
    #[error("Failed to mount MTP device: {output}")]
    MountFailed { output: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
