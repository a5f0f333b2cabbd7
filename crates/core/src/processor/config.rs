//! Configuration for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the sync pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Number of transcode workers, fixed for the whole run.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Directory for temporary transcode outputs.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Buffer size used when copying to the target, in bytes.
    #[serde(default = "default_copy_buffer_size")]
    pub copy_buffer_size: usize,

    /// Capacity of the copy and transcode queues.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize {
    8
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_copy_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MiB
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            temp_dir: default_temp_dir(),
            copy_buffer_size: default_copy_buffer_size(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the number of transcode workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Sets the copy buffer size.
    pub fn with_copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = size;
        self
    }

    /// Sets the queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}
