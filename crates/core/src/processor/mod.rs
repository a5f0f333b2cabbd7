//! Processor module for the sync pipeline.
//!
//! This module provides the pieces that run a sync:
//! - `Planner`: decides per library entry between skip, ignore, copy and transcode
//! - `SyncPipeline`: a single copy stage plus a fixed pool of transcode workers
//! - `SyncDriver`: feeds planned jobs in and drains the pipeline
//!
//! Every transcode worker waits for its file to be copied before taking the
//! next job, so at most `workers` temporary files exist at any time. A fatal
//! error anywhere sets a shared [`AbortSignal`]; intake stops, the pipeline
//! drains, and the first error is returned.
//!
//! # Example
//!
//! ```ignore
//! use tracksync_core::processor::{Planner, ProcessorConfig, SyncDriver, SyncPipeline};
//!
//! let pipeline = SyncPipeline::new(ProcessorConfig::default(), Arc::new(transcoder), tracker);
//! let driver = SyncDriver::new(Planner::new(classifier, music_root, "mp3"), pipeline);
//! let report = driver.run(entries).await?;
//! println!("{}", report);
//! ```

mod abort;
mod config;
mod driver;
mod error;
mod pipeline;
mod planner;
mod types;
mod worker;

pub use abort::AbortSignal;
pub use config::ProcessorConfig;
pub use driver::SyncDriver;
pub use error::PipelineError;
pub use pipeline::{PipelineHandle, SyncPipeline};
pub use planner::{transcoded_path, Planner};
pub use types::{Decision, Job, JobAction, SyncReport};
