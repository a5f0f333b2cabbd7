//! Copy stage: the single writer to the target.
//!
//! Every write to the target, whether a verbatim copy of a library file or the
//! copy of a finished transcode, goes through one [`CopyStage`] task. Requests
//! are serviced strictly in the order they were sent. A request may carry a
//! one-shot completion sender that is fired once the request is done, whether
//! it succeeded or not; transcode workers wait on it before taking their next
//! job.
//!
//! # Example
//!
//! ```ignore
//! use tracksync_core::copier::{CopyMessage, CopyRequest, CopyStage};
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let stage = CopyStage::new(tracker.clone(), abort.clone(), 8 * 1024 * 1024);
//! let handle = tokio::spawn(stage.run(rx));
//!
//! tx.send(CopyMessage::Copy(CopyRequest::verbatim("/music/a.mp3", "/media/player/a.mp3"))).await?;
//! tx.send(CopyMessage::Stop).await?;
//! let stats = handle.await??;
//! ```

mod error;
mod stage;
mod types;

pub use error::CopyError;
pub use stage::CopyStage;
pub use types::{CopyMessage, CopyRequest, CopyStats};
