//! Transcoder module for converting tracks the target cannot play.
//!
//! This module provides the `Transcoder` trait and an FFmpeg implementation.
//! The encoder is driven entirely by the user's argument list; no codec
//! knowledge lives here.
//!
//! # Example
//!
//! ```ignore
//! use tracksync_core::transcoder::{FfmpegTranscoder, Transcoder, TranscoderConfig};
//!
//! let transcoder = FfmpegTranscoder::new(TranscoderConfig {
//!     args: vec!["-codec:a".into(), "libmp3lame".into(), "-q:a".into(), "2".into()],
//!     extension: "mp3".into(),
//!     ..Default::default()
//! });
//!
//! transcoder.validate().await?;
//! let outcome = transcoder
//!     .transcode(Path::new("/music/a.flac"), Path::new("/tmp/tracksync-x.mp3"))
//!     .await?;
//! println!("Transcoded in {:?}", outcome.elapsed);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::TranscodeOutcome;
