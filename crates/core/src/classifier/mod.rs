//! Classifier module for routing library files to a sync action.
//!
//! A file is copied when the target plays its content type natively,
//! transcoded when it is audio in some other format, and ignored otherwise.
//! Content types come from the file's bytes, never from its name.
//!
//! # Example
//!
//! ```ignore
//! use tracksync_core::classifier::{Classifier, FileAction, MagicSniffer, TargetCapabilities};
//!
//! let caps = TargetCapabilities::new(["audio/mpeg".to_string()]);
//! let classifier = Classifier::new(MagicSniffer::new(), caps);
//!
//! match classifier.classify(Path::new("/music/album/01.flac")) {
//!     FileAction::Copy => println!("copy as is"),
//!     FileAction::Transcode => println!("needs transcoding"),
//!     FileAction::Ignore => println!("not music"),
//! }
//! ```

mod classify;
mod magic;
mod traits;
mod types;

pub use classify::Classifier;
pub use magic::{detect_mime, MagicSniffer, HEADER_LEN};
pub use traits::ContentSniffer;
pub use types::{ContentType, FileAction, TargetCapabilities};
