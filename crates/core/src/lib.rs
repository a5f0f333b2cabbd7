pub mod classifier;
pub mod cleanup;
pub mod config;
pub mod copier;
pub mod library;
pub mod metrics;
pub mod processor;
pub mod target;
pub mod testing;
pub mod transcoder;

pub use classifier::{Classifier, ContentSniffer, FileAction, MagicSniffer, TargetCapabilities};
pub use cleanup::{CleanupGuard, CleanupTracker};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use library::{
    BansheeLibrary, DirectoryLibrary, LibraryEntry, LibraryError, LibraryScan, TrackSource,
};
pub use processor::{
    Job, JobAction, PipelineError, Planner, ProcessorConfig, SyncDriver, SyncPipeline, SyncReport,
};
pub use target::{ResolvedTarget, TargetError, TargetResolver};
pub use transcoder::{FfmpegTranscoder, TranscodeError, Transcoder, TranscoderConfig};
