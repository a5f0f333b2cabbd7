//! Per-entry destination planning.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::classifier::{Classifier, ContentSniffer, FileAction};
use crate::library::LibraryEntry;

use super::types::{Decision, Job};

/// `path` with its file extension replaced by `extension`, or with
/// `extension` appended when the file name has none.
pub fn transcoded_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Decides what happens to each library entry on one target.
pub struct Planner<S: ContentSniffer> {
    classifier: Classifier<S>,
    music_root: PathBuf,
    extension: String,
}

impl<S: ContentSniffer> Planner<S> {
    pub fn new(
        classifier: Classifier<S>,
        music_root: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            music_root: music_root.into(),
            extension: extension.into(),
        }
    }

    pub fn music_root(&self) -> &Path {
        &self.music_root
    }

    /// Skips entries already on the target, as-is or transcoded; classifies
    /// the rest.
    pub fn plan(&self, entry: &LibraryEntry) -> Decision {
        let destination = self.music_root.join(&entry.relative_path);
        if destination.exists() {
            debug!("Already on target: {}", destination.display());
            return Decision::Skip;
        }

        let transcoded = transcoded_path(&destination, &self.extension);
        if transcoded.exists() {
            debug!("Already on target: {}", transcoded.display());
            return Decision::Skip;
        }

        match self.classifier.classify(&entry.local_path) {
            FileAction::Copy => Decision::Submit(Job::copy(&entry.local_path, destination)),
            FileAction::Transcode => {
                Decision::Submit(Job::transcode(&entry.local_path, transcoded))
            }
            FileAction::Ignore => {
                info!("Ignore: {}", entry.local_path.display());
                Decision::Ignore
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{MagicSniffer, TargetCapabilities};
    use crate::testing::fixtures;
    use tempfile::TempDir;

    struct Setup {
        _dir: TempDir,
        source: PathBuf,
        music: PathBuf,
        planner: Planner<MagicSniffer>,
    }

    fn setup() -> Setup {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let music = dir.path().join("target/Music");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&music).unwrap();
        let classifier = Classifier::new(
            MagicSniffer::new(),
            TargetCapabilities::new(["audio/mpeg".to_string()]),
        );
        let planner = Planner::new(classifier, &music, "mp3");
        Setup {
            _dir: dir,
            source,
            music,
            planner,
        }
    }

    fn entry(setup: &Setup, relative: &str, bytes: &[u8]) -> LibraryEntry {
        let local_path = setup.source.join(relative);
        std::fs::create_dir_all(local_path.parent().unwrap()).unwrap();
        std::fs::write(&local_path, bytes).unwrap();
        LibraryEntry {
            local_path,
            relative_path: PathBuf::from(relative),
        }
    }

    #[test]
    fn test_transcoded_path_replaces_or_appends() {
        assert_eq!(
            transcoded_path(Path::new("/t/Artist/b.flac"), "mp3"),
            PathBuf::from("/t/Artist/b.mp3")
        );
        assert_eq!(
            transcoded_path(Path::new("/t/Artist/track"), "mp3"),
            PathBuf::from("/t/Artist/track.mp3")
        );
        assert_eq!(
            transcoded_path(Path::new("/t/Mr. Bungle/track"), "mp3"),
            PathBuf::from("/t/Mr. Bungle/track.mp3")
        );
        assert_eq!(
            transcoded_path(Path::new("/t/a.b.flac"), "ogg"),
            PathBuf::from("/t/a.b.ogg")
        );
    }

    #[test]
    fn test_plan_copy_transcode_ignore() {
        let setup = setup();
        let a = entry(&setup, "a.mp3", &fixtures::mp3());
        let b = entry(&setup, "Artist/b.flac", &fixtures::flac());
        let c = entry(&setup, "c.txt", fixtures::TEXT);

        assert_eq!(
            setup.planner.plan(&a),
            Decision::Submit(Job::copy(&a.local_path, setup.music.join("a.mp3")))
        );
        assert_eq!(
            setup.planner.plan(&b),
            Decision::Submit(Job::transcode(&b.local_path, setup.music.join("Artist/b.mp3")))
        );
        assert_eq!(setup.planner.plan(&c), Decision::Ignore);
    }

    #[test]
    fn test_plan_skips_existing_destinations() {
        let setup = setup();
        let a = entry(&setup, "a.mp3", &fixtures::mp3());
        let b = entry(&setup, "b.flac", &fixtures::flac());
        std::fs::write(setup.music.join("a.mp3"), b"old").unwrap();
        std::fs::write(setup.music.join("b.mp3"), b"old").unwrap();

        assert_eq!(setup.planner.plan(&a), Decision::Skip);
        assert_eq!(setup.planner.plan(&b), Decision::Skip);
    }

    #[test]
    fn test_plan_file_without_extension() {
        let setup = setup();
        let copied = entry(&setup, "Mr. Bungle/intro", &fixtures::mp3());
        let transcoded = entry(&setup, "Mr. Bungle/outro", &fixtures::flac());

        // Copies keep the name unchanged; transcodes get the extension appended.
        assert_eq!(
            setup.planner.plan(&copied),
            Decision::Submit(Job::copy(
                &copied.local_path,
                setup.music.join("Mr. Bungle/intro")
            ))
        );
        assert_eq!(
            setup.planner.plan(&transcoded),
            Decision::Submit(Job::transcode(
                &transcoded.local_path,
                setup.music.join("Mr. Bungle/outro.mp3")
            ))
        );
    }

    #[test]
    fn test_plan_missing_source_is_ignored() {
        let setup = setup();
        let ghost = LibraryEntry {
            local_path: setup.source.join("gone.flac"),
            relative_path: PathBuf::from("gone.flac"),
        };
        assert_eq!(setup.planner.plan(&ghost), Decision::Ignore);
    }
}
