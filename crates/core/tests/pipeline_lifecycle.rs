//! Sync lifecycle integration tests.
//!
//! These tests drive a whole run through the planner and the pipeline:
//! library entry -> classify -> copy or transcode -> target

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use tracksync_core::{
    classifier::TargetCapabilities,
    testing::{fixtures, MockTranscoder},
    CleanupTracker, Classifier, LibraryEntry, LibraryScan, MagicSniffer, PipelineError, Planner,
    ProcessorConfig, SyncDriver, SyncPipeline,
};

/// Source library, target and temp dir under one temp root.
struct TestHarness {
    source: PathBuf,
    music: PathBuf,
    temp: PathBuf,
    tracker: CleanupTracker,
    transcoder: MockTranscoder,
    _root: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let source = root.path().join("library");
        let music = root.path().join("player/Music");
        let temp = root.path().join("tmp");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&music).unwrap();

        Self {
            source,
            music,
            temp,
            tracker: CleanupTracker::new(),
            transcoder: MockTranscoder::new("mp3"),
            _root: root,
        }
    }

    fn add(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.source.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Entries for every file below the source root, sorted by path.
    fn entries(&self) -> Vec<LibraryEntry> {
        let scan = LibraryScan::new(&self.source, Vec::<PathBuf>::new());
        let mut paths = Vec::new();
        collect_files(&self.source, &mut paths);
        paths.sort();
        paths.iter().filter_map(|p| scan.entry(p)).collect()
    }

    fn driver(&self, workers: usize) -> SyncDriver<MagicSniffer, MockTranscoder> {
        let classifier = Classifier::new(
            MagicSniffer::new(),
            TargetCapabilities::new(["audio/mpeg".to_string()]),
        );
        let planner = Planner::new(classifier, &self.music, "mp3");
        let config = ProcessorConfig::default()
            .with_workers(workers)
            .with_temp_dir(&self.temp)
            .with_queue_capacity(2);
        let pipeline = SyncPipeline::new(
            config,
            Arc::new(self.transcoder.clone()),
            self.tracker.clone(),
        );
        SyncDriver::new(planner, pipeline)
    }

    fn temp_files(&self) -> usize {
        std::fs::read_dir(&self.temp)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

#[tokio::test]
async fn test_copy_transcode_and_ignore() {
    let harness = TestHarness::new();
    harness.add("Artist/a.mp3", &fixtures::mp3());
    let flac = harness.add("Artist/b.flac", &fixtures::flac());
    harness.add("Artist/c.txt", fixtures::TEXT);

    let report = harness.driver(2).run(harness.entries()).await.unwrap();

    assert_eq!(report.copied, 1);
    assert_eq!(report.transcoded, 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.skipped, 0);

    let copied = harness.music.join("Artist/a.mp3");
    assert_eq!(std::fs::read(&copied).unwrap(), fixtures::mp3());
    // The mock encoder copies its input, so the transcoded file holds the flac bytes.
    let transcoded = harness.music.join("Artist/b.mp3");
    assert_eq!(std::fs::read(&transcoded).unwrap(), fixtures::flac());
    assert!(!harness.music.join("Artist/b.flac").exists());
    assert!(!harness.music.join("Artist/c.txt").exists());

    assert_eq!(
        report.bytes_written,
        (fixtures::mp3().len() + fixtures::flac().len()) as u64
    );
    assert_eq!(harness.transcoder.transcode_count().await, 1);
    assert_eq!(
        harness.transcoder.recorded_transcodes().await[0].input,
        flac
    );
    assert_eq!(harness.temp_files(), 0);
    assert!(harness.tracker.is_empty());
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let harness = TestHarness::new();
    harness.add("a.mp3", &fixtures::mp3());
    harness.add("b.flac", &fixtures::flac());
    harness.add("c.txt", fixtures::TEXT);

    harness.driver(2).run(harness.entries()).await.unwrap();
    let report = harness.driver(2).run(harness.entries()).await.unwrap();

    assert_eq!(report.copied, 0);
    assert_eq!(report.transcoded, 0);
    assert_eq!(report.skipped, 2);
    // Unsupported files are classified again; nothing exists to skip them by.
    assert_eq!(report.ignored, 1);
    assert_eq!(report.bytes_written, 0);
    assert_eq!(harness.transcoder.transcode_count().await, 1);
}

#[tokio::test]
async fn test_transcode_failure_leaves_no_partial_output() {
    let harness = TestHarness::new();
    let flac = harness.add("b.flac", &fixtures::flac());
    harness.transcoder.fail_on(&flac).await;

    let err = harness.driver(2).run(harness.entries()).await.unwrap_err();
    match &err {
        PipelineError::Transcode { input, .. } => assert_eq!(input, &flac),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err
        .encoder_output()
        .unwrap()
        .contains("Invalid data found"));

    assert!(!harness.music.join("b.mp3").exists());
    assert!(!harness.music.join("b.flac").exists());
    assert_eq!(harness.temp_files(), 0);

    let report = harness.tracker.purge();
    assert!(report.deleted.is_empty());
    assert!(harness.tracker.is_empty());
}

#[tokio::test]
async fn test_failure_stops_intake_of_later_files() {
    let harness = TestHarness::new();
    harness.add("a.mp3", &fixtures::mp3());
    let failing = harness.add("b.flac", &fixtures::flac());
    for i in 0..6 {
        harness.add(&format!("c{}.flac", i), &fixtures::flac());
    }
    harness.transcoder.fail_on(&failing).await;
    // Later entries pile up in the queue while b.flac is being encoded.
    harness
        .transcoder
        .set_duration(Duration::from_millis(50))
        .await;

    let err = harness.driver(1).run(harness.entries()).await.unwrap_err();

    assert!(matches!(err, PipelineError::Transcode { ref input, .. } if input == &failing));
    // Queued before the failure, so it is still copied.
    assert_eq!(
        std::fs::read(harness.music.join("a.mp3")).unwrap(),
        fixtures::mp3()
    );
    assert!(!harness.music.join("b.mp3").exists());

    // Nothing after the failing file was encoded or written.
    let recorded = harness.transcoder.recorded_transcodes().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].input, failing);
    for i in 0..6 {
        assert!(!harness.music.join(format!("c{}.mp3", i)).exists());
        assert!(!harness.music.join(format!("c{}.flac", i)).exists());
    }
    assert_eq!(harness.temp_files(), 0);
    assert!(harness.tracker.is_empty());
}

#[tokio::test]
async fn test_interrupt_drains_and_removes_temp_files() {
    let harness = TestHarness::new();
    harness.add("a.flac", &fixtures::flac());
    harness.add("b.flac", &fixtures::flac());
    harness
        .transcoder
        .set_duration(Duration::from_secs(30))
        .await;

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        harness.driver(2).run_until(
            harness.entries(),
            tokio::time::sleep(Duration::from_millis(100)),
        ),
    )
    .await
    .expect("interrupted run did not finish");

    assert!(matches!(result, Err(PipelineError::Interrupted)));
    assert_eq!(harness.transcoder.transcode_count().await, 0);
    assert!(!harness.music.join("a.mp3").exists());
    assert!(!harness.music.join("b.mp3").exists());
    assert_eq!(harness.temp_files(), 0);
    assert!(harness.tracker.is_empty());
}

#[tokio::test]
async fn test_temp_files_bounded_by_worker_count() {
    let harness = TestHarness::new();
    for i in 0..8 {
        harness.add(&format!("Album/{:02}.flac", i), &fixtures::flac());
    }
    harness
        .transcoder
        .set_duration(Duration::from_millis(15))
        .await;

    let report = harness.driver(2).run(harness.entries()).await.unwrap();

    assert_eq!(report.transcoded, 8);
    assert_eq!(harness.transcoder.transcode_count().await, 8);
    let peak = harness.transcoder.peak_outputs().await;
    assert!(peak >= 1);
    assert!(peak <= 2, "saw {} temp files at once", peak);
    for i in 0..8 {
        assert!(harness.music.join(format!("Album/{:02}.mp3", i)).exists());
    }
    assert_eq!(harness.temp_files(), 0);
}

#[tokio::test]
async fn test_existing_transcoded_copy_is_skipped() {
    let harness = TestHarness::new();
    harness.add("b.flac", &fixtures::flac());
    std::fs::write(harness.music.join("b.mp3"), b"already there").unwrap();

    let report = harness.driver(1).run(harness.entries()).await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(harness.transcoder.transcode_count().await, 0);
    assert_eq!(
        std::fs::read(harness.music.join("b.mp3")).unwrap(),
        b"already there"
    );
}
