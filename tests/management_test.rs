use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use mp3ify::management::{
    FinishAction, FinishOutcome, MaterializeOutcome, Materializer, finish_batch, finish_download,
    plan_finish, walk_directory,
};
use mp3ify::types::Track;
use mp3ify::youtube::{DownloadOptions, DownloadedFile};

fn touch(path: &Path) {
    fs::write(path, b"").expect("create test file");
}

#[test]
fn test_walk_directory_filename_fallback() {
    // Empty files carry no readable tag, so identity comes from the filename
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("01 - Artist One - Album One - Track One.mp3"));
    touch(&dir.path().join("02 - Artist One - Album One - Track Two.mp3"));
    touch(&dir.path().join("Artist Two - Album Two - Single Track.mp3"));

    let mut tracks = walk_directory(dir.path());
    tracks.sort_by(|a, b| a.title.cmp(&b.title));

    assert_eq!(tracks.len(), 3);
    let titles: Vec<&str> = tracks.iter().filter_map(|t| t.title.as_deref()).collect();
    assert_eq!(titles, vec!["Single Track", "Track One", "Track Two"]);
    assert_eq!(tracks[0].artist.as_deref(), Some("Artist Two"));
    assert!(tracks.iter().all(|t| t.source_path.is_some()));
}

#[test]
fn test_walk_directory_skips_non_mp3_and_hidden() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("Artist - Album - Song.mp3"));
    touch(&dir.path().join("notes.txt"));
    touch(&dir.path().join(".hidden - Album - Song.mp3"));

    let tracks = walk_directory(dir.path());

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title.as_deref(), Some("Song"));
}

#[test]
fn test_walk_directory_recurses() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("album");
    fs::create_dir(&sub).unwrap();
    touch(&sub.join("Artist - Album - Nested.mp3"));

    let tracks = walk_directory(dir.path());

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title.as_deref(), Some("Nested"));
}

#[test]
fn test_plan_finish_transitions() {
    let current = Path::new("/out/raw title.mp3");
    let canonical = Path::new("/out/01 - Artist - Song.mp3");

    // Fresh finish: rename then tag
    assert_eq!(
        plan_finish(current, canonical, false),
        FinishAction::RenameAndTag
    );
    // Canonical already exists as a different file: duplicate hook firing
    assert_eq!(
        plan_finish(current, canonical, true),
        FinishAction::SkipDuplicate
    );
    // Already in place: skip rename, still correct tags (resumed run)
    assert_eq!(
        plan_finish(canonical, canonical, true),
        FinishAction::Retag
    );
}

#[test]
fn test_finish_download_ignores_non_mp3_artifacts() {
    let dir = TempDir::new().unwrap();
    let intermediate = dir.path().join("Song.webm");
    touch(&intermediate);

    let file = DownloadedFile {
        path: intermediate.clone(),
        title: "Artist - Song".to_string(),
        playlist_index: None,
        source_url: None,
    };
    let result = finish_download(&file, &Track::default()).unwrap();

    assert_eq!(result, FinishOutcome::NotAudio);
    assert!(intermediate.exists());
}

#[test]
fn test_finish_download_duplicate_hook_firing_is_noop() {
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("Artist - Song (Official Video).mp3");
    let canonical = dir.path().join("Artist - Song.mp3");
    touch(&current);
    touch(&canonical);

    let file = DownloadedFile {
        path: current.clone(),
        title: "Artist - Song (Official Video)".to_string(),
        playlist_index: None,
        source_url: None,
    };
    let result = finish_download(&file, &Track::default()).unwrap();

    // Second firing against an existing canonical target does nothing
    assert_eq!(result, FinishOutcome::Duplicate(canonical.clone()));
    assert!(current.exists());
    assert!(canonical.exists());
}

#[test]
fn test_finish_batch_all_duplicates_counts_as_materialized() {
    // Resumed run: the canonical files landed in an earlier run under names
    // the pre-download identity could not predict, so the download repeated
    // and every hook fires against an existing target.
    let dir = TempDir::new().unwrap();
    let current = dir.path().join("Artist - Song (Official Video).mp3");
    touch(&current);
    touch(&dir.path().join("Artist - Song.mp3"));

    let files = vec![DownloadedFile {
        path: current,
        title: "Artist - Song (Official Video)".to_string(),
        playlist_index: None,
        source_url: None,
    }];
    let outcome = finish_batch(&files, &Track::default());

    assert_eq!(outcome, MaterializeOutcome::AlreadyPresent);
}

#[test]
fn test_finish_batch_only_artifacts_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let intermediate = dir.path().join("Song.webm");
    touch(&intermediate);

    let files = vec![DownloadedFile {
        path: intermediate,
        title: "Artist - Song".to_string(),
        playlist_index: None,
        source_url: None,
    }];
    let outcome = finish_batch(&files, &Track::default());

    assert_eq!(outcome, MaterializeOutcome::Failed);
}

#[tokio::test]
async fn test_materializer_existence_gate_skips_download() {
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("01 - Artist - Song.mp3"));

    let materializer = Materializer::new(dir.path().to_path_buf(), DownloadOptions::default());
    let track = Track {
        artist: Some("Artist".to_string()),
        title: Some("Song".to_string()),
        index: Some(1),
        youtube_url: Some("https://www.youtube.com/watch?v=abc123".to_string()),
        ..Track::default()
    };

    // Target on disk means no download is attempted at all
    let outcome = materializer.materialize(&track).await;
    assert_eq!(outcome, MaterializeOutcome::AlreadyPresent);
}

#[tokio::test]
async fn test_materializer_unresolved_track() {
    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path().to_path_buf(), DownloadOptions::default());

    let outcome = materializer.materialize(&Track::default()).await;
    assert_eq!(outcome, MaterializeOutcome::Unresolved);
}

#[test]
fn test_materializer_expected_target() {
    let materializer = Materializer::new(PathBuf::from("/out"), DownloadOptions::default());

    let track = Track {
        artist: Some("Artist".to_string()),
        title: Some("Song".to_string()),
        ..Track::default()
    };
    assert_eq!(
        materializer.expected_target(&track),
        Some(PathBuf::from("/out/Artist - Song.mp3"))
    );

    // No title, no predictable target
    assert_eq!(materializer.expected_target(&Track::default()), None);
}
