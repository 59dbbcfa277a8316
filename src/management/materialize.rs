use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    Res, info, tags,
    types::Track,
    utils, warning,
    youtube::{DownloadOptions, DownloadedFile, download_audio},
};

/// Per-track result of a materialization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// File downloaded, renamed and tagged in this run.
    Downloaded,
    /// The idempotence gate found the target already on disk; no download.
    AlreadyPresent,
    /// Track had no resolved YouTube URL; nothing to do.
    Unresolved,
    /// Download, rename or tag step failed; reported, siblings unaffected.
    Failed,
}

/// Result of one finish-hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// File renamed and/or retagged to its canonical path.
    Finished(PathBuf),
    /// Duplicate hook firing; the canonical file is already on disk and the
    /// reported file was left untouched. The track is materialized.
    Duplicate(PathBuf),
    /// Intermediate non-audio artifact; ignored.
    NotAudio,
}

/// What the finish hook should do for one reported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    /// Canonical target already exists and is a different file: a duplicate
    /// hook firing. Do nothing, so rename+retag runs at most once per name.
    SkipDuplicate,
    /// File already sits at the canonical path; tags may still need fixing.
    Retag,
    RenameAndTag,
}

/// Decides the finish-hook transition purely from path identity and target
/// existence. Kept free of I/O so the re-entrancy rules are testable.
pub fn plan_finish(current: &Path, canonical: &Path, canonical_exists: bool) -> FinishAction {
    if current == canonical {
        return FinishAction::Retag;
    }
    if canonical_exists {
        return FinishAction::SkipDuplicate;
    }
    FinishAction::RenameAndTag
}

/// Post-processing hook for one file the downloader reported finished.
///
/// Recomputes the canonical target name from the tool's own metadata (its
/// reported title and playlist index), since exact casing and ordering are
/// only authoritative post-fetch, then applies the at-most-once rename+retag
/// transition guarded by a target-existence check. Hooks may fire more than
/// once per logical download; the guard absorbs that.
///
/// A duplicate firing is reported as [`FinishOutcome::Duplicate`], not an
/// error: the canonical file on disk is exactly what a successful run leaves
/// behind.
pub fn finish_download(file: &DownloadedFile, track: &Track) -> Res<FinishOutcome> {
    // Guard against being invoked on intermediate non-audio artifacts.
    let is_mp3 = file
        .path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false);
    if !is_mp3 {
        return Ok(FinishOutcome::NotAudio);
    }

    let reported = utils::strip_platform_noise(&file.title);
    let (parsed_artist, title) = utils::split_artist_title(&reported);
    let artist = parsed_artist.or_else(|| track.artist.clone());
    let index = file.playlist_index.or(track.index);

    let basename = utils::target_basename(index, artist.as_deref(), &title);
    let dir = file.path.parent().unwrap_or_else(|| Path::new("."));
    let canonical = dir.join(format!("{basename}.mp3"));

    match plan_finish(&file.path, &canonical, canonical.exists()) {
        FinishAction::SkipDuplicate => return Ok(FinishOutcome::Duplicate(canonical)),
        FinishAction::Retag => {}
        FinishAction::RenameAndTag => {
            fs::rename(&file.path, &canonical)?;
        }
    }

    let provenance = file.source_url.as_deref().or(track.youtube_url.as_deref());
    tags::write_track(
        &canonical,
        &title,
        artist.as_deref(),
        track.album.as_deref(),
        provenance,
    )?;

    Ok(FinishOutcome::Finished(canonical))
}

/// Runs the finish hook for every reported file and folds the results into a
/// per-track outcome.
///
/// Duplicate firings count as materialized: the canonical file exists on
/// disk, which is all the pipeline promises. A batch that renamed or retagged
/// nothing and found no duplicate either produced only non-audio artifacts or
/// failed post-processing, and counts as failed.
pub fn finish_batch(files: &[DownloadedFile], track: &Track) -> MaterializeOutcome {
    let mut finished = 0usize;
    let mut duplicates = 0usize;
    for file in files {
        match finish_download(file, track) {
            Ok(FinishOutcome::Finished(path)) => {
                finished += 1;
                info!("Materialized {}", path.display());
            }
            Ok(FinishOutcome::Duplicate(path)) => {
                duplicates += 1;
                info!("Already materialized: {}", path.display());
            }
            Ok(FinishOutcome::NotAudio) => {}
            Err(e) => {
                warning!("Post-processing failed for {}: {}", file.path.display(), e);
            }
        }
    }

    if finished > 0 {
        MaterializeOutcome::Downloaded
    } else if duplicates > 0 {
        MaterializeOutcome::AlreadyPresent
    } else {
        MaterializeOutcome::Failed
    }
}

/// Drives the download→convert→rename→tag sequence for one resolved track,
/// with exactly-once-effect semantics under retry.
///
/// The only shared mutable resource across concurrent materializers is the
/// output directory's filename namespace, guarded solely by existence
/// checks. Two parallel tracks that sanitize to an identical name can race;
/// known limitation.
pub struct Materializer {
    out_dir: PathBuf,
    options: DownloadOptions,
}

impl Materializer {
    pub fn new(out_dir: PathBuf, options: DownloadOptions) -> Self {
        Materializer { out_dir, options }
    }

    /// The target path the pre-download identity predicts, when the track
    /// carries enough identity to predict one.
    pub fn expected_target(&self, track: &Track) -> Option<PathBuf> {
        let title = track.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }
        let basename = utils::target_basename(track.index, track.artist.as_deref(), title);
        Some(self.out_dir.join(format!("{basename}.mp3")))
    }

    /// Idempotence gate: a correctly-named file on disk means the track is
    /// already materialized and the download is skipped entirely.
    pub fn is_materialized(&self, track: &Track) -> Option<PathBuf> {
        self.expected_target(track).filter(|path| path.exists())
    }

    pub async fn materialize(&self, track: &Track) -> MaterializeOutcome {
        let Some(url) = track.youtube_url.as_deref() else {
            return MaterializeOutcome::Unresolved;
        };

        if let Some(existing) = self.is_materialized(track) {
            info!("Already materialized: {}", existing.display());
            return MaterializeOutcome::AlreadyPresent;
        }

        let files = match download_audio(url, &self.out_dir, &self.options).await {
            Ok(files) => files,
            Err(e) => {
                warning!("Download failed for {}: {}", url, e);
                return MaterializeOutcome::Failed;
            }
        };

        let outcome = finish_batch(&files, track);
        if outcome == MaterializeOutcome::Failed {
            warning!("No file materialized for {}", url);
        }
        outcome
    }
}
