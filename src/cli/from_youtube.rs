use std::path::PathBuf;

use crate::{
    error, info,
    management::{FinishOutcome, finish_download},
    success,
    types::Track,
    warning,
    youtube::{DownloadOptions, download_audio},
};

pub async fn from_youtube(playlist_url: String, directory: PathBuf, keep_intermediate: bool) {
    if playlist_url.trim().is_empty() {
        error!("Missing required playlist URL");
    }
    if let Err(e) = std::fs::create_dir_all(&directory) {
        error!("Cannot access output directory {}: {}", directory.display(), e);
    }

    let options = DownloadOptions {
        keep_intermediate,
        playlist: true,
        ..DownloadOptions::default()
    };

    // One bulk invocation; the external tool manages its own parallelism and
    // per-entry retries, we only consume its finished-file events.
    info!("Downloading playlist {}...", playlist_url);
    let files = match download_audio(&playlist_url, &directory, &options).await {
        Ok(files) => files,
        Err(e) => {
            error!("Playlist download failed: {}", e);
        }
    };

    let mut downloaded = 0usize;
    let mut failed = 0usize;
    for file in &files {
        // Identity comes from the tool's own metadata; there is no catalog
        // record to fall back to in this flow.
        let draft = Track::default();
        match finish_download(file, &draft) {
            Ok(FinishOutcome::Finished(path)) => {
                downloaded += 1;
                info!("Materialized {}", path.display());
            }
            Ok(FinishOutcome::Duplicate(path)) => {
                info!("Already materialized: {}", path.display());
            }
            Ok(FinishOutcome::NotAudio) => {}
            Err(e) => {
                failed += 1;
                warning!("Post-processing failed for {}: {}", file.path.display(), e);
            }
        }
    }

    success!(
        "TOTAL: downloaded={} failed={} (of {} reported files)",
        downloaded,
        failed,
        files.len()
    );
}
