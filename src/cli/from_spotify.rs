use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    error, info, management,
    management::{MaterializeOutcome, Materializer},
    spotify::SpotifyConnection,
    success,
    types::{PlaylistItem, SyncCounts, Track},
    warning,
    youtube::DownloadOptions,
};

/// Page size for the playlist-item fetch loop.
const FETCH_PAGE_SIZE: u32 = 100;

pub async fn from_spotify(config: Config, playlist_id: String, directory: PathBuf) {
    if playlist_id.trim().is_empty() {
        error!("Missing required playlist id");
    }
    if let Err(e) = std::fs::create_dir_all(&directory) {
        error!("Cannot access output directory {}: {}", directory.display(), e);
    }

    let connection = match SpotifyConnection::connect(&config).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Cannot connect to Spotify: {}", e);
        }
    };

    info!("Fetching playlist {}...", playlist_id);
    let mut tracks: Vec<Track> = Vec::new();
    let mut offset: u32 = 0;
    loop {
        let items = match connection
            .playlist_items(&playlist_id, FETCH_PAGE_SIZE, offset)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                error!("Cannot fetch playlist {}: {}", playlist_id, e);
            }
        };
        if items.is_empty() {
            break;
        }
        offset += items.len() as u32;

        for item in items {
            let index = tracks.len() as u32 + 1;
            if let Some(track) = playlist_item_to_track(item, index) {
                tracks.push(track);
            }
        }
    }

    let mut counts = SyncCounts {
        fetched: tracks.len(),
        ..SyncCounts::default()
    };
    if tracks.is_empty() {
        success!("Playlist is empty. Nothing to do.");
        return;
    }
    info!("Fetched {} tracks", counts.fetched);

    // Phase 1: resolve every track against YouTube on a bounded pool. All
    // resolutions complete before any download starts.
    let pb = progress_bar("Resolving tracks against YouTube...", counts.fetched);
    let pb_resolve = pb.clone();
    let resolved: Vec<Track> = management::map_bounded(config.workers, tracks, move |mut track| {
        let pb = pb_resolve.clone();
        async move {
            let label = track.title.clone().unwrap_or_default();
            match management::resolve_youtube(&mut track).await {
                Ok(true) => {}
                Ok(false) => warning!("No YouTube match for '{}'", label),
                Err(e) => warning!("YouTube search failed for '{}': {}", label, e),
            }
            pb.inc(1);
            track
        }
    })
    .await;
    pb.finish_and_clear();

    let (to_download, misses): (Vec<Track>, Vec<Track>) = resolved
        .into_iter()
        .partition(|t| t.youtube_url.is_some());
    counts.resolved = to_download.len();
    counts.failed += misses.len();

    // Phase 2: materialize each resolved track on a second pool of the same
    // shape. The output directory's namespace is the only shared state.
    let materializer = Arc::new(Materializer::new(
        directory.clone(),
        DownloadOptions::default(),
    ));
    let pb = progress_bar("Downloading tracks...", counts.resolved);
    let pb_download = pb.clone();
    let outcomes = management::map_bounded(config.workers, to_download, move |track| {
        let materializer = Arc::clone(&materializer);
        let pb = pb_download.clone();
        async move {
            let outcome = materializer.materialize(&track).await;
            pb.inc(1);
            outcome
        }
    })
    .await;
    pb.finish_and_clear();

    for outcome in outcomes {
        match outcome {
            MaterializeOutcome::Downloaded | MaterializeOutcome::AlreadyPresent => {
                counts.downloaded += 1
            }
            MaterializeOutcome::Unresolved | MaterializeOutcome::Failed => counts.failed += 1,
        }
    }

    success!(
        "TOTAL: fetched={} resolved={} downloaded={} failed={}",
        counts.fetched,
        counts.resolved,
        counts.downloaded,
        counts.failed
    );
}

fn playlist_item_to_track(item: PlaylistItem, index: u32) -> Option<Track> {
    let track = item.track?;
    Some(Track {
        source_path: None,
        artist: track.artists.first().map(|a| a.name.clone()),
        album: Some(track.album.name),
        title: Some(track.name),
        index: Some(index),
        spotify_id: track.id,
        spotify_url: None,
        youtube_url: None,
        album_art_url: track.album.images.first().map(|i| i.url.clone()),
    })
}

fn progress_bar(message: &'static str, len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
