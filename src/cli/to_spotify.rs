use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error, info, management,
    spotify::SpotifyConnection,
    success,
    types::{MatchTableRow, Track},
    warning,
};

pub async fn to_spotify(config: Config, directory: PathBuf, playlist_name: String) {
    if !directory.is_dir() {
        error!("Directory {} does not exist or is not a directory", directory.display());
    }

    let connection = match SpotifyConnection::connect(&config).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Cannot connect to Spotify: {}", e);
        }
    };
    info!(
        "User: {} ({})",
        connection.display_name.as_deref().unwrap_or("unknown"),
        connection.user_id
    );

    info!("Scanning {} for MP3 files...", directory.display());
    let mut tracks = management::walk_directory(&directory);
    let total = tracks.len();
    if tracks.is_empty() {
        success!("No MP3 files found in {}. Nothing to do.", directory.display());
        return;
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_message("Resolving tracks against Spotify...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} {pos}/{len}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    // Sequential resolution: network-bound but order-independent.
    for track in tracks.iter_mut() {
        let label = track
            .title
            .clone()
            .or_else(|| {
                track
                    .source_path
                    .as_ref()
                    .map(|p| p.display().to_string())
            })
            .unwrap_or_default();

        match management::resolve_spotify(&connection, track).await {
            Ok(true) => {}
            Ok(false) => warning!("No Spotify match for '{}'", label),
            Err(e) => warning!("Search failed for '{}': {}", label, e),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut matched: Vec<&Track> = Vec::new();
    let mut rows: Vec<MatchTableRow> = Vec::new();
    for track in &tracks {
        if track.spotify_url.is_some() {
            matched.push(track);
            rows.push(MatchTableRow {
                file: track
                    .source_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                title: track.title.clone().unwrap_or_default(),
                spotify: track.spotify_url.clone().unwrap_or_default(),
            });
        }
    }

    if matched.is_empty() {
        success!("TOTAL: {} Spotify: 0. Nothing to add.", total);
        return;
    }
    println!("{}", Table::new(&rows));

    let playlist_id = match management::ensure_playlist(&connection, &playlist_name, None).await {
        Ok(id) => id,
        Err(e) => {
            error!("Cannot ensure playlist '{}': {}", playlist_name, e);
        }
    };

    // The add endpoint wants URI form; resolution stored both id and URL.
    let uris: Vec<String> = matched
        .iter()
        .filter_map(|t| t.spotify_id.as_ref())
        .map(|id| format!("spotify:track:{id}"))
        .collect();

    let outcome = management::add_tracks(&connection, &playlist_id, &uris).await;
    if outcome.failed_batches > 0 {
        warning!("{} batch(es) failed to add", outcome.failed_batches);
    }

    success!("TOTAL: {} Spotify: {}", total, matched.len());
}
