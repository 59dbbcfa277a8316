use crate::{info, spotify::SpotifyConnection, success, types::Playlist, utils, warning};

/// Spotify accepts at most 100 track URIs per add call.
const ADD_BATCH_SIZE: usize = 100;

/// Outcome of a best-effort multi-batch append.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOutcome {
    pub added: usize,
    pub failed_batches: usize,
}

/// Ensures a playlist with the given name (or explicit id) exists and
/// returns its id.
///
/// Lookup covers the first page of the user's playlists only and matches by
/// exact name equality, or by id when one is supplied. When nothing matches,
/// a new private playlist is created. The lookup-then-create sequence is not
/// atomic against a concurrent external creation; acceptable for single-user
/// interactive usage.
pub async fn ensure_playlist(
    connection: &SpotifyConnection,
    name: &str,
    id: Option<&str>,
) -> Result<String, reqwest::Error> {
    let playlists: Vec<Playlist> = connection.list_playlists().await?;

    let existing = playlists
        .iter()
        .find(|p| p.name == name || id.is_some_and(|id| p.id == id));
    if let Some(playlist) = existing {
        info!("Playlist '{}' already exists ({})", playlist.name, playlist.id);
        return Ok(playlist.id.clone());
    }

    let created = connection.create_playlist(name).await?;
    success!("Created playlist '{}' ({})", created.name, created.id);
    Ok(created.id)
}

/// Appends `urls` to the playlist in fixed-size batches, in order.
///
/// A failed batch is reported and counted, and the append continues with the
/// remaining batches; this is a best-effort append, not a transaction. No
/// pre-add dedup against existing membership is performed.
pub async fn add_tracks(
    connection: &SpotifyConnection,
    playlist_id: &str,
    urls: &[String],
) -> AddOutcome {
    let mut outcome = AddOutcome::default();

    for batch in utils::list_chunks(urls, ADD_BATCH_SIZE) {
        let size = batch.len();
        match connection.add_tracks(playlist_id, batch).await {
            Ok(_) => outcome.added += size,
            Err(e) => {
                warning!("Failed to add a batch of {} tracks: {}", size, e);
                outcome.failed_batches += 1;
            }
        }
    }

    outcome
}
