use crate::{Res, spotify::SpotifyConnection, types::Track, youtube};

/// Resolves a track against the Spotify catalog, attaching `spotify_id` and
/// `spotify_url` from the first search hit.
///
/// Preconditions and invariants:
/// - requires a title (`Track::is_valid_for_spotify`), otherwise `Ok(false)`;
/// - an already-resolved track is left untouched: a confirmed identity is
///   never overwritten by a later attempt;
/// - `Ok(false)` is a resolution miss, a normal per-track outcome. Only
///   transport failures surface as errors, and the caller treats those as
///   per-track failures too.
pub async fn resolve_spotify(
    connection: &SpotifyConnection,
    track: &mut Track,
) -> Result<bool, reqwest::Error> {
    if track.spotify_url.is_some() {
        return Ok(true);
    }
    if !track.is_valid_for_spotify() {
        return Ok(false);
    }

    match connection.search_track(&track.search_query()).await? {
        Some(found) => {
            track.spotify_id = Some(found.id);
            track.spotify_url = Some(found.external_urls.spotify);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Resolves a track against YouTube search, attaching `youtube_url` from the
/// first hit's link.
///
/// The query joins artist, title and (when present) album with single spaces
/// and appends the literal word "audio" to bias results toward audio-only
/// uploads over music videos. Same policy as the Spotify instantiation:
/// requires artist and title, never overwrites a confirmed identity, and a
/// miss is `Ok(false)`.
pub async fn resolve_youtube(track: &mut Track) -> Res<bool> {
    if track.youtube_url.is_some() {
        return Ok(true);
    }
    if !track.is_valid_for_youtube() {
        return Ok(false);
    }

    let mut terms: Vec<&str> = Vec::new();
    let artist = track.artist.as_deref().unwrap_or_default();
    let title = track.title.as_deref().unwrap_or_default();
    terms.push(artist);
    terms.push(title);
    if let Some(album) = track.album.as_deref() {
        if !album.trim().is_empty() {
            terms.push(album);
        }
    }
    terms.push("audio");
    let query = terms.join(" ");

    match youtube::search_video(&query).await? {
        Some(url) => {
            track.youtube_url = Some(url);
            Ok(true)
        }
        None => Ok(false),
    }
}
