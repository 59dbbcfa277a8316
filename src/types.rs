use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The central identity record for one piece of music at any resolution stage.
///
/// A `Track` starts empty or partially filled at discovery time (filesystem
/// walk or playlist fetch), gets enriched by the filename parser or catalog
/// metadata, and finally carries at most one external identity per service.
/// External identities are set once on successful resolution and never
/// overwritten afterwards.
#[derive(Debug, Clone, Default)]
pub struct Track {
    /// Local filesystem path, present only for locally-discovered tracks.
    pub source_path: Option<PathBuf>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    /// Playlist ordering index (1-based), when the track came from a playlist.
    pub index: Option<u32>,
    pub spotify_id: Option<String>,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub album_art_url: Option<String>,
}

impl Track {
    /// A track can be searched on Spotify as soon as it has a title.
    pub fn is_valid_for_spotify(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// YouTube search needs both artist and title to produce usable hits.
    pub fn is_valid_for_youtube(&self) -> bool {
        self.artist
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
            && self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Builds the Spotify search query for this track.
    ///
    /// Uses a field-scoped query (`artist:<artist> track:<title>`) when the
    /// artist is known, otherwise searches by title alone. Returns an empty
    /// string when the track has no title at all.
    pub fn search_query(&self) -> String {
        let title = self.title.as_deref().unwrap_or("").trim();
        if title.is_empty() {
            return String::new();
        }
        match self.artist.as_deref().map(str::trim) {
            Some(artist) if !artist.is_empty() => {
                format!("artist:{artist} track:{title}")
            }
            _ => title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: FoundTracksContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundTracksContainer {
    pub items: Vec<FoundTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<PlaylistTrackArtist>,
    pub album: PlaylistTrackAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumImage {
    pub url: String,
}

#[derive(Tabled)]
pub struct MatchTableRow {
    pub file: String,
    pub title: String,
    pub spotify: String,
}

/// Aggregate counters for the from-spotify flow summary line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncCounts {
    pub fetched: usize,
    pub resolved: usize,
    pub downloaded: usize,
    pub failed: usize,
}
