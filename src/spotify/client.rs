use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Config,
    spotify::TokenManager,
    types::{
        AddTracksToPlaylistRequest, AddTracksToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUserResponse, FoundTrack, GetUserPlaylistsResponse,
        Playlist, PlaylistItem, PlaylistItemsResponse, SearchTracksResponse,
    },
    warning,
};

/// An authenticated handle to the Spotify Web API.
///
/// Constructed once at flow startup from the immutable [`Config`]; carries the
/// HTTP client, the API base URL, the bearer token and the resolved user
/// identity. The handle performs no interior mutation and is safe to share
/// across concurrent search workers, relying on reqwest's connection pool to
/// multiplex requests.
pub struct SpotifyConnection {
    http: Client,
    api_url: String,
    token: String,
    pub user_id: String,
    pub display_name: Option<String>,
}

impl SpotifyConnection {
    /// Establishes an authenticated connection and resolves the current user.
    ///
    /// Loads (or obtains) an access token through [`TokenManager`] and calls
    /// `GET /me` to learn the user id needed for playlist ownership. Any
    /// failure here is a fatal precondition failure: no per-track work can
    /// proceed without a working connection.
    ///
    /// # Errors
    ///
    /// Returns an error string when the token cannot be acquired or the user
    /// lookup fails (bad credentials, network down, revoked access).
    pub async fn connect(config: &Config) -> Result<Self, String> {
        let mut token_mgr = TokenManager::load_or_obtain(config).await?;
        let token = token_mgr.get_valid_token(config).await?;

        let http = Client::new();
        let api_url = config.api_url.clone();

        let user: CurrentUserResponse = get_with_retry(
            &http,
            &format!("{api_url}/me", api_url = api_url),
            &[],
            &token,
        )
        .await
        .map_err(|e| format!("Cannot resolve current user: {e}"))?;

        Ok(SpotifyConnection {
            http,
            api_url,
            token,
            user_id: user.id,
            display_name: user.display_name,
        })
    }

    /// Searches the catalog for one track and returns the first hit.
    ///
    /// The query is taken as-is (see `Track::search_query` for construction)
    /// and the result is limited to a single item; no scoring beyond what
    /// Spotify ranks first. `Ok(None)` is a resolution miss, a normal
    /// per-track outcome, not an error.
    pub async fn search_track(&self, query: &str) -> Result<Option<FoundTrack>, reqwest::Error> {
        let url = format!("{uri}/search", uri = &self.api_url);
        let res: SearchTracksResponse = get_with_retry(
            &self.http,
            &url,
            &[("q", query), ("type", "track"), ("limit", "1")],
            &self.token,
        )
        .await?;

        Ok(res.tracks.items.into_iter().next())
    }

    /// Lists the user's playlists.
    ///
    /// Fetches the first page only (limit 50); playlists beyond the first
    /// batch are not visible to the lookup. Known limitation, acceptable for
    /// single-user interactive usage.
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>, reqwest::Error> {
        let url = format!("{uri}/me/playlists", uri = &self.api_url);
        let res: GetUserPlaylistsResponse =
            get_with_retry(&self.http, &url, &[("limit", "50")], &self.token).await?;
        Ok(res.items)
    }

    /// Creates a new private playlist owned by the connected user.
    pub async fn create_playlist(
        &self,
        name: &str,
    ) -> Result<CreatePlaylistResponse, reqwest::Error> {
        let url = format!(
            "{uri}/users/{user}/playlists",
            uri = &self.api_url,
            user = &self.user_id
        );
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: format!("Created by mp3ify for {name}"),
            public: false,
            collaborative: false,
        };

        post_with_retry(&self.http, &url, &body, &self.token).await
    }

    /// Adds one batch of track URLs/URIs to a playlist.
    ///
    /// The caller is responsible for batching (100 per call, the API's batch
    /// ceiling). No de-duplication against existing membership is performed;
    /// duplicates on repeated runs follow the service's own policy.
    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: Vec<String>,
    ) -> Result<AddTracksToPlaylistResponse, reqwest::Error> {
        let url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &self.api_url,
            id = playlist_id
        );
        let body = AddTracksToPlaylistRequest { uris };

        post_with_retry(&self.http, &url, &body, &self.token).await
    }

    /// Fetches one page of a playlist's items at the given offset.
    ///
    /// An empty page signals the end of the playlist; callers repeat with an
    /// increasing offset until that happens.
    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PlaylistItem>, reqwest::Error> {
        let url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &self.api_url,
            id = playlist_id
        );
        let limit = limit.to_string();
        let offset = offset.to_string();
        let res: PlaylistItemsResponse = get_with_retry(
            &self.http,
            &url,
            &[("limit", limit.as_str()), ("offset", offset.as_str())],
            &self.token,
        )
        .await?;

        Ok(res.items)
    }
}

async fn get_with_retry<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    token: &str,
) -> Result<T, reqwest::Error> {
    loop {
        let response = http
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await;

        match check_response(response).await? {
            Checked::Retry => continue,
            Checked::Ready(response) => return response.json::<T>().await,
        }
    }
}

async fn post_with_retry<B: serde::Serialize, T: DeserializeOwned>(
    http: &Client,
    url: &str,
    body: &B,
    token: &str,
) -> Result<T, reqwest::Error> {
    loop {
        let response = http.post(url).json(body).bearer_auth(token).send().await;

        match check_response(response).await? {
            Checked::Retry => continue,
            Checked::Ready(response) => return response.json::<T>().await,
        }
    }
}

enum Checked {
    Retry,
    Ready(reqwest::Response),
}

/// Shared resilience policy: retry 502 after 10s, honor Retry-After on 429
/// up to 120s, propagate everything else.
async fn check_response(
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<Checked, reqwest::Error> {
    let response = response?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        if let Some(retry_after) = response.headers().get("retry-after") {
            let retry_after = retry_after
                .to_str()
                .unwrap_or("0")
                .parse::<u64>()
                .unwrap_or(0);
            if retry_after <= 120 {
                sleep(Duration::from_secs(retry_after)).await;
                return Ok(Checked::Retry);
            }
            warning!(
                "Retry after has reached an abnormal high of {} seconds. Try your best tomorrow again.",
                retry_after
            );
        }
    }

    match response.error_for_status() {
        Ok(valid_response) => Ok(Checked::Ready(valid_response)),
        Err(err) => {
            if let Some(status) = err.status() {
                if status == StatusCode::BAD_GATEWAY {
                    sleep(Duration::from_secs(10)).await;
                    return Ok(Checked::Retry); // retry
                }
            }
            Err(err) // propagate other errors
        }
    }
}
