use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use mp3ify::config::Config;
use mp3ify::management::{
    MaterializeOutcome, Materializer, add_tracks, ensure_playlist, resolve_spotify,
    walk_directory,
};
use mp3ify::spotify::{SpotifyConnection, TokenManager};
use mp3ify::types::{SyncCounts, Token, Track};
use mp3ify::youtube::DownloadOptions;

/// One request as the stub API server saw it.
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    target: String,
    path: String,
    body: String,
}

async fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut parts = lines.next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body =
        String::from_utf8_lossy(&buf[header_end..header_end + content_length]).into_owned();
    let path = target.split('?').next().unwrap_or("").to_string();
    Some(Recorded {
        method,
        target,
        path,
        body,
    })
}

/// Starts a single-purpose HTTP stub on a random local port. Every request is
/// recorded, routed through `respond` and answered 200 with a JSON body.
async fn start_server<F>(respond: F) -> (String, Arc<Mutex<Vec<Recorded>>>)
where
    F: Fn(&Recorded) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    let log: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));

    let server_log = Arc::clone(&log);
    let respond = Arc::new(respond);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let respond = Arc::clone(&respond);
            let log = Arc::clone(&server_log);
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut stream).await {
                    let body = respond(&request);
                    log.lock().unwrap().push(request);
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            });
        }
    });

    (format!("http://{}", addr), log)
}

fn respond(request: &Recorded) -> String {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/api/token") => {
            r#"{"access_token":"test-access-token","token_type":"Bearer","expires_in":3600}"#
                .to_string()
        }
        ("GET", "/me") => r#"{"id":"listener-1","display_name":"Test Listener"}"#.to_string(),
        ("GET", "/search") => {
            r#"{"tracks":{"items":[{"id":"track-1","name":"Hit","uri":"spotify:track:track-1","external_urls":{"spotify":"https://open.spotify.com/track/track-1"}}]}}"#
                .to_string()
        }
        ("GET", "/me/playlists") => r#"{"items":[]}"#.to_string(),
        ("POST", "/users/listener-1/playlists") => {
            r#"{"id":"playlist-1","name":"MP3ify"}"#.to_string()
        }
        ("GET", "/playlists/fetch-1/tracks") => {
            if request.target.contains("offset=0") {
                r#"{"items":[{"track":{"id":"sp-a","name":"Song A","artists":[{"name":"Artist A"}],"album":{"name":"Album A","images":[{"url":"https://img.example/a.jpg"}]}}},{"track":{"id":"sp-b","name":"Song B","artists":[{"name":"Artist B"}],"album":{"name":"Album B","images":[]}}}]}"#
                    .to_string()
            } else {
                r#"{"items":[]}"#.to_string()
            }
        }
        ("POST", path) if path.starts_with("/playlists/") => {
            r#"{"snapshot_id":"snapshot-1"}"#.to_string()
        }
        _ => "{}".to_string(),
    }
}

fn test_config(base: &str) -> Config {
    Config {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost/callback".to_string(),
        workers: 2,
        api_url: base.to_string(),
        token_url: format!("{base}/api/token"),
    }
}

fn touch(path: &Path) {
    fs::write(path, b"").expect("create test file");
}

#[tokio::test]
async fn test_local_directory_resolves_and_adds_in_one_batch() {
    let (base, log) = start_server(respond).await;
    let config = test_config(&base);

    // Empty files carry no readable tag; identity comes from the filenames
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("01 - Artist One - Album One - Track One.mp3"));
    touch(&dir.path().join("02 - Artist One - Album One - Track Two.mp3"));
    touch(&dir.path().join("Artist Two - Album Two - Single Track.mp3"));
    let mut tracks = walk_directory(dir.path());
    assert_eq!(tracks.len(), 3);

    let connection = SpotifyConnection::connect(&config).await.expect("connect");
    assert_eq!(connection.user_id, "listener-1");

    for track in tracks.iter_mut() {
        assert!(resolve_spotify(&connection, track).await.expect("search"));
    }

    let playlist_id = ensure_playlist(&connection, "MP3ify", None)
        .await
        .expect("ensure playlist");
    assert_eq!(playlist_id, "playlist-1");

    let uris: Vec<String> = tracks
        .iter()
        .filter_map(|t| t.spotify_id.as_deref())
        .map(|id| format!("spotify:track:{id}"))
        .collect();
    assert_eq!(uris.len(), 3);

    let outcome = add_tracks(&connection, &playlist_id, &uris).await;
    assert_eq!(outcome.added, 3);
    assert_eq!(outcome.failed_batches, 0);

    // All three URLs arrive in a single add call
    let adds: Vec<Recorded> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "POST" && r.path == "/playlists/playlist-1/tracks")
        .cloned()
        .collect();
    assert_eq!(adds.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&adds[0].body).unwrap();
    assert_eq!(body["uris"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_tracks_splits_into_hundred_sized_calls() {
    let (base, log) = start_server(respond).await;
    let config = test_config(&base);
    let connection = SpotifyConnection::connect(&config).await.expect("connect");

    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:t{i}")).collect();
    let outcome = add_tracks(&connection, "playlist-1", &uris).await;
    assert_eq!(outcome.added, 250);
    assert_eq!(outcome.failed_batches, 0);

    let sizes: Vec<usize> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.method == "POST" && r.path == "/playlists/playlist-1/tracks")
        .map(|r| {
            let body: serde_json::Value = serde_json::from_str(&r.body).unwrap();
            body["uris"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn test_playlist_sync_counts_with_all_targets_on_disk() {
    let (base, _log) = start_server(respond).await;
    let config = test_config(&base);
    let connection = SpotifyConnection::connect(&config).await.expect("connect");

    // Paginated fetch: one page of two items, then an empty page
    let mut tracks: Vec<Track> = Vec::new();
    let mut offset = 0u32;
    loop {
        let items = connection
            .playlist_items("fetch-1", 100, offset)
            .await
            .expect("fetch page");
        if items.is_empty() {
            break;
        }
        offset += items.len() as u32;
        for item in items {
            let Some(found) = item.track else { continue };
            let index = tracks.len() as u32 + 1;
            tracks.push(Track {
                artist: found.artists.first().map(|a| a.name.clone()),
                album: Some(found.album.name),
                title: Some(found.name),
                index: Some(index),
                spotify_id: found.id,
                ..Track::default()
            });
        }
    }

    let mut counts = SyncCounts {
        fetched: tracks.len(),
        ..SyncCounts::default()
    };

    for track in tracks.iter_mut() {
        track.youtube_url = Some("https://www.youtube.com/watch?v=abc123".to_string());
    }
    counts.resolved = tracks.iter().filter(|t| t.youtube_url.is_some()).count();

    // Both canonical targets already on disk: the gate skips every download
    let dir = TempDir::new().unwrap();
    touch(&dir.path().join("01 - Artist A - Song A.mp3"));
    touch(&dir.path().join("02 - Artist B - Song B.mp3"));

    let materializer = Materializer::new(dir.path().to_path_buf(), DownloadOptions::default());
    for track in &tracks {
        match materializer.materialize(track).await {
            MaterializeOutcome::Downloaded | MaterializeOutcome::AlreadyPresent => {
                counts.downloaded += 1
            }
            MaterializeOutcome::Unresolved | MaterializeOutcome::Failed => counts.failed += 1,
        }
    }

    assert_eq!(counts.fetched, 2);
    assert_eq!(counts.resolved, 2);
    assert_eq!(counts.downloaded, 2);
    assert_eq!(counts.failed, 0);
}

#[test]
fn test_corrupt_token_cache_reads_as_expired() {
    // Zeroed timestamps from a bad cache file must not panic the check
    let token = Token {
        access_token: "stale".to_string(),
        refresh_token: String::new(),
        scope: String::new(),
        expires_in: 0,
        obtained_at: 0,
    };
    let manager = TokenManager::new(token);
    assert!(manager.is_expired());
}
