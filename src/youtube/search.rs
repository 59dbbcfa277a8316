use std::process::Stdio;

use tokio::process::Command;

use crate::Res;

/// Searches YouTube and returns the link of the first hit.
///
/// Runs `yt-dlp --flat-playlist -J "ytsearch1:<query>"` and extracts the
/// first entry's URL from the JSON dump. Selection policy is strictly
/// first-result, limited to one; the caller biases the query (e.g. by
/// appending "audio") rather than re-ranking here.
///
/// Returns `Ok(None)` when the search yields no entries, which is a normal
/// per-track miss.
///
/// # Errors
///
/// Fails when `yt-dlp` is not installed, exits non-zero, or emits JSON
/// without the expected shape.
pub async fn search_video(query: &str) -> Res<Option<String>> {
    let output = Command::new("yt-dlp")
        .arg("--flat-playlist")
        .arg("-J")
        .arg(format!("ytsearch1:{query}"))
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(map_spawn_error)?;

    if !output.status.success() {
        return Err(format!(
            "yt-dlp search exited with status {}",
            output.status.code().unwrap_or(-1)
        )
        .into());
    }

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entries = match parsed.get("entries").and_then(|v| v.as_array()) {
        Some(entries) => entries,
        None => return Ok(None),
    };

    Ok(entries.first().and_then(video_url_from_entry))
}

fn video_url_from_entry(entry: &serde_json::Value) -> Option<String> {
    if let Some(url) = entry.get("url").and_then(|v| v.as_str()) {
        if url.contains("://") {
            return Some(url.to_string());
        }
    }

    entry
        .get("id")
        .and_then(|v| v.as_str())
        .map(|id| format!("https://www.youtube.com/watch?v={id}"))
}

pub(crate) fn map_spawn_error(err: std::io::Error) -> Box<dyn std::error::Error + Send + Sync> {
    if err.kind() == std::io::ErrorKind::NotFound {
        return "yt-dlp was not found in PATH. Install it from https://github.com/yt-dlp/yt-dlp and try again."
            .to_string()
            .into();
    }
    err.into()
}
