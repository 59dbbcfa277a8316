use std::path::Path;

use crate::types::Track;

const ILLEGAL_FILENAME_CHARS: &[char] =
    &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

const NOISE_QUALIFIERS: &[&str] = &["official video", "music video", "lyric video", "audio"];

pub fn parse_filename_stem(stem: &str) -> Track {
    let normalized = stem.replace('_', " ");
    let segments: Vec<&str> = normalized.split('-').map(str::trim).collect();

    let mut track = Track::default();
    match segments.len() {
        // TrackNo - Artist - Album - Title; the leading track number is discarded
        4 => {
            track.artist = Some(segments[1].to_string());
            track.album = Some(segments[2].to_string());
            track.title = Some(segments[3].to_string());
        }
        3 => {
            track.artist = Some(segments[0].to_string());
            track.album = Some(segments[1].to_string());
            track.title = Some(segments[2].to_string());
        }
        // Album - Title; the artist cannot be reliably inferred
        2 => {
            track.album = Some(segments[0].to_string());
            track.title = Some(segments[1].to_string());
        }
        _ => {
            track.title = Some(collapse_whitespace(&normalized));
        }
    }
    track
}

pub fn parse_track_from_path(path: &Path) -> Track {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let mut track = parse_filename_stem(stem);
    track.source_path = Some(path.to_path_buf());
    track
}

pub fn sanitize_for_filesystem(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect();
    collapse_whitespace(&cleaned)
}

/// Strips platform noise from a video title before it reaches the filesystem
/// filter: parenthesized "(Official Video)"-style qualifiers, bracketed
/// annotations, and everything from the first channel-branding marker
/// (`|`, `//`, `#` or `*`) onwards.
pub fn strip_platform_noise(raw_title: &str) -> String {
    let mut text = raw_title.to_string();

    text = remove_delimited(&text, '(', ')', |inner| {
        let inner = inner.to_lowercase();
        NOISE_QUALIFIERS.iter().any(|q| inner.contains(q))
    });
    text = remove_delimited(&text, '[', ']', |_| true);

    let cut = ["|", "//", "#", "*"]
        .iter()
        .filter_map(|marker| text.find(marker))
        .min();
    if let Some(pos) = cut {
        text.truncate(pos);
    }

    collapse_whitespace(&text)
}

pub fn split_artist_title(normalized: &str) -> (Option<String>, String) {
    if let Some((left, right)) = normalized.split_once(" - ") {
        let artist = left.trim();
        let title = right.trim();
        if !artist.is_empty() && !title.is_empty() {
            return (Some(artist.to_string()), title.to_string());
        }
    }
    (None, normalized.trim().to_string())
}

/// Builds the canonical filesystem-safe base name for a materialized track:
/// `<index> - <artist> - <title>` when an ordering index is known, else
/// `<artist> - <title>`, falling back to the bare title.
pub fn target_basename(index: Option<u32>, artist: Option<&str>, title: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(i) = index {
        parts.push(format!("{i:02}"));
    }
    if let Some(artist) = artist {
        if !artist.trim().is_empty() {
            parts.push(artist.trim().to_string());
        }
    }
    parts.push(title.trim().to_string());
    sanitize_for_filesystem(&parts.join(" - "))
}

pub fn list_chunks<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn remove_delimited<F>(text: &str, open: char, close: char, should_remove: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let Some(len) = rest[start..].find(close) else {
            break;
        };
        let inner = &rest[start + open.len_utf8()..start + len];
        if should_remove(inner) {
            out.push_str(&rest[..start]);
        } else {
            out.push_str(&rest[..start + len + close.len_utf8()]);
        }
        rest = &rest[start + len + close.len_utf8()..];
    }
    out.push_str(rest);
    out
}
