use std::path::Path;

use walkdir::WalkDir;

use crate::{tags, types::Track, utils};

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walks `dir` recursively and builds a `Track` draft per MP3 file.
///
/// Embedded ID3 tags win when present; files without a readable tag fall
/// back to the filename heuristic (`utils::parse_filename_stem`). Unreadable
/// entries are skipped, never fatal.
pub fn walk_directory(dir: &Path) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_mp3(path) {
            continue;
        }

        let track = tags::read_track(path).unwrap_or_else(|| utils::parse_track_from_path(path));
        tracks.push(track);
    }

    tracks
}
