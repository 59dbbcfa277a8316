//! ID3 tag boundary: reading identity out of local audio files during the
//! directory scan and writing corrected tags after materialization.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};

use crate::{Res, types::Track};

/// Reads artist/album/title from the file's primary tag into a fresh `Track`.
///
/// Returns `None` when the file has no readable tag container or when the
/// container carries no usable title; callers fall back to the filename
/// heuristic in that case.
pub fn read_track(path: &Path) -> Option<Track> {
    let tagged = lofty::read_from_path(path).ok()?;
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;

    let title = non_empty(tag.title().as_deref());
    title.as_ref()?;

    Some(Track {
        source_path: Some(path.to_path_buf()),
        artist: non_empty(tag.artist().as_deref()),
        album: non_empty(tag.album().as_deref()),
        title,
        ..Track::default()
    })
}

/// Overwrites title/artist (and album when known) on the file's tag,
/// creating an empty ID3v2 container if the file has none, and records the
/// original source URL in the comment field for provenance.
pub fn write_track(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    source_url: Option<&str>,
) -> Res<()> {
    let mut tag = match lofty::read_from_path(path) {
        Ok(tagged) => tagged
            .primary_tag()
            .or_else(|| tagged.first_tag())
            .cloned()
            .unwrap_or_else(|| Tag::new(TagType::Id3v2)),
        Err(_) => Tag::new(TagType::Id3v2),
    };

    tag.set_title(title.to_string());
    if let Some(artist) = artist {
        tag.set_artist(artist.to_string());
    }
    if let Some(album) = album {
        tag.set_album(album.to_string());
    }
    if let Some(url) = source_url {
        tag.insert_text(ItemKey::Comment, url.to_string());
    }

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
