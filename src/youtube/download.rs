use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::Res;
use crate::youtube::search::map_spawn_error;

/// One file the downloader reported finished.
///
/// Parsed from a `--print after_move:` line, so `title` and `playlist_index`
/// are the tool's own post-fetch metadata, authoritative over whatever was
/// guessed before the download started.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub title: String,
    pub playlist_index: Option<u32>,
    /// The video page the file came from, for provenance tagging.
    pub source_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Retry count handed to the external tool; download retries are its job.
    pub retries: u32,
    /// Keep intermediate (pre-transcode) files on disk.
    pub keep_intermediate: bool,
    /// Download a whole playlist instead of a single video.
    pub playlist: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions {
            retries: 3,
            keep_intermediate: false,
            playlist: false,
        }
    }
}

/// Field separator for the after_move print line; illegal in YouTube titles'
/// surrounding fields (index and filepath) and stripped from our parse.
const PRINT_SEPARATOR: char = '\u{1f}';

/// Downloads the best audio stream of `url` as MP3 into `out_dir`.
///
/// Invokes `yt-dlp -x --audio-format mp3` with an output template below
/// `out_dir` and a `--print after_move:` template that emits one
/// `index␟title␟url␟filepath` line per finished file. Those lines are parsed
/// into [`DownloadedFile`] events and returned in emission order; the caller
/// runs the finish hook (rename + retag) on each.
///
/// With `--ignore-errors` a playlist download keeps going past broken
/// entries, so the returned events may cover only a subset of the playlist.
///
/// # Errors
///
/// Fails when the tool cannot be spawned or exits non-zero without having
/// produced any finished file.
pub async fn download_audio(
    url: &str,
    out_dir: &Path,
    options: &DownloadOptions,
) -> Res<Vec<DownloadedFile>> {
    let output_template = out_dir.join("%(title)s.%(ext)s");
    let print_template = format!(
        "after_move:%(playlist_index|)s{sep}%(title)s{sep}%(webpage_url)s{sep}%(filepath)s",
        sep = PRINT_SEPARATOR
    );

    let mut command = Command::new("yt-dlp");
    command
        .arg("--ignore-errors")
        .arg("--continue")
        .arg("-x")
        .arg("--audio-format")
        .arg("mp3")
        .arg("--retries")
        .arg(options.retries.to_string())
        .arg("--output")
        .arg(&output_template)
        .arg("--print")
        .arg(&print_template)
        .arg("--no-simulate");

    if options.playlist {
        command.arg("--yes-playlist");
    } else {
        command.arg("--no-playlist");
    }
    if options.keep_intermediate {
        command.arg("--keep-video");
    }

    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let output = command.output().await.map_err(map_spawn_error)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files: Vec<DownloadedFile> = stdout.lines().filter_map(parse_print_line).collect();

    if files.is_empty() && !output.status.success() {
        return Err(format!(
            "yt-dlp exited with status {}",
            output.status.code().unwrap_or(-1)
        )
        .into());
    }

    Ok(files)
}

fn parse_print_line(line: &str) -> Option<DownloadedFile> {
    let mut parts = line.splitn(4, PRINT_SEPARATOR);
    let index = parts.next()?.trim();
    let title = parts.next()?.trim();
    let source_url = parts.next()?.trim();
    let filepath = parts.next()?.trim();
    if filepath.is_empty() {
        return None;
    }

    Some(DownloadedFile {
        path: PathBuf::from(filepath),
        title: title.to_string(),
        playlist_index: index.parse::<u32>().ok(),
        source_url: (!source_url.is_empty() && source_url != "NA")
            .then(|| source_url.to_string()),
    })
}
