//! # YouTube Integration Module
//!
//! Search and audio download against YouTube, implemented on top of the
//! external `yt-dlp` binary driven through `tokio::process`. The binary is a
//! collaborator: it owns stream selection, MP3 transcoding and its own retry
//! count; this module only constructs invocations and parses their output
//! into typed results.
//!
//! - [`search`] - first-hit video search using the `ytsearch1:` prefix
//! - [`download`] - audio download producing [`download::DownloadedFile`]
//!   events, one per file the tool reports finished (the post-processing
//!   hook feed consumed by the materializer)

pub mod download;
pub mod search;

pub use download::{DownloadOptions, DownloadedFile, download_audio};
pub use search::search_video;
