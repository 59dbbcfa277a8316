//! MP3 ⇄ Spotify ⇄ YouTube Sync CLI Library
//!
//! This library provides functionality for synchronizing music between a local
//! MP3 collection, Spotify playlists, and YouTube. It includes modules for API
//! communication, CLI operations, configuration management, and the
//! track-resolution and file-materialization pipelines.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations (the three sync flows)
//! - `config` - Configuration management and environment variables
//! - `management` - Track scanning, resolution, reconciliation and materialization
//! - `spotify` - Spotify Web API client implementation
//! - `tags` - ID3 tag reading and writing on local audio files
//! - `types` - Data structures and type definitions
//! - `utils` - Filename parsing, title sanitizing and other helpers
//! - `youtube` - YouTube search and audio download via yt-dlp
//!
//! # Example
//!
//! ```
//! use mp3ify::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> mp3ify::Res<()> {
//!     config::load_env(None).await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod management;
pub mod spotify;
pub mod tags;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use mp3ify::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Scanning {} for MP3 files...", dir.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Downloaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable setup
/// errors (missing credentials, inaccessible directories, connection
/// failures) that must abort before any per-track work begins.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal setup errors where
/// recovery is not possible; per-track failures use `warning!` instead.
///
/// # Example
///
/// ```
/// error!("Missing required --playlist-id");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// recoverable issues. Per-track resolution misses and transient network
/// failures are reported through this macro and counted, never raised.
///
/// # Example
///
/// ```
/// warning!("No Spotify match for '{}'", title);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
