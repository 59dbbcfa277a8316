use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use mp3ify::{cli, config, config::Config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// OAuth2 client id (defaults to SPOTIFY_CLIENT_ID)
    #[clap(long, global = true)]
    client_id: Option<String>,

    /// OAuth2 client secret (defaults to SPOTIFY_CLIENT_SECRET)
    #[clap(long, global = true)]
    client_secret: Option<String>,

    /// OAuth2 redirect URI (defaults to SPOTIFY_REDIRECT_URI)
    #[clap(long, global = true)]
    redirect_uri: Option<String>,

    /// Maximum parallel workers; 0 means system-chosen
    #[clap(long, global = true)]
    workers: Option<usize>,

    /// Path to a .env file to load before resolving credentials
    #[clap(long, global = true)]
    env_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Match local MP3 files to Spotify tracks and populate a playlist
    ToSpotify(ToSpotifyOptions),

    /// Download a Spotify playlist via YouTube into a local directory
    FromSpotify(FromSpotifyOptions),

    /// Bulk-download a YouTube playlist into a local directory
    FromYoutube(FromYoutubeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ToSpotifyOptions {
    /// Directory to scan recursively for MP3 files
    #[clap(long, short = 'd', default_value = "mp3/")]
    pub directory: PathBuf,

    /// Playlist name; reused when it exists, created otherwise
    #[clap(long, default_value = "MP3ify")]
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct FromSpotifyOptions {
    /// Spotify playlist id to download
    #[clap(long)]
    pub playlist_id: Option<String>,

    /// Output directory for downloaded MP3 files
    #[clap(long, short = 'd', default_value = "mp3/")]
    pub directory: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct FromYoutubeOptions {
    /// YouTube playlist URL to download
    #[clap(long)]
    pub playlist_url: Option<String>,

    /// Output directory for downloaded MP3 files
    #[clap(long, short = 'd', default_value = "mp3/")]
    pub directory: PathBuf,

    /// Keep intermediate pre-transcode files
    #[clap(long)]
    pub keep_intermediate_files: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = config::load_env(cli.env_file.clone()).await {
        error!("Cannot load environment. Err: {}", e);
    }

    // Completions need no credentials; resolve config lazily per command.
    match cli.command.clone() {
        Command::ToSpotify(opt) => {
            let config = resolve_config(&cli);
            cli::to_spotify(config, opt.directory, opt.playlist).await
        }
        Command::FromSpotify(opt) => {
            let config = resolve_config(&cli);
            // Missing id is a precondition failure (exit 1), not a usage error.
            let playlist_id = opt.playlist_id.unwrap_or_default();
            cli::from_spotify(config, playlist_id, opt.directory).await
        }
        Command::FromYoutube(opt) => {
            let playlist_url = opt.playlist_url.unwrap_or_default();
            cli::from_youtube(playlist_url, opt.directory, opt.keep_intermediate_files).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn resolve_config(cli: &Cli) -> Config {
    match Config::resolve(
        cli.client_id.clone(),
        cli.client_secret.clone(),
        cli.redirect_uri.clone(),
        cli.workers,
    ) {
        Ok(config) => config,
        Err(e) => {
            error!("Missing credentials: {}", e);
        }
    }
}
