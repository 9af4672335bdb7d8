use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use musixmatch_api::MusixmatchClient;
use musixmatch_api::auth::{Credentials, default_cache_dirs, locate_credentials};
use musixmatch_api::types::{LengthFilter, SearchQuery};

#[derive(Parser)]
#[command(
    name = "mxmlyrics",
    version,
    about = "Fetch synchronized lyrics with your Musixmatch desktop app credentials"
)]
struct Cli {
    /// Cache directory to search for credentials (repeatable; defaults to
    /// the Musixmatch app's cache locations)
    #[arg(long = "cache-dir", value_name = "PATH", global = true)]
    cache_dirs: Vec<PathBuf>,
    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the credentials found in the app cache
    Credentials,
    /// Search for a track and print its lyrics
    Lyrics(LyricsArgs),
    /// Print word-level timed lyrics for a Musixmatch track id
    Richsync {
        /// Musixmatch track id
        track_id: u64,
    },
}

#[derive(Args)]
struct LyricsArgs {
    /// Song title
    #[arg(short, long)]
    title: Option<String>,
    /// Song or album artist
    #[arg(short, long)]
    artist: Option<String>,
    /// Album title
    #[arg(short = 'l', long)]
    album: Option<String>,
    /// Spotify track id, e.g. `spotify:track:4dfKz7RAHpo6ZCoCL8Rlrb`
    #[arg(short, long)]
    spotify_id: Option<String>,
    /// Song length in seconds
    #[arg(long, value_name = "SECONDS")]
    length: Option<f64>,
    /// Allowed deviation from --length, in seconds
    #[arg(long, value_name = "SECONDS", default_value = "2", requires = "length")]
    max_deviation: u32,
    /// Also fetch richsync lyrics when available
    #[arg(short, long)]
    richsync: bool,
    /// Print the full API response instead of the short result
    #[arg(long)]
    raw: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let search_paths = if cli.cache_dirs.is_empty() {
        default_cache_dirs()
    } else {
        cli.cache_dirs
    };

    match cli.command {
        Command::Credentials => cmd_credentials(&search_paths),
        Command::Lyrics(args) => cmd_lyrics(&search_paths, args),
        Command::Richsync { track_id } => cmd_richsync(&search_paths, track_id),
    }
}

fn init_logger(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn credentials(search_paths: &[PathBuf]) -> Result<Credentials> {
    locate_credentials(search_paths).context(
        "no Musixmatch credentials found; open the Musixmatch app and let it show some lyrics",
    )
}

// ── credentials ──

fn cmd_credentials(search_paths: &[PathBuf]) -> Result<()> {
    let credentials = credentials(search_paths)?;
    println!("{}", serde_json::to_string_pretty(&credentials)?);
    Ok(())
}

// ── lyrics / richsync ──

fn cmd_lyrics(search_paths: &[PathBuf], args: LyricsArgs) -> Result<()> {
    let client = MusixmatchClient::new(credentials(search_paths)?)?;

    let query = SearchQuery {
        title: args.title,
        artist: args.artist,
        album: args.album,
        spotify_id: args.spotify_id,
        length: args
            .length
            .map(|seconds| LengthFilter::new(seconds, args.max_deviation)),
        richsync: args.richsync,
    };
    let (track, full) = client
        .fetch_lyrics(&query)
        .context("lyrics lookup failed")?;

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&full)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&track)?);
    }
    Ok(())
}

fn cmd_richsync(search_paths: &[PathBuf], track_id: u64) -> Result<()> {
    let client = MusixmatchClient::new(credentials(search_paths)?)?;
    let lines = client
        .fetch_richsync(track_id)
        .with_context(|| format!("richsync lookup failed for track {track_id}"))?;
    println!("{}", serde_json::to_string_pretty(&lines)?);
    Ok(())
}
