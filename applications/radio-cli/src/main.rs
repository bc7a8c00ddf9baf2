/// Radio 24h CLI - headless tools for the continuous player
use anyhow::Context;
use clap::{Parser, Subcommand};
use radio_core::{KeyValueStore, Playlist, RadioConfig};
use radio_cli::{load_config, JsonFileStore, SimulationOptions, Simulator};
use radio_feed_client::ReleaseFeedClient;
use radio_playback::{Persistence, PlaylistLoader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "radio-cli")]
#[command(about = "Radio 24h playlist and session tools", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./radio.toml if present)
    #[arg(short, long, global = true, env = "RADIO_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file standing in for browser storage
    #[arg(long, global = true, default_value = "radio-state.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the normalized playlist
    Playlist {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the persisted snapshot
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },
    /// Run a session against a virtual clock
    Simulate {
        /// Number of one-tick steps
        #[arg(short, long, default_value_t = 30)]
        ticks: u32,
        /// Virtual seconds per tick
        #[arg(long, default_value_t = 1.0)]
        seconds_per_tick: f64,
        /// Length of every track in seconds
        #[arg(long, default_value_t = 180.0)]
        track_secs: f64,
        /// Refuse playback until the first interaction
        #[arg(long)]
        reject_autoplay: bool,
        /// Tick at which a click happens
        #[arg(long)]
        interact_at: Option<u32>,
        /// Seed for track selection
        #[arg(long)]
        seed: Option<u64>,
        /// Use the fallback playlist without contacting the feed
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// Print the stored track index and offset
    Show,
    /// Forget the stored snapshot
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "radio_cli=info,radio_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Playlist { json } => {
            let playlist = fetch_playlist(&config).await?;
            print_playlist(&playlist, json)?;
        }
        Commands::Snapshot { action } => {
            snapshot(&config, &cli.state_file, action)?;
        }
        Commands::Simulate {
            ticks,
            seconds_per_tick,
            track_secs,
            reject_autoplay,
            interact_at,
            seed,
            offline,
        } => {
            anyhow::ensure!(
                seconds_per_tick > 0.0 && track_secs > 0.0,
                "tick and track lengths must be positive"
            );
            let playlist = if offline {
                Playlist::new(config.playlist.fallback_tracks.clone())
                    .context("no fallback tracks configured")?
            } else {
                fetch_playlist(&config).await?
            };

            let store = JsonFileStore::open(&cli.state_file)
                .with_context(|| format!("opening {}", cli.state_file.display()))?;
            let options = SimulationOptions {
                ticks,
                seconds_per_tick,
                track_secs,
                reject_autoplay,
                interact_at,
                seed,
            };

            let report = Simulator::new(config.session.clone(), Box::new(store), options)
                .run(playlist)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

async fn fetch_playlist(config: &RadioConfig) -> anyhow::Result<Playlist> {
    let feed = ReleaseFeedClient::new(&config.feed)?;
    let loader = PlaylistLoader::new(feed, config.playlist.clone());
    loader
        .fetch_playlist()
        .await
        .context("neither the feed nor the fallback list has tracks")
}

fn print_playlist(playlist: &Playlist, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(playlist.tracks())?);
        return Ok(());
    }

    for (index, track) in playlist.iter().enumerate() {
        println!("{index:>3}  {}  ({})", track.display_name(), track.url());
    }
    Ok(())
}

fn snapshot(
    config: &RadioConfig,
    state_file: &std::path::Path,
    action: SnapshotAction,
) -> anyhow::Result<()> {
    let store = JsonFileStore::open(state_file)
        .with_context(|| format!("opening {}", state_file.display()))?;
    let keys = config.session.storage_keys.clone();

    match action {
        SnapshotAction::Show => {
            let raw_index = store.get_item(&keys.index)?;
            let persistence = Persistence::new(Box::new(store), keys);
            match persistence.read_snapshot() {
                Some(snapshot) => println!(
                    "track {} at {:.0}s",
                    snapshot.last_index, snapshot.last_offset_secs
                ),
                None if raw_index.is_some() => println!("stored snapshot is unusable"),
                None => println!("no snapshot"),
            }
        }
        SnapshotAction::Clear => {
            let mut persistence = Persistence::new(Box::new(store), keys);
            persistence.clear()?;
            println!("snapshot cleared");
        }
    }
    Ok(())
}
