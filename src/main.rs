use anyhow::{Context, Result};
use clap::Parser;
use otodecks::analysis::{DurationProbe, MetadataProbe, StubProbe};
use otodecks::deck::{HeadlessDeck, TrackDisplay};
use otodecks::{DeckId, LibraryConfig, LibraryCoordinator};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "otodecks")]
#[command(about = "Two-deck DJ library: playlist, deck loading and play queues", long_about = None)]
struct Args {
    /// Path to the playlist document
    #[arg(
        short = 'p',
        long,
        default_value = otodecks::library::config::DEFAULT_PLAYLIST_PATH
    )]
    playlist: String,

    /// Audio files or folders to add to the playlist
    #[arg(short = 'a', long = "add", num_args = 1..)]
    add: Vec<PathBuf>,

    /// Delete a playlist row (0-based); applied before any other row action
    #[arg(long = "remove")]
    remove: Option<usize>,

    /// Load a playlist row onto a deck, e.g. `1:0`
    #[arg(long = "load")]
    load: Vec<RowAction>,

    /// Queue a playlist row on a deck, e.g. `2:3` (can be repeated)
    #[arg(long = "queue")]
    queue: Vec<RowAction>,

    /// Play the next queued track on a deck (1 or 2)
    #[arg(long = "play-next")]
    play_next: Vec<u8>,

    /// Print the playlist
    #[arg(short = 'l', long)]
    list: bool,

    /// Only save the playlist on exit
    #[arg(long)]
    no_autosave: bool,

    /// Don't read audio files for durations and waveforms
    #[arg(long)]
    no_probe: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// `DECK:ROW` as given on the command line
#[derive(Debug, Clone, Copy)]
struct RowAction {
    deck: DeckId,
    row: usize,
}

impl FromStr for RowAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (deck, row) = s
            .split_once(':')
            .with_context(|| format!("expected DECK:ROW, got {:?}", s))?;
        let deck = DeckId::try_from(deck.trim().parse::<u8>()?)?;
        let row = row.trim().parse::<usize>()?;
        Ok(Self { deck, row })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let playlist_path = PathBuf::from(shellexpand::tilde(&args.playlist).as_ref());
    let config = LibraryConfig::new(playlist_path).with_autosave(!args.no_autosave);

    if args.no_probe {
        let decks = || (HeadlessDeck::with_probe(StubProbe::new()), TrackDisplay::without_waveform());
        run(&args, LibraryCoordinator::new(config, StubProbe::new(), decks(), decks()))
    } else {
        let decks = || (HeadlessDeck::new(), TrackDisplay::new());
        run(&args, LibraryCoordinator::new(config, MetadataProbe::new(), decks(), decks()))
    }
}

fn run<P: DurationProbe, Q: DurationProbe>(
    args: &Args,
    mut library: LibraryCoordinator<P, HeadlessDeck<Q>, TrackDisplay>,
) -> Result<()> {
    let loaded = library.open();
    log::info!(
        "Playlist {:?}: {} tracks",
        library.config().playlist_path,
        loaded
    );

    if !args.add.is_empty() {
        let added = library.add_files(&args.add);
        log::info!("{} new track(s) added", added);
    }

    if let Some(row) = args.remove {
        if !library.delete_row(row) {
            log::warn!("No playlist row {} to remove", row);
        }
    }

    for action in &args.load {
        if !library.load_row_to_deck(action.deck, action.row) {
            log::warn!("No playlist row {} to load onto {}", action.row, action.deck);
        }
    }

    for action in &args.queue {
        if !library.queue_row_to_deck(action.deck, action.row) {
            log::warn!("No playlist row {} to queue on {}", action.row, action.deck);
        }
    }

    for &number in &args.play_next {
        let id = DeckId::try_from(number)?;
        if library.deck_mut(id).dequeue_next().is_none() {
            log::warn!("{}: queue is empty", id);
        }
    }

    if args.list {
        print_playlist(&library);
    }

    for id in DeckId::ALL {
        library.deck_mut(id).refresh_position();
        let deck = library.deck(id);
        println!("{}: {}", id, deck.device().status_line());
        println!("  {}", deck.display().render());
        for (i, queued) in deck.queue().iter().enumerate() {
            println!("  queue {:>2}. {}", i, queued.title);
        }
    }

    library
        .save()
        .with_context(|| format!("Failed to save playlist to {:?}", library.config().playlist_path))?;

    Ok(())
}

fn print_playlist<P: DurationProbe, Q: DurationProbe>(
    library: &LibraryCoordinator<P, HeadlessDeck<Q>, TrackDisplay>,
) {
    let tracks = library.playlist().tracks();
    if tracks.is_empty() {
        println!("Playlist is empty");
        return;
    }

    println!("{:>4} | {:<40} | Length", "Row", "Title");
    println!("{}", "-".repeat(58));
    for (row, track) in tracks.iter().enumerate() {
        println!("{:>4} | {:<40} | {:>6}", row, track.title, track.length_label());
    }
}
