use clap::{Parser, Subcommand};
use proofsheet::deck::DeckProfile;
use proofsheet::store::CardStore;
use proofsheet::{config, decklist, output, pipeline};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "proofsheet")]
#[command(about = "Turn a trading-card deck export into a print-ready proof sheet PDF")]
#[command(long_about = "\
Turn a trading-card deck export into a print-ready proof sheet PDF

Each page tiles nine cards in a 3x3 grid; card-back pages are interleaved
for double-sided printing, and crop marks can be rendered for cutting.
Rendering is driven through ImageMagick's `convert`, which must be on PATH.

Cards directory layout:

  cards/
  ├── back.png                     # Shared card back (interleaved pages)
  ├── blank.png                    # Blank filler (deck padding)
  └── Age of Ascension/            # Subdirectories are scanned too
      ├── 001-Leader.png           # NNN prefix is the card number
      ├── 001-Leader-back.png      # -back suffix: reverse face
      └── 002-Mimicry.png

Deck list format (one card per line, deck order):

  leader (101)      # double-sided: expands to front + back face
  4 (17)            # four copies of card 17
  2 23              # parens optional
  56                # bare number, one copy

Run 'proofsheet gen-config' for a documented proofsheet.toml.")]
#[command(version)]
struct Cli {
    /// Card image directory (default from config: "cards")
    #[arg(long, global = true)]
    cards: Option<PathBuf>,

    /// Output document path (default from config: "./result.pdf")
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file (default: ./proofsheet.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct DeckArgs {
    /// Deck-list export file
    deck: PathBuf,

    /// Write the resolved deck as a JSON manifest
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the deck and render the proof sheet PDF
    Build {
        #[command(flatten)]
        deck: DeckArgs,

        /// Render crop marks for physical cutting
        #[arg(long)]
        crop_marks: bool,
    },
    /// Validate a deck against the cards directory without rendering
    Check {
        #[command(flatten)]
        deck: DeckArgs,
    },
    /// Print a stock proofsheet.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = config::load_config(cli.config.as_deref())?;

    if let Some(cards) = &cli.cards {
        cfg.cards_dir = cards.display().to_string();
    }
    if let Some(output) = &cli.output {
        cfg.output = output.display().to_string();
    }

    match cli.command {
        Command::Build { deck, crop_marks } => {
            let (manifest, profile) = resolve_deck(&cfg, &deck.deck)?;
            write_manifest(&deck, &manifest)?;

            let mut options = cfg.render.to_options();
            if crop_marks {
                options.crop_marks = true;
            }

            init_thread_pool(&cfg.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_render_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::build(
                &manifest.images,
                &profile,
                &options,
                Path::new(&cfg.output),
                Some(tx),
            );
            printer.join().unwrap();
            output::print_build_summary(&result?);
        }
        Command::Check { deck } => {
            let (manifest, profile) = resolve_deck(&cfg, &deck.deck)?;
            profile.validate_card_count(manifest.images.len())?;
            write_manifest(&deck, &manifest)?;
            output::print_check_output(&manifest);
            println!("Deck is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stage 1: scan the card store, parse the deck list, resolve every entry to
/// an image path, and fix the deck-size contract.
fn resolve_deck(
    cfg: &config::ProofConfig,
    deck_path: &Path,
) -> Result<(decklist::DeckManifest, DeckProfile), Box<dyn std::error::Error>> {
    let store = CardStore::scan(Path::new(&cfg.cards_dir))?;
    let entries = decklist::load_deck_list(deck_path)?;
    let mut images = decklist::resolve(&entries, &store)?;

    let cards = cfg.deck.card_count()?;
    if cfg.deck.pad_with_blanks && images.len() < cards {
        let blank = store.blank_image()?.to_path_buf();
        images.resize(cards, blank);
    }

    let back = if cfg.deck.interleave_backs {
        Some(store.back_image()?.to_path_buf())
    } else {
        None
    };
    let profile = DeckProfile::new(cards, back)?;

    Ok((decklist::DeckManifest::new(entries, images, &profile), profile))
}

fn write_manifest(
    args: &DeckArgs,
    manifest: &decklist::DeckManifest,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.manifest {
        let json = serde_json::to_string_pretty(manifest)?;
        std::fs::write(path, json)?;
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
