//! Cairn - stone-stacking balance game CLI.
//!
//! The `play` subcommand stands in for the browser host loop: a scripted
//! driver places stones on a fixed cadence against a simulated millisecond
//! clock, ticking the weather system between placements.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use cairn::{
    BuildRecord, CollapseTrigger, DropPoint, Game, GameConfig, GameStore, Orientation, Stone,
    Viewport, decode,
};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, ViewportArg};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Simulated clock step per loop iteration.
const TICK_STEP_MS: u64 = 200;

/// How often the driver places a stone.
const PLACE_EVERY_MS: u64 = 600;

/// Give up after this much simulated time.
const SIMULATION_CAP_MS: u64 = 3_600_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            store,
            seed,
            viewport,
        } => run_play(config, store, seed, viewport),
        Command::Records { store } => run_records(store),
        Command::Share { store } => run_share(store),
        Command::View { token } => run_view(&token),
        Command::Reset { store } => run_reset(store),
    }
}

/// Run a simulated build session until completion.
fn run_play(
    config_path: Option<PathBuf>,
    store_path: PathBuf,
    seed: Option<u64>,
    viewport: ViewportArg,
) -> Result<()> {
    let config = match config_path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    let columns = *config.columns();
    let viewport = Viewport::from(viewport);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = GameStore::open(&store_path);
    let mut game = Game::new(config, store, 0);

    info!(
        target = game.session().target(),
        experience = game.experience(),
        "Simulated session starting"
    );
    println!(
        "Building toward {} stones (experience {}, starting risk {:.3})",
        game.session().target(),
        game.experience(),
        game.session().risk()
    );

    let mut now_ms = 0u64;
    loop {
        now_ms += TICK_STEP_MS;
        if now_ms > SIMULATION_CAP_MS {
            warn!("Simulation cap reached without completion");
            println!("Gave up after {} simulated seconds.", now_ms / 1000);
            return Ok(());
        }

        if let Some(CollapseTrigger::Weather(kind)) = game.tick(&mut rng, now_ms) {
            println!(
                "{} levelled the pyramid! attempt {}, experience {}",
                kind,
                game.session().attempt(),
                game.experience()
            );
        }

        if now_ms % PLACE_EVERY_MS != 0 {
            continue;
        }

        let point = random_drop_point(&mut rng, viewport, columns);
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        match game.place(viewport, point, orientation, &mut rng) {
            Ok(outcome) => {
                if outcome.collapse.is_some() {
                    println!(
                        "The pyramid rumbled down! attempt {}, experience {}, risk back to {:.3}",
                        game.session().attempt(),
                        game.experience(),
                        game.session().risk()
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "Placement rejected");
                continue;
            }
        }

        if game.session().stones().len() >= game.session().target() {
            let record = game.try_complete(now_ms)?;
            println!();
            println!("Pyramid complete!");
            print_record(&record);
            println!();
            println!("{}", render_shape(record.shape(), columns));
            if let Some(token) = game.share_latest() {
                println!("Share token: {}", token);
            }
            return Ok(());
        }
    }
}

/// Picks a drop point inside the valid band for the viewport.
fn random_drop_point<R: Rng>(rng: &mut R, viewport: Viewport, columns: usize) -> DropPoint {
    match viewport {
        Viewport::Desktop => {
            let column = rng.gen_range(0..columns) as f64;
            DropPoint::new(100.0 + column * 80.0, 400.0)
        }
        Viewport::Mobile { .. } => {
            let x = rng.gen_range(0.0..viewport.canvas_width());
            DropPoint::new(x, 350.0)
        }
    }
}

/// List surviving build records.
fn run_records(store_path: PathBuf) -> Result<()> {
    let store = GameStore::open(&store_path);
    let records = store.recent_records();

    if records.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    for (index, record) in records.iter().enumerate() {
        println!("#{}:", index + 1);
        print_record(record);
        let hours_left = (*record.expiry() - Utc::now()).num_hours();
        println!("  expires in {} hours", hours_left);
    }
    Ok(())
}

/// Print the share token for the latest record.
fn run_share(store_path: PathBuf) -> Result<()> {
    let store = GameStore::open(&store_path);
    match store.recent_records().first() {
        Some(record) => println!("{}", cairn::encode(record)),
        None => println!("No records to share."),
    }
    Ok(())
}

/// Decode a share token and show the result.
fn run_view(token: &str) -> Result<()> {
    let shared = decode(token)?;
    println!(
        "Shared build: {} stones in {} seconds on attempt {}",
        shared.stone_count(),
        shared.time_secs(),
        shared.attempt()
    );
    let columns = shared
        .shape()
        .iter()
        .map(|s| s.column + 1)
        .max()
        .unwrap_or(1);
    println!("{}", render_shape(shared.shape(), columns));
    Ok(())
}

/// Reset experience to zero.
fn run_reset(store_path: PathBuf) -> Result<()> {
    let store = GameStore::open(&store_path);
    store.reset_experience()?;
    println!("Experience reset to 0.");
    Ok(())
}

fn print_record(record: &BuildRecord) {
    println!(
        "  {} stones, {} seconds, attempt {}, experience {}",
        record.stone_count(),
        record.time_secs(),
        record.attempt(),
        record.experience()
    );
    println!("  recorded {}", record.timestamp().to_rfc3339());
}

/// Renders the pyramid as a text grid, one character per stone,
/// `H`/`V` by orientation, bottom row last.
fn render_shape(stones: &[Stone], columns: usize) -> String {
    let mut grid: Vec<Vec<char>> = vec![Vec::new(); columns];
    for stone in stones {
        let symbol = match stone.orientation {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        };
        if stone.column < columns {
            grid[stone.column].push(symbol);
        }
    }

    let height = grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for row in (0..height).rev() {
        for column in grid.iter() {
            out.push(column.get(row).copied().unwrap_or('.'));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
