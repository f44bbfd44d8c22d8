//! Command-line interface for cairn.

use cairn::Viewport;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cairn - stone-stacking balance game
#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(about = "Stone-stacking balance game with a probabilistic collapse engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Viewport class for the simulated driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ViewportArg {
    /// Fixed 800x600 canvas with a centered grid.
    Desktop,
    /// Full-width canvas capped at 600px.
    Mobile,
}

impl From<ViewportArg> for Viewport {
    fn from(arg: ViewportArg) -> Self {
        match arg {
            ViewportArg::Desktop => Viewport::Desktop,
            ViewportArg::Mobile => Viewport::mobile(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulated build session until completion
    Play {
        /// Path to a TOML config file (defaults apply if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to the store file (created if it doesn't exist)
        #[arg(long, default_value = "cairn_store.json")]
        store: PathBuf,

        /// Seed for the driver RNG (entropy if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Viewport class the driver simulates
        #[arg(long, value_enum, default_value_t = ViewportArg::Desktop)]
        viewport: ViewportArg,
    },

    /// List surviving build records
    Records {
        /// Path to the store file
        #[arg(long, default_value = "cairn_store.json")]
        store: PathBuf,
    },

    /// Print the share token for the latest record
    Share {
        /// Path to the store file
        #[arg(long, default_value = "cairn_store.json")]
        store: PathBuf,
    },

    /// Decode a share token and show the result
    View {
        /// The share token
        token: String,
    },

    /// Reset experience to zero
    Reset {
        /// Path to the store file
        #[arg(long, default_value = "cairn_store.json")]
        store: PathBuf,
    },
}
