//! Cairn - a stone-stacking balance game.
//!
//! The player stacks stones into a column-based pyramid toward a randomized
//! target while accumulated collapse risk and timed weather events threaten
//! to level the whole thing. Experience earned from every collapse and
//! completion lowers the baseline risk of future sessions.
//!
//! # Architecture
//!
//! - **Engine**: pure session transitions (placement, risk, weather, collapse)
//! - **Game**: host facade owning the single mutable session
//! - **Store**: JSON-file persistence for experience and build records
//! - **Share**: URL-safe tokens for viewing a completed build
//!
//! # Example
//!
//! ```no_run
//! use cairn::{DropPoint, Game, GameConfig, GameStore, Orientation, Viewport};
//!
//! let store = GameStore::open("cairn_store.json");
//! let mut game = Game::new(GameConfig::default(), store, 0);
//! let mut rng = rand::thread_rng();
//!
//! let outcome = game.place(
//!     Viewport::Desktop,
//!     DropPoint::new(340.0, 400.0),
//!     Orientation::Horizontal,
//!     &mut rng,
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod engine;
mod game;
mod record;
mod share;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Engine types
pub use engine::{
    CollapseTrigger, CompleteError, Completion, DropPoint, MAX_TARGET, MIN_TARGET, Orientation,
    Phase, PlaceError, Placement, Session, Stone, Viewport, WeatherKind, WeatherSystem,
    accumulate, baseline_risk, placement_increment, resolve_column, target_stones, trigger_fires,
};

// Crate-level exports - Host facade
pub use game::{Game, PlaceOutcome};

// Crate-level exports - Records and persistence
pub use record::{BuildRecord, RECORD_LIST_LIMIT, RECORD_TTL_DAYS, prune};
pub use store::{GameStore, StoreError};

// Crate-level exports - Share tokens
pub use share::{ShareError, SharedResult, decode, encode};
