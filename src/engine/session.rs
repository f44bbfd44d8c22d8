//! Session state machine: placement, risk growth, collapse, completion.

use super::placement::{DropPoint, Viewport, resolve_column};
use super::risk;
use super::stone::{Orientation, Stone};
use super::target::target_stones;
use super::weather::WeatherKind;
use crate::config::GameConfig;
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Phase of a build session.
///
/// `Building -> (WeatherActive -> Building)* -> Complete`; collapses loop
/// back into `Building` with an emptied pyramid. `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Stones can be placed.
    Building,
    /// Weather is active; placement continues while a collapse is pending.
    WeatherActive(WeatherKind),
    /// Target reached (or viewing a shared result); no further placement.
    Complete,
}

/// What fired a collapse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollapseTrigger {
    /// The post-placement risk draw came up under the accumulated risk.
    Risk,
    /// An active weather event ran its course with stones still standing.
    Weather(WeatherKind),
}

/// An accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Column the stone landed in.
    pub column: usize,
    /// Row assigned within the column.
    pub row: usize,
    /// Whether the post-placement risk draw fired a collapse.
    pub collapse_triggered: bool,
}

/// Placement rejection. Rejections never mutate the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// The session already reached its target.
    #[display("Session is already complete")]
    SessionComplete,
    /// The release point fell outside the valid drop band.
    #[display("Drop point is outside the valid placement zone")]
    OutsideDropZone,
}

/// Completion rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum CompleteError {
    /// The pyramid is still short of the target.
    #[display("Not enough stones: {} of {}", have, need)]
    NotEnoughStones {
        /// Stones placed so far.
        have: usize,
        /// Stones required.
        need: usize,
    },
    /// The session was already completed.
    #[display("Session is already complete")]
    AlreadyComplete,
}

/// One attempt at building the pyramid.
///
/// The session owns only per-attempt state; experience and persistence live
/// in the host ([`crate::Game`]). All transitions run synchronously to
/// completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    target: usize,
    stones: Vec<Stone>,
    // Incremental per-column counters so row derivation never rescans the log.
    column_counts: Vec<usize>,
    attempt: u32,
    risk: f64,
    phase: Phase,
    started_at_ms: u64,
    generation: u64,
}

impl Session {
    /// Starts a fresh session.
    ///
    /// Risk begins at the experience baseline; `attempt` carries over from
    /// the series so the risk tiers keep tightening across retries.
    #[instrument(skip(config))]
    pub fn new(
        config: &GameConfig,
        experience: u32,
        attempt: u32,
        now_ms: u64,
        generation: u64,
    ) -> Self {
        let target = target_stones(*config.columns(), *config.max_stones_per_column());
        let risk = risk::baseline_risk(
            *config.baseline_risk(),
            *config.experience_relief(),
            experience,
        );
        info!(target, attempt, risk, "Starting session");
        Self {
            target,
            stones: Vec::new(),
            column_counts: vec![0; *config.columns()],
            attempt,
            risk,
            phase: Phase::Building,
            started_at_ms: now_ms,
            generation,
        }
    }

    /// Builds a read-only viewing session from an already-complete stone
    /// list, bypassing the building phase.
    pub fn viewing(stones: Vec<Stone>, attempt: u32) -> Self {
        let columns = stones.iter().map(|s| s.column + 1).max().unwrap_or(1);
        let mut column_counts = vec![0; columns];
        for stone in &stones {
            column_counts[stone.column] += 1;
        }
        Self {
            target: stones.len(),
            stones,
            column_counts,
            attempt,
            risk: 0.0,
            phase: Phase::Complete,
            started_at_ms: 0,
            generation: 0,
        }
    }

    /// Attempts to place a stone at the given release point.
    ///
    /// On acceptance the stone is appended with the next row in its column,
    /// risk grows by the attempt-band increment, and the trigger draw runs.
    /// A fired draw only reports the collapse; the host applies it so
    /// experience bookkeeping stays in one place.
    ///
    /// # Errors
    ///
    /// [`PlaceError::SessionComplete`] once the session is complete,
    /// [`PlaceError::OutsideDropZone`] when the point misses the drop band.
    /// Neither mutates the session.
    #[instrument(skip(self, rng), fields(attempt = self.attempt, risk = self.risk))]
    pub fn place<R: Rng>(
        &mut self,
        viewport: Viewport,
        point: DropPoint,
        orientation: Orientation,
        rng: &mut R,
    ) -> Result<Placement, PlaceError> {
        if self.phase == Phase::Complete {
            warn!("Placement after completion rejected");
            return Err(PlaceError::SessionComplete);
        }

        let column = resolve_column(viewport, point, self.column_counts.len())
            .ok_or(PlaceError::OutsideDropZone)?;

        let row = self.column_counts[column];
        self.stones.push(Stone::new(column, row, orientation));
        self.column_counts[column] += 1;

        self.risk = risk::accumulate(self.risk, self.attempt);
        let collapse_triggered = risk::trigger_fires(rng, self.risk) && !self.stones.is_empty();

        debug!(
            column,
            row,
            placed = self.stones.len(),
            target = self.target,
            risk = self.risk,
            collapse_triggered,
            "Stone placed"
        );

        Ok(Placement {
            column,
            row,
            collapse_triggered,
        })
    }

    /// Applies a collapse: attempt increments and the pyramid empties.
    ///
    /// Risk is left untouched here; a risk-triggered collapse re-baselines
    /// it via [`Session::rebaseline_risk`] after the host bumps experience.
    /// Weather collapses deliberately skip that reset.
    #[instrument(skip(self))]
    pub fn apply_collapse(&mut self, trigger: CollapseTrigger) {
        self.attempt += 1;
        let lost = self.stones.len();
        self.stones.clear();
        self.column_counts.fill(0);
        info!(?trigger, attempt = self.attempt, lost, "Pyramid collapsed");
    }

    /// Resets risk to the baseline for the given experience.
    pub fn rebaseline_risk(&mut self, config: &GameConfig, experience: u32) {
        self.risk = risk::baseline_risk(
            *config.baseline_risk(),
            *config.experience_relief(),
            experience,
        );
        debug!(risk = self.risk, experience, "Risk re-baselined");
    }

    /// Marks weather active. Only a building session takes weather.
    pub fn enter_weather(&mut self, kind: WeatherKind) {
        if self.phase == Phase::Building {
            self.phase = Phase::WeatherActive(kind);
        }
    }

    /// Clears any active weather, returning to building.
    pub fn clear_weather(&mut self) {
        if matches!(self.phase, Phase::WeatherActive(_)) {
            self.phase = Phase::Building;
        }
    }

    /// Attempts to complete the session.
    ///
    /// # Errors
    ///
    /// [`CompleteError::NotEnoughStones`] below target,
    /// [`CompleteError::AlreadyComplete`] on a finished session. Neither
    /// mutates the session.
    #[instrument(skip(self))]
    pub fn try_complete(&mut self, now_ms: u64) -> Result<Completion, CompleteError> {
        if self.phase == Phase::Complete {
            return Err(CompleteError::AlreadyComplete);
        }
        if self.stones.len() < self.target {
            warn!(
                have = self.stones.len(),
                need = self.target,
                "Completion rejected"
            );
            return Err(CompleteError::NotEnoughStones {
                have: self.stones.len(),
                need: self.target,
            });
        }

        self.phase = Phase::Complete;
        let elapsed_secs = self.elapsed_secs(now_ms);
        info!(
            attempt = self.attempt,
            stones = self.stones.len(),
            elapsed_secs,
            "Session complete"
        );
        Ok(Completion {
            attempt: self.attempt,
            elapsed_secs,
            stones: self.stones.clone(),
        })
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms) / 1000
    }

    /// Stones placed so far, in insertion order.
    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    /// Stones required to complete.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Collapse count so far in this series.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Current collapse risk in `[0, 1]`.
    pub fn risk(&self) -> f64 {
        self.risk
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the session reached its target.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Identity stamp used to suppress scheduled work from earlier sessions.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Snapshot handed to the host when a session completes.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Collapse count at completion.
    pub attempt: u32,
    /// Seconds from session start to completion.
    pub elapsed_secs: u64,
    /// The finished pyramid.
    pub stones: Vec<Stone>,
}
