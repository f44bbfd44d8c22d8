//! Host facade: owns the single mutable session and wires collapses,
//! completion, and experience to the persistence store.

use crate::config::GameConfig;
use crate::engine::{
    CollapseTrigger, CompleteError, DropPoint, Orientation, PlaceError, Session, Viewport,
    WeatherSystem,
};
use crate::record::BuildRecord;
use crate::share::{self, ShareError};
use crate::store::GameStore;
use chrono::Utc;
use rand::Rng;
use tracing::{info, instrument, warn};

/// Outcome of a placement as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceOutcome {
    /// Column the stone landed in.
    pub column: usize,
    /// Row assigned within the column.
    pub row: usize,
    /// The collapse this placement set off, if any.
    pub collapse: Option<CollapseTrigger>,
}

/// The running game: one live session plus the cross-session state.
///
/// All transitions are synchronous; the host drives time through
/// [`Game::tick`] with a millisecond clock.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    store: GameStore,
    experience: u32,
    session: Session,
    weather: WeatherSystem,
    generation: u64,
}

impl Game {
    /// Starts a game, reading experience from the store.
    #[instrument(skip(config, store))]
    pub fn new(config: GameConfig, store: GameStore, now_ms: u64) -> Self {
        let experience = store.experience();
        let generation = 1;
        let session = Session::new(&config, experience, 0, now_ms, generation);
        let weather = WeatherSystem::new(&config, now_ms);
        info!(experience, "Game started");
        Self {
            config,
            store,
            experience,
            session,
            weather,
            generation,
        }
    }

    /// Attempts to place a stone; applies a risk collapse if the draw fires.
    ///
    /// # Errors
    ///
    /// Propagates [`PlaceError`] rejections untouched; rejections mutate
    /// nothing.
    #[instrument(skip(self, rng))]
    pub fn place<R: Rng>(
        &mut self,
        viewport: Viewport,
        point: DropPoint,
        orientation: Orientation,
        rng: &mut R,
    ) -> Result<PlaceOutcome, PlaceError> {
        let placement = self.session.place(viewport, point, orientation, rng)?;

        let collapse = if placement.collapse_triggered {
            self.apply_collapse(CollapseTrigger::Risk);
            Some(CollapseTrigger::Risk)
        } else {
            None
        };

        Ok(PlaceOutcome {
            column: placement.column,
            row: placement.row,
            collapse,
        })
    }

    /// Advances the weather system; applies a weather collapse if one fires.
    #[instrument(skip(self, rng))]
    pub fn tick<R: Rng>(&mut self, rng: &mut R, now_ms: u64) -> Option<CollapseTrigger> {
        let kind = self
            .weather
            .tick(&self.config, &mut self.session, rng, now_ms)?;
        let trigger = CollapseTrigger::Weather(kind);
        self.apply_collapse(trigger);
        Some(trigger)
    }

    /// Attempts to complete the session, persisting the record on success.
    ///
    /// # Errors
    ///
    /// Propagates [`CompleteError`] rejections untouched.
    #[instrument(skip(self))]
    pub fn try_complete(&mut self, now_ms: u64) -> Result<BuildRecord, CompleteError> {
        let completion = self.session.try_complete(now_ms)?;
        self.weather.cancel();

        self.experience += 1;
        self.persist_experience();

        let record = BuildRecord::from_completion(&completion, self.experience, Utc::now());
        if let Err(e) = self.store.push_record(record.clone()) {
            warn!(error = %e, "Failed to persist record");
        }
        Ok(record)
    }

    /// Starts a fresh session, keeping experience and the attempt series.
    #[instrument(skip(self))]
    pub fn reset(&mut self, now_ms: u64) {
        self.weather.cancel();
        self.generation += 1;
        self.session = Session::new(
            &self.config,
            self.experience,
            self.session.attempt(),
            now_ms,
            self.generation,
        );
        self.weather = WeatherSystem::new(&self.config, now_ms);
        info!(generation = self.generation, "Session reset");
    }

    /// Player reset: experience and the attempt series both return to zero.
    #[instrument(skip(self))]
    pub fn new_series(&mut self, now_ms: u64) {
        self.experience = 0;
        if let Err(e) = self.store.reset_experience() {
            warn!(error = %e, "Failed to persist experience reset");
        }
        self.weather.cancel();
        self.generation += 1;
        self.session = Session::new(&self.config, 0, 0, now_ms, self.generation);
        self.weather = WeatherSystem::new(&self.config, now_ms);
        info!("New series started");
    }

    /// Replaces the live session with a read-only view of a shared result.
    ///
    /// # Errors
    ///
    /// [`ShareError`] on an undecodable token; the live session is left
    /// untouched in that case.
    #[instrument(skip(self, token))]
    pub fn view_shared(&mut self, token: &str) -> Result<(), ShareError> {
        let shared = share::decode(token)?;
        self.weather.cancel();
        self.generation += 1;
        self.session = shared.into_session();
        info!("Viewing shared result");
        Ok(())
    }

    /// Share token for the most recent surviving record, if any.
    pub fn share_latest(&self) -> Option<String> {
        let latest = self.store.recent_records().into_iter().next()?;
        Some(share::encode(&latest))
    }

    /// Collapse bookkeeping shared by both trigger paths. Only the risk
    /// path re-baselines risk; the weather path leaves it where it stood.
    fn apply_collapse(&mut self, trigger: CollapseTrigger) {
        self.session.apply_collapse(trigger);
        self.experience += 1;
        self.persist_experience();
        if matches!(trigger, CollapseTrigger::Risk) {
            self.session.rebaseline_risk(&self.config, self.experience);
        }
    }

    /// Experience writes are best-effort; a failed write never stops play.
    fn persist_experience(&mut self) {
        if let Err(e) = self.store.set_experience(self.experience) {
            warn!(error = %e, "Failed to persist experience");
        }
    }

    /// The live session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cross-session experience counter.
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// The active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The backing store.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Whether a weather event is currently active.
    pub fn weather_active(&self) -> bool {
        self.weather.is_active()
    }
}
