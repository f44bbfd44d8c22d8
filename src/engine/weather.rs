//! Weather system: periodic Bernoulli trials that can doom the pyramid.
//!
//! The host drives a millisecond clock through [`WeatherSystem::tick`];
//! there are no internal timers. A pending collapse is explicit state
//! stamped with the session generation, so a reset cancels it instead of
//! letting a stale timer fire.

use super::session::Session;
use crate::config::GameConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Kind of weather event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    /// Rain.
    Rain,
    /// Snow.
    Snow,
}

/// A weather collapse waiting for its moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledCollapse {
    kind: WeatherKind,
    due_at_ms: u64,
    session_generation: u64,
}

/// Host-ticked weather scheduler.
#[derive(Debug, Clone)]
pub struct WeatherSystem {
    next_trial_at_ms: u64,
    pending: Option<ScheduledCollapse>,
}

impl WeatherSystem {
    /// Creates the scheduler with the first trial one period out.
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        Self {
            next_trial_at_ms: now_ms + config.weather_period_ms(),
            pending: None,
        }
    }

    /// Cancels any pending collapse, e.g. on session reset or completion.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending weather collapse cancelled");
        }
    }

    /// Whether a weather event is currently active.
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Advances the scheduler to `now_ms`.
    ///
    /// Resolves a due collapse first, then runs the periodic trial. Returns
    /// the weather kind when a collapse fires so the host can apply it; a
    /// due collapse whose session generation no longer matches the live
    /// session is suppressed as a no-op.
    #[instrument(skip(self, config, session, rng))]
    pub fn tick<R: Rng>(
        &mut self,
        config: &GameConfig,
        session: &mut Session,
        rng: &mut R,
        now_ms: u64,
    ) -> Option<WeatherKind> {
        if let Some(fired) = self.resolve_due(session, now_ms) {
            return Some(fired);
        }

        if now_ms >= self.next_trial_at_ms {
            self.next_trial_at_ms = now_ms + config.weather_period_ms();
            if self.pending.is_none()
                && !session.is_complete()
                && rng.r#gen::<f64>() < *config.weather_chance()
            {
                let kind = if rng.gen_range(0..2) == 0 {
                    WeatherKind::Rain
                } else {
                    WeatherKind::Snow
                };
                info!(%kind, "Weather event started");
                session.enter_weather(kind);
                self.pending = Some(ScheduledCollapse {
                    kind,
                    due_at_ms: now_ms + config.weather_duration_ms(),
                    session_generation: session.generation(),
                });
            }
        }

        None
    }

    /// Checks the pending collapse against the clock and the live session.
    fn resolve_due(&mut self, session: &mut Session, now_ms: u64) -> Option<WeatherKind> {
        let scheduled = self.pending?;
        if now_ms < scheduled.due_at_ms {
            return None;
        }
        self.pending = None;

        if scheduled.session_generation != session.generation() {
            debug!(
                scheduled_generation = scheduled.session_generation,
                live_generation = session.generation(),
                "Stale weather collapse suppressed"
            );
            return None;
        }

        // Weather clears unconditionally once its duration elapses.
        session.clear_weather();

        if session.stones().is_empty() || session.is_complete() {
            debug!(kind = %scheduled.kind, "Weather passed without a collapse");
            return None;
        }

        info!(kind = %scheduled.kind, "Weather collapse fired");
        Some(scheduled.kind)
    }
}
