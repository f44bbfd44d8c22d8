//! The progression engine: target, placement, risk, weather, and collapse.

mod placement;
mod risk;
mod session;
mod stone;
mod target;
mod weather;

pub use placement::{DropPoint, Viewport, resolve_column};
pub use risk::{accumulate, baseline_risk, placement_increment, trigger_fires};
pub use session::{
    CollapseTrigger, CompleteError, Completion, Phase, PlaceError, Placement, Session,
};
pub use stone::{Orientation, Stone};
pub use target::{MAX_TARGET, MIN_TARGET, target_stones};
pub use weather::{WeatherKind, WeatherSystem};
