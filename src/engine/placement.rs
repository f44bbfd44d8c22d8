//! Drop-zone geometry: where a release counts, and which column it lands in.

use serde::{Deserialize, Serialize};

/// Desktop canvas width in pixels.
const DESKTOP_CANVAS_WIDTH: f64 = 800.0;

/// X origin of the desktop placement grid.
const DESKTOP_GRID_X: f64 = 100.0;

/// Column width on the desktop grid.
const DESKTOP_STONE_WIDTH: f64 = 80.0;

/// Widest a mobile canvas gets.
const MOBILE_MAX_WIDTH: f64 = 600.0;

/// Margin subtracted from the mobile view width.
const MOBILE_MARGIN: f64 = 40.0;

/// Viewport class the input adapter reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    /// Fixed 800x600 canvas with a centered grid.
    Desktop,
    /// Full-width canvas sized to the device, capped at 600px.
    Mobile {
        /// Device view width in pixels.
        view_width: u32,
    },
}

impl Viewport {
    /// A mobile viewport at the width cap.
    pub fn mobile() -> Self {
        Viewport::Mobile {
            view_width: MOBILE_MAX_WIDTH as u32 + MOBILE_MARGIN as u32,
        }
    }

    /// Canvas width for this viewport.
    pub fn canvas_width(&self) -> f64 {
        match self {
            Viewport::Desktop => DESKTOP_CANVAS_WIDTH,
            Viewport::Mobile { view_width } => {
                (*view_width as f64 - MOBILE_MARGIN).min(MOBILE_MAX_WIDTH)
            }
        }
    }
}

/// A release point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropPoint {
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

impl DropPoint {
    /// Creates a drop point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Resolves a drop point to a column, or `None` when the point falls outside
/// the valid drop band for the viewport.
///
/// Desktop accepts drops inside the grid band only; mobile uses the full
/// canvas width and gates on height alone. Columns clamp to the board edges
/// so a drop at the rim still lands in the outermost column.
pub fn resolve_column(viewport: Viewport, point: DropPoint, columns: usize) -> Option<usize> {
    debug_assert!(columns > 0);
    match viewport {
        Viewport::Desktop => {
            let grid_end = DESKTOP_GRID_X + columns as f64 * DESKTOP_STONE_WIDTH;
            if point.x < DESKTOP_GRID_X
                || point.x > grid_end
                || point.y < 300.0
                || point.y > 520.0
            {
                return None;
            }
            let col = ((point.x - DESKTOP_GRID_X) / DESKTOP_STONE_WIDTH).round() as i64;
            Some(col.clamp(0, columns as i64 - 1) as usize)
        }
        Viewport::Mobile { .. } => {
            if point.y < 200.0 || point.y > 550.0 {
                return None;
            }
            let col_width = viewport.canvas_width() / columns as f64;
            // +1 so the right edge still resolves to the last column.
            let col = ((point.x + 1.0) / col_width).floor() as i64;
            Some(col.clamp(0, columns as i64 - 1) as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_rejects_outside_band() {
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(50.0, 400.0), 7),
            None
        );
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(400.0, 100.0), 7),
            None
        );
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(400.0, 560.0), 7),
            None
        );
    }

    #[test]
    fn desktop_rounds_to_nearest_column() {
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(100.0, 400.0), 7),
            Some(0)
        );
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(340.0, 400.0), 7),
            Some(3)
        );
        // Right rim clamps to the last column.
        assert_eq!(
            resolve_column(Viewport::Desktop, DropPoint::new(660.0, 400.0), 7),
            Some(6)
        );
    }

    #[test]
    fn mobile_gates_on_height_only() {
        let vp = Viewport::mobile();
        assert_eq!(resolve_column(vp, DropPoint::new(0.0, 100.0), 7), None);
        assert_eq!(resolve_column(vp, DropPoint::new(0.0, 300.0), 7), Some(0));
    }

    #[test]
    fn mobile_right_edge_reaches_last_column() {
        let vp = Viewport::mobile();
        let width = vp.canvas_width();
        assert_eq!(
            resolve_column(vp, DropPoint::new(width - 1.0, 300.0), 7),
            Some(6)
        );
    }
}
