//! Target computation: how many stones win a session.

/// Lowest target a session can demand.
pub const MIN_TARGET: usize = 30;

/// Highest target a session can demand.
pub const MAX_TARGET: usize = 50;

/// Computes the stone count required to complete a session.
///
/// Lower columns contribute more stones than higher ones, so the pyramid
/// tapers upward in practice even though placement never enforces it. Each
/// column `c` contributes `floor(max_per_column * max(0.4, 1 - c/columns))`;
/// the sum is clamped to `[MIN_TARGET, MAX_TARGET]`. Deterministic for a
/// given configuration.
pub fn target_stones(columns: usize, max_per_column: usize) -> usize {
    let mut total = 0usize;
    for col in 0..columns {
        let taper = (1.0 - col as f64 / columns as f64).max(0.4);
        total += (max_per_column as f64 * taper).floor() as usize;
    }
    total.clamp(MIN_TARGET, MAX_TARGET)
}
