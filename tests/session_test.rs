//! Tests for the session state machine: placement, risk, collapse, completion.

use cairn::{
    CollapseTrigger, CompleteError, DropPoint, GameConfig, Orientation, Phase, PlaceError,
    Session, Viewport,
};
use rand::RngCore;

/// RNG returning a fixed word; `u64::MAX` makes uniform draws land just
/// under 1.0 (no trigger ever fires), `0` makes them 0.0 (always fires).
struct ConstRng(u64);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn session() -> Session {
    Session::new(&GameConfig::default(), 0, 0, 0, 1)
}

fn drop_at_column(col: usize) -> DropPoint {
    DropPoint::new(100.0 + col as f64 * 80.0, 400.0)
}

#[test]
fn test_rows_are_consecutive_per_column() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);

    for expected_row in 0..5 {
        let placement = session
            .place(
                Viewport::Desktop,
                drop_at_column(2),
                Orientation::Horizontal,
                &mut rng,
            )
            .unwrap();
        assert_eq!(placement.column, 2);
        assert_eq!(placement.row, expected_row);
    }

    let rows: Vec<usize> = session
        .stones()
        .iter()
        .filter(|s| s.column == 2)
        .map(|s| s.row)
        .collect();
    assert_eq!(rows, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_columns_count_independently() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);

    session
        .place(Viewport::Desktop, drop_at_column(0), Orientation::Vertical, &mut rng)
        .unwrap();
    session
        .place(Viewport::Desktop, drop_at_column(0), Orientation::Vertical, &mut rng)
        .unwrap();
    let placement = session
        .place(Viewport::Desktop, drop_at_column(4), Orientation::Horizontal, &mut rng)
        .unwrap();

    assert_eq!(placement.row, 0, "A fresh column starts at row 0");
}

#[test]
fn test_rejected_placement_mutates_nothing() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);

    session
        .place(Viewport::Desktop, drop_at_column(1), Orientation::Horizontal, &mut rng)
        .unwrap();
    let stones_before = session.stones().len();
    let risk_before = session.risk();
    let attempt_before = session.attempt();

    let result = session.place(
        Viewport::Desktop,
        DropPoint::new(10.0, 10.0),
        Orientation::Horizontal,
        &mut rng,
    );
    assert_eq!(result, Err(PlaceError::OutsideDropZone));

    assert_eq!(session.stones().len(), stones_before);
    assert_eq!(session.risk(), risk_before);
    assert_eq!(session.attempt(), attempt_before);
}

#[test]
fn test_risk_grows_monotonically_while_building() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);
    let mut last_risk = session.risk();

    for _ in 0..20 {
        session
            .place(Viewport::Desktop, drop_at_column(3), Orientation::Vertical, &mut rng)
            .unwrap();
        assert!(session.risk() >= last_risk);
        assert!(session.risk() >= 0.0);
        last_risk = session.risk();
    }
}

#[test]
fn test_risk_growth_example_from_balance_sheet() {
    // Experience 0 baselines at 0.2; three placements in the <5 attempt
    // band add 0.005 each.
    let mut session = Session::new(&GameConfig::default(), 0, 2, 0, 1);
    assert!((session.risk() - 0.2).abs() < 1e-12);

    let mut rng = ConstRng(u64::MAX);
    for _ in 0..3 {
        session
            .place(Viewport::Desktop, drop_at_column(0), Orientation::Horizontal, &mut rng)
            .unwrap();
    }
    assert!((session.risk() - 0.215).abs() < 1e-12);
}

#[test]
fn test_placement_trigger_fires_on_low_draw() {
    let mut session = session();
    let mut rng = ConstRng(0);

    let placement = session
        .place(Viewport::Desktop, drop_at_column(0), Orientation::Horizontal, &mut rng)
        .unwrap();
    assert!(placement.collapse_triggered);
}

#[test]
fn test_collapse_increments_attempt_and_empties_pyramid() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);

    for _ in 0..4 {
        session
            .place(Viewport::Desktop, drop_at_column(1), Orientation::Horizontal, &mut rng)
            .unwrap();
    }
    assert_eq!(session.attempt(), 0);

    session.apply_collapse(CollapseTrigger::Risk);
    assert_eq!(session.attempt(), 1);
    assert!(session.stones().is_empty());

    // The next placement starts the column over at row 0.
    let placement = session
        .place(Viewport::Desktop, drop_at_column(1), Orientation::Horizontal, &mut rng)
        .unwrap();
    assert_eq!(placement.row, 0);
}

#[test]
fn test_collapse_alone_does_not_touch_risk() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);
    session
        .place(Viewport::Desktop, drop_at_column(0), Orientation::Vertical, &mut rng)
        .unwrap();
    let risk_before = session.risk();

    session.apply_collapse(CollapseTrigger::Risk);
    assert_eq!(session.risk(), risk_before);

    session.rebaseline_risk(&GameConfig::default(), 1);
    assert!((session.risk() - 0.15).abs() < 1e-12);
}

#[test]
fn test_completion_rejected_below_target() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);
    session
        .place(Viewport::Desktop, drop_at_column(0), Orientation::Horizontal, &mut rng)
        .unwrap();

    let result = session.try_complete(5_000);
    assert_eq!(
        result.unwrap_err(),
        CompleteError::NotEnoughStones {
            have: 1,
            need: session.target()
        }
    );
    assert_eq!(session.phase(), Phase::Building);
    assert_eq!(session.stones().len(), 1);
}

#[test]
fn test_completion_at_target() {
    let mut session = session();
    let mut rng = ConstRng(u64::MAX);
    let target = session.target();

    for i in 0..target {
        session
            .place(
                Viewport::Desktop,
                drop_at_column(i % 7),
                Orientation::Horizontal,
                &mut rng,
            )
            .unwrap();
    }

    let completion = session.try_complete(90_000).unwrap();
    assert_eq!(completion.stones.len(), target);
    assert_eq!(completion.elapsed_secs, 90);
    assert!(session.is_complete());

    // Complete is terminal.
    let result = session.place(
        Viewport::Desktop,
        drop_at_column(0),
        Orientation::Horizontal,
        &mut rng,
    );
    assert_eq!(result, Err(PlaceError::SessionComplete));
    assert_eq!(
        session.try_complete(91_000).unwrap_err(),
        CompleteError::AlreadyComplete
    );
}

#[test]
fn test_viewing_session_is_complete_immediately() {
    let mut rng = ConstRng(u64::MAX);
    let mut source = session();
    for _ in 0..3 {
        source
            .place(Viewport::Desktop, drop_at_column(2), Orientation::Vertical, &mut rng)
            .unwrap();
    }

    let mut viewing = Session::viewing(source.stones().to_vec(), 4);
    assert!(viewing.is_complete());
    assert_eq!(viewing.attempt(), 4);
    assert_eq!(viewing.stones().len(), 3);
    assert_eq!(
        viewing
            .place(Viewport::Desktop, drop_at_column(0), Orientation::Horizontal, &mut rng)
            .unwrap_err(),
        PlaceError::SessionComplete
    );
}
