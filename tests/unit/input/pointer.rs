use super::*;

fn vp() -> Viewport {
    Viewport::new(800.0, 600.0)
}

#[test]
fn one_tick_moves_fifteen_percent() {
    let mut t = PointerTracker::with_state(
        PointerState::at(Point::new(0.0, 0.0)),
        CoordinateSpace::Viewport,
        DEFAULT_SMOOTHING,
    );
    t.ingest(&PointerEvent::Move(Point::new(100.0, 100.0)), &vp());
    assert_eq!(t.state().current, Point::new(0.0, 0.0));

    t.tick();
    let c = t.state().current;
    assert!((c.x - 15.0).abs() < 1e-9);
    assert!((c.y - 15.0).abs() < 1e-9);
}

#[test]
fn smoothing_converges_to_target() {
    let mut t = PointerTracker::with_state(
        PointerState::at(Point::new(0.0, 0.0)),
        CoordinateSpace::Viewport,
        DEFAULT_SMOOTHING,
    );
    t.ingest(&PointerEvent::Move(Point::new(100.0, 100.0)), &vp());
    for _ in 0..400 {
        t.tick();
    }
    let c = t.state().current;
    assert!((c.x - 100.0).abs() < 1e-9);
    assert!((c.y - 100.0).abs() < 1e-9);
}

#[test]
fn first_activation_snaps_to_target() {
    let mut t = PointerTracker::new(CoordinateSpace::Viewport, DEFAULT_SMOOTHING);
    assert_eq!(t.state().current, OFFSCREEN);
    assert_eq!(t.active_position(), None);

    t.ingest(&PointerEvent::Move(Point::new(40.0, 50.0)), &vp());
    assert_eq!(t.active_position(), Some(Point::new(40.0, 50.0)));

    // Later moves are smoothed, not snapped.
    t.ingest(&PointerEvent::Move(Point::new(140.0, 50.0)), &vp());
    assert_eq!(t.state().current, Point::new(40.0, 50.0));
    t.tick();
    assert!((t.state().current.x - 55.0).abs() < 1e-9);
}

#[test]
fn leave_deactivates_but_keeps_position() {
    let mut t = PointerTracker::new(CoordinateSpace::Viewport, DEFAULT_SMOOTHING);
    t.ingest(&PointerEvent::Move(Point::new(10.0, 20.0)), &vp());
    t.ingest(&PointerEvent::Leave, &vp());
    assert!(!t.state().active);
    assert_eq!(t.state().current, Point::new(10.0, 20.0));
    assert_eq!(t.active_position(), None);

    // Inactive ticks do not move the position.
    t.ingest(&PointerEvent::TouchEnd, &vp());
    t.tick();
    assert_eq!(t.state().current, Point::new(10.0, 20.0));
}

#[test]
fn touch_uses_first_point_and_ignores_empty_lists() {
    let mut t = PointerTracker::new(CoordinateSpace::Viewport, DEFAULT_SMOOTHING);
    t.ingest(&PointerEvent::TouchStart(vec![]), &vp());
    assert!(!t.state().active);

    t.ingest(
        &PointerEvent::TouchStart(vec![Point::new(5.0, 6.0), Point::new(500.0, 600.0)]),
        &vp(),
    );
    assert!(t.state().active);
    assert_eq!(t.state().target, Point::new(5.0, 6.0));

    t.ingest(&PointerEvent::TouchMove(vec![Point::new(7.0, 8.0)]), &vp());
    assert_eq!(t.state().target, Point::new(7.0, 8.0));
}

#[test]
fn container_space_subtracts_origin() {
    let viewport = Viewport::new(400.0, 300.0).with_origin(Point::new(100.0, 50.0));
    let mut t = PointerTracker::new(CoordinateSpace::Container, DEFAULT_SMOOTHING);
    t.ingest(&PointerEvent::Move(Point::new(150.0, 80.0)), &viewport);
    assert_eq!(t.state().target, Point::new(50.0, 30.0));
}

#[test]
fn non_finite_positions_are_dropped() {
    let mut t = PointerTracker::new(CoordinateSpace::Viewport, DEFAULT_SMOOTHING);
    t.ingest(&PointerEvent::Move(Point::new(f64::NAN, 1.0)), &vp());
    assert!(!t.state().active);
    assert_eq!(t.state().target, OFFSCREEN);
}
