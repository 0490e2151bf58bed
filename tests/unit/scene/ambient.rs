use super::*;
use crate::anim::clock::TimeStep;
use crate::config::AmbientConfig;
use crate::foundation::core::{LogicalSize, Point};
use crate::host::{CanvasComponent, HeadlessHost, Host};
use crate::input::pointer::PointerEvent;
use crate::render::particles::GridDims;
use crate::scene::Animated;

fn seeded() -> AmbientConfig {
    AmbientConfig {
        palette_seed: Some(3),
        time_step: TimeStep::PER_TICK,
        ..AmbientConfig::default()
    }
}

#[test]
fn mount_lays_out_synchronously() {
    let mut host = HeadlessHost::new(Viewport::new(800.0, 600.0));
    let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();

    let dims = GridDims::for_size(host.viewport().size, 32.0);
    assert_eq!(c.scene().dots().len(), dims.dot_count());
    assert_eq!(c.scene().layout_epochs(), 1);
    assert!(c.scene().frame().is_none());

    host.pump(&mut c);
    assert_eq!(c.scene().stats().frames_presented, 1);
}

#[test]
fn resize_rebuilds_grid_on_next_tick() {
    let mut host = HeadlessHost::new(Viewport::new(800.0, 600.0));
    let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();
    host.pump(&mut c);

    host.push_event(HostEvent::Resize(Viewport::new(400.0, 300.0).with_device_pixel_ratio(2.0)));
    host.pump(&mut c);

    let scene = c.scene();
    assert_eq!(scene.layout_epochs(), 2);
    let dims = GridDims::for_size(LogicalSize::new(400.0, 300.0), 48.0);
    assert_eq!(scene.dots().len(), dims.dot_count());
    let frame = scene.frame().unwrap();
    assert_eq!((frame.width, frame.height), (800, 600));
    assert_eq!(scene.stats().draws_skipped, 0);
}

#[test]
fn pointer_snaps_then_smooths_per_tick() {
    let mut host = HeadlessHost::new(Viewport::new(300.0, 300.0));
    let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();

    host.push_event(HostEvent::Pointer(PointerEvent::Move(Point::new(100.0, 100.0))));
    host.pump(&mut c);
    assert_eq!(c.scene().pointer().current, Point::new(100.0, 100.0));

    host.push_event(HostEvent::Pointer(PointerEvent::Move(Point::new(200.0, 100.0))));
    host.pump(&mut c);
    let p = c.scene().pointer().current;
    assert!((p.x - 115.0).abs() < 1e-9);

    host.push_event(HostEvent::Pointer(PointerEvent::Leave));
    host.pump(&mut c);
    assert!(!c.scene().pointer().active);
    assert_eq!(c.scene().pointer().current, p);
}

#[test]
fn panel_variant_tracks_container_coordinates() {
    let origin = Point::new(50.0, 20.0);
    let mut host = HeadlessHost::new(Viewport::new(300.0, 300.0).with_origin(origin));
    let cfg = AmbientConfig {
        palette_seed: Some(1),
        ..AmbientConfig::panel()
    };
    let mut c = Animated::new(AmbientField::new(cfg).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();

    host.push_event(HostEvent::Pointer(PointerEvent::TouchStart(vec![Point::new(60.0, 30.0)])));
    host.pump(&mut c);
    assert_eq!(c.scene().pointer().current, Point::new(10.0, 10.0));
}

#[test]
fn same_seed_same_pixels() {
    let run = || {
        let mut host = HeadlessHost::new(Viewport::new(120.0, 80.0));
        let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
        c.init(&mut host).unwrap();
        host.run(&mut c, 4);
        c.scene().frame().unwrap().data
    };
    assert_eq!(run(), run());
}

#[test]
fn teardown_releases_surface() {
    let mut host = HeadlessHost::new(Viewport::new(100.0, 100.0));
    let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();
    host.pump(&mut c);
    c.teardown(&mut host);

    assert!(c.scene().frame().is_none());
    assert!(c.scene().dots().is_empty());
    assert!(c.init(&mut host).is_err());
}

#[test]
fn oversize_viewport_keeps_an_empty_field() {
    let mut host = HeadlessHost::new(Viewport::new(70_000.0, 70_000.0));
    let mut c = Animated::new(AmbientField::new(seeded()).unwrap(), TimeStep::PER_TICK);
    c.init(&mut host).unwrap();
    host.run(&mut c, 2);

    assert!(c.scene().dots().is_empty());
    assert!(c.scene().frame().is_none());
    assert_eq!(c.scene().stats().frames_presented, 0);

    host.push_event(HostEvent::Resize(Viewport::new(1e7, 1e7)));
    host.pump(&mut c);
    assert!(c.scene().dots().is_empty());

    host.push_event(HostEvent::Resize(Viewport::new(200.0, 100.0)));
    host.pump(&mut c);
    let dims = GridDims::for_size(LogicalSize::new(200.0, 100.0), 48.0);
    assert_eq!(c.scene().dots().len(), dims.dot_count());
    assert_eq!(c.scene().stats().frames_presented, 1);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = AmbientConfig {
        smoothing: -0.1,
        ..AmbientConfig::default()
    };
    assert!(AmbientField::new(cfg).is_err());
}
