use super::*;
use crate::foundation::core::Viewport;

fn dot_at(x: f64, y: f64) -> Dot {
    Dot {
        base: Point::new(x, y),
        base_radius: 2.5,
        color: Rgb8::new(0, 117, 207),
        phase: 0.0,
    }
}

fn palette() -> Vec<Rgb8> {
    ["#0075CF", "#0075CF", "#FD5A1A", "#FD5A1A", "#000000"]
        .iter()
        .map(|s| Rgb8::parse_hex(s).unwrap())
        .collect()
}

// At t = 0 with phase 0 the wave displaces by (0, amplitude).
fn displaced(dot: &Dot, style: &ParticleStyle) -> Point {
    dot_appearance(dot, 0.0, None, style).center
}

#[test]
fn pointer_on_dot_gives_full_glow() {
    let style = ParticleStyle::default();
    let dot = dot_at(100.0, 100.0);
    let at = displaced(&dot, &style);

    let look = dot_appearance(&dot, 0.0, Some(at), &style);
    assert_eq!(look.radius, 2.5 + 8.0);
    assert!((look.alpha - 1.0).abs() < 1e-12);
    assert_eq!(look.link_alpha, Some(0.6));
}

#[test]
fn glow_boundary_and_beyond_have_no_effect() {
    let style = ParticleStyle::default();
    let dot = dot_at(100.0, 100.0);
    let at = displaced(&dot, &style);

    let edge = dot_appearance(&dot, 0.0, Some(at + Vec2::new(200.0, 0.0)), &style);
    assert_eq!(edge.radius, 2.5);
    assert!((edge.alpha - 0.4).abs() < 1e-12);
    assert_eq!(edge.link_alpha, None);

    let far = dot_appearance(&dot, 0.0, Some(at + Vec2::new(0.0, 350.0)), &style);
    assert_eq!(far.radius, 2.5);
    assert!((far.alpha - 0.4).abs() < 1e-12);
}

#[test]
fn link_only_inside_link_radius() {
    let style = ParticleStyle::default();
    let dot = dot_at(0.0, 0.0);
    let at = displaced(&dot, &style);

    let linked = dot_appearance(&dot, 0.0, Some(at + Vec2::new(100.0, 0.0)), &style);
    let factor = 1.0 - 100.0 / 200.0;
    assert!((linked.link_alpha.unwrap() - 0.6 * factor).abs() < 1e-12);
    assert!((linked.radius - (2.5 + 8.0 * factor)).abs() < 1e-12);

    let glowing = dot_appearance(&dot, 0.0, Some(at + Vec2::new(150.0, 0.0)), &style);
    assert_eq!(glowing.link_alpha, None);
    assert!(glowing.alpha > 0.4);
}

#[test]
fn idle_dots_pulse_and_wave() {
    let style = ParticleStyle::default();
    let dot = Dot {
        phase: 0.4,
        ..dot_at(10.0, 20.0)
    };
    let t = 3.0;
    let look = dot_appearance(&dot, t, None, &style);

    assert!((look.center.x - (10.0 + (t * 0.5 + 0.4).sin() * 15.0)).abs() < 1e-12);
    assert!((look.center.y - (20.0 + (t * 0.3 + 0.4).cos() * 15.0)).abs() < 1e-12);
    assert!((look.alpha - (0.4 + (t * 0.2 + 0.4).sin() * 0.2)).abs() < 1e-12);
    assert_eq!(look.radius, 2.5);
}

#[test]
fn pointer_ring_oscillates_between_12_and_20() {
    let style = ParticleStyle::default();
    for k in 0..200 {
        let r = pointer_indicator(Point::ZERO, f64::from(k) * 0.05, &style).ring_radius;
        assert!((12.0..=20.0).contains(&r));
    }
    let peak = pointer_indicator(Point::ZERO, std::f64::consts::FRAC_PI_4, &style);
    assert!((peak.ring_radius - 20.0).abs() < 1e-12);
}

#[test]
fn grid_dims_follow_floor_plus_one() {
    let d = GridDims::for_size(LogicalSize::new(1000.0, 500.0), 32.0);
    assert_eq!(d, GridDims { cols: 32, rows: 16 });
    assert_eq!(d.dot_count(), 33 * 17);

    let d = GridDims::for_size(LogicalSize::new(0.0, 500.0), 32.0);
    assert_eq!(d.cols, 0);
}

#[test]
fn responsive_layout_switches_at_breakpoint() {
    let layout = GridLayout::default();
    assert_eq!(layout.spec_for(767.0), GridSpec::new(48.0, 2.0));
    assert_eq!(layout.spec_for(768.0), GridSpec::new(32.0, 2.5));
    assert_eq!(GridLayout::PANEL.spec_for(300.0), GridSpec::new(32.0, 2.5));
}

#[test]
fn field_rebuild_is_deterministic_per_seed() {
    let size = LogicalSize::new(400.0, 300.0);
    let a = DotField::build(size, &GridLayout::default(), &palette(), 7);
    let b = DotField::build(size, &GridLayout::default(), &palette(), 7);

    let dims = GridDims::for_size(size, 48.0);
    assert_eq!(a.dims(), Some(dims));
    assert_eq!(a.len(), dims.dot_count());
    assert_eq!(a.dots(), b.dots());

    let last = a.dots().last().unwrap();
    assert_eq!(last.base, Point::new(48.0 * 9.0, 48.0 * 7.0));
    assert!((last.phase - 16.0 * 0.2).abs() < 1e-12);
    assert!(a.dots().iter().all(|d| palette().contains(&d.color)));
}

#[test]
fn empty_palette_or_size_builds_nothing() {
    let size = LogicalSize::new(400.0, 300.0);
    assert!(DotField::build(size, &GridLayout::default(), &[], 1).is_empty());
    let empty = LogicalSize::new(0.0, 0.0);
    assert!(DotField::build(empty, &GridLayout::default(), &palette(), 1).is_empty());
}

#[test]
fn style_validation_rejects_nonsense() {
    assert!(ParticleStyle::default().validate().is_ok());
    let bad = ParticleStyle {
        glow_radius: -1.0,
        ..ParticleStyle::default()
    };
    assert!(bad.validate().is_err());
    let inverted = ParticleStyle {
        link_radius: 300.0,
        ..ParticleStyle::default()
    };
    assert!(inverted.validate().is_err());
    assert!(GridLayout::Fixed(GridSpec::new(0.0, 1.0)).validate().is_err());
}

#[test]
fn renderer_draws_dots_and_pointer_indicator() {
    let mut surface = RenderSurface::default();
    surface.resize_now(Viewport::new(64.0, 64.0).with_device_pixel_ratio(2.0));
    let field = DotField::build(
        LogicalSize::new(64.0, 64.0),
        &GridLayout::PANEL,
        &[Rgb8::new(0, 0, 0)],
        0,
    );
    let renderer = ParticleFieldRenderer::default();

    assert!(renderer.draw(&mut surface, &field, 0.0, Some(Point::new(32.0, 32.0))));
    let frame = surface.frame().unwrap();
    assert_eq!((frame.width, frame.height), (128, 128));

    // Accent dot sits at the pointer, scaled by the device pixel ratio.
    let i = ((64 * frame.width + 64) * 4) as usize;
    assert_eq!(&frame.data[i..i + 4], &[0xFD, 0x5A, 0x1A, 255]);
    assert!(frame.data.chunks_exact(4).any(|px| px[3] == 0));
}
