use std::io::Cursor;
use std::time::{Duration, Instant};

use super::*;
use crate::anim::clock::TimeStep;
use crate::host::{CanvasComponent, FrameRequestId, FrameTime, HeadlessHost, ListenerId};
use crate::scene::Animated;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn png(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn sources(middle: Vec<u8>) -> Vec<FrameSource> {
    vec![
        FrameSource::from_bytes("frame-3.png", png(BLUE)),
        FrameSource::from_bytes("frame-1.png", png(RED)),
        FrameSource::from_bytes("frame-2.png", middle),
    ]
}

fn center(frame: &FrameRGBA) -> [u8; 4] {
    let i = (((frame.height / 2) * frame.width + frame.width / 2) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

fn pump_until_loaded(host: &mut HeadlessHost, c: &mut Animated<ScrollScrubber>) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !c.scene().is_loaded() {
        assert!(Instant::now() < deadline, "frames did not load in time");
        host.pump(c);
        std::thread::sleep(Duration::from_millis(2));
    }
}

fn mounted(middle: Vec<u8>) -> (HeadlessHost, Animated<ScrollScrubber>) {
    let mut host = HeadlessHost::new(Viewport::new(4.0, 4.0));
    let scrubber = ScrollScrubber::new(ScrubberConfig::default(), sources(middle)).unwrap();
    let mut c = Animated::new(scrubber, TimeStep::default());
    c.init(&mut host).unwrap();
    (host, c)
}

#[test]
fn progress_before_load_is_honored_after_load() {
    let (mut host, mut c) = mounted(png(GREEN));
    assert!(c.scene().frame().is_none());

    host.push_event(HostEvent::Scroll(1.0));
    pump_until_loaded(&mut host, &mut c);
    host.pump(&mut c);

    let scene = c.scene();
    assert_eq!(scene.current_frame(), Some(FrameIndex(2)));
    assert_eq!(center(&scene.frame().unwrap()), BLUE);
}

#[test]
fn scrolling_selects_frames_and_skips_redundant_draws() {
    let (mut host, mut c) = mounted(png(GREEN));
    pump_until_loaded(&mut host, &mut c);
    host.pump(&mut c);
    assert_eq!(center(&c.scene().frame().unwrap()), RED);
    let presented = c.scene().stats().frames_presented;

    host.push_event(HostEvent::Scroll(0.1));
    host.run(&mut c, 2);
    assert_eq!(c.scene().stats().frames_presented, presented);

    host.push_event(HostEvent::Scroll(0.5));
    host.pump(&mut c);
    assert_eq!(c.scene().current_frame(), Some(FrameIndex(1)));
    assert_eq!(center(&c.scene().frame().unwrap()), GREEN);
    assert_eq!(c.scene().stats().frames_presented, presented + 1);
}

#[test]
fn failed_frame_keeps_previous_content() {
    let (mut host, mut c) = mounted(b"corrupt".to_vec());
    pump_until_loaded(&mut host, &mut c);
    host.pump(&mut c);
    assert_eq!(c.scene().sequence().unwrap().failed_count(), 1);

    host.push_event(HostEvent::Scroll(0.5));
    host.run(&mut c, 3);
    assert_eq!(c.scene().current_frame(), Some(FrameIndex(0)));
    assert_eq!(center(&c.scene().frame().unwrap()), RED);
}

#[test]
fn cta_reveal_tracks_progress() {
    let (mut host, mut c) = mounted(png(GREEN));
    host.push_event(HostEvent::Scroll(0.975));
    host.pump(&mut c);

    let reveal = c.scene().cta_reveal();
    assert!((reveal.opacity - 0.5).abs() < 1e-9);
    assert!(reveal.interactive);
}

#[test]
fn preloaded_sequence_draws_on_first_tick() {
    let seq = FrameSequenceLoader::default().load_blocking(sources(png(GREEN)));
    let scrubber = ScrollScrubber::with_sequence(ScrubberConfig::default(), seq).unwrap();
    assert!(scrubber.is_loaded());

    let mut host = HeadlessHost::new(Viewport::new(4.0, 4.0));
    let mut c = Animated::new(scrubber, TimeStep::default());
    c.init(&mut host).unwrap();
    host.pump(&mut c);
    assert_eq!(center(&c.scene().frame().unwrap()), RED);
}

#[test]
fn resize_redraws_at_new_size() {
    let (mut host, mut c) = mounted(png(GREEN));
    pump_until_loaded(&mut host, &mut c);
    host.pump(&mut c);

    host.push_event(HostEvent::Resize(Viewport::new(6.0, 3.0).with_device_pixel_ratio(2.0)));
    host.pump(&mut c);
    let frame = c.scene().frame().unwrap();
    assert_eq!((frame.width, frame.height), (12, 6));
    assert_eq!(center(&frame), RED);
}

#[test]
fn nothing_happens_after_teardown() {
    let (mut host, mut c) = mounted(png(GREEN));
    pump_until_loaded(&mut host, &mut c);
    host.pump(&mut c);
    let before = c.scene().stats();

    c.teardown(&mut host);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frames(), 0);

    // Stale handles delivered directly, bypassing the host's listener table.
    c.handle_event(&mut host, ListenerId(1), &HostEvent::Scroll(1.0));
    c.handle_event(&mut host, ListenerId(2), &HostEvent::Resize(Viewport::new(8.0, 8.0)));
    c.on_frame(
        &mut host,
        FrameRequestId(3),
        FrameTime {
            elapsed: Duration::from_secs(1),
        },
    );
    host.run(&mut c, 3);

    assert_eq!(c.scene().stats(), before);
    assert!(c.scene().frame().is_none());
}

#[test]
fn invalid_pattern_is_rejected() {
    let cfg = ScrubberConfig {
        frame_pattern: "frame-".to_owned(),
        ..ScrubberConfig::default()
    };
    assert!(ScrollScrubber::new(cfg, Vec::new()).is_err());
}
