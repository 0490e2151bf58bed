//! Scrollscape is the animation core behind scroll-scrubbed hero sequences and pointer-reactive
//! particle backgrounds, rendered on a CPU canvas.
//!
//! Two components are provided, both driven through the [`Host`] boundary:
//!
//! - [`ScrollScrubber`] loads an image sequence in the background and shows the frame selected by
//!   the host's scroll progress, cover-fit to the surface
//! - [`AmbientField`] animates a grid of dots that wave over time and glow toward the pointer
//!
//! Wrap either in [`Animated`] to get a refresh-synchronized loop with symmetric teardown.
//! [`HeadlessHost`] drives components without a windowing system.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod anim;
mod assets;
mod config;
mod foundation;
/// Host boundary: listeners, frame requests and the headless host.
pub mod host;
mod input;
mod render;
mod scene;
mod scroll;

pub use crate::foundation::core::{
    Affine, BezPath, FrameIndex, LogicalSize, PixelSize, Point, Rect, Rgb8, Rgba8, Vec2, Viewport,
};
pub use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};

pub use crate::anim::clock::{MAX_TICK_DELTA, NOMINAL_FRAME, TimeAccumulator, TimeStep};
pub use crate::anim::scheduler::AnimationScheduler;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::sequence::{
    DEFAULT_FRAME_PATTERN, FrameOrigin, FrameSequence, FrameSequenceLoader, FrameSlot,
    FrameSource, PendingSequence,
};
pub use crate::config::{
    AmbientConfig, DEFAULT_PALETTE, DEFAULT_REVEAL_THRESHOLD, ScrubberConfig,
};
pub use crate::host::{
    CanvasComponent, FrameRequestId, FrameTime, HeadlessHost, Host, HostEvent, ListenerId,
    ListenerKind, PumpReport,
};
pub use crate::input::pointer::{
    CoordinateSpace, DEFAULT_SMOOTHING, OFFSCREEN, PointerEvent, PointerState, PointerTracker,
};
pub use crate::render::frame::{CoverFit, FrameRenderer};
pub use crate::render::particles::{
    Dot, DotAppearance, DotField, GridDims, GridLayout, GridSpec, ParticleFieldRenderer,
    ParticleStyle, PointerIndicator, dot_appearance, pointer_indicator,
};
pub use crate::render::surface::{DrawTarget, FrameRGBA, RenderSurface, SurfaceStats};
pub use crate::scene::ambient::AmbientField;
pub use crate::scene::scrubber::ScrollScrubber;
pub use crate::scene::{Animated, Scene};
pub use crate::scroll::mapper::{CtaReveal, ScrollFrameMapper, frame_index};
