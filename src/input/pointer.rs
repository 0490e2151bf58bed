use crate::foundation::core::{Point, Viewport};
use crate::foundation::math::approach;

/// Position used before the first pointer event, well outside any surface.
pub const OFFSCREEN: Point = Point::new(-1000.0, -1000.0);

/// Default exponential smoothing factor applied once per tick.
pub const DEFAULT_SMOOTHING: f64 = 0.15;

/// Raw pointer input from the host, in viewport (client) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Mouse moved.
    Move(Point),
    /// Touch began; the first touch point is tracked.
    TouchStart(Vec<Point>),
    /// Touch moved; the first touch point is tracked.
    TouchMove(Vec<Point>),
    /// All touches lifted.
    TouchEnd,
    /// Pointer left the tracked area.
    Leave,
}

/// Which coordinate space pointer positions are expressed in once ingested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Client coordinates are used as-is (full-window surfaces).
    #[default]
    Viewport,
    /// Client coordinates are made relative to the container origin.
    Container,
}

/// Smoothed pointer state read by the particle renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Smoothed position, lagging behind `target`.
    pub current: Point,
    /// Latest raw position.
    pub target: Point,
    /// Whether the pointer is currently interacting.
    pub active: bool,
    engaged: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            current: OFFSCREEN,
            target: OFFSCREEN,
            active: false,
            engaged: false,
        }
    }
}

impl PointerState {
    /// State whose smoothed position already sits at `current` (no snap on first activation).
    pub fn at(current: Point) -> Self {
        Self {
            current,
            target: current,
            active: false,
            engaged: true,
        }
    }
}

/// Ingests pointer events and smooths the tracked position.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    state: PointerState,
    space: CoordinateSpace,
    smoothing: f64,
}

impl PointerTracker {
    /// Create a tracker for `space` with the given smoothing factor.
    pub fn new(space: CoordinateSpace, smoothing: f64) -> Self {
        Self::with_state(PointerState::default(), space, smoothing)
    }

    /// Create a tracker starting from an explicit state.
    pub fn with_state(state: PointerState, space: CoordinateSpace, smoothing: f64) -> Self {
        Self {
            state,
            space,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Current state.
    pub fn state(&self) -> &PointerState {
        &self.state
    }

    /// Smoothed position when the pointer is active.
    pub fn active_position(&self) -> Option<Point> {
        self.state.active.then_some(self.state.current)
    }

    /// Apply one input event. Last write wins; nothing is queued.
    pub fn ingest(&mut self, event: &PointerEvent, viewport: &Viewport) {
        match event {
            PointerEvent::Move(p) => self.engage(*p, viewport),
            PointerEvent::TouchStart(touches) | PointerEvent::TouchMove(touches) => {
                if let Some(p) = touches.first() {
                    self.engage(*p, viewport);
                }
            }
            PointerEvent::TouchEnd | PointerEvent::Leave => {
                // Position is kept for trailing effects.
                self.state.active = false;
            }
        }
    }

    /// One smoothing step toward the target. No-op while inactive.
    pub fn tick(&mut self) {
        if self.state.active {
            self.state.current = approach(self.state.current, self.state.target, self.smoothing);
        }
    }

    fn engage(&mut self, client: Point, viewport: &Viewport) {
        let p = match self.space {
            CoordinateSpace::Viewport => client,
            CoordinateSpace::Container => client - viewport.origin.to_vec2(),
        };
        if !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }
        self.state.target = p;
        self.state.active = true;
        if !self.state.engaged {
            self.state.current = p;
            self.state.engaged = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/pointer.rs"]
mod tests;
