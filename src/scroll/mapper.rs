use crate::foundation::core::FrameIndex;
use crate::foundation::math::unit_ramp;

/// Map a normalized scroll progress onto a frame index.
///
/// `round(progress * (frame_count - 1))`, clamped to `[0, frame_count - 1]`. Non-finite progress
/// maps to frame 0. Returns `None` for an empty sequence.
pub fn frame_index(progress: f64, frame_count: usize) -> Option<FrameIndex> {
    if frame_count == 0 {
        return None;
    }
    let last = frame_count - 1;
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let idx = (p * last as f64).round() as usize;
    Some(FrameIndex(idx.min(last)))
}

/// Tracks the external scroll progress and decides when a redraw is needed.
#[derive(Clone, Debug, Default)]
pub struct ScrollFrameMapper {
    progress: f64,
    last_index: Option<FrameIndex>,
    redraw_requested: bool,
}

impl ScrollFrameMapper {
    /// Create a mapper at progress `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest progress seen.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Ingest a progress-change notification.
    ///
    /// Requests a redraw only when the rounded index differs from the last drawn one.
    pub fn on_progress(&mut self, progress: f64, frame_count: usize) {
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if frame_index(self.progress, frame_count) != self.last_index {
            self.redraw_requested = true;
        }
    }

    /// Force the next tick to redraw (sequence became available, surface resized).
    pub fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    /// Return `true` when a redraw is pending.
    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    /// Index for the current progress.
    pub fn current(&self, frame_count: usize) -> Option<FrameIndex> {
        frame_index(self.progress, frame_count)
    }

    /// Record that `idx` is now on screen.
    pub fn mark_drawn(&mut self, idx: FrameIndex) {
        self.last_index = Some(idx);
        self.redraw_requested = false;
    }

    /// Drop the redraw request without changing what is on screen.
    pub fn settle(&mut self) {
        self.redraw_requested = false;
    }

    /// Index that is currently presented, if any.
    pub fn last_drawn(&self) -> Option<FrameIndex> {
        self.last_index
    }
}

/// Reveal state of the call-to-action shown near the end of the scrub.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CtaReveal {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether the control accepts pointer input.
    pub interactive: bool,
}

impl CtaReveal {
    /// Progress in `[threshold, 1]` maps linearly onto opacity `[0, 1]`; the control becomes
    /// interactive strictly above `threshold`.
    pub fn from_progress(progress: f64, threshold: f64) -> Self {
        Self {
            opacity: unit_ramp(progress, threshold, 1.0),
            interactive: progress.is_finite() && progress > threshold,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
