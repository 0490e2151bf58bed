use crate::anim::clock::{TimeAccumulator, TimeStep};
use crate::host::{FrameRequestId, FrameTime, Host, ListenerId, ListenerKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    TornDown,
}

/// Drives one component on the host's refresh clock.
///
/// Owns the time accumulator, the single outstanding frame request and every listener it
/// attached. Teardown is terminal: afterwards no frame is accepted and nothing is rescheduled.
#[derive(Debug)]
pub struct AnimationScheduler {
    lifecycle: Lifecycle,
    pending: Option<FrameRequestId>,
    listeners: Vec<(ListenerId, ListenerKind)>,
    clock: TimeAccumulator,
    ticks: u64,
}

impl AnimationScheduler {
    /// Create an idle scheduler.
    pub fn new(step: TimeStep) -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            pending: None,
            listeners: Vec::new(),
            clock: TimeAccumulator::new(step),
            ticks: 0,
        }
    }

    /// Attach `kinds` and request the first frame. Starting twice is a no-op.
    pub fn start(&mut self, host: &mut dyn Host, kinds: &[ListenerKind]) {
        if self.lifecycle != Lifecycle::Idle {
            tracing::warn!(state = ?self.lifecycle, "scheduler already started");
            return;
        }
        for &kind in kinds {
            let id = host.attach_listener(kind);
            self.listeners.push((id, kind));
        }
        self.pending = Some(host.request_frame());
        self.lifecycle = Lifecycle::Running;
        tracing::info!(listeners = self.listeners.len(), "animation loop started");
    }

    /// Return `true` before start.
    pub fn is_idle(&self) -> bool {
        self.lifecycle == Lifecycle::Idle
    }

    /// Return `true` between start and teardown.
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Kind of `id` if this scheduler attached it and is still running.
    pub fn listener_kind(&self, id: ListenerId) -> Option<ListenerKind> {
        if !self.is_running() {
            return None;
        }
        self.listeners
            .iter()
            .find(|(l, _)| *l == id)
            .map(|(_, k)| *k)
    }

    /// Accept a fired frame request and advance time.
    ///
    /// Returns `None` for stale or foreign requests and after teardown.
    pub fn accept_frame(&mut self, id: FrameRequestId, at: FrameTime) -> Option<f64> {
        if !self.is_running() || self.pending != Some(id) {
            tracing::trace!(?id, "ignoring stale frame request");
            return None;
        }
        self.pending = None;
        self.ticks += 1;
        Some(self.clock.advance(at.elapsed))
    }

    /// Request the next frame if running and none is outstanding.
    pub fn reschedule(&mut self, host: &mut dyn Host) {
        if self.is_running() && self.pending.is_none() {
            self.pending = Some(host.request_frame());
        }
    }

    /// Revoke the pending request and detach every listener.
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
        }
        for (id, _) in self.listeners.drain(..) {
            host.detach_listener(id);
        }
        self.lifecycle = Lifecycle::TornDown;
        tracing::info!(ticks = self.ticks, "animation loop torn down");
    }

    /// Current value of the time accumulator.
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Ticks accepted so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/scheduler.rs"]
mod tests;
