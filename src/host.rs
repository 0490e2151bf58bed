//! Boundary between the animation core and its host environment.
//!
//! The host owns layout, input dispatch and the display-refresh clock. Components only ever see
//! the [`Host`] trait; [`HeadlessHost`] is an in-process implementation with a simulated refresh
//! clock used by batch tools and tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use crate::anim::clock::NOMINAL_FRAME;
use crate::foundation::core::Viewport;
use crate::foundation::error::ScrollscapeResult;
use crate::input::pointer::PointerEvent;

/// Category of host notification a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    /// Container or viewport resized.
    Resize,
    /// Pointer and touch input.
    Pointer,
    /// Scroll-progress change.
    Scroll,
}

/// Handle to an attached listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle to a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Notification delivered to an attached listener.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// New container layout.
    Resize(Viewport),
    /// Raw pointer input.
    Pointer(PointerEvent),
    /// Normalized scroll progress in `[0, 1]`.
    Scroll(f64),
}

impl HostEvent {
    /// Listener kind this event is delivered to.
    pub fn kind(&self) -> ListenerKind {
        match self {
            Self::Resize(_) => ListenerKind::Resize,
            Self::Pointer(_) => ListenerKind::Pointer,
            Self::Scroll(_) => ListenerKind::Scroll,
        }
    }
}

/// Host timestamp attached to a fired frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameTime {
    /// Time since the host started.
    pub elapsed: Duration,
}

/// Services a component needs from its environment.
pub trait Host {
    /// Current layout of the component's container.
    fn viewport(&self) -> Viewport;
    /// Ask for one callback at the next display refresh.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Revoke a request that has not fired yet.
    fn cancel_frame(&mut self, id: FrameRequestId);
    /// Subscribe to notifications of `kind`.
    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerId;
    /// Unsubscribe a listener.
    fn detach_listener(&mut self, id: ListenerId);
}

/// A component driven by a [`Host`].
pub trait CanvasComponent {
    /// Perform the initial layout, attach listeners and schedule the first frame.
    fn init(&mut self, host: &mut dyn Host) -> ScrollscapeResult<()>;
    /// Receive a notification for `listener`.
    fn handle_event(&mut self, host: &mut dyn Host, listener: ListenerId, event: &HostEvent);
    /// A previously requested frame fired.
    fn on_frame(&mut self, host: &mut dyn Host, request: FrameRequestId, at: FrameTime);
    /// Stop the loop and detach every listener.
    fn teardown(&mut self, host: &mut dyn Host);
}

/// What one [`HeadlessHost::pump`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Listener callbacks invoked.
    pub events_delivered: usize,
    /// Events with no attached listener.
    pub events_dropped: usize,
    /// Frame callbacks invoked.
    pub frames_fired: usize,
}

impl std::ops::AddAssign for PumpReport {
    fn add_assign(&mut self, rhs: Self) {
        self.events_delivered += rhs.events_delivered;
        self.events_dropped += rhs.events_dropped;
        self.frames_fired += rhs.frames_fired;
    }
}

/// Deterministic host with a simulated refresh clock.
#[derive(Debug)]
pub struct HeadlessHost {
    viewport: Viewport,
    refresh: Duration,
    now: Duration,
    next_id: u64,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    frame_requests: BTreeSet<FrameRequestId>,
    inbox: VecDeque<HostEvent>,
}

impl HeadlessHost {
    /// Create a 60 Hz host laid out at `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            refresh: NOMINAL_FRAME,
            now: Duration::ZERO,
            next_id: 1,
            listeners: BTreeMap::new(),
            frame_requests: BTreeSet::new(),
            inbox: VecDeque::new(),
        }
    }

    /// Use a different refresh interval.
    pub fn with_refresh_interval(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    /// Queue a notification for the next [`Self::pump`].
    ///
    /// A resize also updates what [`Host::viewport`] reports.
    pub fn push_event(&mut self, event: HostEvent) {
        if let HostEvent::Resize(vp) = &event {
            self.viewport = *vp;
        }
        self.inbox.push_back(event);
    }

    /// Simulated host time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of frame requests waiting to fire.
    pub fn pending_frames(&self) -> usize {
        self.frame_requests.len()
    }

    /// Deliver queued events to attached listeners, advance one refresh interval, and fire the
    /// frame requests that were pending at that moment.
    pub fn pump(&mut self, component: &mut dyn CanvasComponent) -> PumpReport {
        let mut report = PumpReport::default();

        while let Some(event) = self.inbox.pop_front() {
            let kind = event.kind();
            let targets: Vec<ListenerId> = self
                .listeners
                .iter()
                .filter(|(_, k)| **k == kind)
                .map(|(id, _)| *id)
                .collect();
            if targets.is_empty() {
                report.events_dropped += 1;
                continue;
            }
            for id in targets {
                // A callback may detach later listeners.
                if self.listeners.contains_key(&id) {
                    component.handle_event(self, id, &event);
                    report.events_delivered += 1;
                }
            }
        }

        self.now += self.refresh;
        let at = FrameTime { elapsed: self.now };
        let due = std::mem::take(&mut self.frame_requests);
        for id in due {
            component.on_frame(self, id, at);
            report.frames_fired += 1;
        }
        report
    }

    /// Pump `n` times and sum the reports.
    pub fn run(&mut self, component: &mut dyn CanvasComponent, n: usize) -> PumpReport {
        let mut total = PumpReport::default();
        for _ in 0..n {
            total += self.pump(component);
        }
        total
    }

    fn mint(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.mint());
        self.frame_requests.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.frame_requests.remove(&id);
    }

    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.mint());
        self.listeners.insert(id, kind);
        id
    }

    fn detach_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_none() {
            tracing::debug!(?id, "detach of unknown listener");
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/host.rs"]
mod tests;
