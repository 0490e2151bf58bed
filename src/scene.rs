//! Canvas components: a [`Scene`] holds per-instance render state, [`Animated`] binds it to the
//! host through an [`AnimationScheduler`].

pub(crate) mod ambient;
pub(crate) mod scrubber;

use crate::anim::clock::TimeStep;
use crate::anim::scheduler::AnimationScheduler;
use crate::foundation::core::Viewport;
use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};
use crate::host::{
    CanvasComponent, FrameRequestId, FrameTime, Host, HostEvent, ListenerId, ListenerKind,
};

/// Render state of one canvas component instance.
pub trait Scene {
    /// Listener kinds attached while the scene is mounted.
    const LISTENERS: &'static [ListenerKind];

    /// Synchronous initial layout.
    fn mount(&mut self, viewport: Viewport) -> ScrollscapeResult<()>;

    /// Apply a host notification. Called between ticks, never during one.
    fn on_event(&mut self, event: &HostEvent);

    /// One refresh-synchronized iteration at animation time `t`.
    fn tick(&mut self, t: f64);

    /// Release resources and cancel outstanding work.
    fn unmount(&mut self);
}

/// A [`Scene`] driven by the host's refresh clock.
pub struct Animated<S> {
    scene: S,
    scheduler: AnimationScheduler,
    mounted: bool,
}

impl<S: Scene> Animated<S> {
    /// Bind `scene` to a scheduler advancing time by `step`.
    pub fn new(scene: S, step: TimeStep) -> Self {
        Self {
            scene,
            scheduler: AnimationScheduler::new(step),
            mounted: false,
        }
    }

    /// Borrow the scene.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Borrow the scheduler.
    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }
}

impl<S: Scene> CanvasComponent for Animated<S> {
    fn init(&mut self, host: &mut dyn Host) -> ScrollscapeResult<()> {
        if !self.scheduler.is_idle() {
            return Err(ScrollscapeError::validation(
                "component was already initialized or torn down",
            ));
        }
        self.scene.mount(host.viewport())?;
        self.mounted = true;
        self.scheduler.start(host, S::LISTENERS);
        Ok(())
    }

    fn handle_event(&mut self, _host: &mut dyn Host, listener: ListenerId, event: &HostEvent) {
        match self.scheduler.listener_kind(listener) {
            Some(kind) if kind == event.kind() => self.scene.on_event(event),
            _ => tracing::trace!(?listener, "ignoring event for unknown or detached listener"),
        }
    }

    fn on_frame(&mut self, host: &mut dyn Host, request: FrameRequestId, at: FrameTime) {
        let Some(t) = self.scheduler.accept_frame(request, at) else {
            return;
        };
        self.scene.tick(t);
        self.scheduler.reschedule(host);
    }

    fn teardown(&mut self, host: &mut dyn Host) {
        self.scheduler.teardown(host);
        if self.mounted {
            self.scene.unmount();
            self.mounted = false;
        }
    }
}
