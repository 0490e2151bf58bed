use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::AmbientConfig;
use crate::foundation::core::Viewport;
use crate::foundation::error::ScrollscapeResult;
use crate::foundation::math::Fnv1a64;
use crate::host::{HostEvent, ListenerKind};
use crate::input::pointer::{PointerState, PointerTracker};
use crate::render::particles::{DotField, ParticleFieldRenderer};
use crate::render::surface::{FrameRGBA, RenderSurface, SurfaceStats};
use crate::scene::Scene;

/// Pointer-reactive particle field filling its container.
///
/// All animation state is per instance. Dots are rebuilt at the start of the first tick after a
/// resize, before anything is drawn at the new size.
pub struct AmbientField {
    config: AmbientConfig,
    viewport: Option<Viewport>,
    surface: RenderSurface,
    field: DotField,
    pointer: PointerTracker,
    renderer: ParticleFieldRenderer,
    epoch: u64,
    entropy: u64,
}

impl AmbientField {
    /// Create an unmounted field.
    pub fn new(config: AmbientConfig) -> ScrollscapeResult<Self> {
        config.validate()?;
        let pointer = PointerTracker::new(config.coordinate_space, config.smoothing);
        let renderer = ParticleFieldRenderer::new(config.style.clone());
        Ok(Self {
            config,
            viewport: None,
            surface: RenderSurface::default(),
            field: DotField::default(),
            pointer,
            renderer,
            epoch: 0,
            entropy: clock_entropy(),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    /// Latest presented frame.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.surface.frame()
    }

    /// Surface counters.
    pub fn stats(&self) -> SurfaceStats {
        self.surface.stats()
    }

    /// Smoothed pointer state.
    pub fn pointer(&self) -> &PointerState {
        self.pointer.state()
    }

    /// Dots of the current layout epoch.
    pub fn dots(&self) -> &DotField {
        &self.field
    }

    /// Number of layouts applied so far.
    pub fn layout_epochs(&self) -> u64 {
        self.epoch
    }

    fn relayout(&mut self, viewport: Viewport) {
        self.epoch += 1;
        // The grid follows the drawable surface; no surface means no dots.
        if viewport.size.is_degenerate() || self.surface.target().is_none() {
            tracing::debug!(epoch = self.epoch, "no drawable surface; dot field cleared");
            self.field = DotField::default();
            return;
        }
        let seed = match self.config.palette_seed {
            Some(seed) => seed,
            None => {
                let mut h = Fnv1a64::new(self.entropy);
                h.write_u64(self.epoch);
                h.finish()
            }
        };
        self.field = DotField::build(
            viewport.size,
            &self.config.layout,
            &self.config.palette,
            seed,
        );
    }
}

impl Scene for AmbientField {
    const LISTENERS: &'static [ListenerKind] = &[ListenerKind::Resize, ListenerKind::Pointer];

    fn mount(&mut self, viewport: Viewport) -> ScrollscapeResult<()> {
        self.viewport = Some(viewport);
        self.surface.resize_now(viewport);
        self.relayout(viewport);
        Ok(())
    }

    fn on_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::Resize(vp) => {
                self.viewport = Some(*vp);
                self.surface.request_resize(*vp);
            }
            HostEvent::Pointer(e) => {
                if let Some(vp) = self.viewport {
                    self.pointer.ingest(e, &vp);
                }
            }
            HostEvent::Scroll(_) => {}
        }
    }

    fn tick(&mut self, t: f64) {
        if let Some(vp) = self.surface.apply_pending_resize() {
            self.relayout(vp);
        }
        self.pointer.tick();
        self.renderer
            .draw(&mut self.surface, &self.field, t, self.pointer.active_position());
    }

    fn unmount(&mut self) {
        self.surface.release();
        self.field = DotField::default();
    }
}

fn clock_entropy() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut h = Fnv1a64::new(nanos);
    h.write_u64(std::process::id().into());
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/ambient.rs"]
mod tests;
