use std::sync::Arc;

use crate::assets::sequence::{FrameSequence, FrameSequenceLoader, FrameSource, PendingSequence};
use crate::config::ScrubberConfig;
use crate::foundation::core::{FrameIndex, Viewport};
use crate::foundation::error::ScrollscapeResult;
use crate::host::{HostEvent, ListenerKind};
use crate::render::frame::FrameRenderer;
use crate::render::surface::{FrameRGBA, RenderSurface, SurfaceStats};
use crate::scene::Scene;
use crate::scroll::mapper::{CtaReveal, ScrollFrameMapper};

/// Scroll-synchronized flipbook over a frame sequence.
///
/// Frames load on a background thread once mounted; nothing is drawn before the whole sequence
/// has resolved.
pub struct ScrollScrubber {
    config: ScrubberConfig,
    loader: FrameSequenceLoader,
    sources: Option<Vec<FrameSource>>,
    pending: Option<PendingSequence>,
    sequence: Option<Arc<FrameSequence>>,
    mapper: ScrollFrameMapper,
    renderer: FrameRenderer,
    surface: RenderSurface,
}

impl ScrollScrubber {
    /// Create a scrubber that loads `sources` when mounted.
    pub fn new(config: ScrubberConfig, sources: Vec<FrameSource>) -> ScrollscapeResult<Self> {
        config.validate()?;
        let loader = FrameSequenceLoader::new(&config.frame_pattern)?;
        let surface = RenderSurface::new(config.clear);
        Ok(Self {
            config,
            loader,
            sources: Some(sources),
            pending: None,
            sequence: None,
            mapper: ScrollFrameMapper::new(),
            renderer: FrameRenderer::new(),
            surface,
        })
    }

    /// Create a scrubber over an already loaded sequence.
    pub fn with_sequence(
        config: ScrubberConfig,
        sequence: FrameSequence,
    ) -> ScrollscapeResult<Self> {
        let mut s = Self::new(config, Vec::new())?;
        s.sources = None;
        s.install(sequence);
        Ok(s)
    }

    /// Return `true` once every frame has resolved. Never flips back.
    pub fn is_loaded(&self) -> bool {
        self.sequence.is_some()
    }

    /// The loaded sequence.
    pub fn sequence(&self) -> Option<&FrameSequence> {
        self.sequence.as_deref()
    }

    /// Latest scroll progress.
    pub fn progress(&self) -> f64 {
        self.mapper.progress()
    }

    /// Call-to-action reveal for the current progress.
    pub fn cta_reveal(&self) -> CtaReveal {
        CtaReveal::from_progress(self.mapper.progress(), self.config.reveal_threshold)
    }

    /// Index currently on screen.
    pub fn current_frame(&self) -> Option<FrameIndex> {
        self.mapper.last_drawn()
    }

    /// Latest presented frame.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.surface.frame()
    }

    /// Surface counters.
    pub fn stats(&self) -> SurfaceStats {
        self.surface.stats()
    }

    fn frame_count(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.len())
    }

    fn install(&mut self, sequence: FrameSequence) {
        self.renderer.bind(&sequence);
        self.sequence = Some(Arc::new(sequence));
        self.mapper.invalidate();
    }

    fn poll_load(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match pending.poll() {
            Some(seq) => {
                self.pending = None;
                tracing::info!(frames = seq.len(), failed = seq.failed_count(), "scrubber ready");
                self.install(seq);
            }
            None if !pending.is_pending() => self.pending = None,
            None => {}
        }
    }
}

impl Scene for ScrollScrubber {
    const LISTENERS: &'static [ListenerKind] = &[ListenerKind::Resize, ListenerKind::Scroll];

    fn mount(&mut self, viewport: Viewport) -> ScrollscapeResult<()> {
        self.surface.resize_now(viewport);
        if let Some(sources) = self.sources.take() {
            self.pending = Some(self.loader.spawn(sources)?);
        }
        self.mapper.invalidate();
        Ok(())
    }

    fn on_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::Resize(vp) => self.surface.request_resize(*vp),
            HostEvent::Scroll(p) => self.mapper.on_progress(*p, self.frame_count()),
            HostEvent::Pointer(_) => {}
        }
    }

    fn tick(&mut self, _t: f64) {
        self.poll_load();
        if self.surface.apply_pending_resize().is_some() {
            self.mapper.invalidate();
        }

        let Some(seq) = self.sequence.clone() else {
            return;
        };
        if !self.mapper.needs_redraw() {
            return;
        }
        let Some(idx) = self.mapper.current(seq.len()) else {
            return;
        };
        if self.renderer.draw(&mut self.surface, &seq, idx) {
            self.mapper.mark_drawn(idx);
        } else if seq.image(idx).is_none() {
            // Unusable frame: the previous one stays on screen.
            self.mapper.settle();
        }
    }

    fn unmount(&mut self) {
        if let Some(mut p) = self.pending.take() {
            p.cancel();
        }
        self.surface.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scrubber.rs"]
mod tests;
