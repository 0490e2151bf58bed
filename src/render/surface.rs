use crate::foundation::core::{Affine, LogicalSize, PixelSize, Rgba8, Viewport};
use crate::render::cpu::{affine_to_cpu, fill_pixmap, rect_to_cpu};

/// A presented frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel bytes with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Counters for observing what a surface actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Frames swapped onto the front buffer.
    pub frames_presented: u64,
    /// Draw attempts that left the front buffer untouched.
    pub draws_skipped: u64,
    /// Backing-store reallocations.
    pub resizes: u64,
}

/// Geometry handed to draw callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawTarget {
    /// Backing-store size in pixels.
    pub pixels: PixelSize,
    /// Layout size in logical pixels.
    pub logical: LogicalSize,
    /// Effective device pixel ratio.
    pub dpr: f64,
}

struct Backing {
    target: DrawTarget,
    ctx: vello_cpu::RenderContext,
    front: vello_cpu::Pixmap,
    back: vello_cpu::Pixmap,
    has_content: bool,
}

/// Owns a drawable double-buffered surface sized to its container.
///
/// Draws go to the back buffer and are swapped in only when complete, so a partially cleared
/// frame is never observable. A draw while a resize is pending is skipped; the owner applies the
/// resize at the start of its next tick and redraws.
pub struct RenderSurface {
    clear: Rgba8,
    backing: Option<Backing>,
    pending: Option<Viewport>,
    stats: SurfaceStats,
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new(Rgba8::TRANSPARENT)
    }
}

impl RenderSurface {
    /// Create an unallocated surface that clears to `clear` before every draw.
    pub fn new(clear: Rgba8) -> Self {
        Self {
            clear,
            backing: None,
            pending: None,
            stats: SurfaceStats::default(),
        }
    }

    /// Record a layout change. Last write wins until the next [`Self::apply_pending_resize`].
    pub fn request_resize(&mut self, viewport: Viewport) {
        self.pending = Some(viewport);
    }

    /// Return `true` while a layout change has not been applied.
    pub fn has_pending_resize(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a pending layout change, reallocating the backing store.
    ///
    /// Returns the applied viewport so the caller can re-derive size-dependent state.
    pub fn apply_pending_resize(&mut self) -> Option<Viewport> {
        let viewport = self.pending.take()?;
        self.allocate(viewport);
        Some(viewport)
    }

    /// Resize synchronously (initial layout).
    pub fn resize_now(&mut self, viewport: Viewport) {
        self.pending = None;
        self.allocate(viewport);
    }

    /// Return `true` when the surface can be drawn to.
    pub fn is_ready(&self) -> bool {
        self.backing.is_some() && self.pending.is_none()
    }

    /// Current draw geometry, if allocated.
    pub fn target(&self) -> Option<DrawTarget> {
        self.backing.as_ref().map(|b| b.target)
    }

    /// Surface counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Clear, run `draw` against the back buffer, and present it.
    ///
    /// `draw` returns `false` to abandon the frame; the previously presented content stays
    /// visible. Returns whether a frame was presented.
    pub fn draw(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, &DrawTarget) -> bool,
    ) -> bool {
        if self.pending.is_some() {
            tracing::trace!("draw deferred until pending resize is applied");
            self.stats.draws_skipped += 1;
            return false;
        }
        let Some(b) = self.backing.as_mut() else {
            self.stats.draws_skipped += 1;
            return false;
        };

        b.ctx.reset();
        if self.clear.a > 0 {
            b.ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
            b.ctx.set_paint(self.clear.to_paint());
            b.ctx.fill_rect(&rect_to_cpu(
                0.0,
                0.0,
                f64::from(b.target.pixels.width),
                f64::from(b.target.pixels.height),
            ));
        }

        if !draw(&mut b.ctx, &b.target) {
            self.stats.draws_skipped += 1;
            return false;
        }

        fill_pixmap(&mut b.back, self.clear.to_premul_bytes());
        b.ctx.flush();
        b.ctx.render_to_pixmap(&mut b.back);
        std::mem::swap(&mut b.front, &mut b.back);
        b.has_content = true;
        self.stats.frames_presented += 1;
        true
    }

    /// Snapshot of the presented frame. `None` before anything was presented.
    pub fn frame(&self) -> Option<FrameRGBA> {
        let b = self.backing.as_ref().filter(|b| b.has_content)?;
        Some(FrameRGBA {
            width: b.target.pixels.width,
            height: b.target.pixels.height,
            data: b.front.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Drop the backing store and any pending layout change.
    pub fn release(&mut self) {
        self.pending = None;
        self.backing = None;
    }

    #[tracing::instrument(skip(self), fields(w = viewport.size.width, h = viewport.size.height))]
    fn allocate(&mut self, viewport: Viewport) {
        let dpr = viewport.effective_dpr();
        let pixels = viewport.pixel_size();
        let target = DrawTarget {
            pixels,
            logical: viewport.size,
            dpr,
        };

        let (Ok(w), Ok(h)) = (
            u16::try_from(pixels.width),
            u16::try_from(pixels.height),
        ) else {
            tracing::warn!(?pixels, "surface exceeds rasterizer limits; rendering disabled");
            self.backing = None;
            return;
        };
        if w == 0 || h == 0 {
            tracing::warn!(?pixels, "surface has no area; rendering disabled");
            self.backing = None;
            return;
        }

        if let Some(b) = self.backing.as_mut()
            && b.target.pixels == pixels
        {
            // Same backing size; only logical geometry may have changed.
            b.target = target;
            return;
        }

        tracing::debug!(?pixels, dpr, "surface resized");
        let mut front = vello_cpu::Pixmap::new(w, h);
        fill_pixmap(&mut front, self.clear.to_premul_bytes());
        self.backing = Some(Backing {
            target,
            ctx: vello_cpu::RenderContext::new(w, h),
            front,
            back: vello_cpu::Pixmap::new(w, h),
            has_content: false,
        });
        self.stats.resizes += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
