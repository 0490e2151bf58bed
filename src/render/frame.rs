use crate::assets::sequence::FrameSequence;
use crate::foundation::core::{Affine, FrameIndex, PixelSize, Vec2};
use crate::render::cpu::{affine_to_cpu, image_paint, rect_to_cpu};
use crate::render::surface::RenderSurface;

/// Placement of an image scaled to cover a surface, cropping overflow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the image.
    pub scale: f64,
    /// Left edge of the drawn image, in surface pixels (negative when cropped).
    pub x: f64,
    /// Top edge of the drawn image, in surface pixels (negative when cropped).
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
}

impl CoverFit {
    /// `scale = max(W/w, H/h)`, centered. `None` when either size has no area.
    pub fn compute(surface: PixelSize, image_w: u32, image_h: u32) -> Option<Self> {
        if surface.width == 0 || surface.height == 0 || image_w == 0 || image_h == 0 {
            return None;
        }
        let (sw, sh) = (f64::from(surface.width), f64::from(surface.height));
        let (iw, ih) = (f64::from(image_w), f64::from(image_h));

        let scale = (sw / iw).max(sh / ih);
        let width = iw * scale;
        let height = ih * scale;
        Some(Self {
            scale,
            x: sw / 2.0 - width / 2.0,
            y: sh / 2.0 - height / 2.0,
            width,
            height,
        })
    }

    fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::scale(self.scale)
    }
}

/// Draws one frame of a sequence with cover-fit scaling.
///
/// Holds only a per-sequence paint cache; drawing the same index twice yields identical pixels.
#[derive(Default)]
pub struct FrameRenderer {
    paints: Vec<Option<vello_cpu::Image>>,
}

impl FrameRenderer {
    /// Create an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the paint cache for a freshly loaded sequence.
    pub fn bind(&mut self, sequence: &FrameSequence) {
        self.paints.clear();
        self.paints.resize_with(sequence.len(), || None);
    }

    /// Draw `idx` from `sequence` onto `surface`.
    ///
    /// Out-of-range indices, failed frames and unavailable surfaces are no-ops that leave the
    /// previous frame visible. Returns whether a frame was presented.
    pub fn draw(
        &mut self,
        surface: &mut RenderSurface,
        sequence: &FrameSequence,
        idx: FrameIndex,
    ) -> bool {
        let Some(img) = sequence.image(idx) else {
            tracing::trace!(index = idx.0, "no drawable frame at index");
            return false;
        };
        let Some(paint) = self.paint_for(sequence, idx) else {
            return false;
        };

        let (iw, ih) = (img.width, img.height);
        surface.draw(|ctx, target| {
            let Some(fit) = CoverFit::compute(target.pixels, iw, ih) else {
                return false;
            };
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(fit.transform()));
            ctx.set_paint(paint);
            ctx.fill_rect(&rect_to_cpu(0.0, 0.0, f64::from(iw), f64::from(ih)));
            true
        })
    }

    fn paint_for(&mut self, sequence: &FrameSequence, idx: FrameIndex) -> Option<vello_cpu::Image> {
        if self.paints.len() != sequence.len() {
            self.bind(sequence);
        }
        if let Some(p) = self.paints.get(idx.0).and_then(|p| p.clone()) {
            return Some(p);
        }
        let img = sequence.image(idx)?;
        match image_paint(img) {
            Ok(p) => {
                self.paints[idx.0] = Some(p.clone());
                Some(p)
            }
            Err(e) => {
                tracing::warn!(index = idx.0, error = %e, "frame cannot be uploaded; skipping");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
