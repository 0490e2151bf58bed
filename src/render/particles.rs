//! Pointer-reactive dot grid.
//!
//! A [`DotField`] is rebuilt once per layout epoch. Per tick, [`dot_appearance`] derives each
//! dot's displaced position, radius and alpha from the time accumulator and the smoothed pointer,
//! and [`ParticleFieldRenderer`] rasterizes the result in logical pixels scaled by the device
//! pixel ratio.

use crate::foundation::core::{Affine, LogicalSize, Point, Rgb8, Rgba8, Vec2};
use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};
use crate::foundation::math::Fnv1a64;
use crate::render::cpu::{affine_to_cpu, circle_path, line_path};
use crate::render::surface::RenderSurface;

/// Grid spacing and dot size for one breakpoint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    /// Distance between neighboring grid points, in logical pixels.
    pub spacing: f64,
    /// Dot radius before pointer glow.
    pub base_radius: f64,
}

impl GridSpec {
    /// Construct a grid spec.
    pub const fn new(spacing: f64, base_radius: f64) -> Self {
        Self {
            spacing,
            base_radius,
        }
    }
}

/// How the grid spec is chosen for a layout width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridLayout {
    /// `narrow` below `breakpoint` logical pixels of width, `wide` otherwise.
    Responsive {
        /// Width threshold in logical pixels.
        breakpoint: f64,
        /// Spec used for widths below the breakpoint.
        narrow: GridSpec,
        /// Spec used at or above the breakpoint.
        wide: GridSpec,
    },
    /// Same spec at every width.
    Fixed(GridSpec),
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::Responsive {
            breakpoint: 768.0,
            narrow: GridSpec::new(48.0, 2.0),
            wide: GridSpec::new(32.0, 2.5),
        }
    }
}

impl GridLayout {
    /// The fixed layout used by the panel variant.
    pub const PANEL: Self = Self::Fixed(GridSpec::new(32.0, 2.5));

    /// Spec applied to a surface `width` logical pixels wide.
    pub fn spec_for(&self, width: f64) -> GridSpec {
        match *self {
            Self::Responsive {
                breakpoint,
                narrow,
                wide,
            } => {
                if width < breakpoint {
                    narrow
                } else {
                    wide
                }
            }
            Self::Fixed(spec) => spec,
        }
    }

    pub(crate) fn validate(&self) -> ScrollscapeResult<()> {
        let specs = match *self {
            Self::Responsive {
                breakpoint,
                narrow,
                wide,
            } => {
                if !breakpoint.is_finite() || breakpoint < 0.0 {
                    return Err(ScrollscapeError::validation(
                        "grid breakpoint must be finite and >= 0",
                    ));
                }
                vec![narrow, wide]
            }
            Self::Fixed(spec) => vec![spec],
        };
        for s in specs {
            if !s.spacing.is_finite() || s.spacing <= 0.0 {
                return Err(ScrollscapeError::validation("grid spacing must be > 0"));
            }
            if !s.base_radius.is_finite() || s.base_radius < 0.0 {
                return Err(ScrollscapeError::validation("dot base_radius must be >= 0"));
            }
        }
        Ok(())
    }
}

/// Grid extent: points run over `0..=cols` by `0..=rows`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    /// `floor(width / spacing) + 1`.
    pub cols: u32,
    /// `floor(height / spacing) + 1`.
    pub rows: u32,
}

impl GridDims {
    /// Derive the grid extent for a logical size.
    pub fn for_size(size: LogicalSize, spacing: f64) -> Self {
        let axis = |len: f64| {
            if len.is_finite() && len > 0.0 && spacing > 0.0 {
                (len / spacing).floor() as u32 + 1
            } else {
                0
            }
        };
        Self {
            cols: axis(size.width),
            rows: axis(size.height),
        }
    }

    /// Number of dots the grid holds, including the margin row and column.
    pub fn dot_count(self) -> usize {
        (self.cols as usize + 1) * (self.rows as usize + 1)
    }
}

/// One particle of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    /// Undisplaced grid position.
    pub base: Point,
    /// Radius before pointer glow.
    pub base_radius: f64,
    /// Palette entry assigned at build time.
    pub color: Rgb8,
    /// Wave phase offset, `(i + j) * 0.2`.
    pub phase: f64,
}

/// All dots of one layout epoch.
#[derive(Clone, Debug, Default)]
pub struct DotField {
    dims: Option<GridDims>,
    dots: Vec<Dot>,
}

impl DotField {
    /// Lay out a grid over `size` and assign palette colors.
    ///
    /// Color assignment is a pure function of `seed` and the grid coordinates.
    pub fn build(size: LogicalSize, layout: &GridLayout, palette: &[Rgb8], seed: u64) -> Self {
        let spec = layout.spec_for(size.width);
        let dims = GridDims::for_size(size, spec.spacing);
        if palette.is_empty() || dims.cols == 0 || dims.rows == 0 {
            return Self::default();
        }

        let mut dots = Vec::with_capacity(dims.dot_count());
        for i in 0..=dims.cols {
            for j in 0..=dims.rows {
                let mut h = Fnv1a64::new(seed);
                h.write_u64(u64::from(i));
                h.write_u64(u64::from(j));
                let pick = (h.finish() % palette.len() as u64) as usize;
                dots.push(Dot {
                    base: Point::new(f64::from(i) * spec.spacing, f64::from(j) * spec.spacing),
                    base_radius: spec.base_radius,
                    color: palette[pick],
                    phase: f64::from(i + j) * 0.2,
                });
            }
        }
        tracing::debug!(
            cols = dims.cols,
            rows = dims.rows,
            dots = dots.len(),
            spacing = spec.spacing,
            "dot field rebuilt"
        );
        Self {
            dims: Some(dims),
            dots,
        }
    }

    /// Grid extent, `None` for an empty field.
    pub fn dims(&self) -> Option<GridDims> {
        self.dims
    }

    /// Borrow the dots.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Number of dots.
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    /// Return `true` when the field has no dots.
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

/// Animation constants of the particle field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
    /// Pointer distance below which dots glow.
    pub glow_radius: f64,
    /// Pointer distance below which dots link to the pointer.
    pub link_radius: f64,
    /// Extra radius at full glow.
    pub glow_radius_gain: f64,
    /// Link stroke width.
    pub link_width: f64,
    /// Link alpha at full glow.
    pub link_max_alpha: f64,
    /// Wave displacement amplitude on both axes.
    pub wave_amplitude: f64,
    /// Horizontal wave frequency.
    pub wave_freq_x: f64,
    /// Vertical wave frequency.
    pub wave_freq_y: f64,
    /// Alpha with no pointer influence.
    pub base_alpha: f64,
    /// Idle pulsation amplitude around `base_alpha`.
    pub idle_pulse_amplitude: f64,
    /// Idle pulsation frequency.
    pub idle_pulse_freq: f64,
    /// Pointer ring mean radius.
    pub ring_radius: f64,
    /// Pointer ring pulsation amplitude.
    pub ring_pulse_amplitude: f64,
    /// Pointer ring pulsation frequency.
    pub ring_pulse_freq: f64,
    /// Pointer ring stroke width.
    pub ring_width: f64,
    /// Pointer ring stroke color.
    pub ring_color: Rgba8,
    /// Pointer accent dot radius.
    pub accent_radius: f64,
    /// Pointer accent dot color.
    pub accent_color: Rgb8,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            glow_radius: 200.0,
            link_radius: 120.0,
            glow_radius_gain: 8.0,
            link_width: 2.5,
            link_max_alpha: 0.6,
            wave_amplitude: 15.0,
            wave_freq_x: 0.5,
            wave_freq_y: 0.3,
            base_alpha: 0.4,
            idle_pulse_amplitude: 0.2,
            idle_pulse_freq: 0.2,
            ring_radius: 16.0,
            ring_pulse_amplitude: 4.0,
            ring_pulse_freq: 2.0,
            ring_width: 2.0,
            ring_color: Rgba8::new(0, 0, 0, 128),
            accent_radius: 4.0,
            accent_color: Rgb8::new(0xFD, 0x5A, 0x1A),
        }
    }
}

impl ParticleStyle {
    pub(crate) fn validate(&self) -> ScrollscapeResult<()> {
        let non_negative = [
            ("glow_radius", self.glow_radius),
            ("link_radius", self.link_radius),
            ("glow_radius_gain", self.glow_radius_gain),
            ("link_width", self.link_width),
            ("wave_amplitude", self.wave_amplitude),
            ("ring_radius", self.ring_radius),
            ("ring_width", self.ring_width),
            ("accent_radius", self.accent_radius),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(ScrollscapeError::validation(format!(
                    "particle style '{name}' must be finite and >= 0"
                )));
            }
        }
        let finite = [
            self.link_max_alpha,
            self.wave_freq_x,
            self.wave_freq_y,
            self.base_alpha,
            self.idle_pulse_amplitude,
            self.idle_pulse_freq,
            self.ring_pulse_amplitude,
            self.ring_pulse_freq,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ScrollscapeError::validation(
                "particle style values must be finite",
            ));
        }
        if self.link_radius > self.glow_radius {
            return Err(ScrollscapeError::validation(
                "particle style 'link_radius' must not exceed 'glow_radius'",
            ));
        }
        Ok(())
    }
}

/// Per-tick rendering parameters of one dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotAppearance {
    /// Displaced position.
    pub center: Point,
    /// Radius including glow.
    pub radius: f64,
    /// Fill alpha in `[0, 1]`.
    pub alpha: f64,
    /// Alpha of the line to the pointer, when linked.
    pub link_alpha: Option<f64>,
}

/// Derive a dot's appearance at time `t` with an optional active pointer.
pub fn dot_appearance(
    dot: &Dot,
    t: f64,
    pointer: Option<Point>,
    style: &ParticleStyle,
) -> DotAppearance {
    let wave = Vec2::new(
        (t * style.wave_freq_x + dot.phase).sin() * style.wave_amplitude,
        (t * style.wave_freq_y + dot.phase).cos() * style.wave_amplitude,
    );
    let center = dot.base + wave;

    let Some(p) = pointer else {
        let pulse = (t * style.idle_pulse_freq + dot.phase).sin();
        let alpha = style.base_alpha + pulse * style.idle_pulse_amplitude;
        return DotAppearance {
            center,
            radius: dot.base_radius,
            alpha,
            link_alpha: None,
        };
    };

    let d = center.distance(p);
    if d >= style.glow_radius {
        return DotAppearance {
            center,
            radius: dot.base_radius,
            alpha: style.base_alpha,
            link_alpha: None,
        };
    }

    let factor = 1.0 - d / style.glow_radius;
    DotAppearance {
        center,
        radius: dot.base_radius + factor * style.glow_radius_gain,
        alpha: style.base_alpha + factor * (1.0 - style.base_alpha),
        link_alpha: (d < style.link_radius).then_some(style.link_max_alpha * factor),
    }
}

/// The pulsing ring drawn around the active pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerIndicator {
    /// Smoothed pointer position.
    pub center: Point,
    /// Ring radius at this time.
    pub ring_radius: f64,
}

/// Pointer indicator at time `t`; its ring radius oscillates by the configured amplitude.
pub fn pointer_indicator(pointer: Point, t: f64, style: &ParticleStyle) -> PointerIndicator {
    let pulse = (t * style.ring_pulse_freq).sin();
    PointerIndicator {
        center: pointer,
        ring_radius: style.ring_radius + pulse * style.ring_pulse_amplitude,
    }
}

/// Rasterizes a [`DotField`] onto a [`RenderSurface`].
#[derive(Clone, Debug, Default)]
pub struct ParticleFieldRenderer {
    style: ParticleStyle,
}

impl ParticleFieldRenderer {
    /// Create a renderer with `style`.
    pub fn new(style: ParticleStyle) -> Self {
        Self { style }
    }

    /// Animation constants in use.
    pub fn style(&self) -> &ParticleStyle {
        &self.style
    }

    /// Draw one tick. `pointer` is the smoothed position when the pointer is active.
    ///
    /// Returns whether a frame was presented.
    pub fn draw(
        &self,
        surface: &mut RenderSurface,
        field: &DotField,
        t: f64,
        pointer: Option<Point>,
    ) -> bool {
        let style = &self.style;
        surface.draw(|ctx, target| {
            ctx.set_transform(affine_to_cpu(Affine::scale(target.dpr)));

            for dot in field.dots() {
                let look = dot_appearance(dot, t, pointer, style);
                if let (Some(p), Some(a)) = (pointer, look.link_alpha) {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.link_width));
                    ctx.set_paint(dot.color.with_alpha(a).to_paint());
                    ctx.stroke_path(&line_path(look.center, p));
                }
                ctx.set_paint(dot.color.with_alpha(look.alpha).to_paint());
                ctx.fill_path(&circle_path(look.center, look.radius));
            }

            if let Some(p) = pointer {
                let ind = pointer_indicator(p, t, style);
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.ring_width));
                ctx.set_paint(style.ring_color.to_paint());
                ctx.stroke_path(&circle_path(ind.center, ind.ring_radius));

                ctx.set_paint(style.accent_color.with_alpha(1.0).to_paint());
                ctx.fill_path(&circle_path(ind.center, style.accent_radius));
            }
            true
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/particles.rs"]
mod tests;
