use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// 0-based index into a loaded frame sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

/// Layout size in logical (CSS-like) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogicalSize {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl LogicalSize {
    /// Create a new logical size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` when either side is zero, negative or not finite.
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Backing-store dimensions in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Scale a logical size by a device pixel ratio, truncating like a canvas backing store does.
    pub fn from_logical(size: LogicalSize, dpr: f64) -> Self {
        fn px(v: f64) -> u32 {
            if !v.is_finite() || v <= 0.0 {
                return 0;
            }
            v.floor().min(f64::from(u32::MAX)) as u32
        }
        Self {
            width: px(size.width * dpr),
            height: px(size.height * dpr),
        }
    }
}

/// Layout information supplied by the host for one drawable container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Container layout size.
    pub size: LogicalSize,
    /// Container top-left corner in viewport coordinates.
    pub origin: Point,
    /// Host device pixel ratio, if the host reports one.
    pub device_pixel_ratio: Option<f64>,
}

impl Viewport {
    /// A viewport anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: LogicalSize::new(width, height),
            origin: Point::ORIGIN,
            device_pixel_ratio: None,
        }
    }

    /// Return a copy with the given device pixel ratio.
    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = Some(dpr);
        self
    }

    /// Return a copy with the container placed at `origin`.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Device pixel ratio, falling back to `1.0` when missing or unusable.
    pub fn effective_dpr(&self) -> f64 {
        match self.device_pixel_ratio {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => 1.0,
        }
    }

    /// Target backing-store size for this viewport.
    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::from_logical(self.size, self.effective_dpr())
    }
}

/// Opaque sRGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> ScrollscapeResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ScrollscapeError::validation(format!(
                "color '{s}' must have the form #RRGGBB"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| {
                ScrollscapeError::validation(format!("color '{s}' has a non-hex digit"))
            })
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Attach a floating-point alpha in `[0, 1]` (clamped).
    pub fn with_alpha(self, alpha: f64) -> Rgba8 {
        let a = if alpha.is_finite() {
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            0
        };
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = ScrollscapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn to_paint(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Premultiplied byte representation.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        let a = u16::from(self.a);
        [
            crate::foundation::math::mul_div255_u8(u16::from(self.r), a),
            crate::foundation::math::mul_div255_u8(u16::from(self.g), a),
            crate::foundation::math::mul_div255_u8(u16::from(self.b), a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
