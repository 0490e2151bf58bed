//! JSON-loadable configuration for both canvas components.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::anim::clock::TimeStep;
use crate::assets::sequence::DEFAULT_FRAME_PATTERN;
use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};
use crate::input::pointer::{CoordinateSpace, DEFAULT_SMOOTHING};
use crate::render::particles::{GridLayout, ParticleStyle};

/// Brand palette; duplicate entries weight the draw.
pub const DEFAULT_PALETTE: [Rgb8; 5] = [
    Rgb8::new(0x00, 0x75, 0xCF),
    Rgb8::new(0x00, 0x75, 0xCF),
    Rgb8::new(0xFD, 0x5A, 0x1A),
    Rgb8::new(0xFD, 0x5A, 0x1A),
    Rgb8::new(0x00, 0x00, 0x00),
];

/// Default progress above which the call-to-action is revealed.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.95;

/// Configuration of the pointer-reactive particle field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    /// Grid spacing and dot size selection.
    pub layout: GridLayout,
    /// Colors assigned to dots.
    pub palette: Vec<Rgb8>,
    /// Animation constants.
    pub style: ParticleStyle,
    /// Pointer smoothing factor per tick, in `[0, 1]`.
    pub smoothing: f64,
    /// How the time accumulator advances.
    pub time_step: TimeStep,
    /// Fixed palette seed; a fresh seed per layout when absent.
    pub palette_seed: Option<u64>,
    /// Coordinate space of pointer input.
    pub coordinate_space: CoordinateSpace,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            layout: GridLayout::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            style: ParticleStyle::default(),
            smoothing: DEFAULT_SMOOTHING,
            time_step: TimeStep::default(),
            palette_seed: None,
            coordinate_space: CoordinateSpace::Viewport,
        }
    }
}

impl AmbientConfig {
    /// The full-window background: responsive grid, viewport coordinates.
    pub fn background() -> Self {
        Self::default()
    }

    /// The side panel: fixed grid, container-relative coordinates.
    pub fn panel() -> Self {
        Self {
            layout: GridLayout::PANEL,
            coordinate_space: CoordinateSpace::Container,
            ..Self::default()
        }
    }

    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollscapeResult<Self> {
        parse_reader(r, "ambient config")
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> ScrollscapeResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollscapeResult<Self> {
        parse_path(path.as_ref(), "ambient config")
    }

    /// Check value ranges.
    pub fn validate(&self) -> ScrollscapeResult<()> {
        if self.palette.is_empty() {
            return Err(ScrollscapeError::validation("palette must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ScrollscapeError::validation(
                "smoothing must be within [0, 1]",
            ));
        }
        self.layout.validate()?;
        self.style.validate()?;
        self.time_step.validate()
    }
}

/// Configuration of the scroll-synchronized frame player.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrubberConfig {
    /// Regex whose first capture group is the frame's sequence number.
    pub frame_pattern: String,
    /// File extensions accepted when discovering frames in a directory.
    pub extensions: Vec<String>,
    /// Progress above which the call-to-action is revealed.
    pub reveal_threshold: f64,
    /// Color the surface is cleared to before each frame.
    pub clear: Rgba8,
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            frame_pattern: DEFAULT_FRAME_PATTERN.to_owned(),
            extensions: ["jpg", "jpeg", "png", "webp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            clear: Rgba8::TRANSPARENT,
        }
    }
}

impl ScrubberConfig {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollscapeResult<Self> {
        parse_reader(r, "scrubber config")
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> ScrollscapeResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollscapeResult<Self> {
        parse_path(path.as_ref(), "scrubber config")
    }

    /// Check value ranges. The frame pattern is checked when the loader is built.
    pub fn validate(&self) -> ScrollscapeResult<()> {
        if !(0.0..1.0).contains(&self.reveal_threshold) {
            return Err(ScrollscapeError::validation(
                "reveal_threshold must be within [0, 1)",
            ));
        }
        if self.extensions.is_empty() {
            return Err(ScrollscapeError::validation(
                "at least one frame extension is required",
            ));
        }
        Ok(())
    }
}

fn parse_reader<T: DeserializeOwned, R: std::io::Read>(r: R, what: &str) -> ScrollscapeResult<T> {
    serde_json::from_reader(r)
        .map_err(|e| ScrollscapeError::serde(format!("parse {what} JSON: {e}")))
}

fn parse_path<T: DeserializeOwned>(path: &Path, what: &str) -> ScrollscapeResult<T> {
    let f = File::open(path).map_err(|e| {
        ScrollscapeError::validation(format!("open {what} JSON '{}': {e}", path.display()))
    })?;
    parse_reader(BufReader::new(f), what)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
