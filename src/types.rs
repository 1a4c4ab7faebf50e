//! Core types for background removal operations

use crate::error::{BgRemovalError, Result};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

/// Largest possible L1 distance between two RGB triples (3 * 255)
pub const MAX_COLOR_DISTANCE: u32 = 765;

/// Reference color that pixels are compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    /// Pure white, the most common flat background
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from the first three channels of a pixel, ignoring alpha
    #[must_use]
    pub fn from_channels(channels: &[u8]) -> Self {
        match channels {
            [r, g, b, ..] => Self::new(*r, *g, *b),
            _ => Self::new(0, 0, 0),
        }
    }

    /// Manhattan (L1) distance in RGB space
    #[must_use]
    pub fn distance(self, r: u8, g: u8, b: u8) -> u32 {
        u32::from(self.r.abs_diff(r)) + u32::from(self.g.abs_diff(g)) + u32::from(self.b.abs_diff(b))
    }
}

impl From<[u8; 3]> for BackgroundColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for BackgroundColor {
    type Err = BgRemovalError;

    /// Accepts `#rrggbb`, `rrggbb` or `r,g,b`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed.contains(',') {
            let channels = trimmed
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|e| {
                    BgRemovalError::invalid_config(format!("Invalid color '{}': {}", s, e))
                })?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(BgRemovalError::invalid_config(format!(
                    "Invalid color '{}': expected three comma-separated channels",
                    s
                ))),
            };
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(BgRemovalError::invalid_config(format!(
                "Invalid color '{}': expected #rrggbb or r,g,b",
                s
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| {
                    BgRemovalError::invalid_config(format!("Invalid hex color '{}'", s))
                })
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Metadata collected while processing a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Tolerance used for classification
    pub tolerance: u32,
    /// Name of the detection strategy that chose the background color
    pub detector: String,
    /// Color type of the decoded source image (e.g. `Rgb8`)
    pub source_color_type: String,
    /// Whether the source carried its own alpha channel
    pub source_had_alpha: bool,
    /// Wall-clock time spent in detection and classification
    pub processing_ms: u64,
}

/// Result of a background removal operation
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// RGBA image with background pixels made transparent
    pub image: RgbaImage,

    /// Color that was treated as background
    pub background_color: BackgroundColor,

    /// Number of pixels whose alpha was set to 0
    pub pixels_changed: u64,

    /// Original image dimensions
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Original input path (for logging purposes)
    pub input_path: Option<String>,
}

impl RemovalResult {
    #[must_use]
    pub fn new(
        image: RgbaImage,
        background_color: BackgroundColor,
        pixels_changed: u64,
        metadata: ProcessingMetadata,
    ) -> Self {
        let original_dimensions = image.dimensions();
        Self {
            image,
            background_color,
            pixels_changed,
            original_dimensions,
            metadata,
            input_path: None,
        }
    }

    /// Attach the input path this result was produced from
    #[must_use]
    pub fn with_input_path<S: Into<String>>(mut self, path: S) -> Self {
        self.input_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn total_pixels(&self) -> u64 {
        u64::from(self.original_dimensions.0) * u64::from(self.original_dimensions.1)
    }

    /// Fraction of pixels made transparent, in `[0, 1]`
    #[must_use]
    pub fn transparent_ratio(&self) -> f64 {
        let total = self.total_pixels();
        if total == 0 {
            0.0
        } else {
            self.pixels_changed as f64 / total as f64
        }
    }

    /// Encode the result as PNG in memory
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| BgRemovalError::Encode(format!("Failed to encode PNG: {}", e)))?;
        Ok(bytes)
    }

    /// Save the result as PNG, whatever extension `path` carries
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::services::ImageIOService::save_png(&self.image, path)
    }
}
