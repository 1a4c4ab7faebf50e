//! Background removal processor
//!
//! This module provides the `BackgroundRemovalProcessor` that owns the
//! detection strategy and the per-pixel transparency transform. The CLI and
//! the batch runner both go through it so single files and directories are
//! treated identically.

use crate::{
    config::RemovalConfig,
    detector::BackgroundColorDetector,
    error::{BgRemovalError, Result},
    services::ImageIOService,
    types::{BackgroundColor, ProcessingMetadata, RemovalResult},
};
use image::{DynamicImage, Rgba, RgbaImage};
use instant::Instant;
use log::debug;
use std::path::{Path, PathBuf};
use tracing::{debug as trace_debug, instrument};

/// Make every pixel within `tolerance` of `background` fully transparent
///
/// RGB channels are never modified. Pixels that do not match keep the alpha
/// they already carry (255 for sources without an alpha channel once
/// converted to RGBA). Returns the new image and the number of pixels that
/// were made transparent.
#[must_use]
pub fn apply_transparency(
    image: &RgbaImage,
    background: BackgroundColor,
    tolerance: u32,
) -> (RgbaImage, u64) {
    let (width, height) = image.dimensions();
    let mut result = RgbaImage::new(width, height);
    let mut pixels_changed = 0u64;

    for (source, target) in image.pixels().zip(result.pixels_mut()) {
        let Rgba([r, g, b, a]) = *source;
        if background.distance(r, g, b) <= tolerance {
            *target = Rgba([r, g, b, 0]);
            pixels_changed += 1;
        } else {
            *target = Rgba([r, g, b, a]);
        }
    }

    (result, pixels_changed)
}

/// Background removal processor
pub struct BackgroundRemovalProcessor {
    config: RemovalConfig,
    detector: Box<dyn BackgroundColorDetector>,
}

impl BackgroundRemovalProcessor {
    /// Create a processor using the detector named by the configuration
    #[must_use]
    pub fn new(config: RemovalConfig) -> Self {
        let detector = config.detection.create_detector();
        Self::with_detector(config, detector)
    }

    /// Create a processor with a custom detection strategy
    ///
    /// The configuration's own `detection` field is ignored in favor of
    /// `detector`.
    #[must_use]
    pub fn with_detector(config: RemovalConfig, detector: Box<dyn BackgroundColorDetector>) -> Self {
        Self { config, detector }
    }

    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Name of the active detection strategy
    #[must_use]
    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Detect the background color of a decoded image
    pub fn detect_background(&self, image: &DynamicImage) -> Result<BackgroundColor> {
        Self::ensure_not_empty(image)?;
        Ok(self.detector.detect(&image.to_rgba8()))
    }

    /// Process a decoded image
    ///
    /// # Errors
    ///
    /// Returns `BgRemovalError::InvalidImage` for images with zero width or
    /// height. Any non-empty image succeeds.
    #[instrument(
        skip(self, image),
        fields(
            detector = self.detector.name(),
            tolerance = self.config.tolerance,
            dimensions = %format!("{}x{}", image.width(), image.height())
        )
    )]
    pub fn process_image(&self, image: &DynamicImage) -> Result<RemovalResult> {
        Self::ensure_not_empty(image)?;

        let start = Instant::now();
        let source_had_alpha = image.color().has_alpha();
        let rgba = image.to_rgba8();

        let background = self.detector.detect(&rgba);
        trace_debug!(background = %background, "Detected background color");

        let (output, pixels_changed) =
            apply_transparency(&rgba, background, self.config.tolerance);

        let processing_ms = start.elapsed().as_millis() as u64;
        if self.config.debug {
            debug!(
                "Made {} of {} pixels transparent in {}ms",
                pixels_changed,
                u64::from(output.width()) * u64::from(output.height()),
                processing_ms
            );
        }

        let metadata = ProcessingMetadata {
            tolerance: self.config.tolerance,
            detector: self.detector.name().to_string(),
            source_color_type: format!("{:?}", image.color()),
            source_had_alpha,
            processing_ms,
        };

        Ok(RemovalResult::new(output, background, pixels_changed, metadata))
    }

    /// Load and process an image file
    ///
    /// # Errors
    ///
    /// - `BgRemovalError::InputNotFound` when the file does not exist
    /// - `BgRemovalError::Decode` when it is not a decodable image
    pub fn process_file<P: AsRef<Path>>(&self, input_path: P) -> Result<RemovalResult> {
        let input_path = input_path.as_ref();
        let image = ImageIOService::load_image(input_path)?;
        let result = self.process_image(&image)?;
        Ok(result.with_input_path(input_path.display().to_string()))
    }

    /// Process `input_path` and write the PNG-encoded result to `output_path`
    ///
    /// Passing the same path twice overwrites the input in place; the content
    /// is PNG regardless of the file extension.
    pub fn process_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<RemovalResult> {
        let result = self.process_file(input_path)?;
        result.save_png(output_path)?;
        Ok(result)
    }

    /// Process `input_path` and write the result next to it as
    /// `<stem>_transparent<.ext>`, leaving the input untouched
    ///
    /// Returns the result together with the path that was written.
    pub fn process_file_default<P: AsRef<Path>>(
        &self,
        input_path: P,
    ) -> Result<(RemovalResult, PathBuf)> {
        let input_path = input_path.as_ref();
        let output_path = ImageIOService::default_output_path(input_path);
        let result = self.process_file_to(input_path, &output_path)?;
        Ok((result, output_path))
    }

    fn ensure_not_empty(image: &DynamicImage) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BgRemovalError::invalid_image(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(())
    }
}
