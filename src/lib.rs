#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # bgkey
//!
//! Removes flat, solid-color backgrounds from raster images. The background
//! color is detected from the image's four corners (or supplied by the
//! caller), and every pixel within a color-distance tolerance of it becomes
//! fully transparent. Output is always RGBA and is written as PNG.
//!
//! ## Features
//!
//! - **Corner-sampled detection**: majority vote over the four corners, ties
//!   resolved top-left first
//! - **Pluggable strategies**: corner sampling, full-image histogram, or a
//!   fixed color behind the `BackgroundColorDetector` trait
//! - **L1 color distance**: `|dr| + |dg| + |db| <= tolerance` marks a pixel as
//!   background; RGB channels are never modified
//! - **Batch mode**: process a directory in place with `.backup` copies
//! - **CLI Integration**: optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgkey::{BackgroundRemovalProcessor, RemovalConfig};
//!
//! # fn example() -> bgkey::Result<()> {
//! let config = RemovalConfig::builder().tolerance(30).build();
//! let processor = BackgroundRemovalProcessor::new(config);
//!
//! let result = processor.process_file("assets/zombie.png")?;
//! println!("Detected background color: {}", result.background_color);
//! result.save_png("assets/zombie_transparent.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory processing
//!
//! ```rust
//! use bgkey::{remove_background_from_image, RemovalConfig};
//! use image::{DynamicImage, Rgb, RgbImage};
//!
//! let mut img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
//! img.put_pixel(1, 1, Rgb([10, 10, 10]));
//!
//! let result = remove_background_from_image(&DynamicImage::ImageRgb8(img), &RemovalConfig::default())
//!     .unwrap();
//! assert_eq!(result.pixels_changed, 3);
//! assert_eq!(result.image.get_pixel(1, 1).0, [10, 10, 10, 255]);
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod processor;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

pub use config::{DetectionStrategy, RemovalConfig, RemovalConfigBuilder, DEFAULT_TOLERANCE};
pub use detector::{
    BackgroundColorDetector, CornerSampleDetector, FixedColorDetector, HistogramDetector,
};
pub use error::{BgRemovalError, Result};
pub use processor::{apply_transparency, BackgroundRemovalProcessor};
pub use services::{
    BatchOptions, BatchSummary, ConsoleProgressReporter, ImageIOService, InputResolver,
    NoOpProgressReporter, ProcessingStage, ProgressReporter,
};
pub use types::{BackgroundColor, ProcessingMetadata, RemovalResult, MAX_COLOR_DISTANCE};

#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};

/// Remove the background from a `DynamicImage`
///
/// Convenience wrapper that builds a processor for a single call.
pub fn remove_background_from_image(
    image: &image::DynamicImage,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    BackgroundRemovalProcessor::new(config.clone()).process_image(image)
}

/// Remove the background from encoded image bytes (PNG, JPEG, BMP, TIFF)
///
/// Suitable for data that never touches the filesystem; encode the result
/// with [`RemovalResult::to_png_bytes`].
pub fn remove_background_from_bytes(
    image_bytes: &[u8],
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let image = ImageIOService::load_from_bytes(image_bytes)?;
    remove_background_from_image(&image, config)
}
