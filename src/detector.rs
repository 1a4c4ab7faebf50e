//! Background color detection strategies
//!
//! The classifier only ever sees a [`BackgroundColor`]; how that color is
//! chosen lives behind the [`BackgroundColorDetector`] trait so strategies can
//! be swapped without touching the pixel transform.

use crate::types::BackgroundColor;
use image::RgbaImage;
use std::collections::HashMap;

/// Trait for background color detection strategies
pub trait BackgroundColorDetector {
    /// Pick the background color of a non-empty image
    fn detect(&self, image: &RgbaImage) -> BackgroundColor;

    /// Short strategy name used in logs and metadata
    fn name(&self) -> &'static str;
}

/// Majority vote over the four corner pixels
///
/// Samples are taken in the fixed order top-left, top-right, bottom-left,
/// bottom-right. Ties go to the color seen first in that order, so four
/// distinct corners yield the top-left color.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerSampleDetector;

impl CornerSampleDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Coordinates of the four corners in sampling order
    #[must_use]
    pub fn corner_coordinates(width: u32, height: u32) -> [(u32, u32); 4] {
        let right = width.saturating_sub(1);
        let bottom = height.saturating_sub(1);
        [(0, 0), (right, 0), (0, bottom), (right, bottom)]
    }

    /// RGB values of the four corners in sampling order
    #[must_use]
    pub fn sample_corners(image: &RgbaImage) -> Vec<BackgroundColor> {
        let (width, height) = image.dimensions();
        Self::corner_coordinates(width, height)
            .iter()
            .filter_map(|&(x, y)| image.get_pixel_checked(x, y))
            .map(|pixel| BackgroundColor::from_channels(&pixel.0))
            .collect()
    }
}

impl BackgroundColorDetector for CornerSampleDetector {
    fn detect(&self, image: &RgbaImage) -> BackgroundColor {
        most_common_first_seen(Self::sample_corners(image))
    }

    fn name(&self) -> &'static str {
        "corners"
    }
}

/// Most frequent color across the whole image
///
/// Ties go to the color whose first occurrence comes earliest in row-major
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramDetector;

impl HistogramDetector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BackgroundColorDetector for HistogramDetector {
    fn detect(&self, image: &RgbaImage) -> BackgroundColor {
        most_common_first_seen(
            image
                .pixels()
                .map(|pixel| BackgroundColor::from_channels(&pixel.0)),
        )
    }

    fn name(&self) -> &'static str {
        "histogram"
    }
}

/// Always reports a caller-supplied color
#[derive(Debug, Clone, Copy)]
pub struct FixedColorDetector {
    color: BackgroundColor,
}

impl FixedColorDetector {
    #[must_use]
    pub fn new(color: BackgroundColor) -> Self {
        Self { color }
    }
}

impl BackgroundColorDetector for FixedColorDetector {
    fn detect(&self, _image: &RgbaImage) -> BackgroundColor {
        self.color
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Highest count wins; equal counts resolve to the earliest first occurrence
fn most_common_first_seen<I>(samples: I) -> BackgroundColor
where
    I: IntoIterator<Item = BackgroundColor>,
{
    // color -> (count, index of first occurrence)
    let mut counts: HashMap<BackgroundColor, (u64, usize)> = HashMap::new();
    for (index, color) in samples.into_iter().enumerate() {
        counts.entry(color).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map_or(BackgroundColor::new(0, 0, 0), |(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn corners_image(
        top_left: [u8; 3],
        top_right: [u8; 3],
        bottom_left: [u8; 3],
        bottom_right: [u8; 3],
    ) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(5, 4, Rgba([7, 7, 7, 255]));
        let rgba = |c: [u8; 3]| Rgba([c[0], c[1], c[2], 255]);
        image.put_pixel(0, 0, rgba(top_left));
        image.put_pixel(4, 0, rgba(top_right));
        image.put_pixel(0, 3, rgba(bottom_left));
        image.put_pixel(4, 3, rgba(bottom_right));
        image
    }

    #[test]
    fn test_corner_majority() {
        let white = [255, 255, 255];
        let image = corners_image(white, white, [0, 0, 0], white);
        assert_eq!(CornerSampleDetector.detect(&image), BackgroundColor::WHITE);

        let image = corners_image([0, 0, 0], white, white, white);
        assert_eq!(CornerSampleDetector.detect(&image), BackgroundColor::WHITE);
    }

    #[test]
    fn test_all_distinct_corners_pick_top_left() {
        let image = corners_image([1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]);
        assert_eq!(
            CornerSampleDetector.detect(&image),
            BackgroundColor::new(1, 1, 1)
        );
    }

    #[test]
    fn test_two_way_tie_picks_first_seen() {
        let a = [10, 20, 30];
        let b = [200, 100, 0];
        let image = corners_image(b, a, a, b);
        assert_eq!(CornerSampleDetector.detect(&image), BackgroundColor::from(b));

        let image = corners_image(a, b, b, a);
        assert_eq!(CornerSampleDetector.detect(&image), BackgroundColor::from(a));
    }

    #[test]
    fn test_corner_detection_ignores_alpha_and_interior() {
        let mut image = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        for (x, y) in CornerSampleDetector::corner_coordinates(3, 3) {
            image.put_pixel(x, y, Rgba([9, 8, 7, (x * 40 + y) as u8]));
        }
        assert_eq!(
            CornerSampleDetector.detect(&image),
            BackgroundColor::new(9, 8, 7)
        );
    }

    #[test]
    fn test_single_pixel_image() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([12, 34, 56, 78]));
        assert_eq!(
            CornerSampleDetector::corner_coordinates(1, 1),
            [(0, 0); 4]
        );
        assert_eq!(
            CornerSampleDetector.detect(&image),
            BackgroundColor::new(12, 34, 56)
        );
    }

    #[test]
    fn test_single_row_and_column_images() {
        let mut row = RgbaImage::from_pixel(4, 1, Rgba([5, 5, 5, 255]));
        row.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        // top-left and bottom-left coincide, as do the two right corners
        assert_eq!(CornerSampleDetector::sample_corners(&row).len(), 4);
        assert_eq!(CornerSampleDetector.detect(&row), BackgroundColor::new(1, 2, 3));

        let column = RgbaImage::from_pixel(1, 6, Rgba([42, 42, 42, 255]));
        assert_eq!(
            CornerSampleDetector.detect(&column),
            BackgroundColor::new(42, 42, 42)
        );
    }

    #[test]
    fn test_histogram_scans_whole_image() {
        // corners are all red but most of the image is blue
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        for (x, y) in CornerSampleDetector::corner_coordinates(4, 4) {
            image.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
        assert_eq!(
            CornerSampleDetector.detect(&image),
            BackgroundColor::new(255, 0, 0)
        );
        assert_eq!(
            HistogramDetector.detect(&image),
            BackgroundColor::new(0, 0, 255)
        );
    }

    #[test]
    fn test_histogram_tie_picks_earliest_pixel() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([3, 3, 3, 255]));
        image.put_pixel(1, 0, Rgba([4, 4, 4, 255]));
        assert_eq!(HistogramDetector.detect(&image), BackgroundColor::new(3, 3, 3));
    }

    #[test]
    fn test_fixed_detector() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let detector = FixedColorDetector::new(BackgroundColor::new(0, 255, 0));
        assert_eq!(detector.detect(&image), BackgroundColor::new(0, 255, 0));
        assert_eq!(detector.name(), "fixed");
    }
}
