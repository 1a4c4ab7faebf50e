//! Configuration types for background removal operations

use crate::{
    detector::{
        BackgroundColorDetector, CornerSampleDetector, FixedColorDetector, HistogramDetector,
    },
    types::{BackgroundColor, MAX_COLOR_DISTANCE},
};
use serde::{Deserialize, Serialize};

/// Tolerance used when none is given
pub const DEFAULT_TOLERANCE: u32 = 30;

/// How the background color is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Majority vote over the four corner pixels
    #[default]
    Corners,
    /// Most frequent color over every pixel
    Histogram,
    /// A caller-supplied color
    Fixed(BackgroundColor),
}

impl DetectionStrategy {
    /// Instantiate the detector this strategy describes
    #[must_use]
    pub fn create_detector(self) -> Box<dyn BackgroundColorDetector> {
        match self {
            Self::Corners => Box::new(CornerSampleDetector::new()),
            Self::Histogram => Box::new(HistogramDetector::new()),
            Self::Fixed(color) => Box::new(FixedColorDetector::new(color)),
        }
    }
}

impl std::fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Corners => write!(f, "corners"),
            Self::Histogram => write!(f, "histogram"),
            Self::Fixed(color) => write!(f, "fixed {}", color),
        }
    }
}

/// Configuration for background removal operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Maximum L1 color distance for a pixel to count as background
    ///
    /// Any value at or above 765 matches every pixel.
    pub tolerance: u32,

    /// Background detection strategy
    pub detection: DetectionStrategy,

    /// Enable debug mode (additional logging)
    pub debug: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            detection: DetectionStrategy::default(),
            debug: false,
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgkey::{DetectionStrategy, RemovalConfig};
    ///
    /// let config = RemovalConfig::builder()
    ///     .tolerance(12)
    ///     .detection(DetectionStrategy::Histogram)
    ///     .build();
    /// assert_eq!(config.tolerance, 12);
    /// ```
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::default()
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    /// Set tolerance (values above 765 are clamped to 765)
    #[must_use]
    pub fn tolerance(mut self, tolerance: u32) -> Self {
        self.config.tolerance = tolerance.min(MAX_COLOR_DISTANCE);
        self
    }

    /// Set detection strategy
    #[must_use]
    pub fn detection(mut self, detection: DetectionStrategy) -> Self {
        self.config.detection = detection;
        self
    }

    /// Use a fixed background color instead of detecting one
    #[must_use]
    pub fn background_color(mut self, color: BackgroundColor) -> Self {
        self.config.detection = DetectionStrategy::Fixed(color);
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    #[must_use]
    pub fn build(self) -> RemovalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RemovalConfig::default();
        assert_eq!(config.tolerance, 30);
        assert_eq!(config.detection, DetectionStrategy::Corners);
        assert!(!config.debug);
    }

    #[test]
    fn test_config_builder() {
        let config = RemovalConfig::builder()
            .tolerance(0)
            .background_color(BackgroundColor::new(0, 255, 0))
            .debug(true)
            .build();

        assert_eq!(config.tolerance, 0);
        assert_eq!(
            config.detection,
            DetectionStrategy::Fixed(BackgroundColor::new(0, 255, 0))
        );
        assert!(config.debug);
    }

    #[test]
    fn test_builder_clamps_tolerance() {
        let config = RemovalConfig::builder().tolerance(10_000).build();
        assert_eq!(config.tolerance, MAX_COLOR_DISTANCE);
    }

    #[test]
    fn test_hand_built_tolerance_is_not_bounded() {
        let config = RemovalConfig {
            tolerance: 1000,
            ..RemovalConfig::default()
        };
        assert_eq!(config.tolerance, 1000);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: RemovalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tolerance, 1000);
    }

    #[test]
    fn test_strategy_creates_matching_detector() {
        assert_eq!(DetectionStrategy::Corners.create_detector().name(), "corners");
        assert_eq!(
            DetectionStrategy::Histogram.create_detector().name(),
            "histogram"
        );
        assert_eq!(
            DetectionStrategy::Fixed(BackgroundColor::WHITE)
                .create_detector()
                .name(),
            "fixed"
        );
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(DetectionStrategy::Corners.to_string(), "corners");
        assert_eq!(
            DetectionStrategy::Fixed(BackgroundColor::new(1, 2, 3)).to_string(),
            "fixed RGB(1, 2, 3)"
        );
    }

    #[test]
    fn test_removal_config_serde_round_trip() {
        let config = RemovalConfig::builder()
            .tolerance(45)
            .background_color(BackgroundColor::new(10, 20, 30))
            .build();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"tolerance\":45"));
        assert!(json.contains("\"fixed\""));

        let parsed: RemovalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
