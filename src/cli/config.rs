//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliDetector};
use crate::{
    config::{DetectionStrategy, RemovalConfig, DEFAULT_TOLERANCE},
    services::{BatchOptions, InputResolver},
    types::BackgroundColor,
};
use anyhow::{Context, Result};
use log::warn;

/// Convert CLI arguments to library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `RemovalConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<RemovalConfig> {
        let detection = if let Some(color) = &cli.background {
            let color: BackgroundColor = color
                .parse()
                .with_context(|| format!("Invalid --background value '{}'", color))?;
            DetectionStrategy::Fixed(color)
        } else {
            match cli.detector {
                CliDetector::Corners => DetectionStrategy::Corners,
                CliDetector::Histogram => DetectionStrategy::Histogram,
            }
        };

        let config = RemovalConfig::builder()
            .tolerance(Self::tolerance(cli.tolerance.as_deref()))
            .detection(detection)
            .debug(cli.verbose >= 1)
            .build();

        Ok(config)
    }

    /// Parse the optional tolerance argument, falling back to the default
    ///
    /// Anything that is not a non-negative integer is reported and ignored.
    pub(crate) fn tolerance(raw: Option<&str>) -> u32 {
        match raw {
            None => DEFAULT_TOLERANCE,
            Some(value) => value.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(
                    "Invalid tolerance value '{}', using default {}",
                    value, DEFAULT_TOLERANCE
                );
                DEFAULT_TOLERANCE
            }),
        }
    }

    /// Build directory-mode options from CLI arguments
    pub(crate) fn batch_options(cli: &Cli) -> Result<BatchOptions> {
        let options = BatchOptions::new()
            .with_backup(!cli.no_backup)
            .with_recursive(cli.recursive);

        match &cli.pattern {
            Some(pattern) => options
                .with_pattern(pattern)
                .context("Invalid --pattern value"),
            None => Ok(options),
        }
    }

    pub(crate) fn resolver(cli: &Cli) -> InputResolver {
        InputResolver::new(&cli.assets_dir)
    }
}
