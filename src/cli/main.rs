//! Background key CLI tool
//!
//! Command-line interface that removes a flat background from a single image
//! or from every image in a directory.

use super::config::CliConfigBuilder;
use crate::{
    processor::BackgroundRemovalProcessor,
    services::{
        discover_images, process_files, BatchItemProgress, BatchOptions, ConsoleProgressReporter,
        ImageIOService, ProcessingStage, ProgressReporter, DEFAULT_ASSETS_DIR,
    },
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Remove a flat background color from images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgkey")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Image file or directory. Names without a path separator are looked up in the assets directory
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Maximum color distance (sum of per-channel differences) treated as background [default: 30]
    #[arg(value_name = "TOLERANCE", allow_negative_numbers = true)]
    pub tolerance: Option<String>,

    /// Output file for single-image mode [default: overwrite the input]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Write <stem>_transparent<ext> next to a single input instead of overwriting it
    #[arg(long, conflicts_with = "output")]
    pub keep_original: bool,

    /// Directory that bare file names are resolved against
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSETS_DIR)]
    pub assets_dir: String,

    /// Create <file>.backup before overwriting a single image
    #[arg(long)]
    pub backup: bool,

    /// Skip the <file>.backup copies made in directory mode
    #[arg(long)]
    pub no_backup: bool,

    /// Process directory recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Pattern for directory mode (e.g., "*.png")
    #[arg(long)]
    pub pattern: Option<String>,

    /// Background detection strategy
    #[arg(long, value_enum, default_value_t = CliDetector::Corners)]
    pub detector: CliDetector,

    /// Use this background color instead of detecting one (#rrggbb or r,g,b)
    #[arg(long, value_name = "COLOR")]
    pub background: Option<String>,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliDetector {
    /// Majority color of the four corner pixels
    Corners,
    /// Most frequent color in the whole image
    Histogram,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliLogFormat {
    /// Colored human-readable output
    Console,
    /// Plain output without ANSI colors
    Compact,
    /// JSON lines (requires the `tracing-json` feature)
    Json,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format).context("Failed to initialize tracing")?;

    // per-file failures are reported by `run`; the process still exits normally
    if !run(&cli) {
        debug!("No image was processed successfully");
    }
    Ok(())
}

/// Execute a parsed command line, returning whether anything was processed
pub fn run(cli: &Cli) -> bool {
    let path = CliConfigBuilder::resolver(cli).resolve(&cli.input);

    let config = match CliConfigBuilder::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {e:#}");
            return false;
        },
    };

    let processor = BackgroundRemovalProcessor::new(config);

    let is_dir = path.is_dir();
    let ignored = ignored_flags(cli, is_dir);
    if !ignored.is_empty() {
        warn!(
            "Ignoring {}: not used in {} mode",
            ignored.join(", "),
            if is_dir { "directory" } else { "single-file" }
        );
    }

    if is_dir {
        match CliConfigBuilder::batch_options(cli) {
            Ok(options) => process_directory_mode(cli, &processor, &path, &options),
            Err(e) => {
                println!("Error: {e:#}");
                false
            },
        }
    } else if path.exists() {
        let output = match &cli.output {
            Some(output) => PathBuf::from(output),
            None if cli.keep_original => ImageIOService::default_output_path(&path),
            None => path.clone(),
        };
        process_single_file(&processor, &path, &output, cli.backup)
    } else {
        println!("Error: File '{}' not found.", path.display());
        false
    }
}

/// Flags given on the command line that the selected mode does not use
fn ignored_flags(cli: &Cli, directory_mode: bool) -> Vec<&'static str> {
    let candidates: &[(bool, &'static str)] = if directory_mode {
        &[
            (cli.output.is_some(), "--output"),
            (cli.keep_original, "--keep-original"),
            (cli.backup, "--backup"),
        ]
    } else {
        &[
            (cli.no_backup, "--no-backup"),
            (cli.recursive, "--recursive"),
            (cli.pattern.is_some(), "--pattern"),
        ]
    };

    candidates
        .iter()
        .filter(|(given, _)| *given)
        .map(|&(_, flag)| flag)
        .collect()
}

/// Initialize tracing based on verbosity level and output format
///
/// `RUST_LOG`, when set, takes precedence over the verbosity flags.
fn init_tracing(verbose_count: u8, log_format: CliLogFormat) -> Result<()> {
    use crate::tracing_config::{TracingConfig, TracingFormat};

    let format = match log_format {
        CliLogFormat::Console => TracingFormat::Console,
        CliLogFormat::Compact => TracingFormat::Compact,
        #[cfg(feature = "tracing-json")]
        CliLogFormat::Json => TracingFormat::Json,
        #[cfg(not(feature = "tracing-json"))]
        CliLogFormat::Json => {
            anyhow::bail!("JSON log output requires the `tracing-json` feature")
        },
    };

    let mut config = TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(format);
    if let Some(filter) = std::env::var("RUST_LOG")
        .ok()
        .filter(|filter| !filter.trim().is_empty())
    {
        config = config.with_env_filter(filter);
    }

    config
        .init()
        .context("Failed to initialize tracing subscriber")?;

    debug!(verbosity = verbose_count, "Tracing initialized");
    Ok(())
}

fn process_single_file(
    processor: &BackgroundRemovalProcessor,
    input: &Path,
    output: &Path,
    backup: bool,
) -> bool {
    println!("Processing: {}", input.display());
    println!("Tolerance: {}", processor.config().tolerance);

    if backup {
        match ImageIOService::create_backup(input) {
            Ok(Some(backup_path)) => println!("Backup created: {}", backup_path.display()),
            Ok(None) => println!(
                "Backup already exists: {}",
                ImageIOService::backup_path(input).display()
            ),
            Err(e) => println!("Warning: {e}"),
        }
    } else if input == output {
        println!("No backup will be created - overwriting original file");
    }

    let start = Instant::now();
    let outcome = processor
        .process_file(input)
        .and_then(|result| result.save_png(output).map(|()| result));

    match outcome {
        Ok(result) => {
            let (width, height) = result.original_dimensions;
            println!("Original image size: {width}x{height}");
            println!("Original image mode: {}", result.metadata.source_color_type);
            println!("Detected background color: {}", result.background_color);
            println!("Successfully processed image!");
            println!("Pixels changed to transparent: {}", result.pixels_changed);
            println!("Output saved to: {}", output.display());
            info!(
                "Processed {} in {:.2}s ({:.1}% transparent)",
                input.display(),
                start.elapsed().as_secs_f64(),
                result.transparent_ratio() * 100.0
            );
            println!("\n✓ Image processing completed successfully!");
            true
        },
        Err(e) => {
            error!("Failed to process {}: {}", input.display(), e);
            println!("Error processing image: {e}");
            println!("\n✗ Image processing failed.");
            false
        },
    }
}

fn process_directory_mode(
    cli: &Cli,
    processor: &BackgroundRemovalProcessor,
    dir: &Path,
    options: &BatchOptions,
) -> bool {
    let files = match discover_images(dir, options) {
        Ok(files) => files,
        Err(e) => {
            println!("Error: {e}");
            return false;
        },
    };

    if files.is_empty() {
        println!("No image files found in '{}'", dir.display());
        return false;
    }

    println!("\nFound {} image(s) to process:", files.len());
    for file in &files {
        println!("  - {}", file_label(file));
    }

    let start = Instant::now();
    let summary = if files.len() > 1 {
        let reporter = BarProgressReporter::new(files.len(), cli.verbose > 0);
        let summary = process_files(processor, &files, options, &reporter);
        reporter.finish(summary.succeeded, summary.failed());
        summary
    } else {
        process_files(processor, &files, options, &ConsoleProgressReporter::new(cli.verbose > 0))
    };

    for failure in &summary.failures {
        println!("Failed to process: {}", file_label(&failure.path));
    }

    println!("\n🎉 Processing complete!");
    println!(
        "Successfully processed: {}/{} images",
        summary.succeeded, summary.total
    );
    info!(
        "Batch finished in {:.2}s, {} pixel(s) made transparent",
        start.elapsed().as_secs_f64(),
        summary.pixels_changed
    );

    if options.backup {
        println!("\nBackup files created with '.backup' extension");
        println!("You can delete them if you're satisfied with the results");
        if summary.backup_failures > 0 {
            println!(
                "⚠️  {} backup(s) could not be created",
                summary.backup_failures
            );
        }
    }

    summary.any_succeeded()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Progress reporter that drives an indicatif bar for multi-file runs
struct BarProgressReporter {
    bar: ProgressBar,
    verbose: bool,
}

impl BarProgressReporter {
    fn new(total: usize, verbose: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
        bar.set_style(style);
        Self { bar, verbose }
    }

    fn finish(&self, processed: usize, failed: usize) {
        self.bar.finish_with_message(format!(
            "Completed! Processed: {processed}, Failed: {failed}"
        ));
    }
}

impl ProgressReporter for BarProgressReporter {
    fn report_item_start(&self, progress: &BatchItemProgress) {
        self.bar
            .set_message(format!("Processing {}", progress.item_name));
    }

    fn report_item_success(&self, progress: &BatchItemProgress, pixels_changed: u64) {
        if self.verbose {
            self.bar.println(format!(
                "✅ {}: {} pixel(s) made transparent",
                progress.item_name, pixels_changed
            ));
        }
        self.bar.inc(1);
    }

    fn report_warning(&self, stage: ProcessingStage, message: &str) {
        self.bar
            .println(format!("Warning: {}: {}", stage.description(), message));
    }

    fn report_error(&self, _stage: ProcessingStage, error: &str) {
        self.bar.println(format!("❌ {error}"));
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use tempfile::tempdir;

    fn cli_for(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bgkey").chain(args.iter().copied())).unwrap()
    }

    fn write_sprite(path: &Path) {
        let mut image = RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]));
        image.put_pixel(1, 1, Rgb([200, 0, 0]));
        image.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_run_single_file_in_place() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("sprite.png");
        write_sprite(&input);

        let cli = cli_for(&[input.to_str().unwrap(), "10"]);
        assert!(run(&cli));

        let output = image::open(&input).unwrap().to_rgba8();
        assert_eq!(output.get_pixel(0, 0).0, [255, 255, 255, 0]);
        assert_eq!(output.get_pixel(1, 1).0, [200, 0, 0, 255]);
        assert!(!ImageIOService::backup_path(&input).exists());
    }

    #[test]
    fn test_run_single_file_with_output_and_backup() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("sprite.png");
        let output = temp_dir.path().join("out").join("sprite_transparent.png");
        write_sprite(&input);

        let cli = cli_for(&[
            input.to_str().unwrap(),
            "--backup",
            "-o",
            output.to_str().unwrap(),
        ]);
        assert!(run(&cli));
        assert!(output.exists());
        assert!(ImageIOService::backup_path(&input).exists());
    }

    #[test]
    fn test_run_keep_original_writes_sibling() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("sprite.png");
        write_sprite(&input);
        let original = std::fs::read(&input).unwrap();

        let cli = cli_for(&[input.to_str().unwrap(), "--keep-original"]);
        assert!(run(&cli));

        assert_eq!(std::fs::read(&input).unwrap(), original);
        let output = image::open(temp_dir.path().join("sprite_transparent.png"))
            .unwrap()
            .to_rgba8();
        assert_eq!(output.get_pixel(0, 0).0, [255, 255, 255, 0]);
        assert_eq!(output.get_pixel(1, 1).0, [200, 0, 0, 255]);
    }

    #[test]
    fn test_keep_original_conflicts_with_output() {
        let result = Cli::try_parse_from(["bgkey", "a.png", "--keep-original", "-o", "b.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ignored_flags_per_mode() {
        let cli = cli_for(&["sprites/", "-o", "out.png", "--backup", "--no-backup", "-r"]);
        assert_eq!(ignored_flags(&cli, true), vec!["--output", "--backup"]);
        assert_eq!(ignored_flags(&cli, false), vec!["--no-backup", "--recursive"]);

        let cli = cli_for(&["zombie.png", "--pattern", "*.png", "--keep-original"]);
        assert_eq!(ignored_flags(&cli, false), vec!["--pattern"]);
        assert_eq!(ignored_flags(&cli, true), vec!["--keep-original"]);

        let cli = cli_for(&["zombie.png"]);
        assert!(ignored_flags(&cli, true).is_empty());
        assert!(ignored_flags(&cli, false).is_empty());
    }

    #[test]
    fn test_log_format_flag() {
        assert_eq!(cli_for(&["zombie.png"]).log_format, CliLogFormat::Console);
        assert_eq!(
            cli_for(&["zombie.png", "--log-format", "compact"]).log_format,
            CliLogFormat::Compact
        );
        assert!(Cli::try_parse_from(["bgkey", "zombie.png", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_run_missing_file_reports_failure() {
        let temp_dir = tempdir().unwrap();
        let cli = cli_for(&[
            "ghost.png",
            "--assets-dir",
            temp_dir.path().to_str().unwrap(),
        ]);
        assert!(!run(&cli));
    }

    #[test]
    fn test_run_corrupted_file_reports_failure() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("broken.png");
        std::fs::write(&input, b"not really a png").unwrap();

        let cli = cli_for(&[input.to_str().unwrap()]);
        assert!(!run(&cli));
        assert_eq!(std::fs::read(&input).unwrap(), b"not really a png");
    }

    #[test]
    fn test_run_directory_mode() {
        let temp_dir = tempdir().unwrap();
        write_sprite(&temp_dir.path().join("a.png"));
        write_sprite(&temp_dir.path().join("b.png"));

        let cli = cli_for(&[temp_dir.path().to_str().unwrap()]);
        assert!(run(&cli));
        assert!(temp_dir.path().join("a.png.backup").exists());
        assert!(temp_dir.path().join("b.png.backup").exists());
    }

    #[test]
    fn test_run_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let cli = cli_for(&[temp_dir.path().to_str().unwrap(), "--no-backup"]);
        assert!(!run(&cli));
    }
}
