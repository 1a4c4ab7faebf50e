//! Directory batch processing
//!
//! Files are processed one at a time in alphanumeric order, each overwritten
//! in place with its PNG-encoded result. A failing file is recorded in the
//! summary and the run moves on to the next one.

use crate::{
    error::{BgRemovalError, Result},
    processor::BackgroundRemovalProcessor,
    services::{
        io::ImageIOService,
        progress::{BatchItemProgress, ProcessingStage, ProgressReporter},
    },
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options controlling directory discovery and backups
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Copy each file to `<file>.backup` before overwriting it
    pub backup: bool,
    /// Descend into subdirectories
    pub recursive: bool,
    pattern: Option<glob::Pattern>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            backup: true,
            recursive: false,
            pattern: None,
        }
    }
}

impl BatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Only process files whose name matches the glob `pattern`
    ///
    /// # Errors
    ///
    /// Returns `BgRemovalError::InvalidConfig` for malformed patterns.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let compiled = glob::Pattern::new(pattern).map_err(|e| {
            BgRemovalError::invalid_config(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        self.pattern = Some(compiled);
        Ok(self)
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(glob::Pattern::as_str)
    }

    fn matches_pattern(&self, path: &Path) -> bool {
        match &self.pattern {
            Some(pattern) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name)),
            None => true,
        }
    }
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of files discovered
    pub total: usize,
    /// Number of files processed and written
    pub succeeded: usize,
    /// Files that failed, in processing order
    pub failures: Vec<BatchFailure>,
    /// Backups written during this run
    pub backups_created: Vec<PathBuf>,
    /// Backups that could not be written (processing continued)
    pub backup_failures: usize,
    /// Sum of pixels made transparent across all files
    pub pixels_changed: u64,
}

impl BatchSummary {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Mirrors the single-file success flag: true when at least one file was written
    #[must_use]
    pub fn any_succeeded(&self) -> bool {
        self.succeeded > 0
    }
}

/// Find supported images in `dir`, sorted for a stable processing order
///
/// # Errors
///
/// - `BgRemovalError::InputNotFound` when `dir` does not exist
/// - `BgRemovalError::InvalidConfig` when `dir` is not a directory
/// - `BgRemovalError::Io` when the directory cannot be read
pub fn discover_images(dir: &Path, options: &BatchOptions) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(BgRemovalError::input_not_found(dir));
    }
    if !dir.is_dir() {
        return Err(BgRemovalError::invalid_config(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let is_candidate =
        |path: &Path| ImageIOService::is_supported_format(path) && options.matches_pattern(path);

    let mut files = Vec::new();
    if options.recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry.map_err(|e| {
                BgRemovalError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk '{}': {}", dir.display(), e),
                ))
            })?;
            if entry.file_type().is_file() && is_candidate(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| BgRemovalError::file_io_error("read directory", dir, &e))?;
        for entry in entries {
            let entry =
                entry.map_err(|e| BgRemovalError::file_io_error("read directory", dir, &e))?;
            let path = entry.path();
            if path.is_file() && is_candidate(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    debug!(count = files.len(), dir = %dir.display(), "Discovered images");
    Ok(files)
}

/// Process every supported image in `dir` in place
///
/// # Errors
///
/// Only discovery errors are returned; per-file failures are collected in
/// the summary.
pub fn process_directory(
    processor: &BackgroundRemovalProcessor,
    dir: &Path,
    options: &BatchOptions,
    reporter: &dyn ProgressReporter,
) -> Result<BatchSummary> {
    let files = discover_images(dir, options)?;
    info!("Starting batch processing in {}", dir.display());
    Ok(process_files(processor, &files, options, reporter))
}

/// Process an explicit list of files in place, in the given order
///
/// Discovery options (`recursive`, pattern) are ignored here; only
/// `backup` applies.
pub fn process_files(
    processor: &BackgroundRemovalProcessor,
    files: &[PathBuf],
    options: &BatchOptions,
    reporter: &dyn ProgressReporter,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: files.len(),
        ..BatchSummary::default()
    };

    info!(
        count = files.len(),
        backup = options.backup,
        "Processing image batch"
    );

    for (index, path) in files.iter().enumerate() {
        let progress = BatchItemProgress {
            index: index + 1,
            total: files.len(),
            item_name: display_name(path),
        };
        reporter.report_item_start(&progress);

        if options.backup {
            match ImageIOService::create_backup(path) {
                Ok(Some(backup)) => {
                    debug!(backup = %backup.display(), "Backup created");
                    summary.backups_created.push(backup);
                },
                Ok(None) => {},
                Err(e) => {
                    warn!("{}", e);
                    summary.backup_failures += 1;
                    reporter.report_warning(ProcessingStage::Backup, &e.to_string());
                },
            }
        }

        match processor.process_file_to(path, path) {
            Ok(result) => {
                summary.succeeded += 1;
                summary.pixels_changed += result.pixels_changed;
                reporter.report_item_success(&progress, result.pixels_changed);
            },
            Err(e) => {
                let stage = match e {
                    BgRemovalError::Encode(_) | BgRemovalError::Io(_) => {
                        ProcessingStage::FileSaving
                    },
                    _ => ProcessingStage::ImageProcessing,
                };
                reporter.report_error(
                    stage,
                    &format!("Failed to process {}: {}", progress.item_name, e),
                );
                summary.failures.push(BatchFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            },
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed(),
        "Batch processing finished"
    );
    summary
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
