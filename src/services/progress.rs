//! Progress reporting service
//!
//! Batch processing reports through the `ProgressReporter` trait so the
//! library stays silent by default while the CLI can log each step.

/// Processing stages reported during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Copying the original to its backup path
    Backup,
    /// Loading, detecting and classifying one image
    ImageProcessing,
    /// Writing the PNG result
    FileSaving,
}

impl ProcessingStage {
    /// Get a human-readable description of the processing stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Backup => "Creating backup",
            ProcessingStage::ImageProcessing => "Removing background",
            ProcessingStage::FileSaving => "Saving result",
        }
    }
}

/// Per-item progress in a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemProgress {
    /// 1-based position of the current item
    pub index: usize,
    /// Total number of items in the batch
    pub total: usize,
    /// Display name of the current item
    pub item_name: String,
}

/// Trait for reporting progress during background removal operations
pub trait ProgressReporter {
    /// Report that an item is about to be processed
    fn report_item_start(&self, progress: &BatchItemProgress);

    /// Report an item that finished successfully
    fn report_item_success(&self, progress: &BatchItemProgress, pixels_changed: u64);

    /// Report a non-fatal problem (e.g. a backup that could not be written)
    fn report_warning(&self, stage: ProcessingStage, message: &str);

    /// Report an error during processing
    fn report_error(&self, stage: ProcessingStage, error: &str);
}

/// No-op progress reporter that discards all progress updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_item_start(&self, _progress: &BatchItemProgress) {}

    fn report_item_success(&self, _progress: &BatchItemProgress, _pixels_changed: u64) {}

    fn report_warning(&self, _stage: ProcessingStage, _message: &str) {}

    fn report_error(&self, _stage: ProcessingStage, _error: &str) {}
}

/// Console progress reporter that logs progress through `log`
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_item_start(&self, progress: &BatchItemProgress) {
        log::info!(
            "--- Processing [{}/{}]: {} ---",
            progress.index,
            progress.total,
            progress.item_name
        );
    }

    fn report_item_success(&self, progress: &BatchItemProgress, pixels_changed: u64) {
        if self.verbose {
            log::info!(
                "✅ {}: {} pixel(s) made transparent",
                progress.item_name,
                pixels_changed
            );
        }
    }

    fn report_warning(&self, stage: ProcessingStage, message: &str) {
        log::warn!("⚠️  {}: {}", stage.description(), message);
    }

    fn report_error(&self, stage: ProcessingStage, error: &str) {
        log::error!("❌ Error during {}: {}", stage.description(), error);
    }
}
