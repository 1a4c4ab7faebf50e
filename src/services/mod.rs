//! Services around the pixel transform: file I/O, path resolution, batch
//! processing and progress reporting.

pub mod batch;
pub mod io;
pub mod paths;
pub mod progress;

pub use batch::{
    discover_images, process_directory, process_files, BatchFailure, BatchOptions, BatchSummary,
};
pub use io::{ImageIOService, SUPPORTED_EXTENSIONS};
pub use paths::{InputResolver, DEFAULT_ASSETS_DIR};
pub use progress::{
    BatchItemProgress, ConsoleProgressReporter, NoOpProgressReporter, ProcessingStage,
    ProgressReporter,
};
