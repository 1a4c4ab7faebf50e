//! Image I/O operations service
//!
//! This module separates file I/O operations from the pixel transform,
//! making the transform testable without touching the filesystem.

use crate::error::{BgRemovalError, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// Extensions picked up by directory discovery (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// Suffix appended to a file name to form its backup path
pub const BACKUP_SUFFIX: &str = "backup";

/// Inserted between stem and extension when deriving an output path
pub const TRANSPARENT_SUFFIX: &str = "_transparent";

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Format detection first trusts the extension, then falls back to
    /// sniffing the content so a PNG saved under `.jpg` still loads.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bgkey::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("assets/logo.png")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.is_file() {
            return Err(BgRemovalError::input_not_found(path_ref));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    BgRemovalError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    BgRemovalError::decode_error(
                        path_ref,
                        &format!(
                            "extension error: {}; content error: {} ({} bytes)",
                            e,
                            content_err,
                            data.len()
                        ),
                    )
                })
            },
        }
    }

    /// Load an image from bytes
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| {
            BgRemovalError::Decode(format!("Failed to decode image from bytes: {}", e))
        })
    }

    /// Save an RGBA image as PNG
    ///
    /// The content is PNG whatever extension `path` carries, so the alpha
    /// channel always survives. Missing parent directories are created.
    pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BgRemovalError::file_io_error("create output directory", parent, &e)
            })?;
        }

        image
            .save_with_format(path_ref, ImageFormat::Png)
            .map_err(|e| BgRemovalError::encode_error(path_ref, &e.to_string()))?;

        log::debug!("Saved PNG output to {}", path_ref.display());
        Ok(())
    }

    /// Sibling output path used when none is given: `<stem>_transparent<.ext>`
    ///
    /// Only the last extension is kept apart, so `a.tar.png` becomes
    /// `a.tar_transparent.png` and `notes` becomes `notes_transparent`.
    #[must_use]
    pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
        let input = input.as_ref();
        let mut name = input
            .file_stem()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(TRANSPARENT_SUFFIX);
        if let Some(extension) = input.extension() {
            name.push(".");
            name.push(extension);
        }
        input.with_file_name(name)
    }

    /// Backup path for `path`: the full file name with `.backup` appended
    #[must_use]
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut name = path.as_ref().as_os_str().to_os_string();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Copy `path` to its backup sibling unless a backup already exists
    ///
    /// # Returns
    /// * `Ok(Some(path))` - A new backup was written
    /// * `Ok(None)` - A backup was already present and left untouched
    /// * `Err(BgRemovalError::Backup)` - The copy failed
    pub fn create_backup<P: AsRef<Path>>(path: P) -> Result<Option<PathBuf>> {
        let path_ref = path.as_ref();
        let backup = Self::backup_path(path_ref);

        if backup.exists() {
            log::debug!(
                "Backup {} already exists, keeping it",
                backup.display()
            );
            return Ok(None);
        }

        std::fs::copy(path_ref, &backup).map_err(|e| BgRemovalError::backup_error(path_ref, &e))?;
        Ok(Some(backup))
    }

    /// Check if a file path has a supported image extension
    pub fn is_supported_format<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext_lower = ext.to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
            })
    }
}
