//! Input path resolution
//!
//! Bare file names (no path separator) are looked up inside a base
//! directory, which defaults to `assets`. Anything containing a separator is
//! taken verbatim.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Base directory used when none is configured
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Resolves user-supplied input names to filesystem paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputResolver {
    base_dir: PathBuf,
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ASSETS_DIR)
    }
}

impl InputResolver {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `input` against the base directory when it is a bare name
    #[must_use]
    pub fn resolve(&self, input: &str) -> PathBuf {
        if Self::has_separator(input) {
            PathBuf::from(input)
        } else {
            self.base_dir.join(input)
        }
    }

    fn has_separator(input: &str) -> bool {
        input.contains(MAIN_SEPARATOR) || input.contains('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_goes_to_assets() {
        let resolver = InputResolver::default();
        assert_eq!(resolver.resolve("zombie.png"), Path::new("assets").join("zombie.png"));
    }

    #[test]
    fn test_path_with_separator_is_verbatim() {
        let resolver = InputResolver::default();
        assert_eq!(resolver.resolve("./zombie.png"), PathBuf::from("./zombie.png"));
        assert_eq!(
            resolver.resolve("/tmp/sprites/zombie.png"),
            PathBuf::from("/tmp/sprites/zombie.png")
        );
    }

    #[test]
    fn test_custom_base_dir() {
        let resolver = InputResolver::new("/srv/images");
        assert_eq!(resolver.base_dir(), Path::new("/srv/images"));
        assert_eq!(
            resolver.resolve("logo.jpg"),
            PathBuf::from("/srv/images/logo.jpg")
        );
    }
}
