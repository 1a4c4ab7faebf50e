//! bgkey CLI tool
//!
//! Command-line interface for removing flat backgrounds from images using
//! the bgkey library.

#[cfg(feature = "cli")]
use bgkey::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
