//! # Bulk Splitter
//!
//! Splits large binary capture files into size-bounded "bulk" files without
//! cutting a frame across two bulks, and reassembles a bulk set into the
//! original stream. The frame size can be inferred from a repeating sync word.
//!
//! ## Example Usage
//!
//! ```no_run
//! use bulk_splitter::{reconstruct, AppConfig, JobConfig, SplitJob};
//! use std::path::Path;
//!
//! fn main() -> bulk_splitter::Result<()> {
//!     let defaults = AppConfig::load_or_default(Path::new("config.json"));
//!
//!     let mut job = JobConfig::from_defaults("captures/run7.raw", &defaults);
//!     job.auto_detect_frame_size = true;
//!     let outcome = SplitJob::new(job).run_with_hooks(
//!         |pct| println!("{}%", pct),
//!         || false,
//!     )?;
//!     println!("Wrote {} bulks", outcome.report.bulks.len());
//!
//!     reconstruct("run7", Path::new("captures"), "run7_joined.bin")?;
//!     Ok(())
//! }
//! ```

// Include the modules from the modules directory
#[path = "../modules/mod.rs"]
pub mod modules;

// Re-export everything from modules for easy access
pub use modules::*;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library information
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
