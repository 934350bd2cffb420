//! Bulk splitting engine
//!
//! This library provides modules for:
//! - Frame-size detection from a repeating sync word
//! - Frame-aware splitting of a capture into size-bounded bulk files
//! - Reassembly of a bulk set into the original stream
//! - Start-up configuration and the split job that ties detection to splitting

pub mod error;
pub mod config;
pub mod sync_scanner;
pub mod bulk_splitter;
pub mod bulk_reconstructor;
pub mod split_job;

// Re-export commonly used types and structs
pub use error::{BulkError, Result};
pub use config::AppConfig;
pub use sync_scanner::{detect_frame_size, ScanWindow, SyncWord};
pub use bulk_splitter::{BulkSplitter, SplitConfig, SplitReport};
pub use bulk_reconstructor::{reconstruct, BulkReconstructor, DEFAULT_OUTPUT_NAME};
pub use split_job::{JobConfig, JobOutcome, SplitJob};
