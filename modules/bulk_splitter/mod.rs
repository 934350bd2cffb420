//! Bulk Splitter
//!
//! Partitions a binary capture into size-bounded bulk files without ever
//! cutting a frame across two bulks. A frame larger than the bulk cap gets a
//! bulk of its own.

pub mod types;
pub mod splitter;

// Re-export main types and the BulkSplitter
pub use types::*;
pub use splitter::BulkSplitter;
