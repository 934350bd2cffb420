use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::bulk_splitter::types::bulk_file_name;
use super::error::{BulkError, Result};

/// Output file name used when the caller does not pick one.
pub const DEFAULT_OUTPUT_NAME: &str = "reconstructed_file.bin";

/// Reassembles a bulk set into the original byte stream
pub struct BulkReconstructor {
    directory: PathBuf,
}

impl BulkReconstructor {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Concatenate `{prefix}_001.bin`, `{prefix}_002.bin`, ... into `output_name`.
    ///
    /// Stops at the first missing index, so a gap in the numbering truncates
    /// the result without an error. Returns `Ok(None)` and writes nothing when
    /// no bulk file exists.
    pub fn reconstruct(&self, prefix: &str, output_name: &str) -> Result<Option<PathBuf>> {
        let mut reconstructed = Vec::new();
        let mut found = 0usize;

        loop {
            let bulk_path = self.directory.join(bulk_file_name(prefix, found + 1));
            if !bulk_path.is_file() {
                break;
            }

            let bulk = fs::read(&bulk_path).map_err(|e| BulkError::io(&bulk_path, "read", e))?;
            info!("Reading bulk file: {} ({} bytes)", bulk_path.display(), bulk.len());
            reconstructed.extend_from_slice(&bulk);
            found += 1;
        }

        if found == 0 {
            warn!("No bulk files found to reconstruct for prefix '{}' in {}", prefix, self.directory.display());
            return Ok(None);
        }

        let output_path = self.directory.join(output_name);
        fs::write(&output_path, &reconstructed).map_err(|e| BulkError::io(&output_path, "write", e))?;
        info!(
            "Reconstructed file saved as: {} ({} bulks, {} bytes)",
            output_path.display(),
            found,
            reconstructed.len()
        );
        Ok(Some(output_path))
    }
}

/// Convenience wrapper around [`BulkReconstructor::reconstruct`].
pub fn reconstruct(prefix: &str, directory: &Path, output_name: &str) -> Result<Option<PathBuf>> {
    BulkReconstructor::new(directory).reconstruct(prefix, output_name)
}
