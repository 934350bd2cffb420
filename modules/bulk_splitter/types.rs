use std::path::{Path, PathBuf};

/// Bytes per gigabyte when converting a bulk size given in GB.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Zero-padding width of the bulk index in file names.
pub const BULK_INDEX_WIDTH: usize = 3;

/// Configuration for a splitting run
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Target cap for each bulk file in bytes
    pub bulk_size_bytes: u64,
    /// Nominal frame length in bytes
    pub frame_size_bytes: usize,
    /// Name prefix for the bulk files; the source's file stem when `None`
    pub name_prefix: Option<String>,
}

impl SplitConfig {
    /// Build a config from a bulk size expressed in gigabytes
    pub fn from_gb(bulk_size_gb: f64, frame_size_bytes: usize) -> Self {
        Self {
            bulk_size_bytes: gb_to_bytes(bulk_size_gb),
            frame_size_bytes,
            name_prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// The prefix actually used for `source`
    pub fn prefix_for(&self, source: &Path) -> String {
        match &self.name_prefix {
            Some(prefix) => prefix.clone(),
            None => default_prefix(source),
        }
    }
}

/// Outcome of a splitting run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Bulk files written, in index order
    pub bulks: Vec<PathBuf>,
    /// Frames appended across all bulks, including a short trailing frame
    pub frames_written: u64,
    /// Bytes appended across all bulks
    pub bytes_written: u64,
    /// Whether the run stopped early on a cancellation request
    pub cancelled: bool,
}

/// `{prefix}_{NNN}.bin`, index starting at 1.
pub fn bulk_file_name(prefix: &str, index: usize) -> String {
    format!("{}_{:0width$}.bin", prefix, index, width = BULK_INDEX_WIDTH)
}

/// File name of `source` without its extension.
pub fn default_prefix(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory the bulks are written to: the source's parent, or `.`.
pub fn output_directory(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn gb_to_bytes(gb: f64) -> u64 {
    (gb * BYTES_PER_GB) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_file_name_padding() {
        assert_eq!(bulk_file_name("capture", 1), "capture_001.bin");
        assert_eq!(bulk_file_name("capture", 42), "capture_042.bin");
        assert_eq!(bulk_file_name("capture", 1000), "capture_1000.bin");
    }

    #[test]
    fn test_default_prefix_and_directory() {
        assert_eq!(default_prefix(Path::new("/data/run7.raw")), "run7");
        assert_eq!(default_prefix(Path::new("archive.tar.bin")), "archive.tar");
        assert_eq!(output_directory(Path::new("/data/run7.raw")), PathBuf::from("/data"));
        assert_eq!(output_directory(Path::new("run7.raw")), PathBuf::from("."));
    }

    #[test]
    fn test_prefix_override() {
        let config = SplitConfig::from_gb(2.0, 1111).with_prefix("out");
        assert_eq!(config.prefix_for(Path::new("/data/run7.raw")), "out");
        assert_eq!(config.bulk_size_bytes, 2 * 1024 * 1024 * 1024);
    }
}
