//! Split job: optional frame-size detection followed by the split itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use super::bulk_splitter::{BulkSplitter, SplitConfig, SplitReport};
use super::config::AppConfig;
use super::error::Result;
use super::sync_scanner::{detect_frame_size, ScanWindow};

/// Parameters for one splitting job
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JobConfig {
    pub input_path: PathBuf,
    pub bulk_size_gb: f64,
    /// Frame size to use, and the fallback when detection finds nothing
    pub frame_size_bytes: usize,
    pub output_prefix: Option<String>,
    pub sync_word_hex: String,
    pub auto_detect_frame_size: bool,
}

impl JobConfig {
    /// Job for `input_path` using the configured defaults
    pub fn from_defaults(input_path: impl Into<PathBuf>, defaults: &AppConfig) -> Self {
        Self {
            input_path: input_path.into(),
            bulk_size_gb: defaults.default_bulk_size_gb,
            frame_size_bytes: defaults.default_frame_size_bytes,
            output_prefix: None,
            sync_word_hex: defaults.default_sync_word_hex.clone(),
            auto_detect_frame_size: false,
        }
    }
}

/// Result of a completed (or cancelled) job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub frame_size_used: usize,
    /// Frame size reported by detection, when it was requested and succeeded
    pub detected_frame_size: Option<usize>,
    pub report: SplitReport,
}

pub struct SplitJob {
    config: JobConfig,
    scan_window: ScanWindow,
}

impl SplitJob {
    pub fn new(config: JobConfig) -> Self {
        Self {
            config,
            scan_window: ScanWindow::default(),
        }
    }

    pub fn with_scan_window(mut self, scan_window: ScanWindow) -> Self {
        self.scan_window = scan_window;
        self
    }

    pub fn run(&self) -> Result<JobOutcome> {
        self.run_with_hooks(|_| {}, || false)
    }

    /// Run the job; see [`BulkSplitter::split_with_hooks`] for the hook contract.
    pub fn run_with_hooks<P, C>(&self, progress: P, cancel: C) -> Result<JobOutcome>
    where
        P: FnMut(u8),
        C: Fn() -> bool,
    {
        let start_time = Instant::now();

        let detected_frame_size = if self.config.auto_detect_frame_size {
            self.detect()?
        } else {
            None
        };
        let frame_size_used = detected_frame_size.unwrap_or(self.config.frame_size_bytes);

        let mut split_config = SplitConfig::from_gb(self.config.bulk_size_gb, frame_size_used);
        split_config.name_prefix = self.config.output_prefix.clone();

        let report = BulkSplitter::with_config(split_config)
            .split_with_hooks(&self.config.input_path, progress, cancel)?;

        info!(
            "Job for {} finished in {:?}: {} bulks, {} bytes{}",
            self.config.input_path.display(),
            start_time.elapsed(),
            report.bulks.len(),
            report.bytes_written,
            if report.cancelled { " (cancelled)" } else { "" }
        );

        Ok(JobOutcome {
            frame_size_used,
            detected_frame_size,
            report,
        })
    }

    fn detect(&self) -> Result<Option<usize>> {
        let detected = detect_frame_size(&self.config.input_path, &self.config.sync_word_hex, self.scan_window)?;
        match detected {
            Some(size) => info!("Auto-detected frame size: {} bytes", size),
            None => warn!(
                "Frame size auto-detection failed. Using frame size of {} bytes",
                self.config.frame_size_bytes
            ),
        }
        Ok(detected)
    }
}
