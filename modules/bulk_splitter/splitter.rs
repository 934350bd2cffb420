use super::types::*;
use crate::modules::error::{BulkError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Splits a source file into frame-aligned bulk files written beside it
pub struct BulkSplitter {
    config: SplitConfig,
}

impl BulkSplitter {
    /// Create a new bulk splitter with the given configuration
    pub fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `source` without progress reporting or cancellation
    pub fn split(&self, source: &Path) -> Result<SplitReport> {
        self.split_with_hooks(source, |_| {}, || false)
    }

    /// Split `source`, reporting progress and polling `cancel` once per frame.
    ///
    /// `progress` receives the integer percentage of source bytes processed
    /// after every frame write; it is never called for an empty source.
    /// `cancel` is polled before each frame is read. When it returns `true`
    /// the open bulk is closed as is and the call returns `Ok` with
    /// `cancelled` set. Bulks already closed stay on disk if an error aborts
    /// the run.
    pub fn split_with_hooks<P, C>(&self, source: &Path, mut progress: P, cancel: C) -> Result<SplitReport>
    where
        P: FnMut(u8),
        C: Fn() -> bool,
    {
        self.validate()?;
        let frame_size = self.config.frame_size_bytes;
        let bulk_cap = self.config.bulk_size_bytes;

        let file = File::open(source).map_err(|e| BulkError::io(source, "open", e))?;
        let total_size = file
            .metadata()
            .map_err(|e| BulkError::io(source, "stat", e))?
            .len();
        let mut reader = BufReader::new(file);

        let directory = output_directory(source);
        let prefix = self.config.prefix_for(source);
        info!(
            "Splitting {} ({} bytes) into bulks of at most {} bytes, frame size {} bytes",
            source.display(),
            total_size,
            bulk_cap,
            frame_size
        );

        let mut frame = vec![0u8; frame_size];
        let mut current: Option<OpenBulk> = None;
        let mut report = SplitReport::default();

        loop {
            if cancel() {
                info!("Split operation stopped after {} frames", report.frames_written);
                if let Some(bulk) = current.take() {
                    bulk.close()?;
                }
                report.cancelled = true;
                return Ok(report);
            }

            let len = read_frame(&mut reader, &mut frame).map_err(|e| BulkError::io(source, "read", e))?;
            if len == 0 {
                break;
            }

            let rollover = current
                .as_ref()
                .map_or(true, |bulk| bulk.written + len as u64 > bulk_cap);
            if rollover {
                if let Some(bulk) = current.take() {
                    bulk.close()?;
                }
                let path = directory.join(bulk_file_name(&prefix, report.bulks.len() + 1));
                info!("Creating bulk file: {}", path.display());
                current = Some(OpenBulk::create(path.clone())?);
                report.bulks.push(path);
            }

            if let Some(bulk) = current.as_mut() {
                bulk.append(&frame[..len])?;
            }
            report.frames_written += 1;
            report.bytes_written += len as u64;

            if total_size > 0 {
                progress(percent(report.bytes_written, total_size));
            }
        }

        if let Some(bulk) = current.take() {
            bulk.close()?;
        }
        info!(
            "Binary file splitting complete: {} frames in {} bulk files",
            report.frames_written,
            report.bulks.len()
        );
        Ok(report)
    }

    fn validate(&self) -> Result<()> {
        if self.config.frame_size_bytes == 0 {
            return Err(BulkError::InvalidArgument("frame size must be greater than zero".into()));
        }
        if self.config.bulk_size_bytes == 0 {
            return Err(BulkError::InvalidArgument("bulk size must be greater than zero".into()));
        }
        Ok(())
    }
}

/// The single bulk file currently being written
struct OpenBulk {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl OpenBulk {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path).map_err(|e| BulkError::io(&path, "create", e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    fn append(&mut self, frame: &[u8]) -> Result<()> {
        self.writer
            .write_all(frame)
            .map_err(|e| BulkError::io(&self.path, "write", e))?;
        self.written += frame.len() as u64;
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| BulkError::io(&self.path, "write", e))?;
        debug!("Closed bulk file {} ({} bytes)", self.path.display(), self.written);
        Ok(())
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn percent(processed: u64, total: u64) -> u8 {
    let pct = (processed as u128 * 100) / total as u128;
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let limit = buf.len().min(self.step);
            self.inner.read(&mut buf[..limit])
        }
    }

    #[test]
    fn test_read_frame_fills_across_short_reads() {
        let mut reader = Trickle { inner: Cursor::new((0u8..25).collect()), step: 3 };
        let mut buf = [0u8; 10];
        assert_eq!(read_frame(&mut reader, &mut buf).unwrap(), 10);
        assert_eq!(read_frame(&mut reader, &mut buf).unwrap(), 10);
        assert_eq!(read_frame(&mut reader, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], &[20, 21, 22, 23, 24]);
        assert_eq!(read_frame(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(9999, 10000), 99);
        assert_eq!(percent(10000, 10000), 100);
        assert_eq!(percent(20, 10), 100);
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let splitter = BulkSplitter::with_config(SplitConfig {
            bulk_size_bytes: 100,
            frame_size_bytes: 0,
            name_prefix: None,
        });
        assert!(matches!(splitter.split(Path::new("x.bin")), Err(BulkError::InvalidArgument(_))));

        let splitter = BulkSplitter::with_config(SplitConfig {
            bulk_size_bytes: 0,
            frame_size_bytes: 10,
            name_prefix: None,
        });
        assert!(matches!(splitter.split(Path::new("x.bin")), Err(BulkError::InvalidArgument(_))));
    }
}
