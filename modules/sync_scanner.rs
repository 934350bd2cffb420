//! Frame-size detection from a repeating sync word.
//!
//! The scanner looks for the first occurrence of the marker in the head of the
//! stream, then for the next occurrence after it, and reports the distance
//! between the two starts. Payload bytes that happen to match the marker
//! before the real second marker yield a too-small result; this is a property
//! of the heuristic and is left as is.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

use super::error::{BulkError, Result};

/// Bytes read from the start of the stream when looking for the first marker.
pub const DEFAULT_SEARCH_WINDOW: usize = 4096;
/// Largest frame the scanner will consider.
pub const DEFAULT_MAX_GUESS: usize = 65536;

/// A decoded, non-empty sync word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncWord(Vec<u8>);

impl SyncWord {
    /// Decode a hex string such as `"4711"`. Whitespace between digits is ignored.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let compact: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = hex::decode(&compact)
            .map_err(|_| BulkError::InvalidSyncWord(hex_str.to_string()))?;
        if bytes.is_empty() {
            return Err(BulkError::InvalidSyncWord(hex_str.to_string()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sizes of the two search windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    /// Window searched for the first marker, from the start of the stream.
    pub search_window: usize,
    /// Window searched for the second marker, right after the first one.
    pub max_guess: usize,
}

impl Default for ScanWindow {
    fn default() -> Self {
        Self {
            search_window: DEFAULT_SEARCH_WINDOW,
            max_guess: DEFAULT_MAX_GUESS,
        }
    }
}

/// Estimate the frame size of the file at `path`.
///
/// Returns `Ok(None)` when no frame size could be inferred.
pub fn detect_frame_size(path: &Path, sync_word_hex: &str, window: ScanWindow) -> Result<Option<usize>> {
    let sync_word = SyncWord::from_hex(sync_word_hex)?;
    let file = File::open(path).map_err(|e| BulkError::io(path, "open", e))?;
    let mut reader = BufReader::new(file);

    let detected = detect_in_reader(&mut reader, &sync_word, window)
        .map_err(|e| BulkError::io(path, "frame size detection", e))?;

    match detected {
        Some(size) => info!("Detected frame size of {} bytes in {}", size, path.display()),
        None => info!("No frame size detected in {}", path.display()),
    }
    Ok(detected)
}

/// Run the detection over any seekable reader, starting at its current position.
pub fn detect_in_reader<R: Read + Seek>(
    reader: &mut R,
    sync_word: &SyncWord,
    window: ScanWindow,
) -> std::io::Result<Option<usize>> {
    let marker = sync_word.as_bytes();
    let base = reader.stream_position()?;

    let head = read_up_to(reader, window.search_window)?;
    let Some(first) = find(&head, marker) else {
        debug!("Sync word not found in the first {} bytes", head.len());
        return Ok(None);
    };

    reader.seek(SeekFrom::Start(base + (first + marker.len()) as u64))?;
    let tail = read_up_to(reader, window.max_guess)?;
    let Some(second) = find(&tail, marker) else {
        debug!("Second sync word not found within {} bytes of offset {}", tail.len(), first);
        return Ok(None);
    };

    let frame_size = second + marker.len();
    if frame_size <= marker.len() {
        debug!("Degenerate frame size {} at offset {}", frame_size, first);
        return Ok(None);
    }
    Ok(Some(frame_size))
}

fn read_up_to<R: Read>(reader: &mut R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(limit.min(DEFAULT_MAX_GUESS));
    reader.by_ref().take(limit as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const MARKER: [u8; 2] = [0x47, 0x11];

    /// Zero-filled frames of `frame_size` bytes, each starting with the marker.
    fn framed_stream(frame_size: usize, frames: usize) -> Vec<u8> {
        let mut data = vec![0u8; frame_size * frames];
        for i in 0..frames {
            data[i * frame_size..i * frame_size + MARKER.len()].copy_from_slice(&MARKER);
        }
        data
    }

    fn detect(data: Vec<u8>, window: ScanWindow) -> Option<usize> {
        let sync_word = SyncWord::from_hex("4711").unwrap();
        detect_in_reader(&mut Cursor::new(data), &sync_word, window).unwrap()
    }

    #[test]
    fn test_sync_word_parsing() {
        assert_eq!(SyncWord::from_hex("4711").unwrap().as_bytes(), &MARKER);
        assert_eq!(SyncWord::from_hex("de ad be ef").unwrap().len(), 4);
        assert!(matches!(SyncWord::from_hex(""), Err(BulkError::InvalidSyncWord(_))));
        assert!(matches!(SyncWord::from_hex("xyz"), Err(BulkError::InvalidSyncWord(_))));
        assert!(matches!(SyncWord::from_hex("471"), Err(BulkError::InvalidSyncWord(_))));
    }

    #[test]
    fn test_detects_exact_period() {
        for period in [3usize, 100, 1111, 4096] {
            assert_eq!(detect(framed_stream(period, 4), ScanWindow::default()), Some(period));
        }
    }

    #[test]
    fn test_first_marker_not_at_start() {
        let mut data = vec![0u8; 37];
        data.extend(framed_stream(500, 3));
        assert_eq!(detect(data, ScanWindow::default()), Some(500));
    }

    #[test]
    fn test_single_marker_is_not_found() {
        let mut data = vec![0u8; 2000];
        data[10..12].copy_from_slice(&MARKER);
        assert_eq!(detect(data, ScanWindow::default()), None);
    }

    #[test]
    fn test_marker_outside_first_window_is_not_found() {
        let mut data = vec![0u8; 100];
        data.extend(framed_stream(50, 3));
        let window = ScanWindow { search_window: 64, max_guess: DEFAULT_MAX_GUESS };
        assert_eq!(detect(data, window), None);
    }

    #[test]
    fn test_frame_longer_than_max_guess_is_not_found() {
        let window = ScanWindow { search_window: DEFAULT_SEARCH_WINDOW, max_guess: 200 };
        assert_eq!(detect(framed_stream(300, 3), window), None);
    }

    #[test]
    fn test_adjacent_markers_are_degenerate() {
        let mut data = vec![0u8; 64];
        data[0..2].copy_from_slice(&MARKER);
        data[2..4].copy_from_slice(&MARKER);
        assert_eq!(detect(data, ScanWindow::default()), None);
    }

    #[test]
    fn test_marker_inside_payload_shortens_result() {
        let mut data = framed_stream(400, 3);
        data[150..152].copy_from_slice(&MARKER);
        assert_eq!(detect(data, ScanWindow::default()), Some(150));
    }

    #[test]
    fn test_detect_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(&framed_stream(1111, 5)).unwrap();
        drop(file);

        assert_eq!(detect_frame_size(&path, "4711", ScanWindow::default()).unwrap(), Some(1111));
    }

    #[test]
    fn test_missing_file_and_bad_hex() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        assert!(matches!(
            detect_frame_size(&missing, "4711", ScanWindow::default()),
            Err(BulkError::FileNotFound(_))
        ));
        assert!(matches!(
            detect_frame_size(&missing, "zz", ScanWindow::default()),
            Err(BulkError::InvalidSyncWord(_))
        ));
    }
}
