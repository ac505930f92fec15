//! Input file list reading
//!
//! A list is plain text, one media path per line. Lines are read with a
//! fixed-size buffer: each read takes at most `max_line_length - 1` bytes,
//! stopping after a newline. The first newline is stripped and nothing else
//! is filtered, so blank lines become empty paths and an over-long line
//! continues as the following entry.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FramecatError, FramecatResult};

pub mod scan;

pub use scan::{natural_cmp, scan_directory, write_list};

/// Default line buffer size, terminator included
pub const DEFAULT_MAX_LINE_LENGTH: usize = 256;

/// One entry of the file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    path: PathBuf,
    /// 1-based position in the list
    position: usize,
}

impl InputDescriptor {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Sequential reader over a file list
pub struct FileList<R = BufReader<File>> {
    reader: R,
    source: PathBuf,
    max_line_length: usize,
    entries_read: usize,
}

impl FileList<BufReader<File>> {
    /// Open a list file on disk
    pub fn open(path: &Path, max_line_length: usize) -> FramecatResult<Self> {
        let file = File::open(path).map_err(|source| FramecatError::ListUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened file list {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), path, max_line_length))
    }
}

impl<R: BufRead> FileList<R> {
    /// Read a list from any buffered source. `source` is used in diagnostics.
    pub fn from_reader(reader: R, source: &Path, max_line_length: usize) -> Self {
        Self {
            reader,
            source: source.to_path_buf(),
            max_line_length,
            entries_read: 0,
        }
    }

    /// Next entry in list order, `Ok(None)` at end of list
    pub fn next_entry(&mut self) -> FramecatResult<Option<InputDescriptor>> {
        let limit = self.max_line_length.saturating_sub(1).max(1) as u64;
        let mut buf = Vec::new();

        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .map_err(|source| FramecatError::ListUnavailable {
                path: self.source.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }

        if let Some(newline) = buf.iter().position(|&b| b == b'\n') {
            buf.truncate(newline);
        }

        self.entries_read += 1;
        Ok(Some(InputDescriptor {
            path: path_from_bytes(buf),
            position: self.entries_read,
        }))
    }

    /// Entries returned so far
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }
}

/// List bytes as a path, unchanged where the platform allows it
#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

impl<R: BufRead> Iterator for FileList<R> {
    type Item = FramecatResult<InputDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
