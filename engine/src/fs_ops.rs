//! Filesystem primitives.
//!
//! This module provides the low-level operations the batch runner is built
//! on: the chunked file copy and the unique-name probe used by the Rename
//! decision.

use std::fmt::{self, Display};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::model::FailureKind;

/// Buffer size for the copy loop.
pub const COPY_CHUNK_SIZE: usize = 8192;

/// Errors from a single file copy.
///
/// These never abort a batch; the batch runner records them on the item
/// and moves on.
#[derive(Debug)]
pub enum CopyFileError {
    /// Could not open the source or create the destination
    Open { path: PathBuf, source: io::Error },

    /// Failed to read from the source mid-copy
    Read { path: PathBuf, source: io::Error },

    /// Failed to write to the destination
    Write { path: PathBuf, source: io::Error },

    /// A chunk was written only partially
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },
}

impl Display for CopyFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, .. } => {
                write!(f, "Failed to open file: {}", path.display())
            }
            Self::Read { path, .. } => {
                write!(f, "Failed to read file: {}", path.display())
            }
            Self::Write { path, .. } => {
                write!(f, "Failed to write file: {}", path.display())
            }
            Self::ShortWrite {
                path,
                written,
                expected,
            } => {
                write!(
                    f,
                    "Short write to {}: {} of {} bytes",
                    path.display(),
                    written,
                    expected
                )
            }
        }
    }
}

impl std::error::Error for CopyFileError {}

impl CopyFileError {
    /// Collapse onto the per-item failure classification.
    ///
    /// Read errors count as open failures: the source turned out to be
    /// unreadable.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Open { .. } | Self::Read { .. } => FailureKind::Open,
            Self::Write { .. } | Self::ShortWrite { .. } => FailureKind::Write,
        }
    }
}

/// Copy the contents of `src` to `dst` in fixed-size chunks.
///
/// The destination is created (truncating any existing file); on success
/// the source modification time is carried over. A short write aborts the
/// copy and leaves the partially written destination in place.
///
/// Both handles are closed on every exit path when they drop out of scope.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns CopyFileError if opening either file or transferring a chunk fails
pub fn copy_file_contents(src: &Path, dst: &Path) -> Result<u64, CopyFileError> {
    let mut src_file = fs::File::open(src).map_err(|e| CopyFileError::Open {
        path: src.to_path_buf(),
        source: e,
    })?;
    let src_mtime = src_file.metadata().ok().and_then(|m| m.modified().ok());

    let mut dst_file = fs::File::create(dst).map_err(|e| CopyFileError::Open {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let mut buf = [0u8; COPY_CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let read = src_file.read(&mut buf).map_err(|e| CopyFileError::Read {
            path: src.to_path_buf(),
            source: e,
        })?;
        if read == 0 {
            break;
        }

        let written = dst_file
            .write(&buf[..read])
            .map_err(|e| CopyFileError::Write {
                path: dst.to_path_buf(),
                source: e,
            })?;
        if written != read {
            return Err(CopyFileError::ShortWrite {
                path: dst.to_path_buf(),
                written,
                expected: read,
            });
        }
        total += written as u64;
    }

    // Preserve modification time if available
    if let Some(mtime) = src_mtime {
        let _ = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime));
    }

    Ok(total)
}

/// Find a destination path that does not exist yet.
///
/// For `dir/base.ext`, probes `dir/base (1).ext`, `dir/base (2).ext`, ...
/// and returns the first free candidate; the index starts at 1 and the
/// `.ext` suffix is omitted when the original name has none. Probing is
/// unbounded.
pub fn unique_destination(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy().into_owned());

    let mut index: u64 = 1;
    loop {
        let candidate_name = match &ext {
            Some(ext) => format!("{} ({}).{}", stem, index, ext),
            None => format!("{} ({})", stem, index),
        };
        let candidate = dir.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}
