//! Error types for the copy engine.
//!
//! The primary error type is `EngineError`, which represents batch-level
//! errors that prevent a copy from being started. File-level errors are
//! recorded on the TransferItem struct, not as EngineError.

use std::error::Error;
use std::fmt::{self, Display};

/// Errors that can occur at the batch level (preventing execution).
///
/// These errors are raised before any file is touched and should stop the
/// batch. Per-file read/write failures are recorded in TransferItem,
/// not in this enum.
#[derive(Debug)]
pub enum EngineError {
    /// No source directory has been chosen
    SourceNotConfigured,

    /// No destination directory has been chosen
    DestinationNotConfigured,
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotConfigured => {
                write!(f, "Source directory is not set")
            }
            Self::DestinationNotConfigured => {
                write!(f, "Destination directory is not set")
            }
        }
    }
}

impl Error for EngineError {}
