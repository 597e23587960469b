//! # PickCopy Engine - Selective File Copy Library
//!
//! A headless engine for copying a user-selected set of files from one
//! directory to another, with interactive conflict handling. Designed as
//! the foundation for multiple UIs (GUI, CLI, tests).
//!
//! ## Overview
//!
//! The engine provides a core library for listing a source directory and
//! copying selected files. It features:
//! - Flat (non-recursive) source directory listing
//! - Per-file state tracking and error isolation
//! - Per-conflict Overwrite/Skip/Rename/Cancel decisions, delegated to the
//!   caller through a resumable state machine or a provider trait
//! - Unique-name generation for Rename (`name (1).ext`, `name (2).ext`, ...)
//! - Chunked copying with short-write detection
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{list_files, CopyBatch, BatchStep, ConflictChoice};
//! use std::path::Path;
//!
//! let source = Path::new("/data/in");
//! let target = Path::new("/data/out");
//!
//! // List the source and select everything
//! let selection = list_files(source);
//!
//! // Drive the batch, answering conflicts as they come up
//! let mut batch = CopyBatch::new(source, target, &selection)?;
//! let mut step = batch.run();
//! let summary = loop {
//!     match step {
//!         BatchStep::AwaitDecision { file_name, .. } => {
//!             println!("{} already exists, skipping", file_name);
//!             step = batch.resume(ConflictChoice::Skip);
//!         }
//!         BatchStep::Finished(summary) => break summary,
//!     }
//! };
//! println!("{} copied, {} skipped", summary.done, summary.skipped);
//! # Ok::<(), engine::EngineError>(())
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (TransferItem, BatchSummary, enums)
//! - **error**: Batch-level error types
//! - **listing**: Source directory listing
//! - **fs_ops**: Low-level filesystem operations
//! - **batch**: Batch orchestration (state machine and provider-driven run)
//! - **decision**: Decision-provider trait and notices

pub mod batch;
pub mod decision;
pub mod error;
pub mod fs_ops;
pub mod listing;
pub mod model;

// Re-export main types and functions
pub use batch::{copy_selected, BatchStep, CopyBatch};
pub use decision::{DecisionProvider, Notice};
pub use error::EngineError;
pub use fs_ops::{copy_file_contents, unique_destination, CopyFileError, COPY_CHUNK_SIZE};
pub use listing::list_files;
pub use model::{BatchSummary, ConflictChoice, FailureKind, FileState, TransferItem};
