use std::path::PathBuf;
use engine::{list_files, BatchSummary, CopyBatch, TransferItem};

/// One row in the selectable file list.
#[derive(Debug, Clone)]
pub struct FileRow {
    pub name: String,
    pub selected: bool,
}

/// A conflict parked by the batch, waiting for the user's choice.
#[derive(Debug, Clone)]
pub struct PendingConflict {
    pub file_name: String,
    pub destination: PathBuf,
}

/// Application state, holding all UI and batch-related data.
#[derive(Debug)]
pub struct AppState {
    // Chosen directories
    pub source_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,

    // Listing of the source directory
    pub files: Vec<FileRow>,

    // A batch lives here only while it is parked on a conflict
    pub batch: Option<CopyBatch>,
    pub pending_conflict: Option<PendingConflict>,

    // Outcome of the last finished batch
    pub last_summary: Option<BatchSummary>,
    pub last_items: Vec<TransferItem>,

    // UI state
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            source_dir: None,
            target_dir: None,
            files: Vec::new(),
            batch: None,
            pending_conflict: None,
            last_summary: None,
            last_items: Vec::new(),
            error_message: None,
        }
    }

    /// Re-read the source directory into the file list, clearing selection.
    pub fn reload_files(&mut self) {
        self.files = match &self.source_dir {
            Some(dir) => list_files(dir)
                .into_iter()
                .map(|name| FileRow {
                    name,
                    selected: false,
                })
                .collect(),
            None => Vec::new(),
        };
    }

    /// Names of the checked rows, in listing order.
    pub fn selected_names(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|file| file.selected)
            .map(|file| file.name.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.files.iter().filter(|file| file.selected).count()
    }

    /// Record a finished batch and drop the parked state.
    pub fn finish_batch(&mut self, summary: BatchSummary, items: Vec<TransferItem>) {
        self.last_summary = Some(summary);
        self.last_items = items;
        self.pending_conflict = None;
        self.batch = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
