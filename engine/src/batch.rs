//! Batch orchestration.
//!
//! The copy runs as a resumable state machine: [`CopyBatch::run`] processes
//! selected files in order until it either finishes or hits a destination
//! that already exists, in which case it parks and returns
//! [`BatchStep::AwaitDecision`]. The caller resolves the conflict however it
//! likes (dialog, fixed policy) and continues with [`CopyBatch::resume`].
//! An event-loop UI stays responsive between the two calls instead of
//! blocking inside a dialog.
//!
//! [`copy_selected`] wraps the state machine for callers that can answer
//! conflicts synchronously through a [`DecisionProvider`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::decision::{DecisionProvider, Notice};
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{BatchSummary, ConflictChoice, FailureKind, FileState, TransferItem};

/// What a batch needs from its caller next.
#[derive(Debug)]
pub enum BatchStep {
    /// The destination for `items()[index]` already exists; call
    /// [`CopyBatch::resume`] with a decision to continue.
    AwaitDecision {
        index: usize,
        file_name: String,
        destination: PathBuf,
    },

    /// All items processed (some may have failed or been cancelled).
    Finished(BatchSummary),
}

/// A copy operation over a selection of file names, driven to completion
/// by alternating [`run`](CopyBatch::run) / [`resume`](CopyBatch::resume).
#[derive(Debug)]
pub struct CopyBatch {
    source_dir: PathBuf,
    target_dir: PathBuf,
    items: Vec<TransferItem>,

    /// Index of the next unprocessed item
    next_index: usize,

    /// Index parked on a conflict, waiting for a decision
    awaiting: Option<usize>,

    finished: bool,
    bytes_copied: u64,
    started_at: SystemTime,
    finished_at: Option<SystemTime>,
}

impl CopyBatch {
    /// Build a batch from a selection of file names.
    ///
    /// Fails fast when either directory is unset (empty path); nothing is
    /// copied and the filesystem is not touched. The selection is
    /// de-duplicated, first occurrence wins, so every destination is
    /// decided at most once.
    ///
    /// # Errors
    /// Returns EngineError if the source or destination directory is unset
    pub fn new(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        selected: &[String],
    ) -> Result<Self, EngineError> {
        let source_dir = source_dir.into();
        let target_dir = target_dir.into();

        if source_dir.as_os_str().is_empty() {
            return Err(EngineError::SourceNotConfigured);
        }
        if target_dir.as_os_str().is_empty() {
            return Err(EngineError::DestinationNotConfigured);
        }

        let mut seen = HashSet::new();
        let items = selected
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| TransferItem::new(&source_dir, &target_dir, name.clone()))
            .collect();

        Ok(CopyBatch {
            source_dir,
            target_dir,
            items,
            next_index: 0,
            awaiting: None,
            finished: false,
            bytes_copied: 0,
            started_at: SystemTime::now(),
            finished_at: None,
        })
    }

    /// Process items in selection order until a conflict or the end.
    ///
    /// Calling this while a decision is pending re-returns the same
    /// `AwaitDecision`; calling it after the end re-returns `Finished`.
    pub fn run(&mut self) -> BatchStep {
        if let Some(index) = self.awaiting {
            return self.await_step(index);
        }
        if self.finished {
            return BatchStep::Finished(self.summary());
        }
        self.advance()
    }

    /// Apply a decision to the parked item and continue.
    ///
    /// Without a pending conflict this is equivalent to [`run`](Self::run).
    pub fn resume(&mut self, choice: ConflictChoice) -> BatchStep {
        let Some(index) = self.awaiting.take() else {
            return self.run();
        };

        self.items[index].decision = Some(choice);
        match choice {
            ConflictChoice::Skip => {
                self.items[index].state = FileState::Skipped;
            }
            ConflictChoice::Overwrite => {
                // Remove the existing entry before writing
                match fs::remove_file(&self.items[index].destination_path) {
                    Ok(()) => self.copy_item(index),
                    Err(e) => {
                        let item = &mut self.items[index];
                        item.state = FileState::Failed;
                        item.failure = Some(FailureKind::Open);
                        item.error_message = Some(format!(
                            "Failed to remove existing file: {}",
                            e
                        ));
                    }
                }
            }
            ConflictChoice::Rename => {
                // The probe guarantees a fresh name; no second existence check
                let fresh = fs_ops::unique_destination(&self.items[index].destination_path);
                self.items[index].destination_path = fresh;
                self.copy_item(index);
            }
            ConflictChoice::CancelRemaining => {
                for item in &mut self.items[index..] {
                    item.state = FileState::Cancelled;
                }
                self.next_index = self.items.len();
                return self.advance();
            }
        }

        self.next_index = index + 1;
        self.advance()
    }

    fn advance(&mut self) -> BatchStep {
        while self.next_index < self.items.len() {
            let index = self.next_index;

            if self.items[index].destination_path.exists() {
                self.awaiting = Some(index);
                return self.await_step(index);
            }

            self.copy_item(index);
            self.next_index += 1;
        }

        self.finished = true;
        if self.finished_at.is_none() {
            self.finished_at = Some(SystemTime::now());
        }
        BatchStep::Finished(self.summary())
    }

    fn await_step(&self, index: usize) -> BatchStep {
        BatchStep::AwaitDecision {
            index,
            file_name: self.items[index].file_name.clone(),
            destination: self.items[index].destination_path.clone(),
        }
    }

    fn copy_item(&mut self, index: usize) {
        let source = self.items[index].source_path.clone();
        let destination = self.items[index].destination_path.clone();

        self.items[index].state = FileState::Copying;
        match fs_ops::copy_file_contents(&source, &destination) {
            Ok(bytes) => {
                let item = &mut self.items[index];
                item.bytes_copied = bytes;
                item.state = FileState::Done;
                self.bytes_copied += bytes;
            }
            Err(e) => {
                let item = &mut self.items[index];
                item.state = FileState::Failed;
                item.failure = Some(e.failure_kind());
                item.error_message = Some(e.to_string());
            }
        }
    }

    fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.items.len(),
            done: 0,
            skipped: 0,
            failed: 0,
            cancelled: 0,
            bytes_copied: self.bytes_copied,
            started_at: self.started_at,
            finished_at: self.finished_at.unwrap_or(self.started_at),
        };
        for item in &self.items {
            match item.state {
                FileState::Done => summary.done += 1,
                FileState::Skipped => summary.skipped += 1,
                FileState::Failed => summary.failed += 1,
                FileState::Cancelled => summary.cancelled += 1,
                FileState::Pending | FileState::Copying => {}
            }
        }
        summary
    }

    /// Source directory this batch reads from.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Destination directory this batch writes into.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Per-file records, in selection order.
    pub fn items(&self) -> &[TransferItem] {
        &self.items
    }

    /// Consume the batch, keeping the per-file records.
    pub fn into_items(self) -> Vec<TransferItem> {
        self.items
    }

    /// True once every item has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Copy the selected files from `source_dir` to `target_dir`, resolving
/// conflicts through `provider`.
///
/// Per-file failures are raised as [`Notice::FileFailed`] while the loop
/// runs and never stop the batch; a [`Notice::BatchFinished`] follows once
/// every item is processed.
///
/// # Errors
/// Returns EngineError if the source or destination directory is unset;
/// nothing is copied in that case.
pub fn copy_selected(
    source_dir: impl Into<PathBuf>,
    target_dir: impl Into<PathBuf>,
    selected: &[String],
    provider: &mut dyn DecisionProvider,
) -> Result<BatchSummary, EngineError> {
    let mut batch = CopyBatch::new(source_dir, target_dir, selected)?;
    let mut noticed = 0;

    let mut step = batch.run();
    loop {
        raise_failures(batch.items(), &mut noticed, provider);
        match step {
            BatchStep::AwaitDecision {
                file_name,
                destination,
                ..
            } => {
                let choice = provider.resolve_conflict(&file_name, &destination);
                step = batch.resume(choice);
            }
            BatchStep::Finished(summary) => {
                provider.notify(Notice::BatchFinished(summary.clone()));
                return Ok(summary);
            }
        }
    }
}

/// Raise FileFailed notices for items that reached a terminal state since
/// the last call. Items settle in selection order, so a single cursor is
/// enough.
fn raise_failures(
    items: &[TransferItem],
    noticed: &mut usize,
    provider: &mut dyn DecisionProvider,
) {
    while *noticed < items.len() && items[*noticed].state.is_terminal() {
        let item = &items[*noticed];
        if item.state == FileState::Failed {
            provider.notify(Notice::FileFailed {
                file_name: item.file_name.clone(),
                failure: item.failure.unwrap_or(FailureKind::Open),
                detail: item
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        *noticed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn write_file(path: &Path, contents: &[u8]) {
        let mut file = fs::File::create(path).expect("Failed to create file");
        file.write_all(contents).expect("Failed to write file");
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Test double recording every call in order.
    struct ScriptedProvider {
        choice: ConflictChoice,
        conflicts: Vec<String>,
        notices: Vec<String>,
    }

    impl ScriptedProvider {
        fn new(choice: ConflictChoice) -> Self {
            ScriptedProvider {
                choice,
                conflicts: Vec::new(),
                notices: Vec::new(),
            }
        }
    }

    impl DecisionProvider for ScriptedProvider {
        fn resolve_conflict(&mut self, file_name: &str, _destination: &Path) -> ConflictChoice {
            self.conflicts.push(file_name.to_string());
            self.choice
        }

        fn notify(&mut self, notice: Notice) {
            match notice {
                Notice::FileFailed { file_name, .. } => {
                    self.notices.push(format!("failed:{}", file_name))
                }
                Notice::BatchFinished(summary) => self
                    .notices
                    .push(format!("finished:{}/{}", summary.done, summary.total)),
            }
        }
    }

    #[test]
    fn test_unset_source_fails_fast() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&dst).expect("Failed to create dst dir");

        let result = CopyBatch::new("", &dst.display().to_string(), &names(&["a.txt"]));
        assert!(matches!(result, Err(EngineError::SourceNotConfigured)));

        // No filesystem mutation, no notices
        let mut provider = ScriptedProvider::new(ConflictChoice::Skip);
        let result = copy_selected("", dst.display().to_string(), &names(&["a.txt"]), &mut provider);
        assert!(result.is_err());
        assert!(provider.notices.is_empty());
        assert_eq!(fs::read_dir(&dst).expect("Failed to read dst").count(), 0);
    }

    #[test]
    fn test_unset_destination_fails_fast() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = CopyBatch::new(temp_dir.path(), Path::new(""), &names(&["a.txt"]));
        assert!(matches!(result, Err(EngineError::DestinationNotConfigured)));
    }

    #[test]
    fn test_copy_two_files_without_conflict() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&src.join("b.txt"), b"world");

        let mut batch =
            CopyBatch::new(&src, &dst, &names(&["a.txt", "b.txt"])).expect("Failed to create batch");
        let step = batch.run();

        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish without a conflict");
        };
        assert_eq!(summary.total, 2);
        assert_eq!(summary.done, 2);
        assert_eq!(summary.bytes_copied, 10);
        assert_eq!(
            fs::read_to_string(dst.join("a.txt")).expect("Failed to read a.txt"),
            "hello"
        );
        assert_eq!(
            fs::read_to_string(dst.join("b.txt")).expect("Failed to read b.txt"),
            "world"
        );
        assert!(batch.items().iter().all(|i| i.state == FileState::Done));
    }

    #[test]
    fn test_overwrite_decision_replaces_destination() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&dst.join("a.txt"), b"something much longer than hello");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt"])).expect("Failed to create batch");
        let step = batch.run();
        assert!(matches!(step, BatchStep::AwaitDecision { index: 0, .. }));

        let step = batch.resume(ConflictChoice::Overwrite);
        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish after the decision");
        };
        assert_eq!(summary.done, 1);
        assert_eq!(
            fs::read_to_string(dst.join("a.txt")).expect("Failed to read a.txt"),
            "hello"
        );
        assert_eq!(batch.items()[0].decision, Some(ConflictChoice::Overwrite));
    }

    #[test]
    fn test_skip_decision_leaves_destination_unchanged() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&dst.join("a.txt"), b"old");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt"])).expect("Failed to create batch");
        batch.run();
        let step = batch.resume(ConflictChoice::Skip);

        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish after the decision");
        };
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.done, 0);
        assert_eq!(
            fs::read(dst.join("a.txt")).expect("Failed to read a.txt"),
            b"old"
        );
        assert_eq!(batch.items()[0].state, FileState::Skipped);
    }

    #[test]
    fn test_rename_decision_keeps_original_and_adds_fresh_copy() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&dst.join("a.txt"), b"old");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt"])).expect("Failed to create batch");
        batch.run();
        let step = batch.resume(ConflictChoice::Rename);

        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish after the decision");
        };
        assert_eq!(summary.done, 1);
        assert_eq!(
            fs::read(dst.join("a.txt")).expect("Failed to read a.txt"),
            b"old"
        );
        assert_eq!(
            fs::read_to_string(dst.join("a (1).txt")).expect("Failed to read renamed copy"),
            "hello"
        );
        assert_eq!(batch.items()[0].destination_path, dst.join("a (1).txt"));
    }

    #[test]
    fn test_cancel_remaining_stops_the_batch() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"aaa");
        write_file(&src.join("b.txt"), b"bbb");
        write_file(&src.join("c.txt"), b"ccc");
        // Only b conflicts
        write_file(&dst.join("b.txt"), b"old");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt", "b.txt", "c.txt"]))
            .expect("Failed to create batch");
        let step = batch.run();
        assert!(matches!(step, BatchStep::AwaitDecision { index: 1, .. }));

        let step = batch.resume(ConflictChoice::CancelRemaining);
        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish after cancelling");
        };
        assert_eq!(summary.done, 1);
        assert_eq!(summary.cancelled, 2);

        // a was copied before the cancel; b kept its old content; c never copied
        assert_eq!(batch.items()[0].state, FileState::Done);
        assert_eq!(batch.items()[1].state, FileState::Cancelled);
        assert_eq!(batch.items()[2].state, FileState::Cancelled);
        assert_eq!(
            fs::read(dst.join("b.txt")).expect("Failed to read b.txt"),
            b"old"
        );
        assert!(!dst.join("c.txt").exists());
    }

    #[test]
    fn test_open_failure_does_not_stop_the_batch() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("real.txt"), b"data");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["ghost.txt", "real.txt"]))
            .expect("Failed to create batch");
        let step = batch.run();

        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish");
        };
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(batch.items()[0].state, FileState::Failed);
        assert_eq!(batch.items()[0].failure, Some(FailureKind::Open));
        assert!(batch.items()[0].error_message.is_some());
        assert!(dst.join("real.txt").exists());
    }

    #[test]
    fn test_selection_is_deduplicated() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt", "a.txt", "a.txt"]))
            .expect("Failed to create batch");
        let step = batch.run();

        let BatchStep::Finished(summary) = step else {
            panic!("Expected batch to finish");
        };
        assert_eq!(summary.total, 1);
        assert_eq!(summary.done, 1);
    }

    #[test]
    fn test_run_while_awaiting_repeats_the_prompt() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&dst.join("a.txt"), b"old");

        let mut batch = CopyBatch::new(&src, &dst, &names(&["a.txt"])).expect("Failed to create batch");
        assert!(matches!(batch.run(), BatchStep::AwaitDecision { index: 0, .. }));
        assert!(matches!(batch.run(), BatchStep::AwaitDecision { index: 0, .. }));

        // The prompt repeating must not have copied anything
        assert_eq!(
            fs::read(dst.join("a.txt")).expect("Failed to read a.txt"),
            b"old"
        );

        batch.resume(ConflictChoice::Skip);
        assert!(batch.is_finished());
        assert!(matches!(batch.run(), BatchStep::Finished(_)));
    }

    #[test]
    fn test_copy_selected_resolves_conflicts_through_provider() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("a.txt"), b"hello");
        write_file(&dst.join("a.txt"), b"old");

        let mut provider = ScriptedProvider::new(ConflictChoice::Rename);
        let summary = copy_selected(&src, &dst, &names(&["a.txt"]), &mut provider)
            .expect("Batch should run");

        assert_eq!(provider.conflicts, vec!["a.txt"]);
        assert_eq!(summary.done, 1);
        assert!(dst.join("a (1).txt").exists());
        assert_eq!(provider.notices, vec!["finished:1/1"]);
    }

    #[test]
    fn test_copy_selected_raises_failure_notices_in_order() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::create_dir(&dst).expect("Failed to create dst dir");
        write_file(&src.join("ok.txt"), b"fine");

        let mut provider = ScriptedProvider::new(ConflictChoice::Skip);
        let summary = copy_selected(
            &src,
            &dst,
            &names(&["missing.txt", "ok.txt"]),
            &mut provider,
        )
        .expect("Batch should run");

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(
            provider.notices,
            vec!["failed:missing.txt".to_string(), "finished:1/2".to_string()]
        );
    }
}
