mod state;

use iced::{Alignment, Element, Length, Sandbox, Settings};
use iced::widget::{button, checkbox, column, container, row, scrollable, text, Column};
use engine::{BatchStep, ConflictChoice, CopyBatch, FileState};
use state::{AppState, PendingConflict};

pub fn main() -> iced::Result {
    GuiApp::run(Settings::default())
}

#[derive(Debug, Clone)]
pub enum Message {
    BrowseSourcePressed,
    BrowseTargetPressed,
    RefreshPressed,
    FileToggled(usize, bool),
    SelectAllPressed,
    ClearSelectionPressed,
    CopyPressed,
    ConflictResolved(ConflictChoice),
}

pub struct GuiApp {
    state: AppState,
}

impl Sandbox for GuiApp {
    type Message = Message;

    fn new() -> Self {
        GuiApp {
            state: AppState::new(),
        }
    }

    fn title(&self) -> String {
        "PickCopy - Copy Selected Files".to_string()
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::BrowseSourcePressed => {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.state.source_dir = Some(path);
                    self.state.error_message = None;
                    self.state.reload_files();
                }
            }
            Message::BrowseTargetPressed => {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.state.target_dir = Some(path);
                    self.state.error_message = None;
                }
            }
            Message::RefreshPressed => {
                self.state.reload_files();
            }
            Message::FileToggled(index, checked) => {
                if let Some(file) = self.state.files.get_mut(index) {
                    file.selected = checked;
                }
            }
            Message::SelectAllPressed => {
                for file in &mut self.state.files {
                    file.selected = true;
                }
            }
            Message::ClearSelectionPressed => {
                for file in &mut self.state.files {
                    file.selected = false;
                }
            }
            Message::CopyPressed => {
                self.start_copy();
            }
            Message::ConflictResolved(choice) => {
                self.state.pending_conflict = None;
                if let Some(mut batch) = self.state.batch.take() {
                    let step = batch.resume(choice);
                    self.handle_step(batch, step);
                }
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let conflict_open = self.state.pending_conflict.is_some();

        let source_label = self
            .state
            .source_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string());
        let target_label = self
            .state
            .target_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string());

        let dir_section = column![
            row![
                button("Select source folder...")
                    .on_press_maybe((!conflict_open).then_some(Message::BrowseSourcePressed)),
                text(source_label),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            row![
                button("Select destination folder...")
                    .on_press_maybe((!conflict_open).then_some(Message::BrowseTargetPressed)),
                text(target_label),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        ]
        .spacing(10)
        .padding(10);

        let selection_controls = row![
            button("Select all").on_press(Message::SelectAllPressed),
            button("Clear").on_press(Message::ClearSelectionPressed),
            button("Refresh").on_press(Message::RefreshPressed),
        ]
        .spacing(10);

        let file_rows: Vec<Element<Message>> = self
            .state
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                checkbox(file.name.clone(), file.selected)
                    .on_toggle(move |checked| Message::FileToggled(index, checked))
                    .into()
            })
            .collect();

        let file_list: Element<Message> = if file_rows.is_empty() {
            text("No files to show - pick a source folder").into()
        } else {
            scrollable(Column::with_children(file_rows).spacing(4))
                .height(Length::Fixed(260.0))
                .into()
        };

        let copy_button = button(text(format!(
            "Copy {} selected file(s)",
            self.state.selected_count()
        )))
        .on_press_maybe((!conflict_open).then_some(Message::CopyPressed))
        .padding(10);

        let conflict_section: Element<Message> =
            if let Some(conflict) = &self.state.pending_conflict {
                container(
                    column![
                        text(format!(
                            "\"{}\" already exists in the destination.",
                            conflict.file_name
                        )),
                        text(format!("Path: {}", conflict.destination.display())),
                        row![
                            button("Overwrite")
                                .on_press(Message::ConflictResolved(ConflictChoice::Overwrite)),
                            button("Skip")
                                .on_press(Message::ConflictResolved(ConflictChoice::Skip)),
                            button("Rename copy")
                                .on_press(Message::ConflictResolved(ConflictChoice::Rename)),
                            button("Cancel remaining")
                                .on_press(Message::ConflictResolved(
                                    ConflictChoice::CancelRemaining
                                )),
                        ]
                        .spacing(10),
                    ]
                    .spacing(10),
                )
                .padding(10)
                .into()
            } else {
                text("").into()
            };

        let results_section: Element<Message> = if let Some(summary) = &self.state.last_summary {
            let mut col = column![
                text("Copy complete"),
                text(format!(
                    "Done: {} | Skipped: {} | Failed: {} | Cancelled: {}",
                    summary.done, summary.skipped, summary.failed, summary.cancelled
                )),
            ]
            .spacing(5);

            let renamed: Vec<_> = self
                .state
                .last_items
                .iter()
                .filter(|item| {
                    item.decision == Some(ConflictChoice::Rename) && item.state == FileState::Done
                })
                .collect();
            if !renamed.is_empty() {
                col = col.push(text("Renamed copies:"));
                for item in renamed {
                    let dest_name = item
                        .destination_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("(unknown)");
                    col = col.push(text(format!("  {} -> {}", item.file_name, dest_name)));
                }
            }

            let failed: Vec<_> = self
                .state
                .last_items
                .iter()
                .filter(|item| item.state == FileState::Failed)
                .collect();
            if !failed.is_empty() {
                col = col.push(text("Failed files (first 10):"));
                for item in failed.iter().take(10) {
                    col = col.push(text(format!(
                        "  {}: {}",
                        item.file_name,
                        item.error_message.as_deref().unwrap_or("unknown error")
                    )));
                }
            }

            col.spacing(10).padding(10).into()
        } else {
            text("Ready to copy").into()
        };

        let error_section: Element<Message> = if let Some(error) = &self.state.error_message {
            container(text(format!("ERROR: {}", error))).padding(10).into()
        } else {
            text("").into()
        };

        column![
            text("PickCopy - Copy Selected Files").size(24),
            dir_section,
            selection_controls,
            file_list,
            copy_button,
            conflict_section,
            results_section,
            error_section,
        ]
        .spacing(20)
        .padding(20)
        .into()
    }
}

impl GuiApp {
    fn start_copy(&mut self) {
        // A parked batch means a conflict prompt is already on screen
        if self.state.batch.is_some() {
            return;
        }

        let source = self.state.source_dir.clone().unwrap_or_default();
        let target = self.state.target_dir.clone().unwrap_or_default();
        if !source.as_os_str().is_empty() && source == target {
            self.state.error_message =
                Some("Source and destination cannot be the same".to_string());
            return;
        }
        let selection = self.state.selected_names();

        self.state.error_message = None;
        self.state.last_summary = None;
        self.state.last_items.clear();

        match CopyBatch::new(source, target, &selection) {
            Ok(mut batch) => {
                let step = batch.run();
                self.handle_step(batch, step);
            }
            Err(e) => {
                self.state.error_message = Some(e.to_string());
            }
        }
    }

    /// Park the batch on a conflict, or record its outcome.
    fn handle_step(&mut self, batch: CopyBatch, step: BatchStep) {
        match step {
            BatchStep::AwaitDecision {
                file_name,
                destination,
                ..
            } => {
                self.state.pending_conflict = Some(PendingConflict {
                    file_name,
                    destination,
                });
                self.state.batch = Some(batch);
            }
            BatchStep::Finished(summary) => {
                self.state.finish_batch(summary, batch.into_items());
            }
        }
    }
}
