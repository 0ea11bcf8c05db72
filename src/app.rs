use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::bookmarks::tree::FlatBookmark;
use crate::error::{AppError, Result};
use crate::protocol::{Inbound, Outbound};
use crate::theme::ThemeColors;

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    DeleteConfirm { bookmark: FlatBookmark },
    Error { message: String },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
    Help,
}

/// What the main panel shows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum View {
    /// Waiting for the first collect.
    #[default]
    Loading,
    Showing(FlatBookmark),
    /// Every bookmark in this pass was kept, deleted, or the store is empty.
    Done,
}

/// Counters for the current session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TriageStats {
    pub kept: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub opened: usize,
}

/// Main application state.
pub struct App {
    pub view: View,
    pub mode: AppMode,
    pub stats: TriageStats,
    /// Bookmarks left in the current pass.
    pub remaining: usize,
    pub should_quit: bool,
    pub confirm_delete: bool,
    pub watcher_active: bool,
    /// Set when the store changed on disk since the last collect.
    pub store_changed: bool,
    /// Message, when it was set, and whether it reports an error.
    pub status_message: Option<(String, Instant, bool)>,
    pub help_scroll: usize,
    pub theme: ThemeColors,
    pub store_path: PathBuf,
    pub strategy_label: &'static str,
}

impl App {
    pub fn new(store_path: &Path, theme: ThemeColors, confirm_delete: bool) -> Self {
        Self {
            view: View::Loading,
            mode: AppMode::Normal,
            stats: TriageStats::default(),
            remaining: 0,
            should_quit: false,
            confirm_delete,
            watcher_active: false,
            store_changed: false,
            status_message: None,
            help_scroll: 0,
            theme,
            store_path: store_path.to_path_buf(),
            strategy_label: "bounded",
        }
    }

    /// The bookmark on screen, if any.
    #[cfg(test)]
    pub fn current(&self) -> Option<&FlatBookmark> {
        match &self.view {
            View::Showing(bookmark) => Some(bookmark),
            _ => None,
        }
    }

    /// Apply the reply to a dispatched message.
    pub fn finish(&mut self, message: &Inbound, result: Result<Outbound>, remaining: usize) {
        self.remaining = remaining;
        let acted = match result {
            Ok(Outbound::RandomBookmark { bookmark }) => {
                self.view = View::Showing(bookmark);
                true
            }
            Err(AppError::EmptyCollection) => {
                self.view = View::Done;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, ?message, "action failed");
                self.open_dialog(DialogKind::Error {
                    message: e.to_string(),
                });
                false
            }
        };
        if !acted {
            return;
        }

        match message {
            Inbound::Collect => {
                self.store_changed = false;
                self.set_status_message(format!("Collected {} bookmarks", remaining));
            }
            Inbound::Delete { .. } => {
                self.stats.deleted += 1;
                self.set_status_message("Deleted".to_string());
            }
            Inbound::Keep { .. } => {
                self.stats.kept += 1;
                self.set_status_message("Kept".to_string());
            }
            Inbound::Skip => self.stats.skipped += 1,
        }
    }

    /// Record the outcome of opening a bookmark in the browser.
    pub fn finish_open(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                self.stats.opened += 1;
                self.set_status_message("Opened in browser".to_string());
            }
            Err(e) => self.set_error_message(e.to_string()),
        }
    }

    /// Note an outside edit to the store; re-collecting is left to the user.
    pub fn handle_store_changed(&mut self, path: &Path) {
        self.store_changed = true;
        self.set_status_message(format!(
            "{} changed on disk, press r to re-collect",
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string())
        ));
    }

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => {
                self.help_scroll = 0;
                AppMode::Help
            }
        };
    }

    pub fn scroll_help_down(&mut self, max: usize) {
        if self.help_scroll + 1 < max {
            self.help_scroll += 1;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    /// Set an error status message with current timestamp.
    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created, _)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
