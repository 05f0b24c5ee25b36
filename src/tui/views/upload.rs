//! Upload view: stage local files and send them to the analyzer.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::super::theme;
use crate::api::{self, UploadReceipt};
use crate::core::uploader::{read_file, StagedFile, UploadError, Uploader};
use crate::core::Dashboard;
use crate::tui::events::{BackendEvent, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::{InputBuffer, InputOutcome};

pub struct UploadState {
    path: InputBuffer,
    editing: bool,
    uploader: Uploader,
    selected: usize,
}

impl UploadState {
    pub fn new() -> Self {
        Self {
            path: InputBuffer::new(),
            editing: true,
            uploader: Uploader::new(),
            selected: 0,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        if self.editing {
            if let Event::Paste(text) = event {
                self.path.insert_str(text);
                return true;
            }
        }

        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        // Submit works from either mode.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('u') {
            self.submit(services);
            return true;
        }

        if self.editing {
            match self.path.handle_key(key) {
                InputOutcome::Submit => {
                    if !self.path.is_empty() {
                        let path = expand_home(self.path.take().trim());
                        self.read(path, services);
                    }
                }
                InputOutcome::Cancel => self.editing = false,
                InputOutcome::Edited | InputOutcome::Ignored => {}
            }
            return true;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter) => {
                self.editing = true;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                let len = self.uploader.staged().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('x') | KeyCode::Delete) => {
                if let Some(removed) = self.uploader.remove(self.selected) {
                    services.notify(
                        format!("Removed {}", removed.file.file_name),
                        NotificationLevel::Info,
                    );
                }
                self.clamp_selection();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('c')) => {
                self.uploader.clear();
                self.selected = 0;
                true
            }
            _ => false,
        }
    }

    fn read(&self, path: PathBuf, services: &Services) {
        let Some(user_id) = services.session().user_id() else {
            return;
        };
        services.spawn(move |_| async move {
            BackendEvent::FileRead {
                user_id,
                result: read_file(&path).await,
            }
        });
    }

    fn submit(&mut self, services: &Services) {
        match self.uploader.prepare(services.session()) {
            Ok((user_id, files)) => {
                log::info!("Uploading {} file(s) for user {user_id}", files.len());
                services.spawn(move |backend| async move {
                    let result = backend.upload(&user_id, files).await;
                    BackendEvent::UploadFinished { user_id, result }
                });
            }
            Err(e) => services.notify(e.to_string(), NotificationLevel::Warning),
        }
    }

    pub fn on_file_read(&mut self, result: Result<StagedFile, UploadError>, services: &Services) {
        match result {
            Ok(staged) => {
                let name = staged.file.file_name.clone();
                self.uploader.stage(staged.path, staged.file);
                self.selected = self.uploader.staged().len() - 1;
                services.notify(format!("Added {name}"), NotificationLevel::Info);
            }
            Err(e) => services.notify(e.to_string(), NotificationLevel::Error),
        }
    }

    /// Apply an upload result and append the queued files to the collection.
    pub fn on_upload_finished(
        &mut self,
        result: api::Result<UploadReceipt>,
        dashboard: &mut Dashboard,
        services: &Services,
    ) {
        match self.uploader.finish(result) {
            Ok(receipt) => {
                dashboard.apply_upload(&receipt);
                self.selected = 0;
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Uploaded {} file(s)", receipt.queued.len()));
                services.notify(message, NotificationLevel::Success);
            }
            Err(e) => services.notify(e.to_string(), NotificationLevel::Error),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.uploader.staged().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        let input_block = theme::block("File path", self.editing);
        let input_inner = input_block.inner(rows[0]);
        let text = if self.path.text().is_empty() && !self.editing {
            Span::styled("press i to type a path", theme::muted())
        } else {
            Span::raw(self.path.display().into_owned())
        };
        frame.render_widget(Paragraph::new(text).block(input_block), rows[0]);
        if self.editing {
            frame.set_cursor_position(Position::new(
                input_inner.x + self.path.cursor_column().min(input_inner.width as usize) as u16,
                input_inner.y,
            ));
        }

        let staged = self.uploader.staged();
        let title = format!(
            "Selected files ({}, {})",
            staged.len(),
            format_size(self.uploader.total_bytes())
        );
        let block = theme::block(&title, !self.editing);
        if staged.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No files selected.", theme::muted())).block(block),
                rows[1],
            );
        } else {
            let items: Vec<ListItem> = staged
                .iter()
                .map(|s| {
                    ListItem::new(Line::from(vec![
                        Span::raw(s.file.file_name.as_str()),
                        Span::styled(
                            format!("  {} · {}", s.file.mime_type, format_size(s.file.size())),
                            theme::muted(),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(theme::highlight())
                .highlight_symbol("▸ ");
            let mut state = ListState::default().with_selected(Some(self.selected));
            frame.render_stateful_widget(list, rows[1], &mut state);
        }

        let status = if self.uploader.is_uploading() {
            Span::styled(" Uploading…", Style::default().fg(theme::INFO))
        } else {
            Span::styled(" Ctrl+U upload · x remove · c clear", theme::key_hint())
        };
        frame.render_widget(Paragraph::new(status), rows[2]);
    }
}

impl Default for UploadState {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/a.pdf"), PathBuf::from("/tmp/a.pdf"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/a.pdf"), home.join("a.pdf"));
        }
    }
}
