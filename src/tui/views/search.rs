//! Search view: keyword search and sentiment filter over document excerpts.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::super::theme;
use crate::api::{Excerpt, Sentiment};
use crate::core::{Dashboard, ExcerptPanel, ExcerptQuery};
use crate::tui::events::{BackendEvent, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::{InputBuffer, InputOutcome};

pub struct SearchState {
    keyword: InputBuffer,
    editing: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            keyword: InputBuffer::new(),
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn reset(&mut self) {
        self.keyword.clear();
        self.editing = false;
    }

    pub fn handle_input(&mut self, event: &Event, dashboard: &mut Dashboard, services: &Services) -> bool {
        if self.editing {
            if let Event::Paste(text) = event {
                self.keyword.insert_str(text);
                return true;
            }
        }

        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.editing {
            match self.keyword.handle_key(key) {
                InputOutcome::Submit => match ExcerptQuery::keyword(self.keyword.text()) {
                    Ok(query) => {
                        self.editing = false;
                        run_query(query, dashboard, services);
                    }
                    Err(message) => services.notify(message, NotificationLevel::Warning),
                },
                InputOutcome::Cancel => self.editing = false,
                InputOutcome::Edited | InputOutcome::Ignored => {}
            }
            return true;
        }

        let sentiment = match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Enter) => {
                self.editing = true;
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Char('p')) => Sentiment::Positive,
            (KeyModifiers::NONE, KeyCode::Char('n')) => Sentiment::Negative,
            (KeyModifiers::NONE, KeyCode::Char('u')) => Sentiment::Neutral,
            _ => return false,
        };
        run_query(ExcerptQuery::Sentiment(sentiment), dashboard, services);
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

        let input_block = theme::block("Keyword", self.editing);
        let input_inner = input_block.inner(rows[0]);
        let text = if self.keyword.text().is_empty() && !self.editing {
            Span::styled("press / to type a keyword", theme::muted())
        } else {
            Span::raw(self.keyword.display().into_owned())
        };
        frame.render_widget(Paragraph::new(text).block(input_block), rows[0]);
        if self.editing {
            frame.set_cursor_position(Position::new(
                input_inner.x + self.keyword.cursor_column().min(input_inner.width as usize) as u16,
                input_inner.y,
            ));
        }

        let hints = Line::from(vec![
            Span::styled(" Filter by sentiment: ", theme::muted()),
            Span::styled("p", theme::highlight()),
            Span::raw(" positive  "),
            Span::styled("n", theme::highlight()),
            Span::raw(" negative  "),
            Span::styled("u", theme::highlight()),
            Span::raw(" neutral"),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[1]);

        render_excerpts(frame, rows[2], &dashboard.excerpts, !self.editing);
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Start an excerpt query on a background task.
pub fn run_query(query: ExcerptQuery, dashboard: &mut Dashboard, services: &Services) {
    log::debug!("Running excerpt query: {query}");
    dashboard.begin_excerpts(query.clone());
    services.spawn(move |backend| async move {
        let result = query.run(backend.as_ref()).await;
        BackendEvent::Excerpts { query, result }
    });
}

/// Draw the latest excerpt results. Empty sections are omitted.
pub fn render_excerpts(frame: &mut Frame, area: Rect, panel: &ExcerptPanel, focused: bool) {
    let title = match panel.query() {
        Some(query) => format!("Results for {query}"),
        None => "Results".to_string(),
    };
    let block = theme::block(&title, focused);

    let mut lines: Vec<Line> = Vec::new();
    if panel.is_loading() {
        lines.push(Line::from(Span::styled("Loading…", theme::muted())));
    }
    if let Some(err) = panel.error() {
        lines.push(Line::from(Span::styled(err, Style::default().fg(theme::ERROR))));
    }
    if panel.show_sentences() {
        push_section(&mut lines, "Filtered Sentences", &panel.results().sentences);
    }
    if panel.show_paragraphs() {
        push_section(&mut lines, "Filtered Paragraphs", &panel.results().paragraphs);
    }
    if lines.is_empty() && panel.query().is_some() {
        lines.push(Line::from(Span::styled("No matching excerpts.", theme::muted())));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn push_section<'a>(lines: &mut Vec<Line<'a>>, heading: &'a str, excerpts: &'a [Excerpt]) {
    if !lines.is_empty() {
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        heading,
        theme::heading().add_modifier(Modifier::UNDERLINED),
    )));
    for excerpt in excerpts {
        let badge = match excerpt.sentiment {
            Some(s) => Span::styled(
                format!("[{}] ", s.label()),
                Style::default().fg(theme::sentiment_color(Some(s))),
            ),
            None => Span::raw("• "),
        };
        lines.push(Line::from(vec![badge, Span::raw(excerpt.content.as_str())]));
    }
}
