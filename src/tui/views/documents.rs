//! Documents view: the user's collection plus the detail panel of the
//! selected document.
//!
//! `j`/`k` move through the list, `s` loads a summary, `w` loads keywords.
//! With keywords loaded, `h`/`l` pick one, `d` defines it and `a` finds
//! related articles. The lower pane shows whichever of detail or search
//! results was used last.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::super::theme;
use super::search::render_excerpts;
use crate::core::{
    ActiveView, ArticlesView, Dashboard, DefinitionLookup, DetailPanel, KeywordsView, SummaryView,
};
use crate::tui::events::{BackendEvent, NotificationLevel};
use crate::tui::layout::split_list_and_detail;
use crate::tui::services::Services;

pub struct DocumentsState {
    refreshing: bool,
}

impl DocumentsState {
    pub fn new() -> Self {
        Self { refreshing: false }
    }

    /// Fetch the document list for the signed-in user.
    pub fn load(&mut self, services: &Services) {
        match services.session().user_id() {
            Some(user_id) => {
                self.refreshing = true;
                services.request_documents(user_id);
            }
            None => services.notify(
                "No valid user ID found. Please log in again.",
                NotificationLevel::Warning,
            ),
        }
    }

    pub fn on_loaded(&mut self) {
        self.refreshing = false;
    }

    pub fn handle_input(&mut self, event: &Event, dashboard: &mut Dashboard, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                dashboard.documents.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                dashboard.documents.select_prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('s') | KeyCode::Enter) => {
                request_summary(dashboard, services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('w')) => {
                request_keywords(dashboard, services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => {
                if let Some(panel) = dashboard.detail_mut() {
                    panel.next_keyword();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('h') | KeyCode::Left) => {
                if let Some(panel) = dashboard.detail_mut() {
                    panel.prev_keyword();
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                request_definition(dashboard, services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('a')) => {
                request_articles(dashboard, services);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let (list_area, detail_area) = split_list_and_detail(area);
        self.render_list(frame, list_area, dashboard);

        match dashboard.active() {
            ActiveView::Excerpts => render_excerpts(frame, detail_area, &dashboard.excerpts, false),
            ActiveView::Detail(_) => match dashboard.detail() {
                Some(panel) => render_detail(frame, detail_area, panel),
                None => render_hint(frame, detail_area),
            },
            ActiveView::None => render_hint(frame, detail_area),
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let docs = &dashboard.documents;
        let title = if self.refreshing {
            format!("Your documents ({}) · refreshing…", docs.len())
        } else {
            match docs.last_refreshed() {
                Some(at) => format!("Your documents ({}) · {}", docs.len(), at.format("%H:%M:%S")),
                None => format!("Your documents ({})", docs.len()),
            }
        };
        let block = theme::block(&title, true);

        if docs.is_empty() {
            let text = Paragraph::new(Span::styled(
                "No documents yet. Upload some from the Upload tab.",
                theme::muted(),
            ))
            .block(block);
            frame.render_widget(text, area);
            return;
        }

        let items: Vec<ListItem> = docs
            .documents()
            .iter()
            .map(|doc| {
                let label = doc.sentiment.map(|s| s.label()).unwrap_or("pending");
                ListItem::new(Line::from(vec![
                    Span::raw(doc.filename.as_str()),
                    Span::raw("  "),
                    Span::styled(
                        format!("[{label}]"),
                        Style::default().fg(theme::sentiment_color(doc.sentiment)),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::highlight())
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(docs.selected_index()));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for DocumentsState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Requests ────────────────────────────────────────────────────────────────

fn selected_filename(dashboard: &Dashboard, services: &Services) -> Option<String> {
    let name = dashboard.documents.selected().map(|d| d.filename.clone());
    if name.is_none() {
        services.notify("Select a document first.", NotificationLevel::Info);
    }
    name
}

fn request_summary(dashboard: &mut Dashboard, services: &Services) {
    let Some(filename) = selected_filename(dashboard, services) else {
        return;
    };
    let panel = dashboard.open_detail(&filename);
    panel.begin_summary();
    let generation = panel.generation();
    let handle = services.spawn(move |backend| async move {
        let result = backend.summary(&filename).await;
        BackendEvent::Summary { generation, result }
    });
    panel.scope_mut().track(&handle);
}

fn request_keywords(dashboard: &mut Dashboard, services: &Services) {
    let Some(filename) = selected_filename(dashboard, services) else {
        return;
    };
    let panel = dashboard.open_detail(&filename);
    panel.begin_keywords();
    let generation = panel.generation();
    let handle = services.spawn(move |backend| async move {
        let result = backend.keywords(&filename).await;
        BackendEvent::Keywords { generation, result }
    });
    panel.scope_mut().track(&handle);
}

fn selected_keyword(dashboard: &mut Dashboard, services: &Services) -> Option<String> {
    let keyword = dashboard
        .detail()
        .and_then(DetailPanel::selected_keyword)
        .map(str::to_string);
    if keyword.is_none() {
        services.notify("Load keywords with w first.", NotificationLevel::Info);
    }
    keyword
}

fn request_definition(dashboard: &mut Dashboard, services: &Services) {
    let Some(keyword) = selected_keyword(dashboard, services) else {
        return;
    };
    let Some(panel) = dashboard.detail_mut() else {
        return;
    };
    match panel.lookup_definition(&keyword) {
        DefinitionLookup::Cached(_) | DefinitionLookup::Pending => {}
        DefinitionLookup::Fetch => {
            let generation = panel.generation();
            let handle = services.spawn(move |backend| async move {
                let result = backend.definition(&keyword).await;
                BackendEvent::Definition {
                    generation,
                    keyword,
                    result,
                }
            });
            panel.scope_mut().track(&handle);
        }
    }
}

fn request_articles(dashboard: &mut Dashboard, services: &Services) {
    let Some(keyword) = selected_keyword(dashboard, services) else {
        return;
    };
    let Some(panel) = dashboard.detail_mut() else {
        return;
    };
    panel.begin_articles(&keyword);
    let generation = panel.generation();
    let handle = services.spawn(move |backend| async move {
        let result = backend.related_articles(&keyword).await;
        BackendEvent::Articles {
            generation,
            keyword,
            result,
        }
    });
    panel.scope_mut().track(&handle);
}

// ── Rendering ───────────────────────────────────────────────────────────────

fn render_hint(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::styled(
            "Select a document and press s for a summary or w for keywords.",
            theme::muted(),
        )),
    ])
    .block(theme::block("Details", false))
    .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

fn render_detail(frame: &mut Frame, area: Rect, panel: &DetailPanel) {
    let block = theme::block(panel.filename(), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(inner);

    // Left: summary + keywords
    let mut left: Vec<Line> = vec![Line::from(Span::styled("Summary", theme::heading()))];
    match panel.summary() {
        SummaryView::NotLoaded => left.push(Line::from(Span::styled("press s", theme::muted()))),
        SummaryView::Loading => left.push(Line::from(Span::styled("Loading…", theme::muted()))),
        SummaryView::Unavailable => left.push(Line::from(Span::styled(
            panel.summary().text().unwrap_or_default(),
            Style::default().fg(theme::ERROR),
        ))),
        SummaryView::Ready(text) => left.push(Line::raw(text.as_str())),
    }
    left.push(Line::raw(""));
    left.push(Line::from(Span::styled("Keywords", theme::heading())));
    match panel.keywords().message() {
        Some(message) => left.push(Line::from(Span::styled(message, theme::muted()))),
        None if panel.keywords().keywords().is_empty() => {
            let hint = if matches!(panel.keywords(), KeywordsView::Loading) {
                "Loading…"
            } else {
                "press w"
            };
            left.push(Line::from(Span::styled(hint, theme::muted())));
        }
        None => {
            let spans: Vec<Span> = panel
                .keywords()
                .keywords()
                .iter()
                .enumerate()
                .flat_map(|(i, kw)| {
                    let style = if i == panel.keyword_cursor() {
                        theme::highlight().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default().fg(theme::PRIMARY_LIGHT)
                    };
                    [Span::styled(format!(" {kw} "), style), Span::raw(" ")]
                })
                .collect();
            left.push(Line::from(spans));
        }
    }
    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);

    // Right: definition + related articles for the selected keyword
    let mut right: Vec<Line> = Vec::new();
    if let Some(keyword) = panel.selected_keyword() {
        right.push(Line::from(Span::styled(format!("Definition of {keyword}"), theme::heading())));
        match panel.definition(keyword) {
            Some(def) => right.push(Line::raw(def)),
            None => right.push(Line::from(Span::styled("press d", theme::muted()))),
        }
        right.push(Line::raw(""));
    }
    match panel.articles() {
        ArticlesView::Idle => {}
        ArticlesView::Loading { keyword } => {
            right.push(Line::from(Span::styled(format!("Articles for {keyword}"), theme::heading())));
            right.push(Line::from(Span::styled("Loading…", theme::muted())));
        }
        ArticlesView::Loaded { keyword, links } => {
            right.push(Line::from(Span::styled(format!("Articles for {keyword}"), theme::heading())));
            if links.is_empty() {
                right.push(Line::from(Span::styled(
                    panel.articles().message().unwrap_or_default(),
                    theme::muted(),
                )));
            }
            for link in links {
                right.push(Line::from(Span::styled(
                    format!("• {link}"),
                    Style::default().fg(theme::INFO).add_modifier(Modifier::UNDERLINED),
                )));
            }
        }
        ArticlesView::Failed { keyword } => {
            right.push(Line::from(Span::styled(format!("Articles for {keyword}"), theme::heading())));
            right.push(Line::from(Span::styled(
                panel.articles().message().unwrap_or_default(),
                Style::default().fg(theme::ERROR),
            )));
        }
    }
    if let Some(err) = panel.error().filter(|e| Some(*e) != panel.articles().message()) {
        right.push(Line::raw(""));
        right.push(Line::from(Span::styled(err, Style::default().fg(theme::ERROR))));
    }
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: true }), cols[1]);
}
