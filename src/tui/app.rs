use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, BackendEvent, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::documents::DocumentsState;
use super::views::login::LoginState;
use super::views::search::SearchState;
use super::views::upload::UploadState;
use crate::auth::User;
use crate::core::Dashboard;

/// Maximum notifications shown at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused tab.
    pub focus: Focus,
    /// Sign-in screen state (shown while no session exists).
    pub login: LoginState,
    /// Per-session document state shared by the tabs.
    pub dashboard: Dashboard,
    pub documents: DocumentsState,
    pub upload: UploadState,
    pub search: SearchState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Documents,
            login: LoginState::new(&services),
            dashboard: Dashboard::new(),
            documents: DocumentsState::new(),
            upload: UploadState::new(),
            search: SearchState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Sign in with a token supplied outside the UI (command line).
    pub fn sign_in_with(&mut self, credential: &str) -> Option<User> {
        let user = self
            .login
            .submit(credential, &mut self.dashboard, &self.services)?;
        self.on_signed_in();
        Some(user)
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Select next event
            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Ctrl+C always quits
                if is_ctrl_c(&crossterm_event) {
                    self.running = false;
                    return;
                }

                // Priority 2: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 3: Login screen owns all input while signed out
                if !self.is_signed_in() {
                    if self
                        .login
                        .handle_input(&crossterm_event, &mut self.dashboard, &self.services)
                        .is_some()
                    {
                        self.on_signed_in();
                    }
                    return;
                }

                // Priority 4: Focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 5: Global keybindings
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Backend(event) => self.handle_backend_event(event),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn handle_backend_event(&mut self, event: BackendEvent) {
        if !self.is_signed_in() {
            log::debug!("Dropping backend result after sign-out");
            return;
        }
        let services = &self.services;

        match event {
            BackendEvent::DocumentsLoaded { user_id, result } => {
                self.documents.on_loaded();
                if !is_current_user(services, &user_id) {
                    log::debug!("Dropping document list for a previous user");
                    return;
                }
                if let Err(e) = self.dashboard.documents.apply_refresh(result) {
                    services.notify(
                        format!("Could not refresh documents: {e}"),
                        NotificationLevel::Warning,
                    );
                }
            }
            BackendEvent::FileRead { user_id, result } => {
                if is_current_user(services, &user_id) {
                    self.upload.on_file_read(result, services);
                } else {
                    log::debug!("Dropping staged file for a previous user");
                }
            }
            BackendEvent::UploadFinished { user_id, result } => {
                if is_current_user(services, &user_id) {
                    self.upload
                        .on_upload_finished(result, &mut self.dashboard, services);
                } else {
                    log::debug!("Dropping upload result for a previous user");
                }
            }
            BackendEvent::Summary { generation, result } => {
                if let Some(panel) = self.dashboard.detail_for(generation) {
                    if let Err(message) = panel.apply_summary(result) {
                        services.notify(message, NotificationLevel::Error);
                    }
                }
            }
            BackendEvent::Keywords { generation, result } => {
                if let Some(panel) = self.dashboard.detail_for(generation) {
                    if let Err(message) = panel.apply_keywords(result) {
                        services.notify(message, NotificationLevel::Error);
                    }
                }
            }
            BackendEvent::Definition {
                generation,
                keyword,
                result,
            } => {
                if let Some(panel) = self.dashboard.detail_for(generation) {
                    if let Err(message) = panel.apply_definition(&keyword, result) {
                        services.notify(message, NotificationLevel::Error);
                    }
                }
            }
            BackendEvent::Articles {
                generation,
                keyword,
                result,
            } => {
                if let Some(panel) = self.dashboard.detail_for(generation) {
                    if let Err(message) = panel.apply_articles(&keyword, result) {
                        services.notify(message, NotificationLevel::Error);
                    }
                }
            }
            BackendEvent::Excerpts { query, result } => {
                if let Err(message) = self.dashboard.apply_excerpts(&query, result) {
                    services.notify(message, NotificationLevel::Error);
                }
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Documents => {
                self.documents
                    .handle_input(event, &mut self.dashboard, &self.services)
            }
            Focus::Upload => self.upload.handle_input(event, &self.services),
            Focus::Search => self
                .search
                .handle_input(event, &mut self.dashboard, &self.services),
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Char('L') => Some(Action::Logout),
                KeyCode::Char('R') => Some(Action::RefreshDocuments),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    Focus::ALL.get(index).map(|f| f.to_action())
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusDocuments => self.focus = Focus::Documents,
            Action::FocusUpload => self.focus = Focus::Upload,
            Action::FocusSearch => self.focus = Focus::Search,
            Action::TabNext => self.focus = self.focus.next(),
            Action::TabPrev => self.focus = self.focus.prev(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::RefreshDocuments => self.documents.load(&self.services),
            Action::Logout => self.logout(),
        }
    }

    fn is_signed_in(&self) -> bool {
        self.services.session().is_authenticated()
    }

    fn on_signed_in(&mut self) {
        self.focus = Focus::Documents;
        self.upload.reset();
        self.search.reset();
        self.documents.load(&self.services);
    }

    fn logout(&mut self) {
        let user = self.dashboard.sign_out(&self.services.gate);
        self.upload.reset();
        self.search.reset();
        self.documents = DocumentsState::new();
        self.login = LoginState::new(&self.services);
        if user.is_some() {
            self.push_notification("Signed out".to_string(), NotificationLevel::Info);
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            ..Notification::new(message, level)
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let signed_in = self.is_signed_in();

        let layout = AppLayout::compute(area, signed_in);

        self.render_header(frame, layout.header);

        if let Some(tabs_area) = layout.tabs {
            self.render_tabs(frame, tabs_area);
        }

        if signed_in {
            self.render_content(frame, layout.main);
        } else {
            self.login.render(frame, layout.main);
        }

        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = Paragraph::new(Span::styled(
            " Smart Document Analyzer",
            Style::default()
                .fg(theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(title, inner);

        if let Some(user) = self.services.session().current() {
            let welcome = Paragraph::new(Span::styled(
                format!("Welcome, {}! ", user.display_name()),
                Style::default().fg(theme::SECONDARY),
            ))
            .alignment(Alignment::Right);
            frame.render_widget(welcome, inner);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Focus::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| Line::from(format!(" {} {} ", i + 1, f.label())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.focus.index())
            .style(theme::muted())
            .highlight_style(theme::highlight().add_modifier(Modifier::REVERSED))
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        match self.focus {
            Focus::Documents => self.documents.render(frame, area, &self.dashboard),
            Focus::Upload => self.upload.render(frame, area),
            Focus::Search => self.search.render(frame, area, &self.dashboard),
        }
    }

    fn is_editing(&self) -> bool {
        match self.focus {
            Focus::Upload => self.upload.is_editing(),
            Focus::Search => self.search.is_editing(),
            Focus::Documents => false,
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode_indicator = if self.is_signed_in() && self.is_editing() {
            Span::styled(" INSERT ", theme::insert_badge())
        } else {
            Span::raw("")
        };

        let screen = if self.is_signed_in() {
            self.focus.label()
        } else {
            "Sign in"
        };

        let status = Line::from(vec![
            Span::styled(" SMARTDOC ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                screen,
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":nav "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("L", theme::key_hint()),
            Span::raw(":logout "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height).intersection(area);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q", "Quit application"),
            ("Ctrl+C", "Force quit"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous tab"),
            ("1-3", "Jump to tab by number"),
            ("R", "Refresh documents"),
            ("L", "Sign out"),
            ("", ""),
            ("Documents:", ""),
            ("j/k", "Move selection"),
            ("s / Enter", "Summarize selected document"),
            ("w", "Extract keywords"),
            ("h/l", "Pick keyword"),
            ("d", "Define keyword"),
            ("a", "Related articles for keyword"),
            ("r", "Refresh list"),
            ("", ""),
            ("Upload:", ""),
            ("i", "Edit file path"),
            ("Enter", "Add file to selection"),
            ("Esc", "Stop editing"),
            ("j/k, x", "Select / remove file"),
            ("c", "Clear selection"),
            ("Ctrl+U", "Upload selected files"),
            ("", ""),
            ("Search:", ""),
            ("/", "Edit keyword, Enter to search"),
            ("p / n / u", "Positive / negative / neutral excerpts"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::SECONDARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::heading())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).bold(),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::SECONDARY));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Whether a result started for `user_id` still belongs to the open session.
fn is_current_user(services: &Services, user_id: &str) -> bool {
    services.session().user_id().as_deref() == Some(user_id)
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
