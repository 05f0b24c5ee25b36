//! Login view: shown whenever no session exists.
//!
//! The identity provider runs in the browser. The user opens the sign-in URL,
//! copies the returned ID token, and pastes it here.

use crossterm::event::{Event, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::super::theme;
use crate::auth::{generate_nonce, User};
use crate::core::Dashboard;
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::{InputBuffer, InputOutcome};

pub struct LoginState {
    token: InputBuffer,
    sign_in_url: Option<String>,
    error: Option<String>,
}

impl LoginState {
    pub fn new(services: &Services) -> Self {
        let sign_in_url = services
            .identity
            .as_ref()
            .map(|provider| provider.sign_in_url(&generate_nonce()));
        Self {
            token: InputBuffer::masked(),
            sign_in_url,
            error: None,
        }
    }

    /// Accept a credential and populate the session. The caller starts the
    /// document fetch.
    pub fn submit(
        &mut self,
        credential: &str,
        dashboard: &mut Dashboard,
        services: &Services,
    ) -> Option<User> {
        dashboard.reset();
        match services.gate.sign_in(credential.trim()) {
            Ok(user) => {
                self.error = None;
                self.token.clear();
                services.notify(
                    format!("Signed in as {}", user.display_name()),
                    NotificationLevel::Success,
                );
                Some(user)
            }
            Err(e) => {
                let message = format!("Sign-in failed: {e}");
                services.notify(message.clone(), NotificationLevel::Error);
                self.error = Some(message);
                None
            }
        }
    }

    /// Returns the signed-in user once Enter succeeds.
    pub fn handle_input(
        &mut self,
        event: &Event,
        dashboard: &mut Dashboard,
        services: &Services,
    ) -> Option<User> {
        match event {
            Event::Paste(text) => {
                self.token.insert_str(text);
                None
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => match self.token.handle_key(key) {
                InputOutcome::Submit if !self.token.is_empty() => {
                    let credential = self.token.text().to_string();
                    self.submit(&credential, dashboard, services)
                }
                // Esc clears the field; Esc on an empty field abandons the
                // provider flow.
                InputOutcome::Cancel if !self.token.is_empty() => {
                    self.token.clear();
                    self.error = None;
                    None
                }
                InputOutcome::Cancel => {
                    let err = services.gate.fail("sign-in cancelled");
                    self.error = Some(err.to_string());
                    None
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Sign in", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Sign in with Google to analyze your documents.",
                theme::heading(),
            )))
            .alignment(Alignment::Center),
            rows[0],
        );

        let url_lines = match &self.sign_in_url {
            Some(url) => vec![
                Line::from(Span::styled("1. Open this URL in a browser:", theme::muted())),
                Line::from(Span::styled(url.as_str(), Style::default().fg(theme::PRIMARY_LIGHT))),
                Line::raw(""),
                Line::from(Span::styled(
                    "2. Paste the returned ID token below and press Enter.",
                    theme::muted(),
                )),
            ],
            None => vec![
                Line::from(Span::styled(
                    "No OAuth client id configured (auth.client_id).",
                    Style::default().fg(theme::WARNING),
                )),
                Line::from(Span::styled(
                    "Paste an ID token below and press Enter.",
                    theme::muted(),
                )),
            ],
        };
        frame.render_widget(Paragraph::new(url_lines).wrap(Wrap { trim: false }), rows[1]);

        let input_block = theme::block("ID token", true);
        let input_inner = input_block.inner(rows[2]);
        frame.render_widget(
            Paragraph::new(self.token.display().into_owned()).block(input_block),
            rows[2],
        );
        frame.set_cursor_position(Position::new(
            input_inner.x + self.token.cursor_column().min(input_inner.width as usize) as u16,
            input_inner.y,
        ));

        if let Some(ref err) = self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                ))
                .wrap(Wrap { trim: true }),
                rows[3],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    use crate::auth::{AuthGate, SessionStore};
    use crate::tests::mocks::{test_token, MockBackend};

    fn services() -> Services {
        let (tx, _rx) = mpsc::unbounded_channel();
        Services::new(
            Arc::new(MockBackend::new()),
            AuthGate::new(SessionStore::new()),
            None,
            tx,
        )
    }

    fn esc() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
    }

    #[test]
    fn test_esc_clears_typed_token() {
        let services = services();
        let mut dashboard = Dashboard::new();
        let mut login = LoginState::new(&services);
        login.handle_input(&Event::Paste("half-a-tok".into()), &mut dashboard, &services);

        assert!(login.handle_input(&esc(), &mut dashboard, &services).is_none());
        assert!(login.token.is_empty());
        assert!(login.error.is_none());
    }

    #[test]
    fn test_esc_on_empty_field_reports_provider_failure() {
        let services = services();
        let mut dashboard = Dashboard::new();
        let mut login = LoginState::new(&services);
        services.gate.sign_in(&test_token()).unwrap();

        assert!(login.handle_input(&esc(), &mut dashboard, &services).is_none());
        assert!(services.session().current().is_none());
        assert_eq!(login.error.as_deref(), Some("Sign-in failed: sign-in cancelled"));
    }
}
