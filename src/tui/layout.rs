//! Root layout computation for header + tab bar + main content + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the bordered header.
pub const HEADER_HEIGHT: u16 = 3;
/// Hide the tab bar below this terminal height.
pub const HIDE_TABS_THRESHOLD: u16 = 10;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Title and welcome line.
    pub header: Rect,
    /// Tab bar (None when signed out or the terminal is very short).
    pub tabs: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    /// Compute layout regions from the terminal area.
    ///
    /// `show_tabs`: whether a session exists and the tab bar should be drawn.
    pub fn compute(area: Rect, show_tabs: bool) -> Self {
        let show_tabs = show_tabs && area.height >= HIDE_TABS_THRESHOLD;

        let rows = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(if show_tabs { 1 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        AppLayout {
            header: rows[0],
            tabs: show_tabs.then_some(rows[1]),
            main: rows[2],
            status: rows[3],
        }
    }
}

/// Split a view into an upper list and a lower results pane.
pub fn split_list_and_detail(area: Rect) -> (Rect, Rect) {
    let rows = Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);
    (rows[0], rows[1])
}
