//! Indigo & teal color theme for the Smart Document Analyzer TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::api::Sentiment;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo: primary accent, active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x55, 0x6C, 0xD6);
/// Light indigo: highlights, hints.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x8C, 0x9B, 0xE6);

// ── Secondary ───────────────────────────────────────────────────────────────

/// Teal: secondary accent, selected rows, badges.
pub const SECONDARY: Color = Color::Rgb(0x19, 0x85, 0x7B);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Near-black base background (badge text).
pub const BG_BASE: Color = Color::Rgb(0x12, 0x14, 0x1F);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Muted text: secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Dim text: disabled items, faint hints, unfocused borders.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Error: failures.
pub const ERROR: Color = Color::Rgb(0xFF, 0x17, 0x44);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

/// Color used for a sentiment label; unclassified documents are muted.
pub fn sentiment_color(sentiment: Option<Sentiment>) -> Color {
    match sentiment {
        Some(Sentiment::Positive) => SUCCESS,
        Some(Sentiment::Negative) => ERROR,
        Some(Sentiment::Neutral) => INFO,
        None => TEXT_MUTED,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Focused border style.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Unfocused border style.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Insert mode badge.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(SECONDARY)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block styled for whether it has focus.
pub fn block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            border_focused()
        } else {
            border_default()
        })
}
