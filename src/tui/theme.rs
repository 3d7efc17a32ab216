//! Teal & Coral color theme for the thesaurus TUI.
//!
//! RGB truecolor throughout. Views take colors and styles from here.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use super::events::NotificationLevel;
use crate::core::thesaurus::ListMode;

// ── Palette ─────────────────────────────────────────────────────────────────

/// Teal: focused borders, headings.
pub const PRIMARY: Color = Color::Rgb(0x00, 0x80, 0x80);
/// Light teal: key names, the active mode.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x00, 0x96, 0x88);
/// Coral: selection and titles.
pub const ACCENT: Color = Color::Rgb(0xFF, 0x7F, 0x50);
/// Charcoal base, used as badge foreground.
pub const BG_BASE: Color = Color::Rgb(0x0A, 0x19, 0x19);

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

/// Synonym words: pale teal.
pub const SYNONYM: Color = Color::Rgb(0x80, 0xCB, 0xC4);
/// Antonym words: lavender.
pub const ANTONYM: Color = Color::Rgb(0xCE, 0x93, 0xD8);

// ── Semantic lookups ────────────────────────────────────────────────────────

/// Icon and color for a notification.
pub fn notification_style(level: NotificationLevel) -> (&'static str, Color) {
    match level {
        NotificationLevel::Info => ("ℹ", INFO),
        NotificationLevel::Warning => ("⚠", WARNING),
        NotificationLevel::Error => ("✗", ERROR),
    }
}

/// Row color for words listed in `mode`.
pub fn word_color(mode: ListMode) -> Color {
    match mode {
        ListMode::Entries => TEXT,
        ListMode::Synonyms | ListMode::Both => SYNONYM,
        ListMode::Antonyms => ANTONYM,
    }
}

// ── Styles ──────────────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section headers in the result list.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Selected row while the list has focus.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Placeholders and faint labels.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Shown in the status bar while a search is outstanding.
pub fn loading_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// Bordered block; teal when `focused`, dim otherwise.
pub fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border)
}
