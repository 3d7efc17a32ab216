use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use super::clipboard::Clipboard;
use super::events::{Action, AppEvent, Notification, NotificationLevel};
use super::theme;
use super::views::search::{FocusZone, SearchView, ViewResult};

/// Ticks a notification stays on screen.
const NOTIFICATION_TTL_TICKS: u32 = 100;
/// Notifications visible at once; older ones are dropped first.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// The search view; the only view this app has.
    pub search: SearchView,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Held for the session so copied words outlive the copy action.
    clipboard: Clipboard,
}

impl AppState {
    pub fn new(search: SearchView) -> Self {
        Self {
            running: true,
            search,
            notifications: Vec::new(),
            show_help: false,
            clipboard: Clipboard::new(),
        }
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
                    self.handle_event(AppEvent::Tick);
                }
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(crossterm_event)) => self.handle_event(AppEvent::Input(crossterm_event)),
                    Some(Err(e)) => return Err(e),
                    None => self.running = false,
                },
            }
        }

        Ok(())
    }

    /// Abort outstanding work before the terminal is restored.
    pub fn shutdown(&mut self) {
        self.search.shutdown();
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Search view
                match self.search.handle_input(&crossterm_event) {
                    Some(ViewResult::Consumed) => return,
                    Some(ViewResult::Copy(word)) => {
                        self.handle_action(Action::CopyWord(word));
                        return;
                    }
                    None => {}
                }

                // Priority 3: Global keybindings
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Tick => self.on_tick(),
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
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    /// Keys the search view left unhandled.
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
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::CopyWord(word) => match self.clipboard.copy(&word) {
                Ok(()) => self.push_notification(
                    NotificationLevel::Info,
                    "Copied to clipboard".to_string(),
                    word,
                ),
                Err(e) => {
                    log::warn!("Copy failed: {}", e);
                    self.push_notification(
                        NotificationLevel::Warning,
                        "Could not copy word".to_string(),
                        e.to_string(),
                    );
                }
            },
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by title and message, max 3).
    pub fn push_notification(&mut self, level: NotificationLevel, title: String, message: String) {
        if self
            .notifications
            .iter()
            .any(|n| n.title == title && n.message == message)
        {
            return;
        }

        self.notifications.push(Notification {
            title,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll the search.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        for failure in self.search.poll() {
            self.push_notification(NotificationLevel::Error, failure.title, failure.message);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.search.render(frame, main);
        self.render_status_bar(frame, status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let state = self.search.state();
        let search_status = if state.is_loading {
            Span::styled(" SEARCHING ", theme::loading_badge())
        } else {
            Span::styled(
                format!("{} entries", state.results.len()),
                Style::default().fg(theme::TEXT_MUTED),
            )
        };

        let mut spans = vec![
            Span::styled(" THESAURUS ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                self.search.mode().label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            search_status,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":mode "),
        ];
        if self.search.focus() == FocusZone::Results {
            spans.extend([
                Span::styled("y", theme::key_hint()),
                Span::raw(":copy "),
                Span::styled("/", theme::key_hint()),
                Span::raw(":search "),
                Span::styled("?", theme::key_hint()),
                Span::raw(":help "),
                Span::styled("q", theme::key_hint()),
                Span::raw(":quit"),
            ]);
        } else {
            spans.extend([
                Span::styled("↓", theme::key_hint()),
                Span::raw(":results "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":clear/quit"),
            ]);
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(area.height);
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1.min(area.height.saturating_sub(height));
        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = theme::notification_style(n.level);
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::styled(n.title.as_str(), Style::default().fg(color)),
                    Span::raw(": "),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 70, area);

        let keybindings = [
            ("Search bar:", ""),
            ("type", "Search (after a short pause)"),
            ("Enter", "Search now"),
            ("Ctrl+W / Ctrl+U", "Delete word / clear"),
            ("Down", "Move to results"),
            ("Esc", "Clear query, quit when empty"),
            ("", ""),
            ("Results:", ""),
            ("j/k", "Move selection"),
            ("g / G", "First / last word"),
            ("Enter / y", "Copy word"),
            ("/ or i", "Back to search bar"),
            ("", ""),
            ("Global:", ""),
            ("Tab / Shift+Tab", "Next / previous list mode"),
            ("?", "Toggle this help"),
            ("q / Ctrl+C", "Quit"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
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

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
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
