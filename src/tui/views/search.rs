//! Search view: the search bar, the result list, and the sense detail pane.
//!
//! Typing marks the query dirty; the view submits it to the
//! [`QueryController`] once the debounce interval passes without another
//! edit, or immediately on Enter. Rows are a pure projection of the
//! controller's results through the current [`ListMode`], so switching
//! modes never issues a request.
//!
//! Keys:
//! - Search bar: type to search, Enter to search now, Down to reach the list
//! - List: j/k to move, Enter or `y` to copy the word, `/` to edit the query
//! - Tab / Shift+Tab cycle the list mode

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::super::theme;
use crate::core::thesaurus::{
    flatten, Entry, ListMode, QueryController, SearchFailure, SearchOutcome, SearchState,
};
use crate::tui::widgets::input_buffer::InputBuffer;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ── Projection ──────────────────────────────────────────────────────────────

/// One selectable line in the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub subtitle: Option<String>,
    /// Index of the entry this row came from.
    pub entry: usize,
}

impl Row {
    /// Text placed on the clipboard by the copy-word action.
    pub fn copy_text(&self) -> &str {
        &self.title
    }
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub subtitle: Option<String>,
    pub rows: Vec<Row>,
}

fn non_empty(label: &str) -> Option<String> {
    (!label.is_empty()).then(|| label.to_string())
}

/// Project results into display sections for `mode`.
///
/// `Entries` yields a single "Results" section with one row per entry.
/// The word modes yield one section per entry with one row per flattened word.
pub fn build_sections(results: &[Entry], mode: ListMode) -> Vec<Section> {
    let Some(kind) = mode.word_kind() else {
        let rows = results
            .iter()
            .enumerate()
            .map(|(idx, entry)| Row {
                title: entry.word.clone(),
                subtitle: non_empty(&entry.label),
                entry: idx,
            })
            .collect();
        return vec![Section {
            title: "Results".to_string(),
            subtitle: Some(results.len().to_string()),
            rows,
        }];
    };

    results
        .iter()
        .enumerate()
        .map(|(idx, entry)| Section {
            title: entry.word.clone(),
            subtitle: non_empty(&entry.label),
            rows: flatten(entry, kind)
                .into_iter()
                .map(|word| Row {
                    title: word.to_string(),
                    subtitle: None,
                    entry: idx,
                })
                .collect(),
        })
        .collect()
}

// ── Focus zones ─────────────────────────────────────────────────────────────

/// Which part of the view has keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusZone {
    /// Typing edits the query.
    Search,
    /// j/k move the selection, Enter/y copy.
    Results,
}

/// What a handled key asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewResult {
    Consumed,
    /// Copy this word to the clipboard.
    Copy(String),
}

// ── State ────────────────────────────────────────────────────────────────────

pub struct SearchView {
    controller: QueryController,
    input: InputBuffer,
    focus: FocusZone,
    mode: ListMode,
    sections: Vec<Section>,
    /// Index into the flattened rows of all sections.
    selected: usize,
    spinner_frame: usize,

    // ── Debounce state ──────────────────────────────────────────────
    debounce: Duration,
    /// True when the query has changed but hasn't been submitted yet.
    search_pending: bool,
    last_search_edit: Option<Instant>,
}

impl SearchView {
    pub fn new(controller: QueryController, mode: ListMode, debounce: Duration) -> Self {
        let sections = build_sections(&controller.state().results, mode);
        Self {
            controller,
            input: InputBuffer::new(),
            focus: FocusZone::Search,
            mode,
            sections,
            selected: 0,
            spinner_frame: 0,
            debounce,
            search_pending: false,
            last_search_edit: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        self.controller.state()
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn focus(&self) -> FocusZone {
        self.focus
    }

    pub fn query_text(&self) -> &str {
        self.input.text()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_search_pending(&self) -> bool {
        self.search_pending
    }

    /// The currently selected row, if any.
    pub fn selected_row(&self) -> Option<&Row> {
        self.rows().nth(self.selected)
    }

    fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    pub fn set_mode(&mut self, mode: ListMode) {
        if self.mode != mode {
            log::debug!("List mode: {} -> {}", self.mode, mode);
            self.mode = mode;
            self.selected = 0;
            self.rebuild_sections();
        }
    }

    /// Abort any outstanding request.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    // ── Tick ────────────────────────────────────────────────────────────

    /// Fire a due debounced search and apply finished requests. Call from on_tick.
    ///
    /// Returns the failures that should be reported to the user.
    pub fn poll(&mut self) -> Vec<SearchFailure> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Vec<SearchFailure> {
        if self.search_pending {
            if let Some(ts) = self.last_search_edit {
                if now.saturating_duration_since(ts) >= self.debounce {
                    self.submit_now(false);
                }
            }
        }

        if self.controller.state().is_loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }

        let mut failures = Vec::new();
        let mut changed = false;
        for outcome in self.controller.poll() {
            match outcome {
                SearchOutcome::Applied { .. } => changed = true,
                SearchOutcome::Failed(failure) => failures.push(failure),
                SearchOutcome::Stale | SearchOutcome::Cancelled | SearchOutcome::TimedOut => {}
            }
        }
        if changed {
            self.selected = 0;
            self.rebuild_sections();
        }
        failures
    }

    /// Mark the query as dirty, starting the debounce timer.
    fn mark_search_dirty(&mut self) {
        self.search_pending = true;
        self.last_search_edit = Some(Instant::now());
    }

    /// Submit the current text. Unless `force`d, text equal to the last
    /// submitted query is skipped; Enter forces so a failed search can be retried.
    fn submit_now(&mut self, force: bool) {
        self.search_pending = false;
        self.last_search_edit = None;

        let text = self.input.text();
        if !force && text == self.controller.query() {
            return;
        }
        self.controller.submit(text);
        if !self.controller.state().is_loading {
            // Empty queries resolve synchronously.
            self.selected = 0;
            self.rebuild_sections();
        }
    }

    fn rebuild_sections(&mut self) {
        self.sections = build_sections(&self.controller.state().results, self.mode);
        let count = self.row_count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> Option<ViewResult> {
        if let Event::Mouse(mouse) = event {
            return match mouse.kind {
                MouseEventKind::ScrollDown => {
                    self.select_next();
                    Some(ViewResult::Consumed)
                }
                MouseEventKind::ScrollUp => {
                    self.select_prev();
                    Some(ViewResult::Consumed)
                }
                _ => None,
            };
        }

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
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.set_mode(self.mode.next());
                return Some(ViewResult::Consumed);
            }
            (_, KeyCode::BackTab) => {
                self.set_mode(self.mode.prev());
                return Some(ViewResult::Consumed);
            }
            _ => {}
        }

        match self.focus {
            FocusZone::Search => self.handle_search_input(*code, *modifiers),
            FocusZone::Results => self.handle_results_input(*code, *modifiers),
        }
    }

    fn handle_search_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<ViewResult> {
        let edited = match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => self.input.delete_word_back(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.input.clear(),
            // Leave other chords (Ctrl+C) to the app.
            (KeyModifiers::CONTROL, _) | (KeyModifiers::ALT, _) => return None,
            (_, KeyCode::Char(c)) => self.input.insert_char(c),
            (_, KeyCode::Backspace) => self.input.backspace(),
            (_, KeyCode::Delete) => self.input.delete(),
            (_, KeyCode::Enter) => {
                self.submit_now(true);
                return Some(ViewResult::Consumed);
            }
            (_, KeyCode::Down) => {
                if self.row_count() > 0 {
                    self.focus = FocusZone::Results;
                }
                return Some(ViewResult::Consumed);
            }
            (_, KeyCode::Esc) => {
                if self.input.is_empty() {
                    // Esc on an empty bar falls through to quit.
                    return None;
                }
                self.input.clear();
                self.submit_now(true);
                return Some(ViewResult::Consumed);
            }
            (_, KeyCode::Left) => {
                self.input.move_left();
                false
            }
            (_, KeyCode::Right) => {
                self.input.move_right();
                false
            }
            (_, KeyCode::Home) => {
                self.input.move_home();
                false
            }
            (_, KeyCode::End) => {
                self.input.move_end();
                false
            }
            _ => false,
        };

        if edited {
            self.mark_search_dirty();
        }
        Some(ViewResult::Consumed)
    }

    fn handle_results_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<ViewResult> {
        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.select_next();
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                if self.selected == 0 {
                    self.focus = FocusZone::Search;
                } else {
                    self.select_prev();
                }
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.selected = 0;
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
                self.selected = self.row_count().saturating_sub(1);
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                self.selected = (self.selected + 10).min(self.row_count().saturating_sub(1));
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                self.selected = self.selected.saturating_sub(10);
                Some(ViewResult::Consumed)
            }
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('y')) => Some(
                self.selected_row()
                    .map(|row| ViewResult::Copy(row.copy_text().to_string()))
                    .unwrap_or(ViewResult::Consumed),
            ),
            (KeyModifiers::NONE, KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Esc) => {
                self.focus = FocusZone::Search;
                Some(ViewResult::Consumed)
            }
            _ => None,
        }
    }

    fn select_next(&mut self) {
        let count = self.row_count();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [search_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

        self.render_search_bar(frame, search_area);

        if self.mode == ListMode::Entries {
            let [list_area, detail_area] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(body);
            self.render_results(frame, list_area);
            self.render_detail(frame, detail_area);
        } else {
            self.render_results(frame, body);
        }
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusZone::Search;
        let title = if self.controller.state().is_loading {
            format!("{} {}", self.mode.label(), SPINNER[self.spinner_frame])
        } else {
            self.mode.label().to_string()
        };
        let block = theme::panel(&title, focused);
        let inner = block.inner(area);

        let line = if self.input.is_empty() {
            Line::from(Span::styled(self.mode.placeholder(), theme::dim()))
        } else {
            Line::from(Span::styled(
                self.input.text(),
                Style::default().fg(theme::TEXT),
            ))
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if focused && inner.width > 0 {
            let col = (self.input.cursor_column() as u16).min(inner.width - 1);
            frame.set_cursor_position(Position::new(inner.x + col, inner.y));
        }
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusZone::Results;
        let block = theme::panel("Words", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (lines, selected_line) = self.result_lines();
        if lines.is_empty() {
            let hint = if self.controller.state().is_loading {
                "Searching..."
            } else if self.input.is_empty() {
                "Type a word to look it up."
            } else {
                "No matches."
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(hint, theme::muted()))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let scroll = selected_line
            .map(|line| line.saturating_sub(height.saturating_sub(1)))
            .unwrap_or(0);
        frame.render_widget(
            Paragraph::new(lines).scroll((scroll as u16, 0)),
            inner,
        );
    }

    /// Lines for the result list and the line index of the selected row.
    fn result_lines(&self) -> (Vec<Line<'_>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut selected_line = None;
        let mut row_idx = 0;
        let row_color = theme::word_color(self.mode);

        for section in &self.sections {
            if section.rows.is_empty() && self.mode != ListMode::Entries {
                continue;
            }
            let mut header = vec![Span::styled(section.title.as_str(), theme::heading())];
            if let Some(ref subtitle) = section.subtitle {
                header.push(Span::raw("  "));
                header.push(Span::styled(subtitle.as_str(), theme::muted()));
            }
            lines.push(Line::from(header));

            for row in &section.rows {
                let is_selected = row_idx == self.selected;
                if is_selected {
                    selected_line = Some(lines.len());
                }
                let (marker, style) = if is_selected && self.focus == FocusZone::Results {
                    ("▸ ", theme::highlight())
                } else if is_selected {
                    ("▸ ", Style::default().fg(row_color).add_modifier(Modifier::BOLD))
                } else {
                    ("  ", Style::default().fg(row_color))
                };
                let mut spans = vec![
                    Span::styled(marker, theme::highlight()),
                    Span::styled(row.title.as_str(), style),
                ];
                if let Some(ref subtitle) = row.subtitle {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(subtitle.as_str(), theme::muted()));
                }
                lines.push(Line::from(spans));
                row_idx += 1;
            }
        }
        (lines, selected_line)
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel("Senses", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = self
            .selected_row()
            .and_then(|row| self.controller.state().results.get(row.entry))
        else {
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(entry.word.as_str(), theme::title()),
            Span::raw("  "),
            Span::styled(entry.label.as_str(), theme::muted()),
        ])];

        for (idx, sense) in entry.senses.iter().enumerate() {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", idx + 1), theme::heading()),
                Span::styled(sense.definition.as_str(), Style::default().fg(theme::TEXT)),
            ]));
            if !sense.synonyms.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("   syn: ", theme::dim()),
                    Span::styled(sense.synonyms.join(", "), Style::default().fg(theme::SYNONYM)),
                ]));
            }
            if !sense.antonyms.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("   ant: ", theme::dim()),
                    Span::styled(sense.antonyms.join(", "), Style::default().fg(theme::ANTONYM)),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
