/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for debounce, notification TTLs, and result polling.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowHelp,
    CloseHelp,
    /// Put a word on the system clipboard.
    CopyWord(String),
    Quit,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
