//! Terminal display host for the thesaurus search.

pub mod app;
pub mod clipboard;
pub mod events;
pub mod theme;
pub mod views;
pub mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::AppConfig;
use crate::core::thesaurus::QueryController;
use app::AppState;
use views::search::SearchView;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the interactive search until the user quits.
///
/// The terminal is restored before returning, whether the loop ended
/// normally or with an error.
pub async fn run(config: &AppConfig, controller: QueryController) -> io::Result<()> {
    let search = SearchView::new(
        controller,
        config.search.mode,
        Duration::from_millis(config.search.debounce_ms),
    );
    let mut app = AppState::new(search);

    let mouse = config.tui.mouse_enabled;
    let mut terminal = setup_terminal(mouse)?;

    let result = app.run(&mut terminal, config.tick_rate()).await;
    app.shutdown();

    let restored = restore_terminal(&mut terminal, mouse);
    if let Err(ref e) = result {
        log::error!("TUI loop failed: {}", e);
    }
    result.and(restored)
}

fn setup_terminal(mouse: bool) -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Tui, mouse: bool) -> io::Result<()> {
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
