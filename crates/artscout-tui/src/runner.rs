// TUI event loop and terminal management
use crate::app::{Action, App};
use artscout_core::{CatalogSource, Explorer, Query};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{debug, warn};

pub async fn run_tui<C: CatalogSource>(app: App, explorer: Explorer<C>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, &explorer).await;

    // Restore terminal even when the loop bailed out
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: Backend, C: CatalogSource>(
    terminal: &mut Terminal<B>,
    mut app: App,
    explorer: &Explorer<C>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| crate::ui::render(f, &app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::Search => {
                app.begin_search();
                // Show the loading state before blocking on the network
                terminal.draw(|f| crate::ui::render(f, &app))?;

                let query = Query::new(app.search_input.as_str(), app.page_size);
                let outcome = explorer.search(&query).await;
                app.apply_search(outcome);
                load_page(&mut app, explorer).await;
            }
            Action::LoadPage => load_page(&mut app, explorer).await,
            Action::Open(url) => {
                debug!("Opening {}", url);
                if let Err(e) = open::that(&url) {
                    warn!("Failed to open {}: {}", url, e);
                    app.error_message = Some(format!("Failed to open browser: {}", e));
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn load_page<C: CatalogSource>(app: &mut App, explorer: &Explorer<C>) {
    let Some(results) = app.results.as_ref() else {
        return;
    };
    let view = explorer
        .load_page(results, app.page_size, app.page_state)
        .await;
    app.set_page(view);
}
