//! Crypto Monitor - Current Bitcoin price in the terminal
//!
//! A terminal UI application that fetches the Bitcoin ticker on demand and
//! falls back to the last cached price when the network call fails.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use cryptomonitor::app::App;
use cryptomonitor::cli::{Cli, StartupConfig};
use cryptomonitor::data::TickerClient;
use cryptomonitor::logging::setup_logging;
use cryptomonitor::refresh::RefreshHandle;
use cryptomonitor::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the ticker screen and, if open, the help overlay
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_ticker_view(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Runs a single refresh without the TUI and prints what would be on screen
///
/// Returns `true` if a price (live or cached) was shown.
async fn run_once(app: &mut App, refresh: &mut RefreshHandle) -> bool {
    let request_id = refresh.request();
    app.begin_refresh(request_id);

    if let Some(message) = refresh.recv().await {
        app.handle_message(message);
    }

    for notification in &app.notifications {
        eprintln!("{}", notification.message);
    }
    for region in [&app.asset_label, &app.price, &app.timestamp]
        .into_iter()
        .flatten()
    {
        println!("{}", region);
    }

    app.has_price()
}

/// Main event loop: render, poll keys, start fetches, drain finished ones
fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh: &mut RefreshHandle,
) -> io::Result<()> {
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.refresh_requested {
            let request_id = refresh.request();
            app.begin_refresh(request_id);
        }

        // Apply finished fetches on this thread only
        while let Some(message) = refresh.try_recv() {
            app.handle_message(message);
        }

        app.on_tick(Instant::now());

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if let Err(e) = setup_logging(config.log_level, config.log_file.as_deref()) {
        eprintln!("warning: logging disabled: {}", e);
    }
    info!("Using ticker endpoint {}", config.endpoint);

    let mut app = App::new(config.cache_store());
    let mut refresh = RefreshHandle::new(TickerClient::with_url(config.endpoint.as_str()));

    if config.once {
        let shown = run_once(&mut app, &mut refresh).await;
        return Ok(if shown {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if config.refresh_on_start {
        app.refresh_requested = true;
    }

    let result = run_tui(&mut terminal, &mut app, &mut refresh);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        error!("Terminal error: {}", e);
    }
    result?;
    info!("Exiting");

    Ok(ExitCode::SUCCESS)
}
