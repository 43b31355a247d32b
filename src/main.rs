mod api;
mod app;
mod config;
mod theme;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenvy::dotenv;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;

use api::ApiClient;
use app::{App, AppMessage};
use config::Config;
use theme::Theme;
use ui::draw_ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env();
    let client = ApiClient::new(&config.api_url)?;
    let theme = Theme::load(&config.theme_file);
    let mut app = App::new(theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channel for background tasks
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Probe the backend once at startup, without blocking the UI
    {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client
                .check_health()
                .await
                .map(|health| health.status)
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::HealthChecked(result));
        });
    }

    // Run the app
    let res = run_app(&mut terminal, &mut app, &client, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ApiClient,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
) -> Result<()> {
    loop {
        // Check for messages from background tasks (non-blocking)
        while let Ok(msg) = rx.try_recv() {
            match msg {
                AppMessage::RecommendComplete { seq, result } => {
                    app.finish_request(seq, result);
                }
                AppMessage::HealthChecked(result) => {
                    app.record_health(result);
                }
            }
        }

        // Draw UI
        terminal.draw(|f| draw_ui(f, app))?;

        // Handle input with timeout - only read ONE event per loop iteration
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, ignore release and repeat
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.toggle_theme();
                    }
                    KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.open_selected();
                    }
                    KeyCode::Enter => {
                        // submit() refuses blank input and re-entry while loading
                        if let Some((seq, query)) = app.submit() {
                            let client = client.clone();
                            let tx_clone = tx.clone();
                            tokio::spawn(async move {
                                let result = client
                                    .get_recommendations(&query)
                                    .await
                                    .map(|response| response.recommendations)
                                    .map_err(|e| e.to_string());
                                let _ = tx_clone
                                    .send(AppMessage::RecommendComplete { seq, result });
                            });
                        }
                    }
                    KeyCode::Down => {
                        app.next_result();
                    }
                    KeyCode::Up => {
                        app.previous_result();
                    }
                    KeyCode::Char(c) if !app.is_loading() => {
                        app.input.push(c);
                    }
                    KeyCode::Backspace if !app.is_loading() => {
                        app.input.pop();
                    }
                    KeyCode::Esc if !app.is_loading() => {
                        app.input.clear();
                    }
                    _ => {}
                }
            }
        }
    }
}
