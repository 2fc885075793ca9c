//! Terminal client for the BlacknWhite game server.

use anyhow::Result;
use blacknwhite_tui::cli::Cli;
use blacknwhite_tui::{
    App, BOARD_SIZE, Color, Command, GameEvent, HttpGameClient, TurnController, ui,
};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to a file so the alternate screen stays clean.
    let log_file = std::fs::File::create(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!(server_url = %cli.server_url, "Starting BlacknWhite TUI");

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let api = HttpGameClient::new(cli.server_url.clone());
    let controller = TurnController::new(
        Box::new(api),
        Duration::from_millis(cli.ai_delay_ms),
        event_tx,
    );
    let controller_handle = tokio::spawn(async move {
        if let Err(e) = controller.run(cmd_rx).await {
            error!(error = %e, "Controller error");
        }
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(), cmd_tx, &mut event_rx).await;

    controller_handle.abort();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

/// UI loop: draw, drain controller events, translate input into commands.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    cmd_tx: mpsc::UnboundedSender<Command>,
    event_rx: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    let mut layout = ui::BoardLayout::new(Rect::default(), BOARD_SIZE);

    loop {
        terminal.draw(|f| layout = ui::draw(f, &app))?;

        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // A pending notice blocks input until dismissed.
                    if app.dismiss_notice() {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            cmd_tx.send(Command::SelectColor(Color::Black))?;
                        }
                        KeyCode::Char('w') | KeyCode::Char('W') => {
                            cmd_tx.send(Command::SelectColor(Color::White))?;
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => cmd_tx.send(Command::Pass)?,
                        KeyCode::Char('r') | KeyCode::Char('R') => cmd_tx.send(Command::Reset)?,
                        KeyCode::Char('u') | KeyCode::Char('U') => cmd_tx.send(Command::Refresh)?,
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            cmd_tx.send(Command::CellClick(app.cursor()))?;
                        }
                        code @ (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right) => {
                            app.move_cursor(code);
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    if app.dismiss_notice() {
                        continue;
                    }
                    // Only clicks on a rendered cell map to a coordinate.
                    if let Some(coord) = layout.coord_at(mouse.column, mouse.row) {
                        cmd_tx.send(Command::CellClick(coord))?;
                    }
                }
                _ => {}
            }
        }
    }
}
