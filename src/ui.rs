//! UI rendering using ratatui.
//!
//! Rendering is a pure function of the [`App`] state: drawing the same
//! state twice produces the same frame. No turn decisions are made here.

mod board;

pub use board::{BoardLayout, render_board};

use crate::app::App;
use crate::board::BoardSnapshot;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// Builds the status line for a snapshot.
pub fn status_line(snapshot: &BoardSnapshot) -> String {
    let mut line = format!(
        "Turn: {} | White: {} Black: {}",
        snapshot.current_turn, snapshot.white_count, snapshot.black_count
    );
    if snapshot.game_over {
        line.push_str(" | Game Over!");
    }
    line
}

/// End-of-game summary derived from the final counts.
fn winner_line(snapshot: &BoardSnapshot) -> Option<String> {
    use crate::board::Color::{Black, White};
    if !snapshot.game_over {
        return None;
    }
    let summary = match snapshot.winner() {
        Some(White) => "White wins!",
        Some(Black) => "Black wins!",
        None => "It's a tie!",
    };
    Some(summary.to_string())
}

/// Draws a full frame.
///
/// Returns the [`BoardLayout`] the grid was placed with, so the input loop
/// can hit-test mouse clicks against exactly what is on screen.
pub fn draw(f: &mut Frame, app: &App) -> BoardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("BlacknWhite")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let layout = BoardLayout::new(chunks[1], app.board_size());
    render_board(f, &layout, app);

    let status = match app.snapshot() {
        Some(snapshot) => {
            let mut lines = vec![Line::from(status_line(snapshot))];
            if let Some(winner) = winner_line(snapshot) {
                lines.push(Line::from(winner));
            }
            Paragraph::new(lines)
        }
        None => Paragraph::new("Connecting to server..."),
    };
    let status = status
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let (bottom_text, bottom_style) = match (app.notice(), app.claimed()) {
        (Some(notice), _) => (
            format!("{notice} (press any key)"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        (None, None) => (
            "Press B to play Black, W to play White | Q: quit".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        (None, Some(_)) => (
            "Arrows: move | Enter: place piece | P: pass | R: reset | U: refresh | Q: quit"
                .to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let bottom = Paragraph::new(bottom_text)
        .style(bottom_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(bottom, chunks[3]);

    layout
}
