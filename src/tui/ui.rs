//! Stateless rendering of the 4x4 board and control bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::App;
use crate::store::records::{Cell, PlayerIcon};

/// Draws the whole client frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(19),    // Board
            Constraint::Length(3),  // Control + status
            Constraint::Length(1),  // Key help
        ])
        .split(area);

    let seat_label = match app.view().seat {
        Some(seat) => format!("Quadtac - {seat}"),
        None => "Quadtac".to_string(),
    };
    let title = Paragraph::new(seat_label)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);
    draw_control_bar(frame, chunks[2], app);

    let help = Paragraph::new("arrows/hjkl move | enter claim cell | space button | q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let board_area = center_rect(area, 4 * 8 + 3, 4 * 4 + 3);

    let mut row_constraints = Vec::new();
    for row in 0..4 {
        row_constraints.push(Constraint::Length(4));
        if row < 3 {
            row_constraints.push(Constraint::Length(1));
        }
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(board_area);

    for row in 0..4u8 {
        draw_row(frame, rows[(row as usize) * 2], app, row);
        if row < 3 {
            draw_separator(frame, rows[(row as usize) * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, app: &App, row: u8) {
    let mut col_constraints = Vec::new();
    for col in 0..4 {
        col_constraints.push(Constraint::Length(8));
        if col < 3 {
            col_constraints.push(Constraint::Length(1));
        }
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(col_constraints)
        .split(area);

    for col in 0..4u8 {
        if let Some(cell) = Cell::new(row * 4 + col) {
            draw_cell(frame, cols[(col as usize) * 2], app, cell);
        }
        if col < 3 {
            draw_separator_vertical(frame, cols[(col as usize) * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, app: &App, cell: Cell) {
    let board = &app.view().board;

    let (symbol, base_style) = match board.icon_at(cell) {
        None => (
            format!("{:2}", cell.index()),
            Style::default().fg(Color::DarkGray),
        ),
        Some(PlayerIcon::O) => (
            " O".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Some(PlayerIcon::X) => (
            " X".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if board.is_winning(cell) {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if cell == app.cursor() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let widget = Paragraph::new(Line::from(Span::styled(symbol, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).style(style));
    frame.render_widget(widget, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_control_bar(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(0)])
        .split(area);

    let control = app.view().control;
    let button_style = if control.enabled {
        Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(format!(" {} ", control.label))
        .style(button_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, chunks[0]);

    let status = Paragraph::new(app.status_line())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[1]);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
