use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::components::{EMPTY, palette_color};
use crate::engine::Snapshot;
use crate::game::{FIELD_HEIGHT, FIELD_WIDTH};

// Each cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;
const BOARD_WIDTH: u16 = FIELD_WIDTH as u16 * CELL_WIDTH + 2; // +2 for borders
const BOARD_HEIGHT: u16 = FIELD_HEIGHT as u16 + 2;
const INFO_WIDTH: u16 = 24;

/// Draws the whole game screen from one engine snapshot.
pub fn render(f: &mut Frame, app: &App) {
    let min_total_width = BOARD_WIDTH + INFO_WIDTH;
    let min_total_height = BOARD_HEIGHT + 2;

    if f.area().width < min_total_width || f.area().height < min_total_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(warning_text, centered_rect(100, 50, f.area()));
        return;
    }

    // One lock for the whole frame
    let snapshot = app.engine.snapshot();

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Length(INFO_WIDTH)])
        .flex(Flex::Center)
        .split(f.area());

    let board_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(BOARD_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, board_layout[0]);

    render_board(f, &snapshot, board_layout[1]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(8),
        ])
        .split(main_layout[1]);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let music = match &app.audio {
        Some(audio) if audio.is_music_enabled() => {
            format!("on {:.0}%", audio.get_volume() * 100.0)
        }
        _ => "off".to_string(),
    };
    let stats = Paragraph::new(format!(
        "Score: {}\nLevel: {}\nLines: {}\nMusic: {music}",
        snapshot.score, snapshot.level, snapshot.lines_cleared
    ))
    .wrap(Wrap { trim: true });
    f.render_widget(stats, info_layout[1]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move\n\
        ↑: Rotate\n\
        ↓ (hold): Soft drop\n\
        M: Music on/off\n\
        +/-: Volume\n\
        R: Restart\n\
        Q: Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[2]);
}

fn render_board(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    for row in 0..FIELD_HEIGHT {
        for col in 0..FIELD_WIDTH {
            let index = snapshot.color(row, col);
            let (symbol, color) = if index == EMPTY {
                ("·", palette_color(EMPTY))
            } else {
                ("█", palette_color(index))
            };

            let x = inner_area.left() + col as u16 * CELL_WIDTH;
            let y = inner_area.top() + row as u16;
            for dx in 0..CELL_WIDTH {
                if let Some(cell) = f.buffer_mut().cell_mut((x + dx, y)) {
                    cell.set_symbol(if index == EMPTY && dx == 1 { " " } else { symbol });
                    cell.set_fg(color);
                    cell.set_bg(Color::Black);
                }
            }
        }
    }

    if snapshot.game_over {
        let overlay = centered_rect(80, 20, inner_area);
        f.render_widget(Clear, overlay);
        let game_over = Paragraph::new("GAME OVER\nR to restart")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(game_over, overlay);
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
