use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

use super::{form, styles, table};

/// Shortcut hint shown on the right of the status bar.
const SHORTCUTS: &str = "[Enter] add | [Ctrl+L] clear | [Ctrl+E] export | [F1] help | [Esc] quit";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(9), // Form
            Constraint::Min(5),    // Table
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    form::render(frame, app, chunks[1]);
    table::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Hospitalia · Registro de Finanzas";
    let help_hint = "[F1] Ayuda";
    let title_len = title.chars().count();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (left_text, left_style) = match app.status_message {
        Some(ref msg) if app.status_is_error => (format!(" {} ", msg), styles::error_style()),
        Some(ref msg) => (format!(" {} ", msg), styles::success_style()),
        None => (
            format!(" {} entries ", app.ledger.rows().len()),
            styles::muted_style(),
        ),
    };
    let right_text = format!(" {} ", SHORTCUTS);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 20, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            "         Hospitalia Finance Tracker",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Form", styles::highlight_style())),
        help_line("Tab / ↓", "Next field"),
        help_line("S-Tab / ↑", "Previous field"),
        help_line("Backspace", "Delete last character"),
        help_line("Enter", "Add entry to the table"),
        Line::from(""),
        Line::from(Span::styled(" Table", styles::highlight_style())),
        help_line("PgUp/PgDn", "Scroll entries"),
        help_line("Ctrl+L", "Clear table and totals"),
        help_line("Ctrl+E", "Export to spreadsheet"),
        help_line("Esc", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(Span::styled(
            "   Unexported entries will be lost.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
