use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use hospitalia_core::ledger::FormField;

use crate::app::App;
use crate::ui::styles;

/// Width of the label column, "Saldo Anterior" plus padding.
const LABEL_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| render_field(app, *field))
        .collect();

    let block = Block::default()
        .title(" Nueva entrada ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_field(app: &App, field: FormField) -> Line<'static> {
    let focused = app.focus == field;
    let value = app.form.get(field).to_string();

    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };

    let mut spans = vec![
        Span::styled(
            format!(" {:<width$}", field.label(), width = LABEL_WIDTH),
            styles::highlight_style(),
        ),
        Span::styled(format!("{}{}", value, cursor), style),
    ];

    // Numeric fields that will be counted as zero
    if field.is_numeric() && app.form.amount(field).is_invalid() {
        spans.push(Span::styled("  (no es un número: cuenta como 0)", styles::error_style()));
    }

    Line::from(spans)
}
