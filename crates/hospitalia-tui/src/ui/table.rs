use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use hospitalia_core::ledger::LedgerRow;
use hospitalia_core::utils::truncate_string;

use crate::app::App;
use crate::ui::styles;

/// Column widths, in LedgerRow::COLUMNS order.
const COLUMN_WIDTHS: [u16; 9] = [12, 16, 16, 16, 18, 20, 18, 10, 18];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.ledger.rows();

    if rows.is_empty() {
        let block = Block::default()
            .title(" Entradas ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            " Sin entradas. Complete el formulario y presione Enter.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(
        LedgerRow::COLUMNS
            .iter()
            .map(|name| Cell::from(*name).style(styles::highlight_style())),
    );

    let body: Vec<Row> = rows
        .iter()
        .skip(app.table_scroll)
        .map(|row| {
            Row::new(
                row.cells()
                    .iter()
                    .zip(COLUMN_WIDTHS)
                    .map(|(cell, width)| Cell::from(truncate_string(cell, width as usize))),
            )
            .style(styles::list_item_style())
        })
        .collect();

    let totals = app.ledger.totals();
    let format = app.ledger.format();
    let footer = Line::from(vec![
        Span::styled(" Totales: ", styles::totals_style()),
        Span::styled(
            format!(
                "ingresos {}  egresos {}  saldo anterior {}  balance {}  dólares {} ",
                format.primary.format(totals.income()),
                format.primary.format(totals.expense()),
                format.primary.format(totals.prior_balance()),
                format.primary.format(totals.balance()),
                format.secondary.format(totals.dollars()),
            ),
            styles::totals_style(),
        ),
    ]);

    let block = Block::default()
        .title(format!(" Entradas ({}) ", rows.len()))
        .title_style(styles::title_style())
        .title_bottom(footer)
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let table = Table::new(body, COLUMN_WIDTHS.map(Constraint::Length))
        .header(header)
        .block(block);

    frame.render_widget(table, area);
}
