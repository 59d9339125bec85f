//! Edges view rendering.
//!
//! Each edge shows its color token by name and a flow glyph: a marker
//! travelling along the line for animated edges, a plain line otherwise.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;

const FLOW_WIDTH: usize = 8;

/// Flow glyph for one frame.
///
/// Static edges draw a plain line; animated edges move a marker one cell
/// per frame, wrapping around.
pub fn flow_glyph(animated: bool, frame: usize, width: usize) -> String {
    if !animated || width == 0 {
        return "─".repeat(width);
    }
    let marker = frame % width;
    (0..width)
        .map(|i| if i == marker { '●' } else { '─' })
        .collect()
}

/// Render the Edges view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(total) = app.data.as_ref().map(|d| d.edges.len()) else {
        return;
    };
    let edges = app.visible_edges();
    let tick = app.frame();

    let header = Row::new(vec![
        "Source", "", "Target", "Color", "Runtime", "Operational",
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = edges
        .iter()
        .map(|e| {
            let style = app.theme.edge_style(&e.style);
            let runtime = e.runtime().map(|s| s.as_str()).unwrap_or("-");
            let operational = e.operational().map(|s| s.as_str()).unwrap_or("-");
            let glyph = format!("{}▶", flow_glyph(e.style.animated, tick, FLOW_WIDTH));

            Row::new(vec![
                Cell::from(e.source.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(glyph).style(style),
                Cell::from(e.target.clone()),
                Cell::from(e.style.color.name()).style(style),
                Cell::from(runtime),
                Cell::from(operational),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(FLOW_WIDTH as u16 + 1),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let selected = app.selected_edge_index.min(edges.len().saturating_sub(1));
    let animated = edges.iter().filter(|e| e.style.animated).count();

    let filter_info = if !app.filter_text.is_empty() {
        format!(" /{}/", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " Edges ({}/{}, {} flowing){} ",
        edges.len(),
        total,
        animated,
        filter_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
