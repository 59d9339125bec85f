use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::Severity;

/// Render the diagnostics list, most severe first.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.data.is_none() {
        return;
    }
    let diagnostics = app.diagnostics();

    if diagnostics.is_empty() {
        render_clean_message(frame, app, area);
        return;
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Warning)
        .count();

    let header = Row::new(vec!["Level", "Node", "Problem"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = diagnostics
        .iter()
        .map(|d| {
            let style = app.theme.severity_style(d.severity());
            Row::new(vec![
                Cell::from(d.severity().symbol()).style(style),
                Cell::from(d.node_id().unwrap_or("-").to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(d.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Fill(3),
    ];

    let selected = app
        .selected_diagnostic_index
        .min(diagnostics.len().saturating_sub(1));

    let title = format!(
        " Diagnostics ({} err, {} warn) [Enter:go to node] [{}/{}] ",
        errors,
        warnings,
        selected + 1,
        diagnostics.len()
    );

    let border_color = if errors > 0 {
        app.theme.error
    } else if warnings > 0 {
        app.theme.warning
    } else {
        app.theme.border
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border_color)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_clean_message(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Diagnostics ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.success));

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled("    ✓ ", Style::default().fg(app.theme.success)),
            Span::styled(
                "Topology is consistent",
                Style::default()
                    .fg(app.theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "      No cycles, duplicate ids or dangling members.",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
