//! Detail overlay rendering.
//!
//! Displays a modal overlay with the selected node's status, raw facts,
//! members, parents and incident edges.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use topowatch_types::{EntityFacts, MappingFacts, NodeData};

use crate::app::App;
use crate::data::ResolvedNode;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the selected node's detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref data) = app.data else {
        return;
    };
    let Some(node) = app.selected_node() else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7), // Status and facts
        Constraint::Min(8),    // Edges
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let mut header_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", node.display_name()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({} {})", node.kind().short_label(), node.id),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Runtime: "),
            Span::styled(
                node.status.runtime.as_str(),
                app.theme.runtime_style(node.status.runtime),
            ),
            Span::raw("    Operational: "),
            Span::styled(
                node.status.operational.as_str(),
                app.theme.operational_style(node.status.operational),
            ),
            Span::raw("    Source: "),
            Span::styled(
                node.status.source.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    header_lines.extend(fact_lines(node));

    let parents = data.parents(&node.id);
    if !parents.is_empty() {
        header_lines.push(Line::from(format!(" Member of: {}", parents.join(", "))));
    }

    let header_block = Block::default()
        .title(" Node Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== EDGES =====
    let edges: Vec<_> = data.incident_edges(&node.id).collect();
    let edges_block = Block::default()
        .title(format!(" Edges ({}) ", edges.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if edges.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No edges touch this node",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(edges_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(vec!["Edge", "Style", "Description"])
            .height(1)
            .style(app.theme.header);
        let rows: Vec<Row> = edges
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(e.id.clone()),
                    Cell::from(e.style.describe()).style(app.theme.edge_style(&e.style)),
                    Cell::from(e.describe()),
                ])
            })
            .collect();
        let widths = [
            Constraint::Fill(1),
            Constraint::Length(16),
            Constraint::Fill(3),
        ];
        let table = Table::new(rows, widths).header(header).block(edges_block);
        frame.render_widget(table, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}

fn fact_lines(node: &ResolvedNode) -> Vec<Line<'static>> {
    match &node.data {
        NodeData::Group(_) => vec![Line::from(format!(
            " Children: {}",
            list_or_dash(&node.members)
        ))],
        NodeData::Combiner(composite) | NodeData::AssetMapper(composite) => vec![
            Line::from(format!(" Sources: {}", list_or_dash(&node.members))),
            Line::from(format!(" Mappings: {}", mappings(&composite.mappings))),
        ],
        NodeData::Unknown(unknown) => vec![Line::from(format!(
            " Unrecognized type: {}",
            unknown.type_name.as_deref().unwrap_or("-")
        ))],
        data => match data.as_entity() {
            Some((_, facts)) => entity_lines(facts),
            None => Vec::new(),
        },
    }
}

fn entity_lines(facts: &EntityFacts) -> Vec<Line<'static>> {
    let connection = facts
        .connection
        .map(|c| format!("{:?}", c))
        .unwrap_or_else(|| "-".to_string());
    let runtime = facts
        .runtime
        .map(|r| format!("{:?}", r))
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![Line::from(format!(
        " Connection: {}    Process: {}    Mappings: {}",
        connection,
        runtime,
        mappings(&facts.mappings)
    ))];
    if let Some(ref message) = facts.message {
        lines.push(Line::from(format!(" Message: {}", message)));
    }
    lines
}

fn mappings(facts: &MappingFacts) -> String {
    if facts.faulted > 0 {
        format!("{} enabled, {} faulted", facts.enabled, facts.faulted)
    } else {
        format!("{} enabled", facts.enabled)
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
