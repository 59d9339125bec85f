//! Nodes view rendering.
//!
//! Displays every node with its two status axes side by side, so neither
//! depends on color to be read.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::ResolvedNode;

/// Column to sort by in the Nodes view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Kind,
    Runtime,
    Operational,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::Kind,
            SortColumn::Kind => SortColumn::Runtime,
            SortColumn::Runtime => SortColumn::Operational,
            SortColumn::Operational => SortColumn::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Kind => "type",
            SortColumn::Runtime => "runtime",
            SortColumn::Operational => "operational",
        }
    }
}

/// Render the Nodes view as a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(total) = app.data.as_ref().map(|d| d.nodes().len()) else {
        return;
    };
    let nodes = app.visible_nodes();

    let header = Row::new(vec![
        Cell::from(format_header("Node", SortColumn::Name, app)),
        Cell::from(format_header("Type", SortColumn::Kind, app)),
        Cell::from(format_header("Runtime", SortColumn::Runtime, app)),
        Cell::from(format_header("Operational", SortColumn::Operational, app)),
        Cell::from("Source"),
        Cell::from("Members"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = nodes
        .iter()
        .map(|n| {
            let members = if n.kind().is_composite() {
                n.members.len().to_string()
            } else {
                "-".to_string()
            };
            Row::new(vec![
                Cell::from(n.display_name().to_string()),
                Cell::from(n.kind().short_label()),
                Cell::from(n.status.runtime.as_str())
                    .style(app.theme.runtime_style(n.status.runtime)),
                Cell::from(n.status.operational.as_str())
                    .style(app.theme.operational_style(n.status.operational)),
                Cell::from(n.status.source.as_str()),
                Cell::from(members),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Min(9),
        Constraint::Min(12),
        Constraint::Min(14),
        Constraint::Min(8),
    ];

    let selected = app.selected_node_index.min(nodes.len().saturating_sub(1));
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !nodes.is_empty() {
        format!(" [{}/{}]", selected + 1, nodes.len())
    } else {
        String::new()
    };

    let title = format!(
        " Nodes ({}/{}) [s:sort {}{}]{}{} ",
        nodes.len(),
        total,
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
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

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort nodes by the given column and direction, ties broken by id.
pub fn sort_nodes_by(nodes: &mut [&ResolvedNode], column: SortColumn, ascending: bool) {
    nodes.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => a.display_name().cmp(b.display_name()),
            SortColumn::Kind => a.kind().cmp(&b.kind()),
            SortColumn::Runtime => a.status.runtime.cmp(&b.status.runtime),
            SortColumn::Operational => a.status.operational.cmp(&b.status.operational),
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        primary.then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::resolve;
    use topowatch_types::{ConnectionState, TopologySnapshot};

    #[test]
    fn sort_column_cycles() {
        let mut column = SortColumn::default();
        for _ in 0..4 {
            column = column.next();
        }
        assert_eq!(column, SortColumn::Name);
    }

    #[test]
    fn sort_by_runtime_descending_puts_errors_first() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a", |f| f.connected().started())
            .adapter("b", |f| f.connection(ConnectionState::Error))
            .adapter("c", |f| f)
            .build();
        let graph = resolve(&snapshot);
        let mut nodes: Vec<&ResolvedNode> = graph.nodes.iter().collect();

        sort_nodes_by(&mut nodes, SortColumn::Runtime, false);

        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
