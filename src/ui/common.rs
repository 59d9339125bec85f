//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with a topology overview.
///
/// Displays: overall indicator, per-axis counts, diagnostic count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(" TOPOWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let counts = data.counts();
    let diagnostics = data.graph.diagnostics.len();

    let indicator_style = if counts.runtime_error > 0 || counts.operational_error > 0 {
        Style::default()
            .fg(app.theme.error)
            .add_modifier(Modifier::BOLD)
    } else if counts.runtime_active > 0 {
        Style::default().fg(app.theme.success)
    } else {
        Style::default().fg(app.theme.neutral)
    };

    let count_span = |n: usize, style: Style| {
        if n > 0 {
            Span::styled(n.to_string(), style)
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(" ● ", indicator_style),
        Span::styled("TOPOWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ runtime "),
        count_span(counts.runtime_active, Style::default().fg(app.theme.success)),
        Span::raw(" up "),
        count_span(
            counts.runtime_error,
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" err │ flowing "),
        count_span(
            counts.operational_active,
            Style::default().fg(app.theme.success),
        ),
        Span::raw(" faulted "),
        count_span(
            counts.operational_error,
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            counts.total.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" nodes "),
        Span::raw(format!("{} edges", data.edges.len())),
        if diagnostics > 0 {
            Span::styled(
                format!(" │ {} issues", diagnostics),
                Style::default().fg(app.theme.warning),
            )
        } else {
            Span::raw("")
        },
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let diagnostics = app.diagnostics().len();
    let titles: Vec<Line> = vec![
        Line::from(" 1:Nodes "),
        Line::from(" 2:Edges "),
        Line::from(format!(" 3:Diagnostics ({}) ", diagnostics)),
    ];

    let selected = match app.current_view {
        View::Nodes => 0,
        View::Edges => 1,
        View::Diagnostics => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: breadcrumb trail, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();
        let breadcrumb = app.breadcrumb();

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Nodes => "/:search s:sort S:reverse Enter:detail ?:help q:quit",
                View::Edges => "/:search Enter:go to status node ?:help q:quit",
                View::Diagnostics => "Enter:go to node Tab:switch ?:help q:quit",
            }
        };

        let source_error = app
            .load_error
            .as_deref()
            .map(|e| format!(" | {}", e))
            .unwrap_or_default();

        format!(
            " {} | {} | Updated {:.1}s ago{} | {}",
            breadcrumb,
            app.source_description(),
            elapsed.as_secs_f64(),
            source_error,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2/3       Nodes/Edges/Diagnostics"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Detail / go to node"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Nodes & Edges"),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        section(" Legend"),
        Line::from("  green/red/gray   runtime up/error/down"),
        Line::from("  ●───▶            data flowing"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 29u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
