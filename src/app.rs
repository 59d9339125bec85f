//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{export, Diagnostic, RenderedEdge, ResolvedNode, TopologyData};
use crate::source::SnapshotSource;
use crate::ui::nodes::{sort_nodes_by, SortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Node detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every node with its runtime and operational status.
    Nodes,
    /// Every edge with its color and animation.
    Edges,
    /// Problems found in the input graph.
    Diagnostics,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Nodes => View::Edges,
            View::Edges => View::Diagnostics,
            View::Diagnostics => View::Nodes,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Nodes => View::Diagnostics,
            View::Edges => View::Nodes,
            View::Diagnostics => View::Edges,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Nodes => "Nodes",
            View::Edges => "Edges",
            View::Diagnostics => "Diagnostics",
        }
    }
}

/// Saved state for returning to a previous view.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub selected_node_index: usize,
    pub selected_edge_index: usize,
    pub selected_diagnostic_index: usize,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn SnapshotSource>,
    pub data: Option<TopologyData>,
    pub load_error: Option<String>,

    // Navigation state (visual indices into the filtered/sorted lists)
    pub selected_node_index: usize,
    pub selected_edge_index: usize,
    pub selected_diagnostic_index: usize,
    pub view_stack: Vec<ViewState>,

    // Sorting (Nodes view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    /// Frame counter driving the edge flow animation.
    tick: usize,
}

impl App {
    /// Create a new App with the given data source and theme.
    pub fn new(source: Box<dyn SnapshotSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Nodes,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            load_error: None,
            selected_node_index: 0,
            selected_edge_index: 0,
            selected_diagnostic_index: 0,
            view_stack: Vec::new(),
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme,
            status_message: None,
            tick: 0,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < Duration::from_secs(3) => Some(msg),
            _ => None,
        }
    }

    /// Push current state to stack and navigate to a new view.
    pub fn push_view(&mut self, view: View) {
        self.view_stack.push(ViewState {
            view: self.current_view,
            selected_node_index: self.selected_node_index,
            selected_edge_index: self.selected_edge_index,
            selected_diagnostic_index: self.selected_diagnostic_index,
        });
        self.current_view = view;
    }

    /// Pop the view stack and restore previous state.
    pub fn pop_view(&mut self) -> bool {
        if let Some(state) = self.view_stack.pop() {
            self.current_view = state.view;
            self.selected_node_index = state.selected_node_index;
            self.selected_edge_index = state.selected_edge_index;
            self.selected_diagnostic_index = state.selected_diagnostic_index;
            true
        } else {
            false
        }
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<&str> = self.view_stack.iter().map(|s| s.view.label()).collect();
        parts.push(self.current_view.label());
        parts.join(" > ")
    }

    /// Poll the data source and run a resolution pass on new data.
    ///
    /// Returns true if new data was received. Source failures are kept in
    /// `load_error` for the status bar.
    pub fn reload_data(&mut self) -> bool {
        if let Some(snapshot) = self.source.poll() {
            let data = TopologyData::from_snapshot(&snapshot);
            self.selected_node_index = clamp(self.selected_node_index, data.nodes().len());
            self.selected_edge_index = clamp(self.selected_edge_index, data.edges.len());
            self.selected_diagnostic_index =
                clamp(self.selected_diagnostic_index, data.graph.diagnostics.len());
            self.data = Some(data);
            self.load_error = None;
            return true;
        }

        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }
        false
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current animation frame.
    pub fn frame(&self) -> usize {
        self.tick
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Nodes matching the filter, in the current sort order.
    pub fn visible_nodes(&self) -> Vec<&ResolvedNode> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        let mut nodes: Vec<&ResolvedNode> = data
            .nodes()
            .iter()
            .filter(|n| {
                self.matches_filter(&n.id)
                    || self.matches_filter(n.display_name())
                    || self.matches_filter(n.kind().as_str())
            })
            .collect();
        sort_nodes_by(&mut nodes, self.sort_column, self.sort_ascending);
        nodes
    }

    /// Edges whose id or endpoints match the filter, in snapshot order.
    pub fn visible_edges(&self) -> Vec<&RenderedEdge> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        data.edges
            .iter()
            .filter(|e| {
                self.matches_filter(&e.id)
                    || self.matches_filter(&e.source)
                    || self.matches_filter(&e.target)
            })
            .collect()
    }

    /// Diagnostics, most severe first.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.data
            .as_ref()
            .map(|d| d.diagnostics())
            .unwrap_or_default()
    }

    pub fn selected_node(&self) -> Option<&ResolvedNode> {
        self.visible_nodes().get(self.selected_node_index).copied()
    }

    pub fn selected_edge(&self) -> Option<&RenderedEdge> {
        self.visible_edges().get(self.selected_edge_index).copied()
    }

    pub fn selected_diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostics().get(self.selected_diagnostic_index).copied()
    }

    fn current_len(&self) -> usize {
        match self.current_view {
            View::Nodes => self.visible_nodes().len(),
            View::Edges => self.visible_edges().len(),
            View::Diagnostics => self.diagnostics().len(),
        }
    }

    fn current_index_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Nodes => &mut self.selected_node_index,
            View::Edges => &mut self.selected_edge_index,
            View::Diagnostics => &mut self.selected_diagnostic_index,
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.current_len().saturating_sub(1);
        let index = self.current_index_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.current_index_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.current_index_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.current_len().saturating_sub(1);
        *self.current_index_mut() = last;
    }

    /// Select a row by its visual position, if it exists.
    pub fn select_row(&mut self, row: usize) {
        if row < self.current_len() {
            *self.current_index_mut() = row;
        }
    }

    /// Enter on the current selection.
    ///
    /// Opens the detail overlay on the Nodes view. On Edges it jumps to the
    /// endpoint that defines the edge's status, on Diagnostics to the
    /// offending node.
    pub fn enter_detail(&mut self) {
        let target = match self.current_view {
            View::Nodes => {
                if self.selected_node().is_some() {
                    self.show_detail_overlay = true;
                }
                return;
            }
            View::Edges => self.selected_edge().map(|e| e.status_node.clone()),
            View::Diagnostics => self
                .selected_diagnostic()
                .and_then(|d| d.node_id())
                .map(str::to_string),
        };

        if let Some(id) = target {
            if !self.focus_node(&id) {
                self.set_status_message(format!("Node `{}` not in topology", id));
            }
        }
    }

    /// Jump to a node in the Nodes view and open its detail overlay.
    ///
    /// Returns false if no node has that id.
    pub fn focus_node(&mut self, id: &str) -> bool {
        self.filter_text.clear();
        self.filter_active = false;

        let Some(index) = self.visible_nodes().iter().position(|n| n.id == id) else {
            return false;
        };
        if self.current_view != View::Nodes {
            self.push_view(View::Nodes);
        }
        self.selected_node_index = index;
        self.show_detail_overlay = true;
        true
    }

    /// Navigate back: close overlay first, then pop view stack, then go to Nodes.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if !self.pop_view() {
            self.current_view = View::Nodes;
        }
    }

    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Nodes view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Nodes {
            self.sort_column = self.sort_column.next();
        }
    }

    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Nodes {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.reset_selection();
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selected_node_index = 0;
        self.selected_edge_index = 0;
    }

    /// Case-insensitive substring match against the filter.
    pub fn matches_filter(&self, text: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        text.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the resolved topology to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        export::write_report(data, path)
    }
}

fn clamp(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
