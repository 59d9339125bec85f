//! Diagnostics raised while resolving a topology snapshot.
//!
//! None of these abort a resolution pass. They are returned alongside the
//! resolved graph and logged, so the viewer can surface them.

use thiserror::Error;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
        }
    }
}

/// Something noteworthy about the input graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Group membership (or combiner sources) loops back on itself.
    #[error("cyclic membership: {}", .members.join(" -> "))]
    CyclicMembership { members: Vec<String> },

    /// Two nodes share an id; lookups use the first one.
    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    /// A membership list names a node that is not in the snapshot.
    #[error("`{parent}` lists missing member `{member}`")]
    MissingMember { parent: String, member: String },

    /// An entity reported a connection or runtime state this build does not know.
    #[error("`{node}` reported an unrecognized state")]
    UnrecognizedState { node: String },

    /// A node's `type` is not one this build knows; it resolves as inactive.
    #[error("`{node}` has unrecognized type `{}`", .type_name.as_deref().unwrap_or("-"))]
    UnrecognizedType {
        node: String,
        type_name: Option<String>,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::CyclicMembership { .. } => Severity::Error,
            Diagnostic::DuplicateNode { .. } => Severity::Warning,
            Diagnostic::MissingMember { .. }
            | Diagnostic::UnrecognizedState { .. }
            | Diagnostic::UnrecognizedType { .. } => Severity::Info,
        }
    }

    /// The node most closely associated with this diagnostic.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Diagnostic::CyclicMembership { members } => members.first().map(String::as_str),
            Diagnostic::DuplicateNode { id } => Some(id),
            Diagnostic::MissingMember { parent, .. } => Some(parent),
            Diagnostic::UnrecognizedState { node } | Diagnostic::UnrecognizedType { node, .. } => {
                Some(node)
            }
        }
    }
}
