//! Status derivation for topology snapshots.
//!
//! This module turns raw topology snapshots into status-annotated data
//! suitable for display.
//!
//! ## Submodules
//!
//! - [`classify`]: Per-entity classification from connection/runtime/mapping facts
//! - [`aggregate`]: Worst-wins roll-up of child statuses, per axis
//! - [`membership`]: Index-based membership graph and cycle detection
//! - [`resolve`]: Post-order status resolution over the whole graph
//! - [`render`]: Edge color/animation from resolved statuses
//! - [`topology`]: One resolution pass packaged for the viewer ([`TopologyData`])
//! - [`diagnostic`]: Non-fatal problems found in the input graph
//! - [`export`]: JSON report of a resolved topology
//!
//! ## Data Flow
//!
//! ```text
//! TopologySnapshot (raw JSON)
//!        │
//!        ▼
//! TopologyData::from_snapshot()
//!        │
//!        ├──▶ resolve(): classify leaves, aggregate groups and combiners
//!        │
//!        └──▶ map_edges(): color from runtime, animation from operational
//! ```

pub mod aggregate;
pub mod classify;
pub mod diagnostic;
pub mod export;
pub mod membership;
pub mod render;
pub mod resolve;
pub mod topology;

pub use aggregate::{aggregate, aggregate_composite};
pub use classify::classify;
pub use diagnostic::{Diagnostic, Severity};
pub use render::{map_edge, map_edges, ColorToken, EdgeStyle, RenderedEdge};
pub use resolve::{resolve, ResolvedGraph, ResolvedNode};
pub use topology::{StatusCounts, TopologyData};
