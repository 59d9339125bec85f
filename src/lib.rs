//! # topowatch
//!
//! A status engine and diagnostic TUI for edge gateway topologies.
//!
//! A gateway topology is a graph of gateways, hosts, adapters, groups,
//! combiners and asset mappers. Leaves report raw facts (connection state,
//! process state, mapping counts); this crate derives a runtime and an
//! operational status for every node, rolls them up through groups and
//! combiners, and turns the result into edge colors and flow animation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(resolve) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: The status engine. Classifies leaves, aggregates composites
//!   worst-first, resolves the whole graph with a cycle guard, and maps edges
//!   to render hints
//! - **[`source`]**: Snapshot input ([`SnapshotSource`] trait) with file polling,
//!   TCP stream and channel implementations
//! - **[`app`]**: Viewer state, navigation and selection
//! - **[`ui`]**: ratatui rendering of the node, edge and diagnostic views
//! - **[`config`]** and **[`telemetry`]**: Layered settings and log setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a snapshot file
//! topowatch --file topology.json
//!
//! # Follow a live stream of newline-delimited snapshots
//! topowatch --connect localhost:9400
//!
//! # Validate a snapshot and list diagnostics
//! topowatch --check --file topology.json
//! ```
//!
//! ### Resolving a snapshot directly
//!
//! ```
//! use topowatch::{resolve, RuntimeStatus, TopologySnapshot};
//!
//! let snapshot = TopologySnapshot::builder()
//!     .adapter("plc", |f| f.connected().started())
//!     .adapter("scale", |f| f)
//!     .group("line-1", ["plc", "scale"])
//!     .build();
//!
//! let graph = resolve(&snapshot);
//! assert_eq!(graph.status("line-1").unwrap().runtime, RuntimeStatus::Active);
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use topowatch::{App, ChannelSource, TopologySnapshot};
//! use topowatch::ui::Theme;
//!
//! let (tx, source) = ChannelSource::create("in-process");
//! let mut app = App::new(Box::new(source), Theme::dark());
//!
//! tx.send(TopologySnapshot::default()).unwrap();
//! assert!(app.reload_data());
//! ```
//!
//! ### Bridging from a byte stream
//!
//! ```no_run
//! use topowatch::StreamSource;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
//! let source = StreamSource::from_bytes_channel(rx, "bridge");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod telemetry;
pub mod ui;

pub use app::App;
pub use config::{Settings, ThemeMode};
pub use data::{
    resolve, ColorToken, Diagnostic, EdgeStyle, RenderedEdge, ResolvedGraph, ResolvedNode,
    Severity, TopologyData,
};
pub use source::{ChannelSource, FileSource, SnapshotSource, StreamSource};
pub use topowatch_types::{
    NodeKind, OperationalStatus, RuntimeStatus, StatusModel, StatusSource, TopologySnapshot,
};
