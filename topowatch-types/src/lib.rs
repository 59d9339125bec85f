//! # topowatch-types
//!
//! Core types for edge gateway topology status. This crate defines the
//! schema shared between whatever collects entity facts from a gateway
//! (protocol adapters, bridges, devices, combiners, groups) and the
//! status pipeline that turns those facts into per-node, dual-axis status.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature as needed
//! - **Two independent axes**: runtime (is it up?) and operational (is it moving data?)
//! - **Versioned schema**: Snapshots include version info for forward compatibility
//! - **Tolerant decoding**: A malformed node degrades to defaults instead of
//!   rejecting the snapshot
//! - **Ergonomic builders**: Fluent API for constructing snapshots
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/YAML/etc. serialization via serde
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use topowatch_types::{ConnectionState, TopologySnapshot};
//!
//! let snapshot = TopologySnapshot::builder()
//!     .adapter("opcua-1", |f| f.connected().started().mappings(2))
//!     .bridge("cloud", |f| f.connection(ConnectionState::Error))
//!     .group("line-1", ["opcua-1", "cloud"])
//!     .gateway("edge", |f| f.connected().started())
//!     .edge("opcua-1", "edge")
//!     .edge("line-1", "edge")
//!     .build();
//!
//! assert_eq!(snapshot.nodes.len(), 4);
//! assert_eq!(snapshot.edges.len(), 2);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in serialized
//! snapshots to allow consumers to handle format evolution gracefully.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod entity;
mod snapshot;
mod status;
mod version;
#[cfg(feature = "serde")]
mod wire;

pub use entity::*;
pub use snapshot::*;
pub use status::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the snapshot format.
/// Consumers should check this version and handle older formats appropriately.
pub const SCHEMA_VERSION: u32 = 1;
