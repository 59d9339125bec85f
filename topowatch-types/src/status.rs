//! The normalized two-axis status attached to every topology node.

use core::fmt;

use crate::EntityKind;

/// Whether an entity's underlying connection/process is up.
///
/// Variants are declared in aggregation priority order, so `Ord` gives
/// `Inactive < Active < Error` and the worst status wins under `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuntimeStatus {
    /// Down, or no status facts available.
    #[default]
    Inactive,
    /// Connected and running.
    Active,
    /// The connection reported a fault.
    Error,
}

impl RuntimeStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeStatus::Inactive => "INACTIVE",
            RuntimeStatus::Active => "ACTIVE",
            RuntimeStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an entity is configured to move data and is doing so without fault.
///
/// Same priority ordering as [`RuntimeStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OperationalStatus {
    /// Not moving data (nothing configured, or not running).
    #[default]
    Inactive,
    /// Running with at least one enabled mapping.
    Active,
    /// A mapping reported a fault.
    Error,
}

impl OperationalStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalStatus::Inactive => "INACTIVE",
            OperationalStatus::Active => "ACTIVE",
            OperationalStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a [`StatusModel`] came from.
///
/// Classified statuses carry the entity's own type tag; aggregated ones
/// are always [`StatusSource::Derived`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatusSource {
    Adapter,
    Bridge,
    Device,
    TopicFilter,
    ClientFilter,
    Gateway,
    Host,
    /// A node of unrecognized type, which is never classified.
    Unknown,
    Derived,
}

impl StatusSource {
    /// Wire name of the source tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSource::Adapter => "ADAPTER",
            StatusSource::Bridge => "BRIDGE",
            StatusSource::Device => "DEVICE",
            StatusSource::TopicFilter => "TOPIC_FILTER",
            StatusSource::ClientFilter => "CLIENT_FILTER",
            StatusSource::Gateway => "GATEWAY",
            StatusSource::Host => "HOST",
            StatusSource::Unknown => "UNKNOWN",
            StatusSource::Derived => "DERIVED",
        }
    }
}

impl From<EntityKind> for StatusSource {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Adapter => StatusSource::Adapter,
            EntityKind::Bridge => StatusSource::Bridge,
            EntityKind::Device => StatusSource::Device,
            EntityKind::TopicFilter => StatusSource::TopicFilter,
            EntityKind::ClientFilter => StatusSource::ClientFilter,
            EntityKind::Gateway => StatusSource::Gateway,
            EntityKind::Host => StatusSource::Host,
        }
    }
}

impl fmt::Display for StatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully populated dual-axis status.
///
/// There is no "unknown" state: missing facts resolve to
/// `Inactive`/`Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusModel {
    pub runtime: RuntimeStatus,
    pub operational: OperationalStatus,
    pub source: StatusSource,
}

impl StatusModel {
    /// Create a status from explicit parts.
    pub const fn new(
        runtime: RuntimeStatus,
        operational: OperationalStatus,
        source: StatusSource,
    ) -> Self {
        Self {
            runtime,
            operational,
            source,
        }
    }

    /// `Inactive`/`Inactive` with the given source tag.
    pub const fn inactive(source: StatusSource) -> Self {
        Self::new(RuntimeStatus::Inactive, OperationalStatus::Inactive, source)
    }

    /// A status produced by aggregation.
    pub const fn derived(runtime: RuntimeStatus, operational: OperationalStatus) -> Self {
        Self::new(runtime, operational, StatusSource::Derived)
    }

    /// Returns true when this status came from aggregation.
    pub fn is_derived(&self) -> bool {
        self.source == StatusSource::Derived
    }

    /// Returns true when either axis reports an error.
    pub fn has_error(&self) -> bool {
        self.runtime == RuntimeStatus::Error || self.operational == OperationalStatus::Error
    }
}
