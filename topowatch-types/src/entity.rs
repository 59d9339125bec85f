//! Raw per-entity facts as reported by the gateway.

use alloc::string::String;
use core::fmt;

/// Connection state reported for an entity.
///
/// Deserialization never fails: any unrecognized value, including
/// non-strings, becomes [`ConnectionState::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ConnectionState {
    Connected,
    Disconnected,
    /// Connectionless entities (e.g. polling adapters) that are up.
    Stateless,
    Error,
    /// Any value this schema version does not recognize.
    Unknown,
}

impl ConnectionState {
    /// Returns true for states that count as "connected".
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Stateless)
    }
}

/// Runtime (process) state reported for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuntimeState {
    Started,
    Stopped,
    Unknown,
}

/// Counts of data mappings configured on an entity.
///
/// For adapters these are northbound mappings, for bridges their
/// subscriptions, for combiners their combining mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MappingFacts {
    /// Mappings that are configured and enabled.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::wire::count"))]
    pub enabled: u32,
    /// Mappings whose runtime reported a fault.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::wire::count"))]
    pub faulted: u32,
}

impl MappingFacts {
    /// Mapping facts with the given number of enabled mappings.
    pub const fn enabled(enabled: u32) -> Self {
        Self { enabled, faulted: 0 }
    }

    /// Returns true if at least one mapping is enabled.
    pub fn has_enabled(&self) -> bool {
        self.enabled > 0
    }

    /// Returns true if any mapping reported a fault.
    pub fn has_fault(&self) -> bool {
        self.faulted > 0
    }
}

/// Everything the status classifier needs to know about one entity.
///
/// Every field is optional on the wire; a missing field takes the
/// "not configured" branch of classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityFacts {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub connection: Option<ConnectionState>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub runtime: Option<RuntimeState>,

    /// Fault message reported alongside the state, if any.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", deserialize_with = "crate::wire::text")
    )]
    pub message: Option<String>,

    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::wire::map_or_default"))]
    pub mappings: MappingFacts,
}

impl EntityFacts {
    /// Create empty facts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for entity facts.
    pub fn builder() -> EntityFactsBuilder {
        EntityFactsBuilder::new()
    }

    /// Returns true if either reported state is unrecognized.
    pub fn is_malformed(&self) -> bool {
        self.connection == Some(ConnectionState::Unknown)
            || self.runtime == Some(RuntimeState::Unknown)
    }
}

/// Kinds of entity whose status is classified from their own facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Adapter,
    Bridge,
    Device,
    TopicFilter,
    ClientFilter,
    Gateway,
    Host,
}

impl EntityKind {
    /// Every entity kind.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Adapter,
        EntityKind::Bridge,
        EntityKind::Device,
        EntityKind::TopicFilter,
        EntityKind::ClientFilter,
        EntityKind::Gateway,
        EntityKind::Host,
    ];

    /// Whether this kind moves data through configured mappings.
    ///
    /// Kinds without mappings are operational whenever they are running.
    pub fn supports_mappings(&self) -> bool {
        !matches!(self, EntityKind::Gateway | EntityKind::Host)
    }
}

/// Every kind of topology node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Adapter,
    Bridge,
    Device,
    TopicFilter,
    ClientFilter,
    Gateway,
    Host,
    Group,
    Combiner,
    AssetMapper,
    /// A node type this schema version does not recognize.
    Unknown,
}

impl NodeKind {
    /// Wire name of the node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Adapter => "ADAPTER",
            NodeKind::Bridge => "BRIDGE",
            NodeKind::Device => "DEVICE",
            NodeKind::TopicFilter => "TOPIC_FILTER",
            NodeKind::ClientFilter => "CLIENT_FILTER",
            NodeKind::Gateway => "GATEWAY",
            NodeKind::Host => "HOST",
            NodeKind::Group => "GROUP",
            NodeKind::Combiner => "COMBINER",
            NodeKind::AssetMapper => "ASSET_MAPPER",
            NodeKind::Unknown => "UNKNOWN",
        }
    }

    /// Short label for narrow displays.
    pub fn short_label(&self) -> &'static str {
        match self {
            NodeKind::Adapter => "adapter",
            NodeKind::Bridge => "bridge",
            NodeKind::Device => "device",
            NodeKind::TopicFilter => "topic",
            NodeKind::ClientFilter => "client",
            NodeKind::Gateway => "gateway",
            NodeKind::Host => "host",
            NodeKind::Group => "group",
            NodeKind::Combiner => "combiner",
            NodeKind::AssetMapper => "mapper",
            NodeKind::Unknown => "unknown",
        }
    }

    /// Returns true for kinds whose status is derived from other nodes.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            NodeKind::Group | NodeKind::Combiner | NodeKind::AssetMapper
        )
    }
}

impl From<EntityKind> for NodeKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Adapter => NodeKind::Adapter,
            EntityKind::Bridge => NodeKind::Bridge,
            EntityKind::Device => NodeKind::Device,
            EntityKind::TopicFilter => NodeKind::TopicFilter,
            EntityKind::ClientFilter => NodeKind::ClientFilter,
            EntityKind::Gateway => NodeKind::Gateway,
            EntityKind::Host => NodeKind::Host,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for `EntityFacts`.
#[derive(Debug, Default)]
pub struct EntityFactsBuilder {
    facts: EntityFacts,
}

impl EntityFactsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection state.
    pub fn connection(mut self, state: ConnectionState) -> Self {
        self.facts.connection = Some(state);
        self
    }

    /// Set the runtime state.
    pub fn runtime(mut self, state: RuntimeState) -> Self {
        self.facts.runtime = Some(state);
        self
    }

    /// Shorthand for `connection(ConnectionState::Connected)`.
    pub fn connected(self) -> Self {
        self.connection(ConnectionState::Connected)
    }

    /// Shorthand for `connection(ConnectionState::Disconnected)`.
    pub fn disconnected(self) -> Self {
        self.connection(ConnectionState::Disconnected)
    }

    /// Shorthand for `runtime(RuntimeState::Started)`.
    pub fn started(self) -> Self {
        self.runtime(RuntimeState::Started)
    }

    /// Shorthand for `runtime(RuntimeState::Stopped)`.
    pub fn stopped(self) -> Self {
        self.runtime(RuntimeState::Stopped)
    }

    /// Set the fault message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.facts.message = Some(message.into());
        self
    }

    /// Set the number of enabled mappings.
    pub fn mappings(mut self, enabled: u32) -> Self {
        self.facts.mappings.enabled = enabled;
        self
    }

    /// Set the number of faulted mappings.
    pub fn faulted_mappings(mut self, faulted: u32) -> Self {
        self.facts.mappings.faulted = faulted;
        self
    }

    /// Build the entity facts.
    pub fn build(self) -> EntityFacts {
        self.facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stateless_counts_as_connected() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(ConnectionState::Stateless.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
        assert!(!ConnectionState::Error.is_connected());
        assert!(!ConnectionState::Unknown.is_connected());
    }

    #[test]
    fn builder_sets_all_fields() {
        let facts = EntityFacts::builder()
            .connected()
            .started()
            .message("ok")
            .mappings(3)
            .faulted_mappings(1)
            .build();

        assert_eq!(facts.connection, Some(ConnectionState::Connected));
        assert_eq!(facts.runtime, Some(RuntimeState::Started));
        assert_eq!(facts.message.as_deref(), Some("ok"));
        assert_eq!(facts.mappings, MappingFacts { enabled: 3, faulted: 1 });
        assert!(!facts.is_malformed());
    }

    #[test]
    fn unknown_states_are_malformed() {
        let facts = EntityFacts::builder().connection(ConnectionState::Unknown).build();
        assert!(facts.is_malformed());

        let facts = EntityFacts::builder().runtime(RuntimeState::Unknown).build();
        assert!(facts.is_malformed());

        assert!(!EntityFacts::new().is_malformed());
    }

    #[test]
    fn gateway_and_host_have_no_mappings() {
        assert!(!EntityKind::Gateway.supports_mappings());
        assert!(!EntityKind::Host.supports_mappings());
        assert!(EntityKind::Adapter.supports_mappings());
        assert!(EntityKind::Bridge.supports_mappings());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unrecognized_wire_values_become_unknown() {
        let facts: EntityFacts =
            serde_json::from_str(r#"{"connection":"RECONNECTING","runtime":"PAUSED"}"#).unwrap();
        assert_eq!(facts.connection, Some(ConnectionState::Unknown));
        assert_eq!(facts.runtime, Some(RuntimeState::Unknown));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let facts: EntityFacts = serde_json::from_str("{}").unwrap();
        assert_eq!(facts, EntityFacts::default());

        let facts: EntityFacts = serde_json::from_str(r#"{"mappings":{"enabled":2}}"#).unwrap();
        assert_eq!(facts.mappings, MappingFacts::enabled(2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn mistyped_facts_fall_back_instead_of_failing() {
        let facts: EntityFacts = serde_json::from_str(
            r#"{"connection":7,"runtime":{"state":"STARTED"},"message":false,"mappings":null}"#,
        )
        .unwrap();
        assert_eq!(facts.connection, Some(ConnectionState::Unknown));
        assert_eq!(facts.runtime, Some(RuntimeState::Unknown));
        assert_eq!(facts.message, None);
        assert_eq!(facts.mappings, MappingFacts::default());

        let facts: EntityFacts =
            serde_json::from_str(r#"{"connection":null,"mappings":{"enabled":"3","faulted":-1}}"#)
                .unwrap();
        assert_eq!(facts.connection, None);
        assert_eq!(facts.mappings, MappingFacts::default());
    }
}
