//! Tolerant deserialization of gateway payloads.
//!
//! Snapshots are polled while the gateway is mid-update, so individual
//! nodes routinely arrive with missing, null or oddly typed facts. None of
//! that may reject the snapshot: bad facts fall back to their "not
//! configured" defaults, unrecognized states become `Unknown`, and an
//! unrecognized node type becomes [`NodeData::Unknown`].

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::{
    CompositeData, ConnectionState, EntityFacts, GroupData, MappingFacts, Node, NodeData,
    RuntimeState, UnknownNode,
};

// ============================================================================
// Node
// ============================================================================

/// A node as it appears on the wire, before the payload is typed.
#[derive(serde::Deserialize)]
pub(crate) struct WireNode {
    id: String,
    #[serde(default, deserialize_with = "text")]
    label: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "map_or_default")]
    data: WirePayload,
}

/// Union of every payload field; each node kind picks the ones it uses.
#[derive(Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePayload {
    connection: Option<ConnectionState>,
    runtime: Option<RuntimeState>,
    #[serde(deserialize_with = "text")]
    message: Option<String>,
    #[serde(deserialize_with = "map_or_default")]
    mappings: MappingFacts,
    #[serde(deserialize_with = "ids")]
    children_node_ids: Vec<String>,
    #[serde(deserialize_with = "ids")]
    source_node_ids: Vec<String>,
    #[serde(deserialize_with = "text")]
    type_name: Option<String>,
}

impl WirePayload {
    fn facts(self) -> EntityFacts {
        EntityFacts {
            connection: self.connection,
            runtime: self.runtime,
            message: self.message,
            mappings: self.mappings,
        }
    }

    fn composite(self) -> CompositeData {
        CompositeData {
            source_node_ids: self.source_node_ids,
            mappings: self.mappings,
        }
    }
}

impl From<WireNode> for Node {
    fn from(wire: WireNode) -> Self {
        let payload = wire.data;
        let data = match wire.kind.as_deref() {
            Some("ADAPTER") => NodeData::Adapter(payload.facts()),
            Some("BRIDGE") => NodeData::Bridge(payload.facts()),
            Some("DEVICE") => NodeData::Device(payload.facts()),
            Some("TOPIC_FILTER") => NodeData::TopicFilter(payload.facts()),
            Some("CLIENT_FILTER") => NodeData::ClientFilter(payload.facts()),
            Some("GATEWAY") => NodeData::Gateway(payload.facts()),
            Some("HOST") => NodeData::Host(payload.facts()),
            Some("GROUP") | Some("CLUSTER") => NodeData::Group(GroupData {
                children_node_ids: payload.children_node_ids,
            }),
            Some("COMBINER") => NodeData::Combiner(payload.composite()),
            Some("ASSET_MAPPER") => NodeData::AssetMapper(payload.composite()),
            // Re-reading our own output keeps the original type name
            Some("UNKNOWN") => NodeData::Unknown(UnknownNode {
                type_name: payload.type_name,
            }),
            other => NodeData::Unknown(UnknownNode {
                type_name: other.map(ToOwned::to_owned),
            }),
        };

        Node {
            id: wire.id,
            label: wire.label,
            data,
        }
    }
}

// ============================================================================
// States
// ============================================================================

/// A state enum with a catch-all variant.
trait WireState: Sized {
    const UNKNOWN: Self;
    fn from_name(name: &str) -> Self;
}

impl WireState for ConnectionState {
    const UNKNOWN: Self = ConnectionState::Unknown;

    fn from_name(name: &str) -> Self {
        match name {
            "CONNECTED" => ConnectionState::Connected,
            "DISCONNECTED" => ConnectionState::Disconnected,
            "STATELESS" => ConnectionState::Stateless,
            "ERROR" => ConnectionState::Error,
            _ => ConnectionState::Unknown,
        }
    }
}

impl WireState for RuntimeState {
    const UNKNOWN: Self = RuntimeState::Unknown;

    fn from_name(name: &str) -> Self {
        match name {
            "STARTED" => RuntimeState::Started,
            "STOPPED" => RuntimeState::Stopped,
            _ => RuntimeState::Unknown,
        }
    }
}

struct StateVisitor<T>(PhantomData<T>);

impl<'de, T: WireState> Visitor<'de> for StateVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a state name")
    }

    fn visit_str<E>(self, v: &str) -> Result<T, E> {
        Ok(T::from_name(v))
    }

    fn visit_bool<E>(self, _: bool) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_i64<E>(self, _: i64) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_u64<E>(self, _: u64) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_f64<E>(self, _: f64) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_unit<E>(self) -> Result<T, E> {
        Ok(T::UNKNOWN)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<T, A::Error> {
        drain_seq(seq)?;
        Ok(T::UNKNOWN)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
        drain_map(map)?;
        Ok(T::UNKNOWN)
    }
}

impl<'de> Deserialize<'de> for ConnectionState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StateVisitor(PhantomData))
    }
}

impl<'de> Deserialize<'de> for RuntimeState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StateVisitor(PhantomData))
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn drain_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn drain_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

/// Accepts any value: a map deserializes as `T`, anything else is `T::default()`.
pub(crate) fn map_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    struct MapOrDefault<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de> + Default> Visitor<'de> for MapOrDefault<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map))
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<T, D::Error> {
            map_or_default(deserializer)
        }

        fn visit_none<E>(self) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_unit<E>(self) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_bool<E>(self, _: bool) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_i64<E>(self, _: i64) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_u64<E>(self, _: u64) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_f64<E>(self, _: f64) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_str<E>(self, _: &str) -> Result<T, E> {
            Ok(T::default())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<T, A::Error> {
            drain_seq(seq)?;
            Ok(T::default())
        }
    }

    deserializer.deserialize_any(MapOrDefault(PhantomData))
}

/// A string if the value is one, otherwise `None`.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Text::deserialize(deserializer).map(|t| t.0)
}

struct Text(Option<String>);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = Text;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Text, E> {
                Ok(Text(Some(v.to_owned())))
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Text, D::Error> {
                Text::deserialize(deserializer)
            }

            fn visit_none<E>(self) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_unit<E>(self) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_bool<E>(self, _: bool) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_i64<E>(self, _: i64) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_u64<E>(self, _: u64) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_f64<E>(self, _: f64) -> Result<Text, E> {
                Ok(Text(None))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Text, A::Error> {
                drain_seq(seq)?;
                Ok(Text(None))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Text, A::Error> {
                drain_map(map)?;
                Ok(Text(None))
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

/// A list of ids; non-string entries are dropped, a non-list is empty.
pub(crate) fn ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    struct IdsVisitor;

    impl<'de> Visitor<'de> for IdsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of node ids")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<String>, A::Error> {
            let mut ids = Vec::new();
            while let Some(Text(id)) = seq.next_element::<Text>()? {
                ids.extend(id);
            }
            Ok(ids)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Vec<String>, D::Error> {
            ids(deserializer)
        }

        fn visit_none<E>(self) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_bool<E>(self, _: bool) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_i64<E>(self, _: i64) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_u64<E>(self, _: u64) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_f64<E>(self, _: f64) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_str<E>(self, _: &str) -> Result<Vec<String>, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Vec<String>, A::Error> {
            drain_map(map)?;
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(IdsVisitor)
}

/// A mapping count; negative, fractional or non-numeric values count as zero.
pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a count")
        }

        fn visit_u64<E>(self, v: u64) -> Result<u32, E> {
            Ok(u32::try_from(v).unwrap_or(u32::MAX))
        }

        fn visit_i64<E>(self, v: i64) -> Result<u32, E> {
            Ok(u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        }

        fn visit_f64<E>(self, _: f64) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_bool<E>(self, _: bool) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_str<E>(self, _: &str) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<u32, D::Error> {
            count(deserializer)
        }

        fn visit_none<E>(self) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_unit<E>(self) -> Result<u32, E> {
            Ok(0)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<u32, A::Error> {
            drain_seq(seq)?;
            Ok(0)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<u32, A::Error> {
            drain_map(map)?;
            Ok(0)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
