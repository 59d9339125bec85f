//! Status classification for individual entities.
//!
//! Turns one entity's raw connection/runtime/mapping facts into a
//! [`StatusModel`] tagged with the entity's own kind.

use topowatch_types::{
    ConnectionState, EntityFacts, EntityKind, OperationalStatus, RuntimeState, RuntimeStatus,
    StatusModel, StatusSource,
};

/// Classify a single entity from its own facts.
///
/// - Runtime: `Error` if the connection reports an error, `Active` if
///   connected (or stateless) and started, otherwise `Inactive`.
/// - Operational: `Error` if a mapping reports a fault, `Active` if the
///   runtime is `Active` and the entity has at least one enabled mapping
///   (kinds without mappings only need to be running), otherwise `Inactive`.
///
/// Facts carrying an unrecognized state classify as `Inactive`/`Inactive`.
pub fn classify(kind: EntityKind, facts: &EntityFacts) -> StatusModel {
    let source = StatusSource::from(kind);
    if facts.is_malformed() {
        return StatusModel::inactive(source);
    }

    let runtime = runtime_status(facts);
    let operational = operational_status(kind, facts, runtime);
    StatusModel::new(runtime, operational, source)
}

fn runtime_status(facts: &EntityFacts) -> RuntimeStatus {
    match (facts.connection, facts.runtime) {
        (Some(ConnectionState::Error), _) => RuntimeStatus::Error,
        (Some(connection), Some(RuntimeState::Started)) if connection.is_connected() => {
            RuntimeStatus::Active
        }
        _ => RuntimeStatus::Inactive,
    }
}

fn operational_status(
    kind: EntityKind,
    facts: &EntityFacts,
    runtime: RuntimeStatus,
) -> OperationalStatus {
    if facts.mappings.has_fault() {
        return OperationalStatus::Error;
    }

    let configured = !kind.supports_mappings() || facts.mappings.has_enabled();
    if runtime == RuntimeStatus::Active && configured {
        OperationalStatus::Active
    } else {
        OperationalStatus::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topowatch_types::EntityFactsBuilder;

    fn facts(f: impl FnOnce(EntityFactsBuilder) -> EntityFactsBuilder) -> EntityFacts {
        f(EntityFacts::builder()).build()
    }

    #[test]
    fn connected_started_with_mapping_is_fully_active() {
        let status = classify(
            EntityKind::Adapter,
            &facts(|f| f.connected().started().mappings(1)),
        );
        assert_eq!(status.runtime, RuntimeStatus::Active);
        assert_eq!(status.operational, OperationalStatus::Active);
        assert_eq!(status.source, StatusSource::Adapter);
    }

    #[test]
    fn connected_without_mappings_is_not_moving_data() {
        let status = classify(EntityKind::Adapter, &facts(|f| f.connected().started()));
        assert_eq!(status.runtime, RuntimeStatus::Active);
        assert_eq!(status.operational, OperationalStatus::Inactive);
    }

    #[test]
    fn connection_error_wins_over_runtime_state() {
        let status = classify(
            EntityKind::Bridge,
            &facts(|f| f.connection(ConnectionState::Error).started().mappings(2)),
        );
        assert_eq!(status.runtime, RuntimeStatus::Error);
        // Operational stays independent: no mapping fault, runtime not active.
        assert_eq!(status.operational, OperationalStatus::Inactive);
        assert_eq!(status.source, StatusSource::Bridge);
    }

    #[test]
    fn stopped_or_disconnected_is_inactive() {
        let stopped = classify(
            EntityKind::Adapter,
            &facts(|f| f.connected().stopped().mappings(1)),
        );
        assert_eq!(stopped.runtime, RuntimeStatus::Inactive);
        assert_eq!(stopped.operational, OperationalStatus::Inactive);

        let disconnected = classify(
            EntityKind::Adapter,
            &facts(|f| f.disconnected().started().mappings(1)),
        );
        assert_eq!(disconnected.runtime, RuntimeStatus::Inactive);
    }

    #[test]
    fn stateless_entities_count_as_connected() {
        let status = classify(
            EntityKind::Adapter,
            &facts(|f| f.connection(ConnectionState::Stateless).started().mappings(1)),
        );
        assert_eq!(status.runtime, RuntimeStatus::Active);
        assert_eq!(status.operational, OperationalStatus::Active);
    }

    #[test]
    fn faulted_mapping_is_operational_error() {
        let status = classify(
            EntityKind::Adapter,
            &facts(|f| f.connected().started().mappings(2).faulted_mappings(1)),
        );
        assert_eq!(status.runtime, RuntimeStatus::Active);
        assert_eq!(status.operational, OperationalStatus::Error);
    }

    #[test]
    fn missing_facts_default_to_inactive() {
        let status = classify(EntityKind::Device, &EntityFacts::default());
        assert_eq!(status, StatusModel::inactive(StatusSource::Device));
    }

    #[test]
    fn unrecognized_state_is_conservatively_inactive() {
        let status = classify(
            EntityKind::Adapter,
            &facts(|f| f.connection(ConnectionState::Unknown).started().faulted_mappings(1)),
        );
        assert_eq!(status, StatusModel::inactive(StatusSource::Adapter));

        let status = classify(
            EntityKind::Adapter,
            &facts(|f| f.connected().runtime(RuntimeState::Unknown).mappings(1)),
        );
        assert_eq!(status, StatusModel::inactive(StatusSource::Adapter));
    }

    #[test]
    fn kinds_without_mappings_follow_runtime() {
        let status = classify(EntityKind::Gateway, &facts(|f| f.connected().started()));
        assert_eq!(status.runtime, RuntimeStatus::Active);
        assert_eq!(status.operational, OperationalStatus::Active);
        assert_eq!(status.source, StatusSource::Gateway);

        let status = classify(EntityKind::Host, &facts(|f| f.disconnected()));
        assert_eq!(status.operational, OperationalStatus::Inactive);
    }

    #[test]
    fn classification_is_idempotent() {
        let input = facts(|f| f.connected().started().mappings(1).message("ok"));
        let first = classify(EntityKind::Bridge, &input);
        let second = classify(EntityKind::Bridge, &input);
        assert_eq!(first, second);
    }

    #[test]
    fn classified_source_is_never_derived() {
        let input = facts(|f| f.connected().started().mappings(1));
        for kind in EntityKind::ALL {
            assert!(!classify(kind, &input).is_derived());
        }
    }
}
