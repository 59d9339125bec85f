//! Status aggregation for groups and composite entities.
//!
//! Each axis is rolled up independently with the fixed priority
//! `Error > Active > Inactive`, which is the `Ord` of the status enums.

use topowatch_types::{MappingFacts, OperationalStatus, RuntimeStatus, StatusModel};

/// Combine child statuses into one derived status.
///
/// An empty input yields `Inactive`/`Inactive`. The result is always
/// [`StatusSource::Derived`](topowatch_types::StatusSource::Derived).
pub fn aggregate<'a, I>(children: I) -> StatusModel
where
    I: IntoIterator<Item = &'a StatusModel>,
{
    let mut runtime = RuntimeStatus::Inactive;
    let mut operational = OperationalStatus::Inactive;

    for child in children {
        runtime = runtime.max(child.runtime);
        operational = operational.max(child.operational);
        if runtime == RuntimeStatus::Error && operational == OperationalStatus::Error {
            break;
        }
    }

    StatusModel::derived(runtime, operational)
}

/// Derive the status of a combiner-like entity.
///
/// Runtime is the aggregate of its sources. Operational is gated by the
/// entity's own mappings: a faulted mapping is `Error`, otherwise it is
/// `Active` only when the sources are up and a mapping is enabled.
pub fn aggregate_composite<'a, I>(sources: I, mappings: &MappingFacts) -> StatusModel
where
    I: IntoIterator<Item = &'a StatusModel>,
{
    let runtime = aggregate(sources).runtime;
    let operational = if mappings.has_fault() {
        OperationalStatus::Error
    } else if runtime == RuntimeStatus::Active && mappings.has_enabled() {
        OperationalStatus::Active
    } else {
        OperationalStatus::Inactive
    };
    StatusModel::derived(runtime, operational)
}

#[cfg(test)]
mod tests {
    use super::*;
    use topowatch_types::{OperationalStatus as Op, RuntimeStatus as Rt, StatusSource};

    fn adapter(runtime: Rt, operational: Op) -> StatusModel {
        StatusModel::new(runtime, operational, StatusSource::Adapter)
    }

    #[test]
    fn empty_input_is_inactive_derived() {
        let status = aggregate(std::iter::empty());
        assert_eq!(status, StatusModel::derived(Rt::Inactive, Op::Inactive));
    }

    #[test]
    fn single_child_identity_up_to_source() {
        for runtime in [Rt::Inactive, Rt::Active, Rt::Error] {
            for operational in [Op::Inactive, Op::Active, Op::Error] {
                let child = adapter(runtime, operational);
                let status = aggregate([&child]);
                assert_eq!(status, StatusModel::derived(runtime, operational));
            }
        }
    }

    #[test]
    fn runtime_error_wins_regardless_of_other_children() {
        let children = vec![
            adapter(Rt::Active, Op::Active),
            adapter(Rt::Inactive, Op::Inactive),
            adapter(Rt::Error, Op::Inactive),
            adapter(Rt::Active, Op::Inactive),
        ];
        assert_eq!(aggregate(&children).runtime, Rt::Error);
    }

    #[test]
    fn operational_error_wins_independently() {
        let children = vec![
            adapter(Rt::Active, Op::Active),
            adapter(Rt::Active, Op::Error),
            adapter(Rt::Inactive, Op::Inactive),
        ];
        let status = aggregate(&children);
        assert_eq!(status.operational, Op::Error);
        assert_eq!(status.runtime, Rt::Active);
    }

    #[test]
    fn axes_never_influence_each_other() {
        let child = adapter(Rt::Error, Op::Active);
        let status = aggregate([&child]);
        assert_eq!(status.runtime, Rt::Error);
        assert_eq!(status.operational, Op::Active);
    }

    #[test]
    fn two_adapters_one_erroring() {
        let children = vec![adapter(Rt::Active, Op::Active), adapter(Rt::Error, Op::Active)];
        assert_eq!(
            aggregate(&children),
            StatusModel::derived(Rt::Error, Op::Active)
        );
    }

    #[test]
    fn three_bridges_any_active_is_active() {
        let children: Vec<StatusModel> = [Rt::Active, Rt::Inactive, Rt::Active]
            .into_iter()
            .map(|rt| StatusModel::new(rt, Op::Inactive, StatusSource::Bridge))
            .collect();
        assert_eq!(aggregate(&children).runtime, Rt::Active);
    }

    #[test]
    fn mixed_kinds_are_aggregated_uniformly() {
        let children = vec![
            StatusModel::new(Rt::Inactive, Op::Inactive, StatusSource::Device),
            StatusModel::derived(Rt::Active, Op::Inactive),
            StatusModel::new(Rt::Inactive, Op::Active, StatusSource::Bridge),
        ];
        assert_eq!(
            aggregate(&children),
            StatusModel::derived(Rt::Active, Op::Active)
        );
    }

    #[test]
    fn order_does_not_matter() {
        let mut children = vec![
            adapter(Rt::Inactive, Op::Error),
            adapter(Rt::Active, Op::Inactive),
            adapter(Rt::Error, Op::Active),
        ];
        let forward = aggregate(&children);
        children.reverse();
        assert_eq!(forward, aggregate(&children));
    }

    #[test]
    fn composite_needs_enabled_mappings_to_be_operational() {
        let sources = vec![adapter(Rt::Active, Op::Active)];

        let idle = aggregate_composite(&sources, &MappingFacts::default());
        assert_eq!(idle, StatusModel::derived(Rt::Active, Op::Inactive));

        let moving = aggregate_composite(&sources, &MappingFacts::enabled(1));
        assert_eq!(moving, StatusModel::derived(Rt::Active, Op::Active));
    }

    #[test]
    fn composite_mapping_fault_is_operational_error() {
        let sources = vec![adapter(Rt::Inactive, Op::Inactive)];
        let mappings = MappingFacts {
            enabled: 1,
            faulted: 1,
        };
        let status = aggregate_composite(&sources, &mappings);
        assert_eq!(status, StatusModel::derived(Rt::Inactive, Op::Error));
    }

    #[test]
    fn composite_runtime_follows_sources() {
        let sources = vec![adapter(Rt::Error, Op::Active), adapter(Rt::Active, Op::Active)];
        let status = aggregate_composite(&sources, &MappingFacts::enabled(3));
        assert_eq!(status.runtime, Rt::Error);
        assert_eq!(status.operational, Op::Inactive);
    }
}
