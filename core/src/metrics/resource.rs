use std::sync::Arc;

use raidsim_types::{ResourceMetricsProto, ResourceType};

use super::{MergeOptions, MetricsError, ResultContext, UnitInfo, bucket, shared_unit};
use crate::action_id::ActionId;

/// Resource gains (or spends, as negative gain) attributed to one action.
#[derive(Debug, Clone)]
pub struct ResourceMetrics {
    pub unit: Option<Arc<UnitInfo>>,
    pub action_id: ActionId,
    data: ResourceMetricsProto,
    context: ResultContext,
}

impl ResourceMetrics {
    pub fn new(
        unit: Option<Arc<UnitInfo>>,
        action_id: ActionId,
        data: ResourceMetricsProto,
        context: ResultContext,
    ) -> Self {
        Self {
            unit,
            action_id,
            data,
            context,
        }
    }

    pub fn to_proto(&self) -> &ResourceMetricsProto {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.action_id.name
    }

    pub fn icon_url(&self) -> &str {
        &self.action_id.icon_url
    }

    pub fn resource_type(&self) -> ResourceType {
        self.data.resource_type
    }

    pub fn events(&self) -> f64 {
        self.data.events as f64 / self.context.iterations
    }

    pub fn gain(&self) -> f64 {
        self.data.gain / self.context.iterations
    }

    pub fn gain_per_second(&self) -> f64 {
        self.data.gain / self.context.iterations / self.context.duration
    }

    pub fn avg_gain(&self) -> f64 {
        self.data.gain / self.data.events as f64
    }

    /// Gain lost to the resource cap, per iteration.
    pub fn wasted_gain(&self) -> f64 {
        (self.data.gain - self.data.actual_gain) / self.context.iterations
    }

    /// Sums metrics of one resource type. Mixing types is an error.
    pub fn merge(resources: &[ResourceMetrics], options: MergeOptions) -> Result<Self, MetricsError> {
        let first = resources.first().ok_or(MetricsError::EmptyMerge)?;
        if let Some(other) = resources
            .iter()
            .map(|r| r.resource_type())
            .find(|&t| t != first.resource_type())
        {
            return Err(MetricsError::MixedResourceTypes {
                first: first.resource_type(),
                other,
            });
        }

        let action_id = options.resolve_id(&first.action_id);
        Ok(Self::new(
            shared_unit(resources.iter().map(|r| &r.unit)),
            action_id.clone(),
            ResourceMetricsProto {
                id: action_id.to_proto(),
                resource_type: first.data.resource_type,
                events: resources.iter().map(|r| r.data.events).sum(),
                gain: resources.iter().map(|r| r.data.gain).sum(),
                actual_gain: resources.iter().map(|r| r.data.actual_gain).sum(),
            },
            first.context,
        ))
    }

    /// Buckets by id and resource type, so one action's mana and health
    /// changes stay apart.
    pub fn group_by_id(resources: Vec<ResourceMetrics>, use_tag: bool) -> Vec<Vec<ResourceMetrics>> {
        bucket(resources, |r| {
            let key = if use_tag {
                r.action_id.key()
            } else {
                r.action_id.key_ignoring_tag()
            };
            (key, r.resource_type())
        })
    }

    pub fn join_by_id(resources: Vec<ResourceMetrics>, use_tag: bool) -> Vec<ResourceMetrics> {
        Self::group_by_id(resources, use_tag)
            .into_iter()
            .filter_map(|group| Self::merge(&group, MergeOptions::default()).ok())
            .collect()
    }
}
