use std::sync::Arc;

use raidsim_types::AuraMetricsProto;

use super::{MergeOptions, MetricsError, ResultContext, UnitInfo, bucket, shared_unit};
use crate::action_id::ActionId;

/// Uptime statistics of one buff or debuff.
#[derive(Debug, Clone)]
pub struct AuraMetrics {
    pub unit: Option<Arc<UnitInfo>>,
    pub action_id: ActionId,
    data: AuraMetricsProto,
    context: ResultContext,
}

impl AuraMetrics {
    pub fn new(
        unit: Option<Arc<UnitInfo>>,
        action_id: ActionId,
        data: AuraMetricsProto,
        context: ResultContext,
    ) -> Self {
        Self {
            unit,
            action_id,
            data,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.action_id.name
    }

    pub fn icon_url(&self) -> &str {
        &self.action_id.icon_url
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.data.uptime_seconds_avg
    }

    pub fn uptime_percent(&self) -> f64 {
        self.data.uptime_seconds_avg / self.context.duration * 100.0
    }

    pub fn average_procs(&self) -> f64 {
        self.data.procs_avg
    }

    pub fn ppm(&self) -> f64 {
        self.data.procs_avg / (self.context.duration / 60.0)
    }

    /// Overlapping auras do not add up. The merged aura is the one with the
    /// longest uptime, carrying its procs and deviation.
    pub fn merge(auras: &[AuraMetrics], options: MergeOptions) -> Result<Self, MetricsError> {
        let first = auras.first().ok_or(MetricsError::EmptyMerge)?;
        let longest = auras
            .iter()
            .max_by(|a, b| a.data.uptime_seconds_avg.total_cmp(&b.data.uptime_seconds_avg))
            .unwrap_or(first);

        let action_id = options.resolve_id(&first.action_id);
        Ok(Self::new(
            shared_unit(auras.iter().map(|a| &a.unit)),
            action_id.clone(),
            AuraMetricsProto {
                id: action_id.to_proto(),
                ..longest.data.clone()
            },
            first.context,
        ))
    }

    pub fn to_proto(&self) -> &AuraMetricsProto {
        &self.data
    }

    /// Buckets auras by id, by tag too when `use_tag` is set.
    pub fn group_by_id(auras: Vec<AuraMetrics>, use_tag: bool) -> Vec<Vec<AuraMetrics>> {
        bucket(auras, |a| {
            if use_tag {
                a.action_id.key()
            } else {
                a.action_id.key_ignoring_tag()
            }
        })
    }

    pub fn join_by_id(auras: Vec<AuraMetrics>, use_tag: bool) -> Vec<AuraMetrics> {
        Self::group_by_id(auras, use_tag)
            .into_iter()
            .filter_map(|group| Self::merge(&group, MergeOptions::default()).ok())
            .collect()
    }
}
