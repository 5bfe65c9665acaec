//! Per-unit views over the parsed log, built once when a unit is constructed.

use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use raidsim_types::ResourceType;

use super::{LogKind, SimLog};
use crate::action_id::{ActionId, ActionKey};

/// A cast from its start to its completion, if one was logged.
#[derive(Debug, Clone, PartialEq)]
pub struct CastLog {
    pub action_id: ActionId,
    pub began_at: f64,
    pub completed_at: Option<f64>,
    pub cost: f64,
    pub cast_time: f64,
    pub effective_time: f64,
}

impl CastLog {
    pub fn from_logs(logs: &[Arc<SimLog>]) -> Vec<CastLog> {
        let mut casts: Vec<CastLog> = Vec::new();
        for log in logs {
            match &log.kind {
                LogKind::CastBegan {
                    action_id,
                    cost,
                    cast_time,
                    effective_time,
                } => casts.push(CastLog {
                    action_id: action_id.clone(),
                    began_at: log.timestamp,
                    completed_at: None,
                    cost: *cost,
                    cast_time: *cast_time,
                    effective_time: *effective_time,
                }),
                LogKind::CastCompleted { action_id } => {
                    if let Some(cast) = casts
                        .iter_mut()
                        .rev()
                        .find(|c| c.completed_at.is_none() && c.action_id == *action_id)
                    {
                        cast.completed_at = Some(log.timestamp);
                    }
                }
                _ => {}
            }
        }
        casts
    }
}

/// One continuous window during which an aura was active.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraUptimeLog {
    pub action_id: ActionId,
    pub gained_at: f64,
    pub faded_at: f64,
}

impl AuraUptimeLog {
    pub fn uptime(&self) -> f64 {
        self.faded_at - self.gained_at
    }

    /// Pairs gained/faded lines. Auras still active at the end close at
    /// `end_time`.
    pub fn from_logs(logs: &[Arc<SimLog>], end_time: f64) -> Vec<AuraUptimeLog> {
        let mut active: HashMap<ActionKey, (ActionId, f64)> = HashMap::new();
        let mut uptimes = Vec::new();

        for log in logs {
            match &log.kind {
                LogKind::AuraGained { action_id } => {
                    active
                        .entry(action_id.key())
                        .or_insert_with(|| (action_id.clone(), log.timestamp));
                }
                LogKind::AuraFaded { action_id } => {
                    if let Some((id, gained_at)) = active.remove(&action_id.key()) {
                        uptimes.push(AuraUptimeLog {
                            action_id: id,
                            gained_at,
                            faded_at: log.timestamp,
                        });
                    }
                }
                _ => {}
            }
        }

        uptimes.extend(active.into_values().map(|(action_id, gained_at)| AuraUptimeLog {
            action_id,
            gained_at,
            faded_at: end_time.max(gained_at),
        }));
        uptimes.sort_by(|a, b| a.gained_at.total_cmp(&b.gained_at));
        uptimes
    }

    /// Windows covering `timestamp`, gain inclusive and fade exclusive.
    pub fn active_at(uptimes: &[AuraUptimeLog], timestamp: f64) -> Vec<AuraUptimeLog> {
        uptimes
            .iter()
            .filter(|aura| aura.gained_at <= timestamp && timestamp < aura.faded_at)
            .cloned()
            .collect()
    }
}

/// Resource changes of one type that happened at the same timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceChangedLogGroup {
    pub resource_type: ResourceType,
    pub timestamp: f64,
    pub value_before: f64,
    pub value_after: f64,
    pub logs: Vec<Arc<SimLog>>,
    /// Auras active at `timestamp`. Filled for mana only.
    pub active_auras: Vec<AuraUptimeLog>,
}

impl ResourceChangedLogGroup {
    pub fn from_logs(logs: &[Arc<SimLog>]) -> HashMap<ResourceType, Vec<ResourceChangedLogGroup>> {
        let mut grouped: HashMap<ResourceType, Vec<ResourceChangedLogGroup>> = HashMap::new();

        for log in logs {
            let LogKind::ResourceChanged {
                resource_type,
                value_before,
                value_after,
                ..
            } = log.kind
            else {
                continue;
            };

            let groups = grouped.entry(resource_type).or_default();
            match groups.last_mut() {
                Some(group) if group.timestamp == log.timestamp => {
                    group.value_after = value_after;
                    group.logs.push(Arc::clone(log));
                }
                _ => groups.push(ResourceChangedLogGroup {
                    resource_type,
                    timestamp: log.timestamp,
                    value_before,
                    value_after,
                    logs: vec![Arc::clone(log)],
                    active_auras: Vec::new(),
                }),
            }
        }

        grouped
    }
}

/// Cumulative threat after the damage lines at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatLogGroup {
    pub timestamp: f64,
    pub threat_before: f64,
    pub threat_after: f64,
    pub logs: Vec<Arc<SimLog>>,
}

impl ThreatLogGroup {
    pub fn from_logs(logs: &[Arc<SimLog>]) -> Vec<ThreatLogGroup> {
        let mut groups: Vec<ThreatLogGroup> = Vec::new();
        let mut threat = 0.0;

        for log in logs.iter().filter(|l| l.is_damage_dealt()) {
            let before = threat;
            threat += log.threat();
            match groups.last_mut() {
                Some(group) if group.timestamp == log.timestamp => {
                    group.threat_after = threat;
                    group.logs.push(Arc::clone(log));
                }
                _ => groups.push(ThreatLogGroup {
                    timestamp: log.timestamp,
                    threat_before: before,
                    threat_after: threat,
                    logs: vec![Arc::clone(log)],
                }),
            }
        }

        groups
    }
}

/// Seconds of damage averaged into each [`DpsLog`] sample.
pub const DPS_WINDOW: f64 = 15.0;

/// Damage per second over the trailing [`DPS_WINDOW`], sampled at every
/// timestamp where damage was dealt.
#[derive(Debug, Clone, PartialEq)]
pub struct DpsLog {
    pub timestamp: f64,
    pub dps: f64,
    /// Damage lines at `timestamp`.
    pub logs: Vec<Arc<SimLog>>,
    pub active_auras: Vec<AuraUptimeLog>,
}

impl DpsLog {
    pub fn from_logs(logs: &[Arc<SimLog>]) -> Vec<DpsLog> {
        let mut samples: Vec<DpsLog> = Vec::new();
        let mut window: VecDeque<(f64, f64)> = VecDeque::new();
        let mut total = 0.0;

        for log in logs.iter().filter(|l| l.is_damage_dealt()) {
            window.push_back((log.timestamp, log.damage()));
            total += log.damage();
            while let Some(&(at, damage)) = window.front() {
                if at > log.timestamp - DPS_WINDOW {
                    break;
                }
                total -= damage;
                window.pop_front();
            }

            let dps = total / DPS_WINDOW;
            match samples.last_mut() {
                Some(sample) if sample.timestamp == log.timestamp => {
                    sample.dps = dps;
                    sample.logs.push(Arc::clone(log));
                }
                _ => samples.push(DpsLog {
                    timestamp: log.timestamp,
                    dps,
                    logs: vec![Arc::clone(log)],
                    active_auras: Vec::new(),
                }),
            }
        }

        samples
    }
}

/// Every log view a unit exposes.
#[derive(Debug, Clone, Default)]
pub struct UnitLogs {
    pub logs: Vec<Arc<SimLog>>,
    pub damage_dealt: Vec<Arc<SimLog>>,
    pub dps: Vec<DpsLog>,
    pub casts: Vec<CastLog>,
    pub threat: Vec<ThreatLogGroup>,
    pub aura_uptimes: Vec<AuraUptimeLog>,
    pub major_cooldowns: Vec<Arc<SimLog>>,
    /// Aura windows of auras that a major cooldown applied.
    pub major_cooldown_auras: Vec<AuraUptimeLog>,
    pub resources: HashMap<ResourceType, Vec<ResourceChangedLogGroup>>,
}

impl UnitLogs {
    pub fn new(logs: Vec<Arc<SimLog>>, first_iteration_duration: f64) -> Self {
        let damage_dealt: Vec<_> = logs
            .iter()
            .filter(|l| l.is_damage_dealt())
            .cloned()
            .collect();
        let major_cooldowns: Vec<_> = logs
            .iter()
            .filter(|l| l.is_major_cooldown_used())
            .cloned()
            .collect();
        let aura_uptimes = AuraUptimeLog::from_logs(&logs, first_iteration_duration);
        let major_cooldown_auras = aura_uptimes
            .iter()
            .filter(|aura| {
                major_cooldowns
                    .iter()
                    .any(|mcd| mcd.action_id() == Some(&aura.action_id))
            })
            .cloned()
            .collect();

        let mut dps = DpsLog::from_logs(&damage_dealt);
        for sample in &mut dps {
            sample.active_auras = AuraUptimeLog::active_at(&aura_uptimes, sample.timestamp);
        }
        let mut resources = ResourceChangedLogGroup::from_logs(&logs);
        if let Some(mana) = resources.get_mut(&ResourceType::Mana) {
            for group in mana {
                group.active_auras = AuraUptimeLog::active_at(&aura_uptimes, group.timestamp);
            }
        }

        Self {
            casts: CastLog::from_logs(&logs),
            threat: ThreatLogGroup::from_logs(&logs),
            resources,
            damage_dealt,
            dps,
            aura_uptimes,
            major_cooldowns,
            major_cooldown_auras,
            logs,
        }
    }

    /// Threat at the end of the logged iteration.
    pub fn max_threat(&self) -> f64 {
        self.threat.last().map(|t| t.threat_after).unwrap_or(0.0)
    }

    /// Highest trailing-window dps of the logged iteration.
    pub fn peak_dps(&self) -> f64 {
        self.dps.iter().map(|s| s.dps).fold(0.0, f64::max)
    }

    pub fn resource_logs(&self, resource_type: ResourceType) -> &[ResourceChangedLogGroup] {
        self.resources
            .get(&resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::LogParser;

    fn logs(text: &str) -> Vec<Arc<SimLog>> {
        LogParser::new().parse_all(text)
    }

    #[test]
    fn aura_uptimes_pair_and_close_at_end() {
        let logs = logs(
            "[1.00] [Alice (#1)] Aura gained: {SpellID: 10}.\n\
             [5.00] [Alice (#1)] Aura faded: {SpellID: 10}.\n\
             [8.00] [Alice (#1)] Aura gained: {SpellID: 11}.",
        );
        let uptimes = AuraUptimeLog::from_logs(&logs, 20.0);
        assert_eq!(uptimes.len(), 2);
        assert_eq!(uptimes[0].uptime(), 4.0);
        assert_eq!(uptimes[1].action_id.spell_id, 11);
        assert_eq!(uptimes[1].faded_at, 20.0);
    }

    #[test]
    fn casts_pair_with_latest_open_cast() {
        let logs = logs(
            "[0.00] [Alice (#1)] Casting {SpellID: 1} (Cost = 10, Cast Time = 2s, Effective Time = 2s)\n\
             [2.00] [Alice (#1)] Completed cast {SpellID: 1}\n\
             [2.00] [Alice (#1)] Casting {SpellID: 2} (Cost = 0, Cast Time = 0s, Effective Time = 1.5s)",
        );
        let casts = CastLog::from_logs(&logs);
        assert_eq!(casts.len(), 2);
        assert_eq!(casts[0].completed_at, Some(2.0));
        assert_eq!(casts[0].cost, 10.0);
        assert_eq!(casts[1].completed_at, None);
        assert_eq!(casts[1].effective_time, 1.5);
    }

    #[test]
    fn threat_accumulates_by_timestamp() {
        let logs = logs(
            "[1.00] [Alice (#1)] [Target 1] {SpellID: 1} Hit for 100 damage. (Threat: 150)\n\
             [1.00] [Alice (#1)] [Target 1] {SpellID: 2} Hit for 10 damage. (Threat: 50)\n\
             [2.00] [Alice (#1)] [Target 1] {SpellID: 1} Crit for 200 damage. (Threat: 300)",
        );
        let unit_logs = UnitLogs::new(logs, 10.0);
        assert_eq!(unit_logs.threat.len(), 2);
        assert_eq!(unit_logs.threat[0].threat_after, 200.0);
        assert_eq!(unit_logs.threat[1].threat_before, 200.0);
        assert_eq!(unit_logs.max_threat(), 500.0);
        assert_eq!(unit_logs.damage_dealt.len(), 3);
    }

    #[test]
    fn resources_group_by_type_and_time() {
        let logs = logs(
            "[1.00] [Alice (#1)] Gained 10 mana from {OtherID: 2} (100 --> 110)\n\
             [1.00] [Alice (#1)] Spent 30 mana from {SpellID: 5} (110 --> 80)\n\
             [2.00] [Alice (#1)] Gained 15 rage from {OtherID: 6} (0 --> 15)",
        );
        let unit_logs = UnitLogs::new(logs, 10.0);
        let mana = unit_logs.resource_logs(ResourceType::Mana);
        assert_eq!(mana.len(), 1);
        assert_eq!(mana[0].value_before, 100.0);
        assert_eq!(mana[0].value_after, 80.0);
        assert_eq!(unit_logs.resource_logs(ResourceType::Rage).len(), 1);
        assert!(unit_logs.resource_logs(ResourceType::Energy).is_empty());
    }

    #[test]
    fn dps_uses_trailing_window() {
        let logs = logs(
            "[1.00] [Alice (#1)] [Target 1] {SpellID: 1} Hit for 150 damage. (Threat: 150)\n\
             [1.00] [Alice (#1)] [Target 1] {SpellID: 2} Hit for 150 damage. (Threat: 150)\n\
             [10.00] [Alice (#1)] [Target 1] {SpellID: 1} Hit for 600 damage. (Threat: 600)\n\
             [16.00] [Alice (#1)] [Target 1] {SpellID: 1} Miss for 0 damage. (Threat: 0)",
        );
        let samples = DpsLog::from_logs(&logs);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].logs.len(), 2);
        assert_eq!(samples[0].dps, 20.0);
        assert_eq!(samples[1].dps, 60.0);
        // the 1.00 lines fell out of the window
        assert_eq!(samples[2].dps, 40.0);
    }

    #[test]
    fn active_auras_attach_to_dps_and_mana() {
        let logs = logs(
            "[1.00] [Alice (#1)] Aura gained: {SpellID: 10}.\n\
             [2.00] [Alice (#1)] [Target 1] {SpellID: 1} Hit for 150 damage. (Threat: 150)\n\
             [2.00] [Alice (#1)] Spent 30 mana from {SpellID: 1} (110 --> 80)\n\
             [5.00] [Alice (#1)] Aura faded: {SpellID: 10}.\n\
             [5.00] [Alice (#1)] [Target 1] {SpellID: 1} Hit for 150 damage. (Threat: 150)\n\
             [6.00] [Alice (#1)] Gained 15 rage from {OtherID: 6} (0 --> 15)",
        );
        let unit_logs = UnitLogs::new(logs, 10.0);
        assert_eq!(unit_logs.dps.len(), 2);
        assert_eq!(unit_logs.dps[0].active_auras.len(), 1);
        assert_eq!(unit_logs.dps[0].active_auras[0].action_id.spell_id, 10);
        assert!(unit_logs.dps[1].active_auras.is_empty());
        assert_eq!(unit_logs.peak_dps(), 20.0);

        assert_eq!(unit_logs.resource_logs(ResourceType::Mana)[0].active_auras.len(), 1);
        assert!(unit_logs.resource_logs(ResourceType::Rage)[0].active_auras.is_empty());
    }

    #[test]
    fn major_cooldown_auras_follow_cooldown_ids() {
        let logs = logs(
            "[1.00] [Alice (#1)] Major cooldown used: {SpellID: 12472}.\n\
             [1.00] [Alice (#1)] Aura gained: {SpellID: 12472}.\n\
             [1.00] [Alice (#1)] Aura gained: {SpellID: 99}.\n\
             [21.00] [Alice (#1)] Aura faded: {SpellID: 12472}.",
        );
        let unit_logs = UnitLogs::new(logs, 30.0);
        assert_eq!(unit_logs.aura_uptimes.len(), 2);
        assert_eq!(unit_logs.major_cooldown_auras.len(), 1);
        assert_eq!(unit_logs.major_cooldown_auras[0].uptime(), 20.0);
    }
}
