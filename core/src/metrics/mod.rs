//! Derived statistics over a simulation result.
//!
//! The tree mirrors the result message: raid → party → unit → action →
//! per-target slice, plus encounter targets. Every node is built once by
//! [`crate::SimResult::make_new`] and is immutable afterwards.

mod action;
mod aura;
pub mod breakdown;
mod error;
mod raid;
mod resource;
mod targeted;
mod unit;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod unit_tests;

use std::hash::Hash;
use std::sync::Arc;

use hashbrown::HashMap;
use raidsim_types::{RaidSimRequest, RaidSimResult};

use crate::action_id::ActionId;

pub use action::{ActionMetrics, DamageDone, DamageSlice};
pub use aura::AuraMetrics;
pub use error::MetricsError;
pub use raid::{EncounterMetrics, PARTY_SIZE, PartyMetrics, RaidMetrics};
pub use resource::ResourceMetrics;
pub use targeted::TargetedActionMetrics;
pub use unit::{UnitInfo, UnitKind, UnitMetrics};

// ─────────────────────────────────────────────────────────────────────────────
// Normalization Context
// ─────────────────────────────────────────────────────────────────────────────

/// Values from the request/result pair that every metric normalizes against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultContext {
    pub iterations: f64,
    /// Average iteration duration in seconds.
    pub duration: f64,
    pub first_iteration_duration: f64,
    pub raid_dps_avg: f64,
    pub raid_hps_avg: f64,
    /// Threat of the first player of the first party, the tank reference for
    /// threat shares.
    pub first_player_threat_avg: f64,
}

impl Default for ResultContext {
    fn default() -> Self {
        Self {
            iterations: 1.0,
            duration: 1.0,
            first_iteration_duration: 1.0,
            raid_dps_avg: 0.0,
            raid_hps_avg: 0.0,
            first_player_threat_avg: 0.0,
        }
    }
}

impl ResultContext {
    /// Zero iterations or durations fall back to 1.
    pub fn new(request: &RaidSimRequest, result: &RaidSimResult) -> Self {
        let or_one = |v: f64| if v == 0.0 { 1.0 } else { v };
        let raid = &result.raid_metrics;
        Self {
            iterations: or_one(request.sim_options.iterations as f64),
            duration: or_one(result.avg_iteration_duration),
            first_iteration_duration: or_one(result.first_iteration_duration),
            raid_dps_avg: raid.dps.avg,
            raid_hps_avg: raid.hps.avg,
            first_player_threat_avg: raid
                .parties
                .first()
                .and_then(|p| p.players.first())
                .map(|p| p.threat.avg)
                .unwrap_or(0.0),
        }
    }
}

/// Options for merging metrics of the same identity.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub remove_tag: bool,
    pub action_id_override: Option<ActionId>,
}

impl MergeOptions {
    pub fn remove_tag() -> Self {
        Self {
            remove_tag: true,
            action_id_override: None,
        }
    }

    pub(crate) fn resolve_id(&self, first: &ActionId) -> ActionId {
        let id = self.action_id_override.as_ref().unwrap_or(first);
        if self.remove_tag {
            id.without_tag()
        } else {
            id.clone()
        }
    }
}

/// Buckets items by key, keeping first-seen order of both buckets and items.
pub(crate) fn bucket<T, K: Eq + Hash>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<Vec<T>> {
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<T>> = Vec::new();
    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&pos) => groups[pos].push(item),
            None => {
                positions.insert(k, groups.len());
                groups.push(vec![item]);
            }
        }
    }
    groups
}

/// The unit shared by every input, or `None` when they differ.
pub(crate) fn shared_unit<'a>(
    mut units: impl Iterator<Item = &'a Option<Arc<UnitInfo>>>,
) -> Option<Arc<UnitInfo>> {
    let first = units.next()?.clone()?;
    units
        .all(|u| u.as_ref().is_some_and(|u| Arc::ptr_eq(u, &first)))
        .then_some(first)
}
