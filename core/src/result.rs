//! The top-level result: a request/result pair plus its derived metrics tree.

use std::sync::Arc;

use raidsim_types::{DistributionMetrics, RaidSimRequest, RaidSimResult, ResourceType, SimRun};
use tracing::info;

use crate::action_id::IdentityResolver;
use crate::combat_log::{LogParser, SimLog};
use crate::metrics::{
    ActionMetrics, AuraMetrics, EncounterMetrics, MetricsError, RaidMetrics, ResourceMetrics,
    ResultContext, UnitMetrics,
};

/// Selects a player, a target, or both for a query.
///
/// Both fields hold unit indices, except for [`SimResult::raid_indexed_players`]
/// and [`SimResult::raid_indexed_action_metrics`] where `player` is a raid
/// index. `-1` counts as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub player: Option<i32>,
    pub target: Option<i32>,
}

impl ResultFilter {
    /// Every player against every target.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn player(player: i32) -> Self {
        Self {
            player: Some(player),
            target: None,
        }
    }

    pub fn target(target: i32) -> Self {
        Self {
            player: None,
            target: Some(target),
        }
    }

    pub fn player_vs_target(player: i32, target: i32) -> Self {
        Self {
            player: Some(player),
            target: Some(target),
        }
    }

    fn selected_player(&self) -> Option<i32> {
        self.player.filter(|&p| p != -1)
    }

    fn selected_target(&self) -> Option<i32> {
        self.target.filter(|&t| t != -1)
    }
}

/// A simulation result with every unit, action, aura and resource resolved.
///
/// Only [`SimResult::make_new`] and [`SimResult::from_proto`] construct one;
/// the tree is immutable afterwards.
#[derive(Debug, Clone)]
pub struct SimResult {
    pub request: RaidSimRequest,
    pub result: RaidSimResult,
    pub raid_metrics: RaidMetrics,
    pub encounter_metrics: EncounterMetrics,
    pub logs: Vec<Arc<SimLog>>,
    context: ResultContext,
}

impl SimResult {
    /// Parses the logs, then builds the raid and encounter trees concurrently.
    /// The first failed id lookup aborts the whole build.
    pub async fn make_new(
        request: RaidSimRequest,
        result: RaidSimResult,
        resolver: &dyn IdentityResolver,
    ) -> Result<SimResult, MetricsError> {
        let timer = std::time::Instant::now();
        let context = ResultContext::new(&request, &result);
        let logs = LogParser::new().parse_all(&result.logs);

        let (raid_metrics, encounter_metrics) = tokio::try_join!(
            RaidMetrics::make_new(resolver, context, &request.raid, &result.raid_metrics, &logs),
            EncounterMetrics::make_new(
                resolver,
                context,
                &request.encounter,
                &result.encounter_metrics,
                &logs
            ),
        )?;

        info!(
            players = raid_metrics.players().count(),
            targets = encounter_metrics.targets.len(),
            logs = logs.len(),
            elapsed_ms = timer.elapsed().as_millis() as u64,
            "Sim result built"
        );

        Ok(Self {
            request,
            result,
            raid_metrics,
            encounter_metrics,
            logs,
            context,
        })
    }

    pub async fn from_proto(run: SimRun, resolver: &dyn IdentityResolver) -> Result<SimResult, MetricsError> {
        Self::make_new(run.request, run.result, resolver).await
    }

    pub fn to_proto(&self) -> SimRun {
        SimRun {
            request: self.request.clone(),
            result: self.result.clone(),
        }
    }

    pub fn iterations(&self) -> f64 {
        self.context.iterations
    }

    pub fn duration(&self) -> f64 {
        self.context.duration
    }

    pub fn first_iteration_duration(&self) -> f64 {
        self.context.first_iteration_duration
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Units
    // ─────────────────────────────────────────────────────────────────────────

    fn all_players(&self) -> impl Iterator<Item = &UnitMetrics> {
        self.raid_metrics.players()
    }

    fn units(&self) -> impl Iterator<Item = &UnitMetrics> {
        self.all_players().chain(self.encounter_metrics.targets.iter())
    }

    /// All players, or the unit whose unit index is `filter.player`.
    pub fn players(&self, filter: &ResultFilter) -> Vec<&UnitMetrics> {
        match filter.selected_player() {
            Some(index) => self.unit_with_index(index).into_iter().collect(),
            None => self.all_players().collect(),
        }
    }

    /// All players, or the player whose raid index is `filter.player`.
    pub fn raid_indexed_players(&self, filter: &ResultFilter) -> Vec<&UnitMetrics> {
        match filter.selected_player() {
            Some(index) => self.player_with_raid_index(index).into_iter().collect(),
            None => self.all_players().collect(),
        }
    }

    /// First player regardless of party or slot.
    pub fn first_player(&self) -> Option<&UnitMetrics> {
        self.all_players().next()
    }

    pub fn player_with_index(&self, unit_index: i32) -> Option<&UnitMetrics> {
        self.all_players().find(|p| p.unit_index() == unit_index)
    }

    pub fn player_with_raid_index(&self, raid_index: i32) -> Option<&UnitMetrics> {
        self.all_players().find(|p| p.index() == raid_index)
    }

    /// All targets, or the unit whose unit index is `filter.target`.
    pub fn targets(&self, filter: &ResultFilter) -> Vec<&UnitMetrics> {
        match filter.selected_target() {
            Some(index) => self.unit_with_index(index).into_iter().collect(),
            None => self.encounter_metrics.targets.iter().collect(),
        }
    }

    pub fn target_with_index(&self, unit_index: i32) -> Option<&UnitMetrics> {
        self.encounter_metrics
            .targets
            .iter()
            .find(|t| t.unit_index() == unit_index)
    }

    pub fn target_with_encounter_index(&self, index: i32) -> Option<&UnitMetrics> {
        self.encounter_metrics.targets.iter().find(|t| t.index() == index)
    }

    pub fn unit_with_index(&self, unit_index: i32) -> Option<&UnitMetrics> {
        self.units().find(|u| u.unit_index() == unit_index)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Metrics Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The selected player's dps, or the raid's when no player is selected.
    pub fn damage_metrics(&self, filter: &ResultFilter) -> DistributionMetrics {
        match filter.selected_player() {
            Some(index) => self
                .player_with_index(index)
                .map(|p| p.dps.clone())
                .unwrap_or_default(),
            None => self.raid_metrics.dps.clone(),
        }
    }

    fn actions_of(
        players: Vec<&UnitMetrics>,
        filter: &ResultFilter,
    ) -> Result<Vec<ActionMetrics>, MetricsError> {
        let actions = players
            .into_iter()
            .flat_map(|p| p.player_and_pet_actions())
            .map(|a| a.for_target(filter))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ActionMetrics::join_by_id(actions, false))
    }

    /// One row per distinct action of the selected players and their pets,
    /// restricted to the selected target.
    pub fn action_metrics(&self, filter: &ResultFilter) -> Result<Vec<ActionMetrics>, MetricsError> {
        Self::actions_of(self.players(filter), filter)
    }

    pub fn raid_indexed_action_metrics(
        &self,
        filter: &ResultFilter,
    ) -> Result<Vec<ActionMetrics>, MetricsError> {
        Self::actions_of(self.raid_indexed_players(filter), filter)
    }

    pub fn actions_for_player(&self, unit_index: i32) -> Result<Vec<ActionMetrics>, MetricsError> {
        self.action_metrics(&ResultFilter::player(unit_index))
    }

    pub fn actions_for_player_vs_target(
        &self,
        player: i32,
        target: i32,
    ) -> Result<Vec<ActionMetrics>, MetricsError> {
        self.action_metrics(&ResultFilter::player_vs_target(player, target))
    }

    pub fn spell_metrics(&self, filter: &ResultFilter) -> Result<Vec<ActionMetrics>, MetricsError> {
        Ok(self
            .action_metrics(filter)?
            .into_iter()
            .filter(|a| a.hit_attempts() != 0.0 && !a.is_melee())
            .collect())
    }

    pub fn melee_metrics(&self, filter: &ResultFilter) -> Result<Vec<ActionMetrics>, MetricsError> {
        Ok(self
            .action_metrics(filter)?
            .into_iter()
            .filter(|a| a.hit_attempts() != 0.0 && a.is_melee())
            .collect())
    }

    pub fn resource_metrics(&self, resource_type: ResourceType, filter: &ResultFilter) -> Vec<ResourceMetrics> {
        let resources = self
            .players(filter)
            .into_iter()
            .flat_map(|p| p.resource_metrics(resource_type))
            .cloned()
            .collect();
        ResourceMetrics::join_by_id(resources, false)
    }

    pub fn buff_metrics(&self, filter: &ResultFilter) -> Vec<AuraMetrics> {
        let auras = self
            .players(filter)
            .into_iter()
            .flat_map(|p| p.auras.iter().cloned())
            .collect();
        AuraMetrics::join_by_id(auras, false)
    }

    /// Target auras with nonzero uptime.
    pub fn debuff_metrics(&self, filter: &ResultFilter) -> Vec<AuraMetrics> {
        let auras = self
            .targets(filter)
            .into_iter()
            .flat_map(|t| t.auras.iter().cloned())
            .collect();
        AuraMetrics::join_by_id(auras, false)
            .into_iter()
            .filter(|a| a.uptime_percent() != 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests;
