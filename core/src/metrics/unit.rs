use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, try_join_all};
use raidsim_types::{
    ActionIdProto, DistributionMetrics, Player, ResourceType, Target, UnitMetricsProto,
};
use tracing::debug;

use super::{ActionMetrics, AuraMetrics, MetricsError, ResourceMetrics, ResultContext};
use crate::action_id::{ActionId, IdentityResolver};
use crate::combat_log::{SimLog, UnitLogs};
use crate::result::ResultFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Player,
    Pet,
    Target,
}

/// Identity of a unit, shared by the unit and every metric it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    /// Raid index for players and pets (owner's index), encounter index for
    /// targets.
    pub index: i32,
    /// Index assigned by the simulation, unique across the result.
    pub unit_index: i32,
    pub name: String,
    pub kind: UnitKind,
    pub pet_action_id: Option<ActionId>,
    pub in_front_of_target: bool,
}

impl UnitInfo {
    pub fn label(&self) -> String {
        match self.kind {
            UnitKind::Target => self.name.clone(),
            UnitKind::Player | UnitKind::Pet => format!("{} (#{})", self.name, self.index + 1),
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == UnitKind::Player
    }

    pub fn is_pet(&self) -> bool {
        self.kind == UnitKind::Pet
    }

    pub fn is_target(&self) -> bool {
        self.kind == UnitKind::Target
    }

    /// Unit index of the opposing side selected by `filter`.
    ///
    /// Players and pets read the filter's target, targets read its player.
    /// Unset and `-1` select nothing.
    pub fn target_index(&self, filter: &ResultFilter) -> Option<i32> {
        let index = if self.is_target() {
            filter.player
        } else {
            filter.target
        };
        index.filter(|&i| i != -1)
    }
}

/// One player, pet or encounter target with everything it did.
#[derive(Debug, Clone)]
pub struct UnitMetrics {
    pub info: Arc<UnitInfo>,
    pub dps: DistributionMetrics,
    pub dpasp: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub tps: DistributionMetrics,
    pub dtps: DistributionMetrics,
    pub tmi: DistributionMetrics,
    pub tto: DistributionMetrics,
    pub actions: Vec<ActionMetrics>,
    pub auras: Vec<AuraMetrics>,
    pub resources: Vec<ResourceMetrics>,
    pub pets: Vec<UnitMetrics>,
    pub logs: UnitLogs,
    seconds_oom_avg: f64,
    chance_of_death: f64,
    context: ResultContext,
}

async fn resolve(
    id: &ActionIdProto,
    resolver: &dyn IdentityResolver,
    player_index: Option<i32>,
) -> Result<ActionId, MetricsError> {
    Ok(ActionId::from_proto(id).fill(resolver, player_index).await?)
}

impl UnitMetrics {
    #[allow(clippy::too_many_arguments)]
    fn assemble(
        info: Arc<UnitInfo>,
        metrics: &UnitMetricsProto,
        actions: Vec<ActionMetrics>,
        auras: Vec<AuraMetrics>,
        resources: Vec<ResourceMetrics>,
        pets: Vec<UnitMetrics>,
        logs: Vec<Arc<SimLog>>,
        context: ResultContext,
    ) -> Self {
        Self {
            info,
            dps: metrics.dps.clone(),
            dpasp: metrics.dpasp.clone(),
            hps: metrics.hps.clone(),
            tps: metrics.threat.clone(),
            dtps: metrics.dtps.clone(),
            tmi: metrics.tmi.clone(),
            tto: metrics.tto.clone(),
            actions,
            auras,
            resources,
            pets,
            logs: UnitLogs::new(logs, context.first_iteration_duration),
            seconds_oom_avg: metrics.seconds_oom_avg,
            chance_of_death: metrics.chance_of_death,
            context,
        }
    }

    /// Builds a player, or a pet when `is_pet` is set, with its pets.
    ///
    /// Every action, aura and resource id of the unit is resolved
    /// concurrently; pets are built with their owner's `raid_index`.
    pub(crate) fn make_new_player<'a>(
        resolver: &'a dyn IdentityResolver,
        context: ResultContext,
        player: &'a Player,
        metrics: &'a UnitMetricsProto,
        raid_index: i32,
        is_pet: bool,
        logs: &'a [Arc<SimLog>],
    ) -> BoxFuture<'a, Result<UnitMetrics, MetricsError>> {
        async move {
            let pet_name = is_pet.then_some(metrics.name.as_str());
            let unit_logs: Vec<Arc<SimLog>> = logs
                .iter()
                .filter(|log| log.is_from_player(raid_index, pet_name))
                .cloned()
                .collect();
            let pet_logs: Vec<Arc<SimLog>> = logs
                .iter()
                .filter(|log| log.is_from_pet_of(raid_index))
                .cloned()
                .collect();

            let player_index = Some(raid_index);
            let (action_ids, aura_ids, resource_ids, pets, pet_action_id) = tokio::try_join!(
                try_join_all(metrics.actions.iter().map(|a| resolve(&a.id, resolver, player_index))),
                try_join_all(metrics.auras.iter().map(|a| resolve(&a.id, resolver, player_index))),
                try_join_all(metrics.resources.iter().map(|r| resolve(&r.id, resolver, player_index))),
                try_join_all(metrics.pets.iter().map(|pet| {
                    Self::make_new_player(resolver, context, player, pet, raid_index, true, &pet_logs)
                })),
                async {
                    if is_pet {
                        let id = ActionId::from_pet_name(&metrics.name);
                        Ok::<_, MetricsError>(Some(id.fill(resolver, player_index).await?))
                    } else {
                        Ok(None)
                    }
                },
            )?;

            let info = Arc::new(UnitInfo {
                index: raid_index,
                unit_index: metrics.unit_index,
                name: metrics.name.clone(),
                kind: if is_pet { UnitKind::Pet } else { UnitKind::Player },
                pet_action_id,
                in_front_of_target: !is_pet && player.in_front_of_target,
            });

            let resources: Vec<ResourceMetrics> = metrics
                .resources
                .iter()
                .zip(resource_ids)
                .map(|(data, id)| ResourceMetrics::new(Some(Arc::clone(&info)), id, data.clone(), context))
                .collect();
            let actions = metrics
                .actions
                .iter()
                .zip(action_ids)
                .map(|(data, id)| {
                    let matching = resources.iter().filter(|r| r.action_id == id).cloned().collect();
                    ActionMetrics::new(Some(Arc::clone(&info)), id, data.clone(), context, matching)
                })
                .collect();
            let auras = metrics
                .auras
                .iter()
                .zip(aura_ids)
                .map(|(data, id)| AuraMetrics::new(Some(Arc::clone(&info)), id, data.clone(), context))
                .collect();

            debug!(
                unit = %info.label(),
                unit_index = info.unit_index,
                pets = pets.len(),
                logs = unit_logs.len(),
                "Built player metrics"
            );
            Ok(Self::assemble(info, metrics, actions, auras, resources, pets, unit_logs, context))
        }
        .boxed()
    }

    /// Builds the encounter target at `index`.
    pub(crate) async fn make_new_target(
        resolver: &dyn IdentityResolver,
        context: ResultContext,
        target: &Target,
        metrics: &UnitMetricsProto,
        index: i32,
        logs: &[Arc<SimLog>],
    ) -> Result<UnitMetrics, MetricsError> {
        let unit_logs: Vec<Arc<SimLog>> = logs.iter().filter(|log| log.is_from_target(index)).cloned().collect();

        let (action_ids, aura_ids) = tokio::try_join!(
            try_join_all(metrics.actions.iter().map(|a| resolve(&a.id, resolver, Some(index)))),
            try_join_all(metrics.auras.iter().map(|a| resolve(&a.id, resolver, None))),
        )?;

        let name = if metrics.name.is_empty() {
            target.name.clone()
        } else {
            metrics.name.clone()
        };
        let info = Arc::new(UnitInfo {
            index,
            unit_index: metrics.unit_index,
            name,
            kind: UnitKind::Target,
            pet_action_id: None,
            in_front_of_target: true,
        });

        let actions = metrics
            .actions
            .iter()
            .zip(action_ids)
            .map(|(data, id)| ActionMetrics::new(Some(Arc::clone(&info)), id, data.clone(), context, Vec::new()))
            .collect();
        let auras = metrics
            .auras
            .iter()
            .zip(aura_ids)
            .map(|(data, id)| AuraMetrics::new(Some(Arc::clone(&info)), id, data.clone(), context))
            .collect();

        debug!(unit = %info.label(), unit_index = info.unit_index, "Built target metrics");
        Ok(Self::assemble(info, metrics, actions, auras, Vec::new(), Vec::new(), unit_logs, context))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn index(&self) -> i32 {
        self.info.index
    }

    pub fn unit_index(&self) -> i32 {
        self.info.unit_index
    }

    pub fn label(&self) -> String {
        self.info.label()
    }

    pub fn is_player(&self) -> bool {
        self.info.is_player()
    }

    pub fn is_pet(&self) -> bool {
        self.info.is_pet()
    }

    pub fn is_target(&self) -> bool {
        self.info.is_target()
    }

    pub fn in_front_of_target(&self) -> bool {
        self.info.in_front_of_target
    }

    pub fn target_index(&self, filter: &ResultFilter) -> Option<i32> {
        self.info.target_index(filter)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rollups
    // ─────────────────────────────────────────────────────────────────────────

    /// Chance of death in percent, with the binomial standard error as stdev.
    pub fn chance_of_death(&self) -> DistributionMetrics {
        let p = self.chance_of_death.clamp(0.0, 1.0);
        let err = ((p * (1.0 - p)).abs() / self.context.iterations).sqrt();
        DistributionMetrics::with_avg(p * 100.0, err * 100.0)
    }

    pub fn max_threat(&self) -> f64 {
        self.logs.max_threat()
    }

    pub fn seconds_oom_avg(&self) -> f64 {
        self.seconds_oom_avg
    }

    pub fn total_damage(&self) -> f64 {
        self.dps.avg * self.context.duration
    }

    pub fn total_damage_taken(&self) -> f64 {
        self.dtps.avg * self.context.duration
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action Views
    // ─────────────────────────────────────────────────────────────────────────

    /// Own actions followed by every pet's, recursively.
    pub fn player_and_pet_actions(&self) -> Vec<ActionMetrics> {
        let mut actions = self.actions.clone();
        for pet in &self.pets {
            actions.extend(pet.player_and_pet_actions());
        }
        actions
    }

    fn display_actions(&self) -> impl Iterator<Item = &ActionMetrics> {
        self.actions
            .iter()
            .filter(|a| a.hit_attempts() != 0.0 || a.tps() != 0.0 || a.dps() != 0.0)
    }

    fn is_damage(action: &ActionMetrics) -> bool {
        action.dps() != 0.0 && action.hps() == 0.0
    }

    pub fn melee_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions().filter(|a| a.is_melee()).collect()
    }

    pub fn melee_damage_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions()
            .filter(|a| a.is_melee() && Self::is_damage(a))
            .collect()
    }

    pub fn spell_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions().filter(|a| !a.is_melee()).collect()
    }

    pub fn spell_damage_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions()
            .filter(|a| !a.is_melee() && Self::is_damage(a))
            .collect()
    }

    pub fn damage_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions().filter(|a| Self::is_damage(a)).collect()
    }

    pub fn threat_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions()
            .filter(|a| a.tps() != 0.0 && a.hps() == 0.0)
            .collect()
    }

    pub fn healing_actions(&self) -> Vec<&ActionMetrics> {
        self.display_actions().collect()
    }

    pub fn resource_metrics(&self, resource_type: ResourceType) -> Vec<&ResourceMetrics> {
        self.resources
            .iter()
            .filter(|r| r.resource_type() == resource_type)
            .collect()
    }
}
