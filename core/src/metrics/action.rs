use std::sync::Arc;

use hashbrown::HashMap;
use raidsim_types::{ActionMetricsProto, ResourceType, SpellSchool, TargetedActionMetricsProto};

use super::{
    MergeOptions, MetricsError, ResourceMetrics, ResultContext, TargetedActionMetrics, UnitInfo, bucket,
    shared_unit,
};
use crate::action_id::ActionId;
use crate::result::ResultFilter;

/// All statistics for one identified action of one unit.
///
/// `targets()` holds one slice per target the action hit; `combined()` is
/// their sum. Getters defined here apply action-level rules (passive actions report
/// no casts, pet actions without a spell report no throughput); everything
/// else is available on `combined()`.
#[derive(Debug, Clone)]
pub struct ActionMetrics {
    pub unit: Option<Arc<UnitInfo>>,
    pub action_id: ActionId,
    targets: Vec<TargetedActionMetrics>,
    /// Resource metrics of the owning unit that share this action's id.
    resources: Vec<ResourceMetrics>,
    data: ActionMetricsProto,
    combined: TargetedActionMetrics,
    context: ResultContext,
}

/// One category of [`DamageDone`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageSlice {
    /// Average damage per iteration in this category.
    pub value: f64,
    /// Share of the action's average damage.
    pub percentage: f64,
    /// Average damage per event in this category.
    pub average: f64,
}

/// Average damage split into mutually exclusive outcome categories.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageDone {
    pub hit: DamageSlice,
    pub resisted_hit: DamageSlice,
    pub crit_hit: DamageSlice,
    pub resisted_crit_hit: DamageSlice,
    pub tick: DamageSlice,
    pub resisted_tick: DamageSlice,
    pub crit_tick: DamageSlice,
    pub resisted_crit_tick: DamageSlice,
    pub glance: DamageSlice,
    pub block: DamageSlice,
    pub blocked_crit: DamageSlice,
    pub crush: DamageSlice,
}

impl DamageDone {
    pub fn slices(&self) -> [(&'static str, DamageSlice); 12] {
        [
            ("Hit", self.hit),
            ("Resisted Hit", self.resisted_hit),
            ("Critical Hit", self.crit_hit),
            ("Resisted Critical Hit", self.resisted_crit_hit),
            ("Tick", self.tick),
            ("Resisted Tick", self.resisted_tick),
            ("Critical Tick", self.crit_tick),
            ("Resisted Critical Tick", self.resisted_crit_tick),
            ("Glancing Blow", self.glance),
            ("Blocked Hit", self.block),
            ("Blocked Critical Hit", self.blocked_crit),
            ("Crushing Blow", self.crush),
        ]
    }

    pub fn total(&self) -> f64 {
        self.slices().iter().map(|(_, s)| s.value).sum()
    }
}

fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

impl ActionMetrics {
    pub fn new(
        unit: Option<Arc<UnitInfo>>,
        action_id: ActionId,
        data: ActionMetricsProto,
        context: ResultContext,
        resources: Vec<ResourceMetrics>,
    ) -> Self {
        let targets: Vec<TargetedActionMetrics> = data
            .targets
            .iter()
            .map(|t| TargetedActionMetrics::new(t.clone(), context.iterations, context.duration))
            .collect();
        let combined = TargetedActionMetrics::merge(&targets);

        Self {
            unit,
            action_id,
            targets,
            resources,
            data,
            combined,
            context,
        }
    }

    /// Sum of every target slice, without action-level rules applied.
    pub fn combined(&self) -> &TargetedActionMetrics {
        &self.combined
    }

    pub fn to_proto(&self) -> &ActionMetricsProto {
        &self.data
    }

    pub fn targets(&self) -> &[TargetedActionMetrics] {
        &self.targets
    }

    /// Resource metrics of the owning unit that share this action's id.
    pub fn resources(&self) -> &[ResourceMetrics] {
        &self.resources
    }

    pub fn name(&self) -> &str {
        &self.action_id.name
    }

    pub fn icon_url(&self) -> &str {
        &self.action_id.icon_url
    }

    pub fn spell_school(&self) -> Option<SpellSchool> {
        self.data.spell_school
    }

    pub fn is_melee(&self) -> bool {
        self.data.is_melee
    }

    pub fn is_passive(&self) -> bool {
        self.data.is_passive
    }

    fn is_pet_without_spell(&self) -> bool {
        self.unit.as_ref().is_some_and(|u| u.is_pet()) && self.action_id.spell_id == 0
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Totals and Shares
    // ─────────────────────────────────────────────────────────────────────────

    pub fn damage(&self) -> f64 {
        self.combined.damage()
    }

    pub fn avg_damage(&self) -> f64 {
        self.combined.avg_damage()
    }

    pub fn dps(&self) -> f64 {
        self.combined.dps()
    }

    pub fn avg_threat(&self) -> f64 {
        self.combined.avg_threat()
    }

    pub fn tps(&self) -> f64 {
        self.combined.tps()
    }

    pub fn healing(&self) -> f64 {
        self.combined.healing()
    }

    pub fn avg_healing(&self) -> f64 {
        self.combined.healing() / self.context.iterations
    }

    pub fn avg_crit_healing(&self) -> f64 {
        self.combined.crit_healing() / self.context.iterations
    }

    pub fn hps(&self) -> f64 {
        self.combined.hps()
    }

    fn share(value: f64, total_rate: f64, duration: f64) -> Option<f64> {
        (total_rate != 0.0).then(|| value / (total_rate * duration) * 100.0)
    }

    /// Share of the raid's damage, `None` when the raid dealt none.
    pub fn total_damage_percent(&self) -> Option<f64> {
        Self::share(self.avg_damage(), self.context.raid_dps_avg, self.context.duration)
    }

    /// Share of the first player's threat.
    pub fn total_threat_percent(&self) -> Option<f64> {
        Self::share(
            self.avg_threat(),
            self.context.first_player_threat_avg,
            self.context.duration,
        )
    }

    pub fn total_healing_percent(&self) -> Option<f64> {
        Self::share(self.avg_healing(), self.context.raid_hps_avg, self.context.duration)
    }

    /// Damage of plain hits, with ticks and every special outcome removed.
    pub fn avg_hit_damage(&self) -> f64 {
        let c = &self.combined;
        c.avg_damage() - c.avg_tick_damage() - c.avg_crit_damage() + c.avg_crit_tick_damage()
            - c.avg_glance_damage()
            - c.avg_block_damage()
            - c.avg_blocked_crit_damage()
            - c.avg_crush_damage()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Casts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn casts(&self) -> f64 {
        if self.is_passive() { 0.0 } else { self.combined.casts() }
    }

    pub fn casts_per_minute(&self) -> f64 {
        if self.is_passive() {
            0.0
        } else {
            self.combined.casts_per_minute()
        }
    }

    pub fn avg_cast_time_ms(&self) -> f64 {
        if self.is_passive() {
            0.0
        } else {
            self.combined.avg_cast_time_ms()
        }
    }

    pub fn avg_cast(&self) -> f64 {
        if self.is_passive() { 0.0 } else { self.combined.avg_cast() }
    }

    pub fn avg_cast_hit(&self) -> f64 {
        let avg_cast = self.combined.avg_cast();
        if avg_cast == 0.0 {
            return 0.0;
        }
        avg_cast - self.combined.avg_cast_tick()
    }

    pub fn avg_cast_healing(&self) -> f64 {
        if self.is_passive() {
            0.0
        } else {
            self.combined.avg_cast_healing()
        }
    }

    pub fn avg_cast_threat(&self) -> f64 {
        if self.is_passive() {
            0.0
        } else {
            self.combined.avg_cast_threat()
        }
    }

    /// Healing per point of mana spent, 0 without mana metrics.
    pub fn hpm(&self) -> f64 {
        let total_healing = self.combined.hps() * self.context.duration;
        self.resources
            .iter()
            .find(|r| r.resource_type() == ResourceType::Mana)
            .map(|mana| total_healing / -mana.gain())
            .unwrap_or(0.0)
    }

    pub fn damage_throughput(&self) -> f64 {
        if self.is_pet_without_spell() {
            return 0.0;
        }
        self.combined.damage_throughput()
    }

    pub fn threat_throughput(&self) -> f64 {
        if self.is_pet_without_spell() {
            return 0.0;
        }
        self.combined.threat_throughput()
    }

    pub fn healing_throughput(&self) -> f64 {
        self.combined.healing_throughput()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outcomes
    // ─────────────────────────────────────────────────────────────────────────

    pub fn hit_attempts(&self) -> f64 {
        self.combined.hit_attempts()
    }

    pub fn landed_hits(&self) -> f64 {
        self.combined.landed_hits()
    }

    pub fn crit_percent(&self) -> f64 {
        self.combined.crit_percent()
    }

    pub fn total_misses_percent(&self) -> f64 {
        self.combined.total_misses_percent()
    }

    /// Average damage split into outcome categories.
    ///
    /// Resisted, crit and tick totals overlap upstream, so the exclusive
    /// categories are recovered by subtraction and rounded to 8 decimals.
    /// Values sum back to `avg_damage()`.
    pub fn damage_done(&self) -> DamageDone {
        let c = &self.combined;
        let avg_damage = c.avg_damage();

        let hit = round8(
            avg_damage - c.avg_resisted_damage() + c.avg_resisted_tick_damage() + c.avg_resisted_crit_damage()
                - c.avg_resisted_crit_tick_damage()
                - c.avg_crit_damage()
                + c.avg_crit_tick_damage()
                - c.avg_tick_damage()
                - c.avg_glance_damage()
                - c.avg_block_damage()
                - c.avg_blocked_crit_damage()
                - c.avg_crush_damage(),
        );
        let resisted_hit = round8(
            c.avg_resisted_damage() - c.avg_resisted_crit_damage() - c.avg_resisted_tick_damage()
                + c.avg_resisted_crit_tick_damage(),
        );
        let crit_hit = round8(
            c.avg_crit_damage() - c.avg_resisted_crit_damage() - c.avg_crit_tick_damage()
                + c.avg_resisted_crit_tick_damage(),
        );
        let resisted_crit_hit = round8(c.avg_resisted_crit_damage() - c.avg_resisted_crit_tick_damage());
        let tick = round8(
            c.avg_tick_damage() - c.avg_crit_tick_damage() - c.avg_resisted_tick_damage()
                + c.avg_resisted_crit_tick_damage(),
        );
        let resisted_tick = round8(c.avg_resisted_tick_damage() - c.avg_resisted_crit_tick_damage());
        let crit_tick = round8(c.avg_crit_tick_damage() - c.avg_resisted_crit_tick_damage());

        let slice = |value: f64, events: f64| DamageSlice {
            value,
            percentage: value / avg_damage * 100.0,
            average: value / events,
        };

        DamageDone {
            hit: slice(hit, c.hits() - c.resisted_hits()),
            resisted_hit: slice(resisted_hit, c.resisted_hits()),
            crit_hit: slice(crit_hit, c.crits() - c.resisted_crits()),
            resisted_crit_hit: slice(resisted_crit_hit, c.resisted_crits()),
            tick: slice(tick, c.ticks() - c.resisted_ticks()),
            resisted_tick: slice(resisted_tick, c.resisted_ticks()),
            crit_tick: slice(crit_tick, c.crit_ticks() - c.resisted_crit_ticks()),
            resisted_crit_tick: slice(c.avg_resisted_crit_tick_damage(), c.resisted_crit_ticks()),
            glance: slice(c.avg_glance_damage(), c.glances()),
            block: slice(c.avg_block_damage(), c.blocks()),
            blocked_crit: slice(c.avg_blocked_crit_damage(), c.blocked_crits()),
            crush: slice(c.avg_crush_damage(), c.crushes()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Targeting and Merging
    // ─────────────────────────────────────────────────────────────────────────

    /// This action restricted to the target selected by `filter`.
    ///
    /// Returns a copy of the whole action when the filter selects no target
    /// from this unit's side, or when the action has no single owning unit.
    pub fn for_target(&self, filter: &ResultFilter) -> Result<ActionMetrics, MetricsError> {
        let Some(unit_index) = self.unit.as_ref().and_then(|u| u.target_index(filter)) else {
            return Ok(self.clone());
        };

        let target = self
            .targets
            .iter()
            .find(|t| t.unit_index() == unit_index)
            .ok_or(MetricsError::TargetNotFound { unit_index })?;

        let data = ActionMetricsProto {
            targets: vec![target.to_proto().clone()],
            ..self.data.clone()
        };
        Ok(Self::new(
            self.unit.clone(),
            self.action_id.clone(),
            data,
            self.context,
            self.resources.clone(),
        ))
    }

    /// Combines actions of the same identity, e.g. of same-named pets.
    ///
    /// Target slices are summed per target unit index, in first-seen order.
    /// Resources are summed per id and resource type.
    pub fn merge(actions: &[ActionMetrics], options: MergeOptions) -> Result<Self, MetricsError> {
        let first = actions.first().ok_or(MetricsError::EmptyMerge)?;

        let mut positions: HashMap<i32, usize> = HashMap::new();
        let mut targets: Vec<TargetedActionMetricsProto> = Vec::new();
        for target in actions.iter().flat_map(|a| &a.data.targets) {
            match positions.get(&target.unit_index) {
                Some(&pos) => targets[pos] += target,
                None => {
                    positions.insert(target.unit_index, targets.len());
                    targets.push(target.clone());
                }
            }
        }

        let action_id = options.resolve_id(&first.action_id);
        let data = ActionMetricsProto {
            id: action_id.to_proto(),
            is_melee: first.data.is_melee,
            is_passive: actions.iter().all(|a| a.is_passive()),
            spell_school: first.data.spell_school,
            targets,
        };
        let resources = ResourceMetrics::join_by_id(
            actions.iter().flat_map(|a| a.resources.iter().cloned()).collect(),
            false,
        );

        Ok(Self::new(
            shared_unit(actions.iter().map(|a| &a.unit)),
            action_id,
            data,
            first.context,
            resources,
        ))
    }

    /// Buckets actions by id, by tag too when `use_tag` is set.
    pub fn group_by_id(actions: Vec<ActionMetrics>, use_tag: bool) -> Vec<Vec<ActionMetrics>> {
        bucket(actions, |a| {
            if use_tag {
                a.action_id.key()
            } else {
                a.action_id.key_ignoring_tag()
            }
        })
    }

    pub fn join_by_id(actions: Vec<ActionMetrics>, use_tag: bool) -> Vec<ActionMetrics> {
        Self::group_by_id(actions, use_tag)
            .into_iter()
            .filter_map(|group| Self::merge(&group, MergeOptions::default()).ok())
            .collect()
    }
}
