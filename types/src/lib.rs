//! Shared wire and configuration types for raidsim
//!
//! This crate mirrors the simulation engine's request/result schema (protobuf
//! JSON mapping: camelCase names, absent fields take their default) and the
//! persisted viewer configuration. It carries no aggregation logic; that lives
//! in raidsim-core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::AddAssign;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Non-spell, non-item action identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OtherAction {
    #[default]
    #[serde(rename = "OtherActionNone")]
    None,
    #[serde(rename = "OtherActionWait")]
    Wait,
    #[serde(rename = "OtherActionManaRegen")]
    ManaRegen,
    #[serde(rename = "OtherActionEnergyRegen")]
    EnergyRegen,
    #[serde(rename = "OtherActionFocusRegen")]
    FocusRegen,
    #[serde(rename = "OtherActionManaGain")]
    ManaGain,
    #[serde(rename = "OtherActionRageGain")]
    RageGain,
    #[serde(rename = "OtherActionAttack")]
    Attack,
    #[serde(rename = "OtherActionShoot")]
    Shoot,
    #[serde(rename = "OtherActionPet")]
    Pet,
    #[serde(rename = "OtherActionRefund")]
    Refund,
    #[serde(rename = "OtherActionDamageTaken")]
    DamageTaken,
    #[serde(rename = "OtherActionHealingModel")]
    HealingModel,
    #[serde(rename = "OtherActionPotion")]
    Potion,
    #[serde(rename = "OtherActionExplosives")]
    Explosives,
    #[serde(rename = "OtherActionOffensiveEquip")]
    OffensiveEquip,
    #[serde(rename = "OtherActionDefensiveEquip")]
    DefensiveEquip,
    #[serde(rename = "OtherActionComboPoints")]
    ComboPoints,
    #[serde(rename = "OtherActionMove")]
    Move,
}

impl OtherAction {
    /// Numeric value used by the engine's log text (`{OtherID: n}`).
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => Self::Wait,
            2 => Self::ManaRegen,
            3 => Self::EnergyRegen,
            4 => Self::FocusRegen,
            5 => Self::ManaGain,
            6 => Self::RageGain,
            7 => Self::Attack,
            8 => Self::Shoot,
            9 => Self::Pet,
            10 => Self::Refund,
            11 => Self::DamageTaken,
            12 => Self::HealingModel,
            13 => Self::Potion,
            14 => Self::Explosives,
            15 => Self::OffensiveEquip,
            16 => Self::DefensiveEquip,
            17 => Self::ComboPoints,
            18 => Self::Move,
            _ => Self::None,
        }
    }

    pub fn as_raw(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Wait => 1,
            Self::ManaRegen => 2,
            Self::EnergyRegen => 3,
            Self::FocusRegen => 4,
            Self::ManaGain => 5,
            Self::RageGain => 6,
            Self::Attack => 7,
            Self::Shoot => 8,
            Self::Pet => 9,
            Self::Refund => 10,
            Self::DamageTaken => 11,
            Self::HealingModel => 12,
            Self::Potion => 13,
            Self::Explosives => 14,
            Self::OffensiveEquip => 15,
            Self::DefensiveEquip => 16,
            Self::ComboPoints => 17,
            Self::Move => 18,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceType {
    #[default]
    #[serde(rename = "ResourceTypeNone")]
    None,
    #[serde(rename = "ResourceTypeMana")]
    Mana,
    #[serde(rename = "ResourceTypeEnergy")]
    Energy,
    #[serde(rename = "ResourceTypeRage")]
    Rage,
    #[serde(rename = "ResourceTypeComboPoints")]
    ComboPoints,
    #[serde(rename = "ResourceTypeFocus")]
    Focus,
    #[serde(rename = "ResourceTypeHealth")]
    Health,
}

impl ResourceType {
    /// Lowercase name as it appears in log text ("mana", "combo points").
    pub fn log_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mana => "mana",
            Self::Energy => "energy",
            Self::Rage => "rage",
            Self::ComboPoints => "combo points",
            Self::Focus => "focus",
            Self::Health => "health",
        }
    }

    pub fn from_log_name(name: &str) -> Option<Self> {
        [
            Self::Mana,
            Self::Energy,
            Self::Rage,
            Self::ComboPoints,
            Self::Focus,
            Self::Health,
        ]
        .into_iter()
        .find(|t| t.log_name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpellSchool {
    #[default]
    #[serde(rename = "SpellSchoolPhysical")]
    Physical,
    #[serde(rename = "SpellSchoolArcane")]
    Arcane,
    #[serde(rename = "SpellSchoolFire")]
    Fire,
    #[serde(rename = "SpellSchoolFrost")]
    Frost,
    #[serde(rename = "SpellSchoolHoly")]
    Holy,
    #[serde(rename = "SpellSchoolNature")]
    Nature,
    #[serde(rename = "SpellSchoolShadow")]
    Shadow,
}

/// Player class. `Unknown` marks an empty raid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Class {
    #[default]
    #[serde(rename = "ClassUnknown")]
    Unknown,
    #[serde(rename = "ClassDruid")]
    Druid,
    #[serde(rename = "ClassHunter")]
    Hunter,
    #[serde(rename = "ClassMage")]
    Mage,
    #[serde(rename = "ClassPaladin")]
    Paladin,
    #[serde(rename = "ClassPriest")]
    Priest,
    #[serde(rename = "ClassRogue")]
    Rogue,
    #[serde(rename = "ClassShaman")]
    Shaman,
    #[serde(rename = "ClassWarlock")]
    Warlock,
    #[serde(rename = "ClassWarrior")]
    Warrior,
}

impl Class {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Druid => "Druid",
            Self::Hunter => "Hunter",
            Self::Mage => "Mage",
            Self::Paladin => "Paladin",
            Self::Priest => "Priest",
            Self::Rogue => "Rogue",
            Self::Shaman => "Shaman",
            Self::Warlock => "Warlock",
            Self::Warrior => "Warrior",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identities and Distributions
// ─────────────────────────────────────────────────────────────────────────────

/// Raw action identity. Exactly one of the ids is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionIdProto {
    pub spell_id: i32,
    pub item_id: i32,
    pub other_id: OtherAction,
    pub tag: i32,
    pub rank: i32,
    pub random_suffix_id: i32,
}

/// Aggregate over all iterations of one statistic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistributionMetrics {
    pub avg: f64,
    pub stdev: f64,
    pub max: f64,
    pub max_seed: i64,
    pub min: f64,
    pub min_seed: i64,
    pub hist: HashMap<i32, i32>,
    pub all_values: Vec<f64>,
}

impl DistributionMetrics {
    pub fn with_avg(avg: f64, stdev: f64) -> Self {
        Self {
            avg,
            stdev,
            ..Default::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// Raw counters for one action against one target, totalled over all iterations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetedActionMetricsProto {
    pub unit_index: i32,

    pub casts: i64,
    pub hits: i64,
    pub resisted_hits: i64,
    pub crits: i64,
    pub resisted_crits: i64,
    pub ticks: i64,
    pub resisted_ticks: i64,
    pub crit_ticks: i64,
    pub resisted_crit_ticks: i64,
    pub misses: i64,
    pub dodges: i64,
    pub parries: i64,
    pub blocks: i64,
    pub blocked_crits: i64,
    pub glances: i64,
    pub crushes: i64,

    pub damage: f64,
    pub resisted_damage: f64,
    pub crit_damage: f64,
    pub resisted_crit_damage: f64,
    pub tick_damage: f64,
    pub resisted_tick_damage: f64,
    pub crit_tick_damage: f64,
    pub resisted_crit_tick_damage: f64,
    pub glance_damage: f64,
    pub block_damage: f64,
    pub blocked_crit_damage: f64,
    pub crush_damage: f64,

    pub threat: f64,
    pub healing: f64,
    pub crit_healing: f64,
    pub shielding: f64,
    pub cast_time_ms: f64,
}

/// Sums every counter; `unit_index` is left untouched.
impl AddAssign<&TargetedActionMetricsProto> for TargetedActionMetricsProto {
    fn add_assign(&mut self, rhs: &TargetedActionMetricsProto) {
        self.casts += rhs.casts;
        self.hits += rhs.hits;
        self.resisted_hits += rhs.resisted_hits;
        self.crits += rhs.crits;
        self.resisted_crits += rhs.resisted_crits;
        self.ticks += rhs.ticks;
        self.resisted_ticks += rhs.resisted_ticks;
        self.crit_ticks += rhs.crit_ticks;
        self.resisted_crit_ticks += rhs.resisted_crit_ticks;
        self.misses += rhs.misses;
        self.dodges += rhs.dodges;
        self.parries += rhs.parries;
        self.blocks += rhs.blocks;
        self.blocked_crits += rhs.blocked_crits;
        self.glances += rhs.glances;
        self.crushes += rhs.crushes;

        self.damage += rhs.damage;
        self.resisted_damage += rhs.resisted_damage;
        self.crit_damage += rhs.crit_damage;
        self.resisted_crit_damage += rhs.resisted_crit_damage;
        self.tick_damage += rhs.tick_damage;
        self.resisted_tick_damage += rhs.resisted_tick_damage;
        self.crit_tick_damage += rhs.crit_tick_damage;
        self.resisted_crit_tick_damage += rhs.resisted_crit_tick_damage;
        self.glance_damage += rhs.glance_damage;
        self.block_damage += rhs.block_damage;
        self.blocked_crit_damage += rhs.blocked_crit_damage;
        self.crush_damage += rhs.crush_damage;

        self.threat += rhs.threat;
        self.healing += rhs.healing;
        self.crit_healing += rhs.crit_healing;
        self.shielding += rhs.shielding;
        self.cast_time_ms += rhs.cast_time_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionMetricsProto {
    pub id: ActionIdProto,
    pub is_melee: bool,
    pub is_passive: bool,
    pub spell_school: Option<SpellSchool>,
    pub targets: Vec<TargetedActionMetricsProto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuraMetricsProto {
    pub id: ActionIdProto,
    pub uptime_seconds_avg: f64,
    pub uptime_seconds_stdev: f64,
    pub procs_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceMetricsProto {
    pub id: ActionIdProto,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub events: i64,
    pub gain: f64,
    pub actual_gain: f64,
}

/// Per-combatant metrics: a player, one of its pets, or an encounter target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnitMetricsProto {
    pub name: String,
    pub unit_index: i32,

    pub dps: DistributionMetrics,
    pub dpasp: DistributionMetrics,
    pub threat: DistributionMetrics,
    pub dtps: DistributionMetrics,
    pub tmi: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub tto: DistributionMetrics,

    pub seconds_oom_avg: f64,
    pub chance_of_death: f64,

    pub actions: Vec<ActionMetricsProto>,
    pub auras: Vec<AuraMetricsProto>,
    pub resources: Vec<ResourceMetricsProto>,
    pub pets: Vec<UnitMetricsProto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartyMetricsProto {
    pub dps: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub players: Vec<UnitMetricsProto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaidMetricsProto {
    pub dps: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub parties: Vec<PartyMetricsProto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncounterMetricsProto {
    pub targets: Vec<UnitMetricsProto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorOutcome {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaidSimResult {
    pub raid_metrics: RaidMetricsProto,
    pub encounter_metrics: EncounterMetricsProto,
    /// Raw event log text of the first iteration.
    pub logs: String,
    pub first_iteration_duration: f64,
    pub avg_iteration_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutcome>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub class: Class,
    pub race: String,
    pub talents_string: String,
    pub in_front_of_target: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Raid {
    pub parties: Vec<Party>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Target {
    pub id: i32,
    pub name: String,
    pub level: i32,
    pub mob_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Encounter {
    pub duration: f64,
    pub duration_variation: f64,
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimOptions {
    pub iterations: i32,
    pub random_seed: i64,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaidSimRequest {
    pub raid: Raid,
    pub encounter: Encounter,
    pub sim_options: SimOptions,
}

/// A request/result pair as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimRun {
    pub request: RaidSimRequest,
    pub result: RaidSimResult,
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewer Configuration
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_ICON_BASE_URL: &str = "https://wow.zamimg.com/images/wow/icons/large/";

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_decimals() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Column the action tables are sorted by when no other order is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Damage,
    Dps,
    Threat,
    Casts,
    Name,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// CSV file with `kind,id,name,icon,rank` rows used to name actions.
    #[serde(default)]
    pub icon_database: Option<String>,
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,
    /// Fraction digits printed in tables.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// Group same-named pets into a single breakdown row.
    #[serde(default = "default_true")]
    pub merge_pets: bool,
    #[serde(default)]
    pub default_sort: SortColumn,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            icon_database: None,
            icon_base_url: default_icon_base_url(),
            decimals: default_decimals(),
            merge_pets: true,
            default_sort: SortColumn::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_decodes_protobuf_json_names() {
        let json = r#"{
            "raidMetrics": {
                "dps": {"avg": 1200.5},
                "parties": [{"players": [{
                    "name": "Alice",
                    "unitIndex": 3,
                    "actions": [{
                        "id": {"spellId": 133, "tag": 1},
                        "targets": [{"unitIndex": 0, "casts": 10, "damage": 5000.0}]
                    }],
                    "resources": [{"id": {"otherId": "OtherActionManaRegen"}, "type": "ResourceTypeMana", "gain": 40.0}]
                }]}]
            },
            "avgIterationDuration": 180.0
        }"#;

        let result: RaidSimResult = serde_json::from_str(json).unwrap();
        let player = &result.raid_metrics.parties[0].players[0];
        assert_eq!(player.unit_index, 3);
        assert_eq!(player.actions[0].id.spell_id, 133);
        assert_eq!(player.actions[0].id.tag, 1);
        assert_eq!(player.actions[0].targets[0].casts, 10);
        assert_eq!(player.resources[0].resource_type, ResourceType::Mana);
        assert_eq!(player.resources[0].id.other_id, OtherAction::ManaRegen);
        assert_eq!(result.avg_iteration_duration, 180.0);
        assert!(result.encounter_metrics.targets.is_empty());
    }

    #[test]
    fn add_assign_sums_counters_but_keeps_unit_index() {
        let mut a = TargetedActionMetricsProto {
            unit_index: 2,
            casts: 3,
            damage: 100.0,
            ..Default::default()
        };
        let b = TargetedActionMetricsProto {
            unit_index: 7,
            casts: 4,
            damage: 50.0,
            threat: 12.0,
            ..Default::default()
        };
        a += &b;
        assert_eq!(a.unit_index, 2);
        assert_eq!(a.casts, 7);
        assert_eq!(a.damage, 150.0);
        assert_eq!(a.threat, 12.0);
    }

    #[test]
    fn other_action_raw_roundtrip_for_known_values() {
        for raw in 0..=18 {
            assert_eq!(OtherAction::from_raw(raw).as_raw(), raw);
        }
        assert_eq!(OtherAction::from_raw(99), OtherAction::None);
    }

    #[test]
    fn viewer_config_fills_missing_fields() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert!(config.merge_pets);
        assert_eq!(config.decimals, 2);
    }

    #[test]
    fn resource_log_names() {
        assert_eq!(ResourceType::from_log_name("mana"), Some(ResourceType::Mana));
        assert_eq!(
            ResourceType::from_log_name("combo points"),
            Some(ResourceType::ComboPoints)
        );
        assert_eq!(ResourceType::from_log_name("shards"), None);
    }
}
