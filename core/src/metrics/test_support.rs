//! Fixture results shared by the metrics tests.
//!
//! One party: Alice (mage, raid index 0, unit 0) with two Water Elementals
//! (units 1 and 2), an empty slot, and Bob (warrior, raid index 2, unit 3).
//! Two targets: Boss (unit 10, encounter index 0) and Add (unit 11, index 1).
//! 10 iterations of 100 seconds.

use raidsim_types::{
    ActionIdProto, ActionMetricsProto, AuraMetricsProto, Class, DistributionMetrics, Encounter,
    EncounterMetricsProto, OtherAction, Party, PartyMetricsProto, Player, Raid, RaidMetricsProto,
    RaidSimRequest, RaidSimResult, ResourceMetricsProto, ResourceType, SimOptions, Target,
    TargetedActionMetricsProto, UnitMetricsProto,
};

use crate::action_id::{IconData, IconRegistry};
use crate::result::SimResult;

pub const FIREBALL: i32 = 133;
pub const WATERBOLT: i32 = 31707;
pub const HEROIC_STRIKE: i32 = 47450;
pub const FLASH_HEAL: i32 = 48071;
pub const SUNDER_ARMOR: i32 = 7386;
pub const BLOODLUST: i32 = 2825;

pub const BOSS: i32 = 10;
pub const ADD: i32 = 11;

pub fn slice(unit_index: i32, casts: i64, hits: i64, damage: f64) -> TargetedActionMetricsProto {
    TargetedActionMetricsProto {
        unit_index,
        casts,
        hits,
        damage,
        threat: damage,
        ..Default::default()
    }
}

pub fn spell(spell_id: i32, tag: i32, targets: Vec<TargetedActionMetricsProto>) -> ActionMetricsProto {
    ActionMetricsProto {
        id: ActionIdProto {
            spell_id,
            tag,
            ..Default::default()
        },
        targets,
        ..Default::default()
    }
}

fn melee(targets: Vec<TargetedActionMetricsProto>) -> ActionMetricsProto {
    ActionMetricsProto {
        id: ActionIdProto {
            other_id: OtherAction::Attack,
            tag: 1,
            ..Default::default()
        },
        is_melee: true,
        targets,
        ..Default::default()
    }
}

fn aura(spell_id: i32, uptime: f64) -> AuraMetricsProto {
    AuraMetricsProto {
        id: ActionIdProto {
            spell_id,
            ..Default::default()
        },
        uptime_seconds_avg: uptime,
        procs_avg: 1.0,
        ..Default::default()
    }
}

fn unit(name: &str, unit_index: i32, dps: f64, actions: Vec<ActionMetricsProto>) -> UnitMetricsProto {
    UnitMetricsProto {
        name: name.to_string(),
        unit_index,
        dps: DistributionMetrics::with_avg(dps, 0.0),
        threat: DistributionMetrics::with_avg(dps, 0.0),
        actions,
        ..Default::default()
    }
}

fn player(name: &str, class: Class) -> Player {
    Player {
        name: name.to_string(),
        class,
        ..Default::default()
    }
}

pub fn registry() -> IconRegistry {
    let mut registry = IconRegistry::new().with_icon_base_url("http://icons/");
    for (id, name, icon) in [
        (FIREBALL, "Fireball", "spell_fire_flamebolt"),
        (WATERBOLT, "Waterbolt", "spell_frost_frostbolt"),
        (HEROIC_STRIKE, "Heroic Strike", "ability_rogue_ambush"),
        (FLASH_HEAL, "Flash Heal", "spell_holy_flashheal"),
        (SUNDER_ARMOR, "Sunder Armor", "ability_warrior_sunder"),
        (BLOODLUST, "Bloodlust", "spell_nature_bloodlust"),
    ] {
        registry.insert_spell(
            id,
            IconData {
                name: name.to_string(),
                icon: icon.to_string(),
                rank: 0,
            },
        );
    }
    registry
}

pub fn request() -> RaidSimRequest {
    RaidSimRequest {
        raid: Raid {
            parties: vec![Party {
                players: vec![
                    Player {
                        in_front_of_target: false,
                        ..player("Alice", Class::Mage)
                    },
                    Player::default(),
                    Player {
                        in_front_of_target: true,
                        ..player("Bob", Class::Warrior)
                    },
                ],
            }],
        },
        encounter: Encounter {
            duration: 100.0,
            targets: vec![
                Target {
                    id: 31146,
                    name: "Boss".to_string(),
                    level: 83,
                    ..Default::default()
                },
                Target {
                    id: 31147,
                    name: "Add".to_string(),
                    level: 80,
                    ..Default::default()
                },
            ],
            ..Default::default()
        },
        sim_options: SimOptions {
            iterations: 10,
            ..Default::default()
        },
    }
}

const LOGS: &str = "\
[0.00] [Alice (#1)] Casting {SpellID: 133} (Cost = 400, Cast Time = 3s, Effective Time = 3s)
[3.00] [Alice (#1)] Completed cast {SpellID: 133}
[3.00] [Alice (#1)] [Target 1] {SpellID: 133} Hit for 1000 damage. (Threat: 1000)
[3.00] [Alice (#1)] Spent 400 mana from {SpellID: 133} (5000 --> 4600)
[4.00] [Alice (#1) - Water Elemental] [Target 1] {SpellID: 31707} Hit for 300 damage. (Threat: 300)
[5.00] [Bob (#3)] Major cooldown used: {SpellID: 2825}.
[5.00] [Bob (#3)] Aura gained: {SpellID: 2825}.
[5.00] [Bob (#3)] [Target 1] {SpellID: 47450} Crit for 2000 damage. (Threat: 2500)
[6.00] [Target 1] [Bob (#3)] {OtherID: 7, Tag: 1} Hit for 500 damage. (Threat: 0)
[45.00] [Bob (#3)] Aura faded: {SpellID: 2825}.
";

pub fn result() -> RaidSimResult {
    let pet = |unit_index: i32, damage: f64| {
        unit(
            "Water Elemental",
            unit_index,
            damage / 10.0 / 100.0,
            vec![spell(WATERBOLT, 0, vec![slice(BOSS, 20, 20, damage)])],
        )
    };

    let alice = UnitMetricsProto {
        actions: vec![
            spell(FIREBALL, 0, vec![slice(BOSS, 200, 200, 500_000.0), slice(ADD, 50, 50, 100_000.0)]),
            spell(FLASH_HEAL, 0, vec![TargetedActionMetricsProto {
                unit_index: 0,
                casts: 10,
                hits: 10,
                healing: 20_000.0,
                ..Default::default()
            }]),
        ],
        resources: vec![ResourceMetricsProto {
            id: ActionIdProto {
                spell_id: FLASH_HEAL,
                ..Default::default()
            },
            resource_type: ResourceType::Mana,
            events: 10,
            gain: -4_000.0,
            actual_gain: -4_000.0,
        }],
        auras: vec![aura(BLOODLUST, 40.0)],
        pets: vec![pet(1, 40_000.0), pet(2, 20_000.0)],
        seconds_oom_avg: 12.5,
        chance_of_death: 0.1,
        ..unit("Alice", 0, 600.0, Vec::new())
    };

    let bob = UnitMetricsProto {
        auras: vec![aura(BLOODLUST, 40.0)],
        dtps: DistributionMetrics::with_avg(50.0, 0.0),
        ..unit(
            "Bob",
            3,
            300.0,
            vec![
                spell(HEROIC_STRIKE, 0, vec![slice(BOSS, 100, 100, 200_000.0)]),
                melee(vec![slice(BOSS, 0, 400, 100_000.0)]),
            ],
        )
    };

    let boss = UnitMetricsProto {
        auras: vec![aura(SUNDER_ARMOR, 90.0), aura(FIREBALL, 0.0)],
        ..unit("Boss", BOSS, 50.0, vec![melee(vec![slice(3, 0, 100, 50_000.0)])])
    };

    RaidSimResult {
        raid_metrics: RaidMetricsProto {
            dps: DistributionMetrics::with_avg(1000.0, 10.0),
            hps: DistributionMetrics::with_avg(20.0, 0.0),
            parties: vec![PartyMetricsProto {
                dps: DistributionMetrics::with_avg(1000.0, 10.0),
                players: vec![alice, UnitMetricsProto::default(), bob],
                ..Default::default()
            }],
        },
        encounter_metrics: EncounterMetricsProto {
            targets: vec![boss, unit("Add", ADD, 0.0, Vec::new())],
        },
        logs: LOGS.to_string(),
        first_iteration_duration: 100.0,
        avg_iteration_duration: 100.0,
        error: None,
    }
}

pub async fn sim_result() -> SimResult {
    SimResult::make_new(request(), result(), &registry())
        .await
        .expect("fixture builds")
}
