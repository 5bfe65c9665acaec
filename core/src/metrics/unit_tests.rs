use raidsim_types::ResourceType;

use super::test_support::{self, ADD, BLOODLUST, BOSS, FIREBALL};
use crate::result::{ResultFilter, SimResult};

async fn fixture() -> SimResult {
    test_support::sim_result().await
}

#[tokio::test]
async fn target_index_flips_with_side() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let pet = &alice.pets[0];
    let boss = result.target_with_index(BOSS).unwrap();

    let filter = ResultFilter::player_vs_target(0, BOSS);
    assert_eq!(alice.target_index(&filter), Some(BOSS));
    assert_eq!(pet.target_index(&filter), Some(BOSS));
    assert_eq!(boss.target_index(&filter), Some(0));

    assert_eq!(alice.target_index(&ResultFilter::all()), None);
    assert_eq!(alice.target_index(&ResultFilter::player_vs_target(0, -1)), None);
    assert_eq!(boss.target_index(&ResultFilter::target(ADD)), None);
    assert_eq!(boss.target_index(&ResultFilter::player(-1)), None);
}

#[tokio::test]
async fn identity_and_labels() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let bob = result.player_with_index(3).unwrap();
    let boss = result.target_with_index(BOSS).unwrap();

    assert_eq!(alice.label(), "Alice (#1)");
    assert_eq!(bob.index(), 2);
    assert_eq!(bob.label(), "Bob (#3)");
    assert_eq!(boss.label(), "Boss");
    assert_eq!(alice.pets[1].label(), "Water Elemental (#1)");

    assert!(alice.is_player() && !alice.is_pet() && !alice.is_target());
    assert!(alice.pets[0].is_pet());
    assert!(boss.is_target());
    assert_eq!(
        alice.pets[0].info.pet_action_id.as_ref().map(|id| id.name.as_str()),
        Some("Water Elemental")
    );

    assert!(!alice.in_front_of_target());
    assert!(bob.in_front_of_target());
    assert!(!alice.pets[0].in_front_of_target());
    assert!(boss.in_front_of_target());
}

#[tokio::test]
async fn chance_of_death_is_a_binomial_estimate() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let death = alice.chance_of_death();
    assert!((death.avg - 10.0).abs() < 1e-9);
    assert!((death.stdev - (0.1 * 0.9 / 10.0_f64).sqrt() * 100.0).abs() < 1e-9);

    let mut raw = test_support::result();
    raw.raid_metrics.parties[0].players[2].chance_of_death = 1.5;
    let clamped = SimResult::make_new(test_support::request(), raw, &test_support::registry())
        .await
        .unwrap();
    let bob = clamped.player_with_index(3).unwrap().chance_of_death();
    assert_eq!(bob.avg, 100.0);
    assert_eq!(bob.stdev, 0.0);
}

#[tokio::test]
async fn rollups_use_average_duration() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let bob = result.player_with_index(3).unwrap();

    assert_eq!(alice.total_damage(), 60_000.0);
    assert_eq!(bob.total_damage_taken(), 5_000.0);
    assert_eq!(alice.seconds_oom_avg(), 12.5);
    assert_eq!(alice.max_threat(), 1_000.0);
    assert_eq!(bob.max_threat(), 2_500.0);
}

#[tokio::test]
async fn logs_are_split_by_source() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let bob = result.player_with_index(3).unwrap();
    let boss = result.target_with_index(BOSS).unwrap();

    assert_eq!(result.logs.len(), 10);
    assert_eq!(alice.logs.logs.len(), 4);
    assert_eq!(alice.logs.casts.len(), 1);
    assert_eq!(alice.logs.resource_logs(ResourceType::Mana).len(), 1);
    assert_eq!(alice.pets[0].logs.damage_dealt.len(), 1);
    assert_eq!(boss.logs.logs.len(), 1);

    assert_eq!(bob.logs.major_cooldowns.len(), 1);
    assert_eq!(bob.logs.major_cooldown_auras.len(), 1);
    assert_eq!(bob.logs.major_cooldown_auras[0].uptime(), 40.0);

    assert_eq!(bob.logs.dps.len(), 1);
    assert_eq!(bob.logs.dps[0].active_auras.len(), 1);
    assert_eq!(bob.logs.dps[0].active_auras[0].action_id.spell_id, BLOODLUST);
    assert!(alice.logs.dps[0].active_auras.is_empty());
    assert_eq!(alice.logs.resource_logs(ResourceType::Mana)[0].active_auras.len(), 0);
}

#[tokio::test]
async fn display_filters() {
    let result = fixture().await;
    let alice = result.player_with_index(0).unwrap();
    let bob = result.player_with_index(3).unwrap();

    assert_eq!(alice.player_and_pet_actions().len(), 4);
    let damage: Vec<i32> = alice
        .damage_actions()
        .iter()
        .map(|a| a.action_id.spell_id)
        .collect();
    assert_eq!(damage, vec![FIREBALL]);
    assert_eq!(alice.healing_actions().len(), 2);
    assert_eq!(alice.spell_damage_actions().len(), 1);
    assert!(alice.melee_actions().is_empty());

    assert_eq!(bob.melee_actions().len(), 1);
    assert_eq!(bob.melee_damage_actions()[0].name(), "Melee (Main-Hand)");
    assert_eq!(bob.spell_actions().len(), 1);
    assert_eq!(bob.threat_actions().len(), 2);

    assert_eq!(alice.resource_metrics(ResourceType::Mana).len(), 1);
    assert!(alice.resource_metrics(ResourceType::Rage).is_empty());
}
