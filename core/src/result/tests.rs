use raidsim_types::ResourceType;

use super::*;
use crate::action_id::ResolveError;
use crate::metrics::test_support::{self, ADD, BOSS, FIREBALL, HEROIC_STRIKE, SUNDER_ARMOR};

fn spell_ids(actions: &[ActionMetrics]) -> Vec<i32> {
    actions.iter().map(|a| a.action_id.spell_id).collect()
}

#[tokio::test]
async fn unit_queries() {
    let result = test_support::sim_result().await;

    assert_eq!(result.iterations(), 10.0);
    assert_eq!(result.duration(), 100.0);
    assert_eq!(result.first_iteration_duration(), 100.0);

    assert_eq!(result.players(&ResultFilter::all()).len(), 2);
    assert_eq!(result.players(&ResultFilter::player(3))[0].name(), "Bob");
    assert!(result.players(&ResultFilter::player(42)).is_empty());
    assert_eq!(result.raid_indexed_players(&ResultFilter::player(2))[0].name(), "Bob");
    assert_eq!(result.first_player().map(|p| p.name()), Some("Alice"));
    assert!(result.player_with_raid_index(1).is_none());

    assert_eq!(result.targets(&ResultFilter::all()).len(), 2);
    assert_eq!(result.targets(&ResultFilter::target(ADD))[0].name(), "Add");
    assert_eq!(result.target_with_encounter_index(0).map(|t| t.unit_index()), Some(BOSS));
    assert!(result.target_with_index(0).is_none());
    assert_eq!(result.unit_with_index(BOSS).map(|u| u.name()), Some("Boss"));
}

#[tokio::test]
async fn damage_metrics_fall_back_to_raid() {
    let result = test_support::sim_result().await;
    assert_eq!(result.damage_metrics(&ResultFilter::all()).avg, 1000.0);
    assert_eq!(result.damage_metrics(&ResultFilter::player(3)).avg, 300.0);
    assert_eq!(result.damage_metrics(&ResultFilter::player(99)).avg, 0.0);
}

#[tokio::test]
async fn action_queries_join_players_and_pets() {
    let result = test_support::sim_result().await;

    let all = result.action_metrics(&ResultFilter::all()).unwrap();
    assert_eq!(all.len(), 5);
    let fireball = all.iter().find(|a| a.action_id.spell_id == FIREBALL).unwrap();
    assert_eq!(fireball.avg_damage(), 60_000.0);

    let bob_on_boss = result.actions_for_player_vs_target(3, BOSS).unwrap();
    assert_eq!(bob_on_boss.len(), 2);
    assert_eq!(bob_on_boss[0].action_id.spell_id, HEROIC_STRIKE);

    assert_eq!(spell_ids(&result.spell_metrics(&ResultFilter::player(3)).unwrap()), vec![HEROIC_STRIKE]);
    let melee = result.melee_metrics(&ResultFilter::player(3)).unwrap();
    assert_eq!(melee.len(), 1);
    assert!(melee[0].is_melee());

    let by_raid_index = result
        .raid_indexed_action_metrics(&ResultFilter::player(2))
        .unwrap();
    assert_eq!(by_raid_index.len(), 2);
}

#[tokio::test]
async fn missing_target_slice_is_an_error() {
    let result = test_support::sim_result().await;
    // Alice's heal only ever landed on Alice
    assert!(matches!(
        result.actions_for_player_vs_target(0, BOSS),
        Err(MetricsError::TargetNotFound { unit_index: BOSS })
    ));
    assert_eq!(result.actions_for_player(0).unwrap().len(), 3);
}

#[tokio::test]
async fn aura_and_resource_queries() {
    let result = test_support::sim_result().await;

    let mana = result.resource_metrics(ResourceType::Mana, &ResultFilter::all());
    assert_eq!(mana.len(), 1);
    assert_eq!(mana[0].gain(), -400.0);

    let buffs = result.buff_metrics(&ResultFilter::all());
    assert_eq!(buffs.len(), 1);
    assert_eq!(buffs[0].uptime_seconds(), 40.0);
    assert!(buffs[0].unit.is_none());

    let debuffs = result.debuff_metrics(&ResultFilter::all());
    assert_eq!(debuffs.len(), 1);
    assert_eq!(debuffs[0].action_id.spell_id, SUNDER_ARMOR);
    assert_eq!(debuffs[0].uptime_percent(), 90.0);
}

#[tokio::test]
async fn aura_queries_keep_procs() {
    let result = test_support::sim_result().await;

    let buffs = result.buff_metrics(&ResultFilter::player(0));
    assert_eq!(buffs.len(), 1);
    assert_eq!(buffs[0].average_procs(), 1.0);
    assert!((buffs[0].ppm() - 0.6).abs() < 1e-9);

    let debuffs = result.debuff_metrics(&ResultFilter::all());
    assert_eq!(debuffs[0].average_procs(), 1.0);
}

#[tokio::test]
async fn proto_round_trip_rebuilds_tree() {
    let result = test_support::sim_result().await;
    let rebuilt = SimResult::from_proto(result.to_proto(), &test_support::registry())
        .await
        .unwrap();

    let units = |r: &SimResult| {
        r.players(&ResultFilter::all())
            .into_iter()
            .chain(r.targets(&ResultFilter::all()))
            .map(|u| (u.unit_index(), spell_ids(&u.actions)))
            .collect::<Vec<_>>()
    };
    assert_eq!(units(&rebuilt), units(&result));
}

#[tokio::test]
async fn failed_lookup_aborts_build() {
    let registry = test_support::registry().strict(true);
    let mut raw = test_support::result();
    raw.raid_metrics.parties[0].players[2].actions[0].id.spell_id = 999_999;

    let err = SimResult::make_new(test_support::request(), raw, &registry)
        .await
        .unwrap_err();
    assert!(matches!(err, MetricsError::Resolve(ResolveError::UnknownSpell(999_999))));
}
