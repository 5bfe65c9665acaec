//! Rows behind the per-player damage and threat tables.
//!
//! A row is one ability of the selected player, or one pet (all of its
//! abilities merged under the pet's identity). Rows made of more than one
//! source keep those sources as children.

use std::cmp::Ordering;

use hashbrown::HashMap;
use raidsim_types::SortColumn;

use super::{ActionMetrics, MergeOptions, MetricsError, UnitMetrics};
use crate::result::{ResultFilter, SimResult};

#[derive(Debug, Clone)]
pub struct BreakdownRow {
    pub metrics: ActionMetrics,
    pub children: Vec<ActionMetrics>,
    /// The row stands for one pet, or several same-named pets.
    pub is_pet: bool,
}

impl BreakdownRow {
    fn from_group(group: Vec<ActionMetrics>, options: MergeOptions, is_pet: bool) -> Result<Self, MetricsError> {
        let metrics = ActionMetrics::merge(&group, options)?;
        let children = if group.len() > 1 { group } else { Vec::new() };
        Ok(Self {
            metrics,
            children,
            is_pet,
        })
    }
}

pub fn damage_breakdown(
    result: &SimResult,
    filter: &ResultFilter,
    merge_pets: bool,
) -> Result<Vec<BreakdownRow>, MetricsError> {
    breakdown(result, filter, merge_pets, UnitMetrics::damage_actions)
}

pub fn threat_breakdown(
    result: &SimResult,
    filter: &ResultFilter,
    merge_pets: bool,
) -> Result<Vec<BreakdownRow>, MetricsError> {
    breakdown(result, filter, merge_pets, UnitMetrics::threat_actions)
}

/// `filter.player` is a raid index here. Anything other than exactly one
/// matching player yields no rows.
fn breakdown(
    result: &SimResult,
    filter: &ResultFilter,
    merge_pets: bool,
    select: fn(&UnitMetrics) -> Vec<&ActionMetrics>,
) -> Result<Vec<BreakdownRow>, MetricsError> {
    let players = result.raid_indexed_players(filter);
    let [player] = players[..] else {
        return Ok(Vec::new());
    };

    let targeted = |unit: &UnitMetrics| -> Result<Vec<ActionMetrics>, MetricsError> {
        select(unit).into_iter().map(|a| a.for_target(filter)).collect()
    };

    let mut rows = Vec::new();
    for group in ActionMetrics::group_by_id(targeted(player)?, false) {
        rows.push(BreakdownRow::from_group(group, MergeOptions::remove_tag(), false)?);
    }

    for pets in pet_groups(&player.pets, merge_pets) {
        let mut actions = Vec::new();
        for pet in pets.iter().copied() {
            actions.extend(targeted(pet)?);
        }
        let joined = ActionMetrics::join_by_id(actions, true);
        if joined.is_empty() {
            continue;
        }
        let options = MergeOptions {
            remove_tag: true,
            action_id_override: pets[0].info.pet_action_id.clone(),
        };
        rows.push(BreakdownRow::from_group(joined, options, true)?);
    }

    Ok(rows)
}

/// Pets bucketed by name, or one bucket per pet when not merging.
fn pet_groups(pets: &[UnitMetrics], merge_pets: bool) -> Vec<Vec<&UnitMetrics>> {
    if !merge_pets {
        return pets.iter().map(|p| vec![p]).collect();
    }
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&UnitMetrics>> = Vec::new();
    for pet in pets {
        match positions.get(pet.name()) {
            Some(&pos) => groups[pos].push(pet),
            None => {
                positions.insert(pet.name(), groups.len());
                groups.push(vec![pet]);
            }
        }
    }
    groups
}

fn compare(a: &ActionMetrics, b: &ActionMetrics, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Damage => a.avg_damage().total_cmp(&b.avg_damage()),
        SortColumn::Dps => a.dps().total_cmp(&b.dps()),
        SortColumn::Threat => a.avg_threat().total_cmp(&b.avg_threat()),
        SortColumn::Casts => a.casts().total_cmp(&b.casts()),
        SortColumn::Name => a.name().cmp(b.name()),
    }
}

/// Sorts rows, then each row's children on their own. Children never leave
/// their parent row.
pub fn sort_rows(rows: &mut [BreakdownRow], column: SortColumn, descending: bool) {
    let ordered = |a: &ActionMetrics, b: &ActionMetrics| {
        let ord = compare(a, b, column);
        if descending { ord.reverse() } else { ord }
    };
    rows.sort_by(|a, b| ordered(&a.metrics, &b.metrics));
    for row in rows.iter_mut() {
        row.children.sort_by(|a, b| ordered(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{self, BOSS, FIREBALL, HEROIC_STRIKE, slice, spell};

    fn names(rows: &[BreakdownRow]) -> Vec<&str> {
        rows.iter().map(|r| r.metrics.name()).collect()
    }

    #[tokio::test]
    async fn needs_exactly_one_player() {
        let result = test_support::sim_result().await;
        assert!(damage_breakdown(&result, &ResultFilter::all(), true).unwrap().is_empty());
        assert!(damage_breakdown(&result, &ResultFilter::player(1), true).unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_named_pets_share_a_row() {
        let result = test_support::sim_result().await;

        let merged = damage_breakdown(&result, &ResultFilter::player(0), true).unwrap();
        assert_eq!(names(&merged), vec!["Fireball", "Water Elemental"]);
        assert!(merged[1].is_pet);
        assert!(!merged[0].is_pet);
        assert!(merged[1].metrics.unit.is_none());
        assert_eq!(merged[1].metrics.avg_damage(), 6_000.0);

        let separate = damage_breakdown(&result, &ResultFilter::player(0), false).unwrap();
        assert_eq!(separate.len(), 3);
        assert_eq!(separate[1].metrics.avg_damage(), 4_000.0);
        assert_eq!(separate[2].metrics.avg_damage(), 2_000.0);
        assert!(separate[2].metrics.unit.as_ref().is_some_and(|u| u.is_pet()));
    }

    #[tokio::test]
    async fn tagged_variants_become_children() {
        let mut raw = test_support::result();
        raw.raid_metrics.parties[0].players[0]
            .actions
            .push(spell(FIREBALL, 1, vec![slice(BOSS, 10, 10, 50_000.0)]));
        let result = SimResult::make_new(test_support::request(), raw, &test_support::registry())
            .await
            .unwrap();

        let rows = damage_breakdown(&result, &ResultFilter::player_vs_target(0, BOSS), true).unwrap();
        let fireball = &rows[0];
        assert_eq!(fireball.children.len(), 2);
        assert_eq!(fireball.metrics.action_id.tag, 0);
        assert_eq!(fireball.metrics.avg_damage(), 55_000.0);
        assert_eq!(fireball.children[1].action_id.tag, 1);
    }

    #[tokio::test]
    async fn threat_rows_for_a_tank() {
        let result = test_support::sim_result().await;
        let rows = threat_breakdown(&result, &ResultFilter::player(2), true).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metrics.action_id.spell_id, HEROIC_STRIKE);
    }

    #[tokio::test]
    async fn sorting_keeps_children_with_parents() {
        let mut raw = test_support::result();
        let alice = &mut raw.raid_metrics.parties[0].players[0];
        alice.actions.push(spell(FIREBALL, 1, vec![slice(BOSS, 10, 10, 900_000.0)]));
        alice.actions.push(spell(FIREBALL, 2, vec![slice(BOSS, 10, 10, 1_000.0)]));
        let result = SimResult::make_new(test_support::request(), raw, &test_support::registry())
            .await
            .unwrap();
        let mut rows = damage_breakdown(&result, &ResultFilter::player(0), true).unwrap();

        sort_rows(&mut rows, SortColumn::Damage, false);
        assert_eq!(names(&rows), vec!["Water Elemental", "Fireball"]);
        let damages: Vec<f64> = rows[1].children.iter().map(|c| c.avg_damage()).collect();
        assert_eq!(damages, vec![100.0, 60_000.0, 90_000.0]);

        sort_rows(&mut rows, SortColumn::Damage, true);
        assert_eq!(names(&rows), vec!["Fireball", "Water Elemental"]);
        assert_eq!(rows[0].children[0].avg_damage(), 90_000.0);
    }
}
