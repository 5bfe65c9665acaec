use std::sync::Arc;

use futures_util::future::try_join_all;
use raidsim_types::{
    Class, DistributionMetrics, Encounter, EncounterMetricsProto, Party, PartyMetricsProto, Raid,
    RaidMetricsProto,
};

use super::{MetricsError, ResultContext, UnitMetrics};
use crate::action_id::IdentityResolver;
use crate::combat_log::SimLog;

/// Raid slots per party; a player's raid index is `party * 5 + slot`.
pub const PARTY_SIZE: i32 = 5;

#[derive(Debug, Clone)]
pub struct RaidMetrics {
    pub dps: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub parties: Vec<PartyMetrics>,
}

impl RaidMetrics {
    /// Builds every party concurrently. Parties beyond the shorter of the
    /// request and result lists are ignored.
    pub(crate) async fn make_new(
        resolver: &dyn IdentityResolver,
        context: ResultContext,
        raid: &Raid,
        metrics: &RaidMetricsProto,
        logs: &[Arc<SimLog>],
    ) -> Result<RaidMetrics, MetricsError> {
        let parties = try_join_all(
            raid.parties
                .iter()
                .zip(&metrics.parties)
                .enumerate()
                .map(|(i, (party, party_metrics))| {
                    PartyMetrics::make_new(resolver, context, party, party_metrics, i as i32, logs)
                }),
        )
        .await?;

        Ok(Self {
            dps: metrics.dps.clone(),
            hps: metrics.hps.clone(),
            parties,
        })
    }

    pub fn players(&self) -> impl Iterator<Item = &UnitMetrics> {
        self.parties.iter().flat_map(|p| p.players.iter())
    }
}

#[derive(Debug, Clone)]
pub struct PartyMetrics {
    pub party_index: i32,
    pub dps: DistributionMetrics,
    pub hps: DistributionMetrics,
    pub players: Vec<UnitMetrics>,
}

impl PartyMetrics {
    /// Builds the party's players concurrently, in slot order. Empty slots
    /// (unknown class) are skipped but keep their raid index reserved.
    pub(crate) async fn make_new(
        resolver: &dyn IdentityResolver,
        context: ResultContext,
        party: &Party,
        metrics: &PartyMetricsProto,
        party_index: i32,
        logs: &[Arc<SimLog>],
    ) -> Result<PartyMetrics, MetricsError> {
        let players = try_join_all(
            party
                .players
                .iter()
                .zip(&metrics.players)
                .enumerate()
                .filter(|(_, (player, _))| player.class != Class::Unknown)
                .map(|(i, (player, player_metrics))| {
                    let raid_index = party_index * PARTY_SIZE + i as i32;
                    UnitMetrics::make_new_player(resolver, context, player, player_metrics, raid_index, false, logs)
                }),
        )
        .await?;

        Ok(Self {
            party_index,
            dps: metrics.dps.clone(),
            hps: metrics.hps.clone(),
            players,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EncounterMetrics {
    pub duration_seconds: f64,
    pub targets: Vec<UnitMetrics>,
}

impl EncounterMetrics {
    pub(crate) async fn make_new(
        resolver: &dyn IdentityResolver,
        context: ResultContext,
        encounter: &Encounter,
        metrics: &EncounterMetricsProto,
        logs: &[Arc<SimLog>],
    ) -> Result<EncounterMetrics, MetricsError> {
        let targets = try_join_all(
            encounter
                .targets
                .iter()
                .zip(&metrics.targets)
                .enumerate()
                .map(|(i, (target, target_metrics))| {
                    UnitMetrics::make_new_target(resolver, context, target, target_metrics, i as i32, logs)
                }),
        )
        .await?;

        Ok(Self {
            duration_seconds: encounter.duration,
            targets,
        })
    }
}
