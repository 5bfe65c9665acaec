use raidsim_types::TargetedActionMetricsProto;

/// One action's statistics against one target.
///
/// Raw counters are totals over all iterations. `avg_*` getters divide by the
/// iteration count and rates (dps, tps, hps) also divide by the average
/// iteration duration. Percentages are not guarded against zero
/// denominators and may be NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetedActionMetrics {
    data: TargetedActionMetricsProto,
    iterations: f64,
    duration: f64,

    landed_hits_raw: f64,
    landed_ticks_raw: f64,
    hit_attempts: f64,
}

impl TargetedActionMetrics {
    pub fn new(data: TargetedActionMetricsProto, iterations: f64, duration: f64) -> Self {
        let d = &data;
        let landed_hits_raw = (d.hits + d.crits + d.blocks + d.blocked_crits + d.glances + d.crushes) as f64;
        let landed_ticks_raw = (d.ticks + d.crit_ticks) as f64;

        let mut hit_attempts = d.misses
            + d.dodges
            + d.parries
            + d.blocks
            + d.blocked_crits
            + d.glances
            + d.crits
            + d.crushes;
        if d.hits != 0 {
            hit_attempts += d.hits;
        } else if d.ticks > 0 {
            // Tick-only spells report no hits, their casts are the attempts
            hit_attempts += d.casts;
        }

        Self {
            iterations,
            duration,
            landed_hits_raw,
            landed_ticks_raw,
            hit_attempts: hit_attempts as f64,
            data,
        }
    }

    /// Element-wise sum of every counter, normalized with the first element's
    /// iterations and duration.
    pub fn merge<'a>(actions: impl IntoIterator<Item = &'a TargetedActionMetrics>) -> Self {
        let mut iter = actions.into_iter();
        let Some(first) = iter.next() else {
            return Self::new(TargetedActionMetricsProto::default(), 1.0, 1.0);
        };

        let mut data = TargetedActionMetricsProto {
            unit_index: first.data.unit_index,
            ..Default::default()
        };
        data += &first.data;
        for action in iter {
            data += &action.data;
        }
        Self::new(data, first.iterations, first.duration)
    }

    pub fn to_proto(&self) -> &TargetedActionMetricsProto {
        &self.data
    }

    pub fn unit_index(&self) -> i32 {
        self.data.unit_index
    }

    /// Swings and casts that could have landed, summed over all iterations.
    pub fn hit_attempts(&self) -> f64 {
        self.hit_attempts
    }

    pub fn iterations(&self) -> f64 {
        self.iterations
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Damage
    // ─────────────────────────────────────────────────────────────────────────

    pub fn damage(&self) -> f64 {
        self.data.damage
    }

    pub fn avg_damage(&self) -> f64 {
        self.data.damage / self.iterations
    }

    pub fn avg_resisted_damage(&self) -> f64 {
        self.data.resisted_damage / self.iterations
    }

    pub fn avg_crit_damage(&self) -> f64 {
        self.data.crit_damage / self.iterations
    }

    pub fn avg_resisted_crit_damage(&self) -> f64 {
        self.data.resisted_crit_damage / self.iterations
    }

    pub fn avg_tick_damage(&self) -> f64 {
        self.data.tick_damage / self.iterations
    }

    pub fn avg_resisted_tick_damage(&self) -> f64 {
        self.data.resisted_tick_damage / self.iterations
    }

    pub fn avg_crit_tick_damage(&self) -> f64 {
        self.data.crit_tick_damage / self.iterations
    }

    pub fn avg_resisted_crit_tick_damage(&self) -> f64 {
        self.data.resisted_crit_tick_damage / self.iterations
    }

    pub fn avg_glance_damage(&self) -> f64 {
        self.data.glance_damage / self.iterations
    }

    pub fn avg_block_damage(&self) -> f64 {
        self.data.block_damage / self.iterations
    }

    pub fn avg_blocked_crit_damage(&self) -> f64 {
        self.data.blocked_crit_damage / self.iterations
    }

    pub fn avg_crush_damage(&self) -> f64 {
        self.data.crush_damage / self.iterations
    }

    pub fn dps(&self) -> f64 {
        self.data.damage / self.iterations / self.duration
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Threat and Healing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn threat(&self) -> f64 {
        self.data.threat
    }

    pub fn avg_threat(&self) -> f64 {
        self.data.threat / self.iterations
    }

    pub fn tps(&self) -> f64 {
        self.data.threat / self.iterations / self.duration
    }

    /// Healing including shields.
    pub fn healing(&self) -> f64 {
        self.data.healing + self.data.shielding
    }

    pub fn avg_healing(&self) -> f64 {
        self.healing() / self.iterations
    }

    pub fn crit_healing(&self) -> f64 {
        self.data.crit_healing
    }

    pub fn avg_crit_healing(&self) -> f64 {
        self.data.crit_healing / self.iterations
    }

    pub fn shielding(&self) -> f64 {
        self.data.shielding
    }

    pub fn hps(&self) -> f64 {
        self.healing() / self.iterations / self.duration
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Casts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn casts(&self) -> f64 {
        self.data.casts as f64 / self.iterations
    }

    pub fn casts_per_minute(&self) -> f64 {
        self.casts() / (self.duration / 60.0)
    }

    pub fn avg_cast_time_ms(&self) -> f64 {
        self.data.cast_time_ms / self.iterations / self.casts()
    }

    pub fn time_spent_casting_ms(&self) -> f64 {
        self.data.cast_time_ms / self.iterations
    }

    /// Damage per second of cast time.
    pub fn damage_throughput(&self) -> f64 {
        let cast_time = self.avg_cast_time_ms();
        if cast_time != 0.0 && !cast_time.is_nan() {
            self.avg_cast() / (cast_time / 1000.0)
        } else {
            0.0
        }
    }

    pub fn threat_throughput(&self) -> f64 {
        let cast_time = self.avg_cast_time_ms();
        if cast_time != 0.0 && !cast_time.is_nan() {
            self.avg_hit_threat().max(self.avg_cast_threat()) / (cast_time / 1000.0)
        } else {
            0.0
        }
    }

    pub fn healing_throughput(&self) -> f64 {
        let cast_time = self.avg_cast_time_ms();
        if cast_time != 0.0 && !cast_time.is_nan() {
            self.hps() / (cast_time / 1000.0)
        } else {
            0.0
        }
    }

    /// Casts divisor that falls back to 1 when nothing was cast.
    fn casts_or_one(&self) -> f64 {
        let casts = self.casts();
        if casts == 0.0 { 1.0 } else { casts }
    }

    pub fn avg_cast(&self) -> f64 {
        if self.casts() == 0.0 {
            return 0.0;
        }
        self.data.damage / self.iterations / self.casts()
    }

    pub fn avg_cast_tick(&self) -> f64 {
        self.data.tick_damage / self.iterations / self.casts_or_one()
    }

    pub fn avg_cast_healing(&self) -> f64 {
        self.healing() / self.iterations / self.casts_or_one()
    }

    pub fn avg_cast_threat(&self) -> f64 {
        self.data.threat / self.iterations / self.casts_or_one()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per Landed Hit
    // ─────────────────────────────────────────────────────────────────────────

    pub fn landed_hits(&self) -> f64 {
        self.landed_hits_raw / self.iterations
    }

    pub fn landed_ticks(&self) -> f64 {
        self.landed_ticks_raw / self.iterations
    }

    pub fn avg_hit(&self) -> f64 {
        if self.landed_hits_raw == 0.0 {
            return 0.0;
        }
        (self.data.damage - self.data.tick_damage) / self.landed_hits_raw
    }

    pub fn avg_tick(&self) -> f64 {
        if self.landed_ticks_raw == 0.0 {
            return 0.0;
        }
        self.data.tick_damage / self.landed_ticks_raw
    }

    pub fn avg_hit_healing(&self) -> f64 {
        self.healing() / self.iterations / self.landed_hits()
    }

    pub fn avg_hit_threat(&self) -> f64 {
        if self.landed_hits_raw == 0.0 {
            return 0.0;
        }
        self.data.threat / self.landed_hits_raw
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outcomes
    // ─────────────────────────────────────────────────────────────────────────

    fn per_iteration(&self, count: i64) -> f64 {
        count as f64 / self.iterations
    }

    fn of_attempts(&self, count: i64) -> f64 {
        count as f64 / self.hit_attempts * 100.0
    }

    fn of_ticks(&self, count: i64) -> f64 {
        count as f64 / (self.data.ticks + self.data.crit_ticks) as f64 * 100.0
    }

    pub fn hits(&self) -> f64 {
        self.per_iteration(self.data.hits)
    }

    pub fn hit_percent(&self) -> f64 {
        self.of_attempts(self.data.hits)
    }

    pub fn resisted_hits(&self) -> f64 {
        self.per_iteration(self.data.resisted_hits)
    }

    pub fn resisted_hit_percent(&self) -> f64 {
        self.of_attempts(self.data.resisted_hits)
    }

    pub fn crits(&self) -> f64 {
        self.per_iteration(self.data.crits)
    }

    pub fn crit_percent(&self) -> f64 {
        self.of_attempts(self.data.crits)
    }

    pub fn resisted_crits(&self) -> f64 {
        self.per_iteration(self.data.resisted_crits)
    }

    pub fn resisted_crit_percent(&self) -> f64 {
        self.of_attempts(self.data.resisted_crits)
    }

    pub fn ticks(&self) -> f64 {
        self.per_iteration(self.data.ticks)
    }

    pub fn resisted_ticks(&self) -> f64 {
        self.per_iteration(self.data.resisted_ticks)
    }

    pub fn resisted_tick_percent(&self) -> f64 {
        self.of_ticks(self.data.resisted_ticks)
    }

    pub fn crit_ticks(&self) -> f64 {
        self.per_iteration(self.data.crit_ticks)
    }

    pub fn crit_tick_percent(&self) -> f64 {
        self.of_ticks(self.data.crit_ticks)
    }

    pub fn resisted_crit_ticks(&self) -> f64 {
        self.per_iteration(self.data.resisted_crit_ticks)
    }

    pub fn resisted_crit_tick_percent(&self) -> f64 {
        self.of_ticks(self.data.resisted_crit_ticks)
    }

    pub fn misses(&self) -> f64 {
        self.per_iteration(self.data.misses)
    }

    pub fn miss_percent(&self) -> f64 {
        self.of_attempts(self.data.misses)
    }

    pub fn dodges(&self) -> f64 {
        self.per_iteration(self.data.dodges)
    }

    pub fn dodge_percent(&self) -> f64 {
        self.of_attempts(self.data.dodges)
    }

    pub fn parries(&self) -> f64 {
        self.per_iteration(self.data.parries)
    }

    pub fn parry_percent(&self) -> f64 {
        self.of_attempts(self.data.parries)
    }

    pub fn total_misses(&self) -> f64 {
        self.misses() + self.dodges() + self.parries()
    }

    pub fn total_misses_percent(&self) -> f64 {
        self.miss_percent() + self.dodge_percent() + self.parry_percent()
    }

    pub fn blocks(&self) -> f64 {
        self.per_iteration(self.data.blocks)
    }

    pub fn block_percent(&self) -> f64 {
        self.of_attempts(self.data.blocks)
    }

    pub fn blocked_crits(&self) -> f64 {
        self.per_iteration(self.data.blocked_crits)
    }

    pub fn blocked_crit_percent(&self) -> f64 {
        self.of_attempts(self.data.blocked_crits)
    }

    pub fn glances(&self) -> f64 {
        self.per_iteration(self.data.glances)
    }

    pub fn glance_percent(&self) -> f64 {
        self.of_attempts(self.data.glances)
    }

    pub fn crushes(&self) -> f64 {
        self.per_iteration(self.data.crushes)
    }

    pub fn crush_percent(&self) -> f64 {
        self.of_attempts(self.data.crushes)
    }

    pub fn healing_percent(&self) -> f64 {
        (self.healing() - self.crit_healing()) / self.healing() * 100.0
    }

    pub fn healing_crit_percent(&self) -> f64 {
        self.data.crit_healing / self.healing() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(casts: i64, hits: i64, damage: f64) -> TargetedActionMetricsProto {
        TargetedActionMetricsProto {
            casts,
            hits,
            damage,
            ..Default::default()
        }
    }

    #[test]
    fn single_target_scenario() {
        // 1000 iterations, 500000 damage over 200 casts
        let m = TargetedActionMetrics::new(slice(200, 200, 500_000.0), 1000.0, 180.0);
        assert_eq!(m.avg_damage(), 500.0);
        assert_eq!(m.casts(), 0.2);
        assert_eq!(m.dps(), 500.0 / 180.0);
        assert_eq!(m.hit_attempts(), 200.0);
    }

    #[test]
    fn hit_attempts_fall_back_to_casts_for_tick_only_spells() {
        let data = TargetedActionMetricsProto {
            casts: 10,
            ticks: 50,
            misses: 2,
            ..Default::default()
        };
        let m = TargetedActionMetrics::new(data, 1.0, 1.0);
        assert_eq!(m.hit_attempts(), 12.0);
        assert_eq!(m.landed_ticks(), 50.0);
    }

    #[test]
    fn percentages_are_nan_without_attempts() {
        let m = TargetedActionMetrics::new(TargetedActionMetricsProto::default(), 1.0, 1.0);
        assert!(m.crit_percent().is_nan());
        assert_eq!(m.avg_hit(), 0.0);
        assert_eq!(m.avg_cast(), 0.0);
        assert_eq!(m.damage_throughput(), 0.0);
    }

    #[test]
    fn merge_sums_counters_and_keeps_first_context() {
        let a = TargetedActionMetrics::new(slice(10, 8, 1000.0), 4.0, 60.0);
        let b = TargetedActionMetrics::new(slice(6, 5, 600.0), 4.0, 60.0);
        let merged = TargetedActionMetrics::merge([&a, &b]);

        assert_eq!(merged.to_proto().casts, 16);
        assert_eq!(merged.to_proto().hits, 13);
        assert_eq!(merged.hit_attempts(), 13.0);
        assert_eq!(merged.damage(), 1600.0);
        assert_eq!(merged.iterations(), 4.0);
        assert_eq!(merged.dps(), 1600.0 / 4.0 / 60.0);
        assert_eq!(merged.avg_cast(), 100.0);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = TargetedActionMetrics::merge(std::iter::empty());
        assert_eq!(merged.damage(), 0.0);
        assert_eq!(merged.iterations(), 1.0);
    }

    #[test]
    fn throughput_uses_cast_time() {
        let data = TargetedActionMetricsProto {
            casts: 10,
            hits: 10,
            damage: 10_000.0,
            threat: 5_000.0,
            cast_time_ms: 20_000.0,
            ..Default::default()
        };
        let m = TargetedActionMetrics::new(data, 1.0, 60.0);
        assert_eq!(m.avg_cast_time_ms(), 2000.0);
        assert_eq!(m.damage_throughput(), 500.0);
        assert_eq!(m.threat_throughput(), 250.0);
        assert_eq!(m.casts_per_minute(), 10.0);
    }

    #[test]
    fn healing_includes_shields() {
        let data = TargetedActionMetricsProto {
            healing: 300.0,
            shielding: 100.0,
            crit_healing: 100.0,
            ..Default::default()
        };
        let m = TargetedActionMetrics::new(data, 2.0, 10.0);
        assert_eq!(m.healing(), 400.0);
        assert_eq!(m.hps(), 20.0);
        assert_eq!(m.healing_percent(), 75.0);
        assert_eq!(m.healing_crit_percent(), 25.0);
    }
}
