use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use raidsim_core::{
    ActionMetrics, BreakdownRow, DPS_WINDOW, ResultFilter, SimResult, ViewerConfigExt, damage_breakdown,
    load_sim_run, sort_rows, threat_breakdown,
};
use raidsim_types::{ResourceType, SortColumn};

use crate::context::CliContext;

/// Formats a metric, printing `-` for NaN and infinite values.
fn num(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "-".to_string()
    }
}

fn percent(value: Option<f64>, decimals: usize) -> String {
    value.map(|v| num(v, decimals)).unwrap_or_else(|| "-".to_string())
}

/// Error message with every source in the chain.
fn report(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

fn filter(player: Option<i32>, target: Option<i32>) -> ResultFilter {
    ResultFilter { player, target }
}

fn descending(column: SortColumn) -> bool {
    column != SortColumn::Name
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

pub async fn load(path: &str, ctx: &CliContext) -> Result<(), String> {
    let timer = Instant::now();
    let run = load_sim_run(Path::new(path)).map_err(|e| report(&e))?;
    let result = SimResult::from_proto(run, ctx.resolver())
        .await
        .map_err(|e| report(&e))?;

    println!(
        "loaded {} players and {} targets in {}ms",
        result.players(&ResultFilter::all()).len(),
        result.targets(&ResultFilter::all()).len(),
        timer.elapsed().as_millis()
    );
    println!(
        "{} iterations, {}s average duration",
        result.iterations(),
        num(result.duration(), 1)
    );
    ctx.set_result(result).await;
    Ok(())
}

pub async fn show_config(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    match raidsim_core::ViewerConfig::config_path() {
        Some(path) => println!("config file:   {}", path.display()),
        None => println!("config file:   (unavailable)"),
    }
    println!(
        "icon database: {}",
        config.icon_database.as_deref().unwrap_or("(none)")
    );
    println!("icon base url: {}", config.icon_base_url);
    println!("decimals:      {}", config.decimals);
    println!("merge pets:    {}", config.merge_pets);
    println!("default sort:  {:?}", config.default_sort);
    Ok(())
}

pub fn exit() -> Result<(), String> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "quitting...").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Units
// ─────────────────────────────────────────────────────────────────────────────

pub async fn players(ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;

    println!(
        "{:>4} {:>4}  {:<28} {:>10} {:>10} {:>10} {:>10}",
        "Raid", "Unit", "Name", "DPS", "HPS", "TPS", "DTPS"
    );
    println!("{}", "-".repeat(82));
    for player in result.players(&ResultFilter::all()) {
        println!(
            "{:>4} {:>4}  {:<28} {:>10} {:>10} {:>10} {:>10}",
            player.index(),
            player.unit_index(),
            player.label(),
            num(player.dps.avg, d),
            num(player.hps.avg, d),
            num(player.tps.avg, d),
            num(player.dtps.avg, d),
        );
        for pet in &player.pets {
            println!(
                "{:>4} {:>4}    {:<26} {:>10}",
                "",
                pet.unit_index(),
                pet.name(),
                num(pet.dps.avg, d)
            );
        }
    }
    Ok(())
}

pub async fn targets(ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;

    println!("{:>4} {:>4}  {:<28} {:>10}", "Idx", "Unit", "Name", "DPS");
    println!("{}", "-".repeat(50));
    for target in result.targets(&ResultFilter::all()) {
        println!(
            "{:>4} {:>4}  {:<28} {:>10}",
            target.index(),
            target.unit_index(),
            target.label(),
            num(target.dps.avg, d)
        );
    }
    Ok(())
}

pub async fn death(player: i32, ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;
    let unit = result
        .player_with_index(player)
        .ok_or_else(|| format!("No player with unit index {player}"))?;

    let death = unit.chance_of_death();
    println!("{}", unit.label());
    println!(
        "  chance of death: {}% ± {}",
        num(death.avg, d),
        num(death.stdev, d)
    );
    println!("  seconds oom:     {}", num(unit.seconds_oom_avg(), d));
    println!("  dtps:            {}", num(unit.dtps.avg, d));
    println!("  tmi:             {}", num(unit.tmi.avg, d));
    println!("  max threat:      {}", num(unit.max_threat(), d));
    println!("  peak dps ({}s):  {}", DPS_WINDOW, num(unit.logs.peak_dps(), d));
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

pub async fn actions(player: Option<i32>, target: Option<i32>, ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let config = ctx.config.read().await.clone();
    let d = config.decimals;

    let mut rows: Vec<BreakdownRow> = result
        .action_metrics(&filter(player, target))
        .map_err(|e| report(&e))?
        .into_iter()
        .map(|metrics| BreakdownRow {
            metrics,
            children: Vec::new(),
            is_pet: false,
        })
        .collect();
    sort_rows(&mut rows, config.default_sort, descending(config.default_sort));

    println!(
        "{:<32} {:>8} {:>7} {:>12} {:>10} {:>7} {:>7} {:>7}",
        "Name", "Casts", "CPM", "Damage", "DPS", "Crit %", "Miss %", "Dmg %"
    );
    println!("{}", "-".repeat(98));
    for row in &rows {
        let a = &row.metrics;
        println!(
            "{:<32} {:>8} {:>7} {:>12} {:>10} {:>7} {:>7} {:>7}",
            a.name(),
            num(a.casts(), d),
            num(a.casts_per_minute(), d),
            num(a.avg_damage(), d),
            num(a.dps(), d),
            num(a.crit_percent(), d),
            num(a.total_misses_percent(), d),
            percent(a.total_damage_percent(), d),
        );
    }
    Ok(())
}

fn print_breakdown_row(a: &ActionMetrics, prefix: &str, threat: bool, d: usize) {
    let (total, rate, share) = if threat {
        (a.avg_threat(), a.tps(), a.total_threat_percent())
    } else {
        (a.avg_damage(), a.dps(), a.total_damage_percent())
    };
    println!(
        "{:<36} {:>12} {:>10} {:>8} {:>8} {:>7}",
        format!("{prefix}{}", a.name()),
        num(total, d),
        num(rate, d),
        num(a.casts(), d),
        num(a.avg_cast(), d),
        percent(share, d),
    );
}

pub async fn breakdown(
    player: i32,
    target: Option<i32>,
    threat: bool,
    ctx: &CliContext,
) -> Result<(), String> {
    let result = ctx.result().await?;
    let config = ctx.config.read().await.clone();
    let d = config.decimals;

    let filter = filter(Some(player), target);
    let mut rows = if threat {
        threat_breakdown(&result, &filter, config.merge_pets)
    } else {
        damage_breakdown(&result, &filter, config.merge_pets)
    }
    .map_err(|e| report(&e))?;

    if rows.is_empty() {
        println!("No actions for raid index {player}");
        return Ok(());
    }

    let column = match (threat, config.default_sort) {
        (true, SortColumn::Damage) => SortColumn::Threat,
        (_, column) => column,
    };
    sort_rows(&mut rows, column, descending(column));

    println!(
        "{:<36} {:>12} {:>10} {:>8} {:>8} {:>7}",
        "Name",
        if threat { "Threat" } else { "Damage" },
        if threat { "TPS" } else { "DPS" },
        "Casts",
        "Avg Cast",
        "Share"
    );
    println!("{}", "-".repeat(86));
    for row in &rows {
        let prefix = if row.is_pet { "[pet] " } else { "" };
        print_breakdown_row(&row.metrics, prefix, threat, d);
        for child in &row.children {
            print_breakdown_row(child, "    ", threat, d);
        }
    }
    Ok(())
}

pub async fn auras(player: Option<i32>, ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;
    let auras = result.buff_metrics(&filter(player, None));
    print_auras(&auras, d);
    Ok(())
}

pub async fn debuffs(target: Option<i32>, ctx: &CliContext) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;
    let auras = result.debuff_metrics(&filter(None, target));
    print_auras(&auras, d);
    Ok(())
}

fn print_auras(auras: &[raidsim_core::AuraMetrics], d: usize) {
    println!("{:<36} {:>9} {:>8} {:>8}", "Name", "Uptime %", "Procs", "PPM");
    println!("{}", "-".repeat(64));
    for aura in auras {
        println!(
            "{:<36} {:>9} {:>8} {:>8}",
            aura.name(),
            num(aura.uptime_percent(), d),
            num(aura.average_procs(), d),
            num(aura.ppm(), d),
        );
    }
}

pub async fn resources(
    kind: ResourceType,
    player: Option<i32>,
    ctx: &CliContext,
) -> Result<(), String> {
    let result = ctx.result().await?;
    let d = ctx.config.read().await.decimals;

    println!(
        "{:<36} {:>8} {:>10} {:>9} {:>9} {:>9}",
        "Name", "Events", "Gain", "Gain/s", "Avg Gain", "Wasted"
    );
    println!("{}", "-".repeat(86));
    for resource in result.resource_metrics(kind, &filter(player, None)) {
        println!(
            "{:<36} {:>8} {:>10} {:>9} {:>9} {:>9}",
            resource.name(),
            num(resource.events(), d),
            num(resource.gain(), d),
            num(resource.gain_per_second(), d),
            num(resource.avg_gain(), d),
            num(resource.wasted_gain(), d),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_print_as_dash() {
        assert_eq!(num(f64::NAN, 2), "-");
        assert_eq!(num(f64::INFINITY, 2), "-");
        assert_eq!(num(12.345, 1), "12.3");
        assert_eq!(percent(None, 2), "-");
        assert_eq!(percent(Some(50.0), 0), "50");
    }

    #[test]
    fn name_sorts_ascending() {
        assert!(!descending(SortColumn::Name));
        assert!(descending(SortColumn::Dps));
    }

    #[test]
    fn report_walks_the_source_chain() {
        let err = raidsim_core::LoadError::Open {
            path: "run.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = report(&err);
        assert!(message.ends_with(": missing"), "{message}");
    }
}
