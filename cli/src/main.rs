use clap::{Parser, Subcommand, ValueEnum};
use raidsim_cli::{CliContext, commands, logging, readline};
use raidsim_types::ResourceType;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "raidsim result viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Mana,
    Energy,
    Rage,
    ComboPoints,
    Focus,
    Health,
}

impl From<ResourceKind> for ResourceType {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Mana => ResourceType::Mana,
            ResourceKind::Energy => ResourceType::Energy,
            ResourceKind::Rage => ResourceType::Rage,
            ResourceKind::ComboPoints => ResourceType::ComboPoints,
            ResourceKind::Focus => ResourceType::Focus,
            ResourceKind::Health => ResourceType::Health,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a saved sim run (JSON request/result pair)
    Load {
        #[arg(short, long)]
        path: String,
    },
    Players,
    Targets,
    /// Action table; `--player` and `--target` are unit indices
    Actions {
        #[arg(short, long)]
        player: Option<i32>,
        #[arg(short, long)]
        target: Option<i32>,
    },
    /// Damage or threat breakdown for one player; `--player` is a raid index
    Breakdown {
        #[arg(short, long)]
        player: i32,
        #[arg(short, long)]
        target: Option<i32>,
        #[arg(long)]
        threat: bool,
    },
    Auras {
        #[arg(short, long)]
        player: Option<i32>,
    },
    Debuffs {
        #[arg(short, long)]
        target: Option<i32>,
    },
    Resources {
        #[arg(short, long, value_enum)]
        kind: ResourceKind,
        #[arg(short, long)]
        player: Option<i32>,
    },
    /// Survival stats for a player unit index
    Death {
        #[arg(short, long)]
        player: i32,
    },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "raidsim".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Load { path }) => commands::load(&path, ctx).await?,
        Some(Commands::Players) => commands::players(ctx).await?,
        Some(Commands::Targets) => commands::targets(ctx).await?,
        Some(Commands::Actions { player, target }) => commands::actions(player, target, ctx).await?,
        Some(Commands::Breakdown {
            player,
            target,
            threat,
        }) => commands::breakdown(player, target, threat, ctx).await?,
        Some(Commands::Auras { player }) => commands::auras(player, ctx).await?,
        Some(Commands::Debuffs { target }) => commands::debuffs(target, ctx).await?,
        Some(Commands::Resources { kind, player }) => {
            commands::resources(kind.into(), player, ctx).await?
        }
        Some(Commands::Death { player }) => commands::death(player, ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
