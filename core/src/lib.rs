pub mod action_id;
pub mod combat_log;
pub mod context;
pub mod metrics;
pub mod result;

// Re-exports for convenience
pub use action_id::{ActionId, CachedResolver, IconData, IconRegistry, IdentityResolver, ResolveError};
pub use combat_log::*;
pub use context::{ConfigError, LoadError, ViewerConfig, ViewerConfigExt, load_sim_run};
pub use metrics::breakdown::{BreakdownRow, damage_breakdown, sort_rows, threat_breakdown};
pub use metrics::{
    ActionMetrics, AuraMetrics, EncounterMetrics, MergeOptions, MetricsError, PartyMetrics, RaidMetrics,
    ResourceMetrics, ResultContext, TargetedActionMetrics, UnitMetrics,
};
pub use result::{ResultFilter, SimResult};
