mod config;
mod error;
mod loader;

pub use config::{DEFAULT_ICON_BASE_URL, SortColumn, ViewerConfig, ViewerConfigExt};
pub use error::{ConfigError, LoadError};
pub use loader::load_sim_run;
