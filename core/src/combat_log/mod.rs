mod error;
mod log_entry;
mod parser;
mod views;

pub use error::ParseError;
pub use log_entry::*;
pub use parser::LogParser;
pub use views::{
    AuraUptimeLog, CastLog, DPS_WINDOW, DpsLog, ResourceChangedLogGroup, ThreatLogGroup, UnitLogs,
};
