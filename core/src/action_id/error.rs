//! Error types for action identity resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors while resolving display names and icons for action ids
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no display data for spell {0}")]
    UnknownSpell(i32),

    #[error("no display data for item {0}")]
    UnknownItem(i32),

    #[error("action id has no spell, item or other id")]
    EmptyActionId,

    #[error("failed to load icon registry {path}")]
    Registry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
