//! Error types for building and querying the metrics tree

use raidsim_types::ResourceType;
use thiserror::Error;

use crate::action_id::ResolveError;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("could not find target with unit index {unit_index}")]
    TargetNotFound { unit_index: i32 },

    #[error("cannot merge an empty set of metrics")]
    EmptyMerge,

    #[error("cannot merge {first:?} resource metrics with {other:?}")]
    MixedResourceTypes {
        first: ResourceType,
        other: ResourceType,
    },

    #[error("failed to resolve action identity")]
    Resolve(#[from] ResolveError),
}
