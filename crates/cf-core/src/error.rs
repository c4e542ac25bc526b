use crate::id::{BuildingId, CreatureId, PlotId, ResourceId};
use crate::item::Item;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core data model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The requested building does not exist.
    #[error("building not found: {0}")]
    BuildingNotFound(BuildingId),

    /// The requested resource does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),

    /// The requested crop plot does not exist.
    #[error("crop plot not found: {0}")]
    PlotNotFound(PlotId),

    /// The requested creature does not exist.
    #[error("creature not found: {0}")]
    CreatureNotFound(CreatureId),

    /// The inventory holds fewer items than requested.
    #[error("not enough {item}: have {have}, need {need}")]
    NotEnoughItems {
        /// The item that ran short.
        item: Item,
        /// How many are held.
        have: i64,
        /// How many were requested.
        need: i64,
    },
}
