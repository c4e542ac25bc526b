use cf_core::building::BuildingKind;
use cf_core::error::CoreError;
use cf_core::item::Item;
use cf_core::species::Species;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Alias for `Result<T, CommandError>`.
pub type CommandResult<T> = Result<T, CommandError>;

/// Failures of the simulation plumbing: saves, files, configuration.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A system failed during a tick.
    #[error("system error: {0}")]
    SystemError(String),
}

/// Policy failures of player commands. A command that returns one of these
/// has not changed the game state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The player cannot afford the money cost.
    #[error("not enough money: have {have}, need {need}")]
    NotEnoughMoney {
        /// Money held.
        have: i64,
        /// Money required.
        need: i64,
    },

    /// The player is too tired.
    #[error("not enough energy: have {have}, need {need}")]
    NotEnoughEnergy {
        /// Energy left.
        have: u32,
        /// Energy required.
        need: u32,
    },

    /// The inventory lacks an ingredient or material.
    #[error("not enough {item}: have {have}, need {need}")]
    NotEnoughItems {
        /// Missing item.
        item: Item,
        /// Units held.
        have: i64,
        /// Units required.
        need: i64,
    },

    /// The site failed placement validation.
    #[error("cannot build here: {0}")]
    InvalidPlacement(String),

    /// The building cannot be torn down.
    #[error("a {0} cannot be destroyed")]
    Indestructible(BuildingKind),

    /// An id did not resolve.
    #[error(transparent)]
    NotFound(CoreError),

    /// Something is already growing.
    #[error("plot is not empty")]
    PlotNotEmpty,

    /// Nothing is growing.
    #[error("plot has nothing planted")]
    PlotNotPlanted,

    /// The crop is still growing.
    #[error("crop is not ready to harvest")]
    PlotNotMature,

    /// Fertilizer was already applied this season.
    #[error("plot is already fertilized")]
    AlreadyFertilized,

    /// The resource has nothing left to give right now.
    #[error("nothing to collect")]
    NothingToCollect,

    /// The item cannot be planted.
    #[error("{0} is not a seed")]
    NotASeed(Item),

    /// No recipe has this id.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// The item does nothing for this species.
    #[error("{species} does not evolve with {item}")]
    NoEvolution {
        /// Species targeted.
        species: Species,
        /// Item offered.
        item: Item,
    },

    /// The team is at its size limit.
    #[error("team is full")]
    TeamFull,

    /// The creature already travels with the player.
    #[error("creature is already on the team")]
    AlreadyOnTeam,

    /// The creature is not on the team.
    #[error("creature is not on the team")]
    NotOnTeam,

    /// Revival needs a laboratory.
    #[error("{0} is not a laboratory")]
    NotALaboratory(BuildingKind),

    /// The laboratory is already reviving a fossil.
    #[error("laboratory is busy")]
    LaboratoryBusy,

    /// Only revived species hatch from fossils.
    #[error("{0} cannot be revived from a fossil")]
    NotRevivable(Species),
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotEnoughItems { item, have, need } => {
                CommandError::NotEnoughItems { item, have, need }
            }
            other => CommandError::NotFound(other),
        }
    }
}
