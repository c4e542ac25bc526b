use cf_core::building::BuildingKind;
use cf_core::id::{BuildingId, CreatureId, PlotId, ResourceId};
use cf_core::species::Species;
use cf_core::weather::Weather;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Daily cycle
    /// A daily rollover ran.
    DayStarted {
        /// Day number after the rollover.
        day: u32,
        /// Weather rolled for the day.
        weather: Weather,
    },

    // Lifecycle
    /// A creature arrived on the farm.
    CreatureSpawned {
        /// The new creature.
        creature: CreatureId,
        /// Its species.
        species: Species,
    },
    /// A creature died of old age.
    CreatureDied {
        /// The creature that died.
        creature: CreatureId,
        /// Its species.
        species: Species,
    },
    /// A pest was caught by a protector.
    PestCaught {
        /// The protector.
        hunter: CreatureId,
        /// The pest removed.
        pest: CreatureId,
    },
    /// A fossil hatched in a laboratory.
    FossilRevived {
        /// The revived creature.
        creature: CreatureId,
        /// The laboratory.
        lab: BuildingId,
    },
    /// A creature changed species.
    Evolved {
        /// The creature.
        creature: CreatureId,
        /// Former species.
        from: Species,
        /// New species.
        to: Species,
    },

    // Housing
    /// A creature lost its home and now roams the farm.
    Evicted {
        /// The evicted creature.
        creature: CreatureId,
        /// Its species.
        species: Species,
    },
    /// A creature moved to another building of the same kind.
    Relocated {
        /// The creature.
        creature: CreatureId,
        /// Its new home.
        to: BuildingId,
    },

    // Behavior
    /// A creature used its tick ability.
    AbilityUsed {
        /// The creature.
        creature: CreatureId,
        /// Short name of the ability.
        ability: String,
    },
    /// A slowpoke got bitten by a shellder.
    Bitten {
        /// The bitten creature.
        creature: CreatureId,
    },

    // World
    /// A crop plot finished growing.
    CropMatured {
        /// The plot.
        plot: PlotId,
    },
    /// A harvested resource grew back.
    ResourceRespawned {
        /// The new resource.
        resource: ResourceId,
    },
    /// A building was placed.
    BuildingPlaced {
        /// The building.
        building: BuildingId,
        /// Its kind.
        kind: BuildingKind,
    },
    /// A building was torn down.
    BuildingDestroyed {
        /// The building.
        building: BuildingId,
        /// Its kind.
        kind: BuildingKind,
    },

    // Player
    /// The player reached a new level.
    LevelUp {
        /// New level.
        level: u32,
    },
}

impl SimEventKind {
    /// Check whether a given creature is involved in this event.
    pub fn involves(&self, id: CreatureId) -> bool {
        match self {
            Self::CreatureSpawned { creature, .. }
            | Self::CreatureDied { creature, .. }
            | Self::FossilRevived { creature, .. }
            | Self::Evolved { creature, .. }
            | Self::Evicted { creature, .. }
            | Self::Relocated { creature, .. }
            | Self::AbilityUsed { creature, .. }
            | Self::Bitten { creature } => *creature == id,
            Self::PestCaught { hunter, pest } => *hunter == id || *pest == id,
            Self::DayStarted { .. }
            | Self::CropMatured { .. }
            | Self::ResourceRespawned { .. }
            | Self::BuildingPlaced { .. }
            | Self::BuildingDestroyed { .. }
            | Self::LevelUp { .. } => false,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The game day when this event occurred.
    pub day: u32,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event.
    pub fn new(tick: u64, day: u32, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            day,
            kind,
            description: description.into(),
        }
    }
}

/// Notifications for the presentation layer. Not saved.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events recorded on the given day.
    pub fn events_on_day(&self, day: u32) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.day == day).collect()
    }

    /// Return all events involving the given creature.
    pub fn events_for_creature(&self, id: CreatureId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Count events matching a predicate.
    pub fn count(&self, pred: impl Fn(&SimEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
