//! Species table: habitats, abilities, lifespans and the day/night timetable.
//!
//! Every per-species behavior is looked up here. Abilities are tagged unions
//! so a creature carries at most one tick ability and at most one daily
//! ability, dispatched by a single `match` in the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::building::BuildingKind;
use crate::item::Item;

/// Elemental type, used for weather reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Normal.
    Normal,
    /// Grass.
    Grass,
    /// Water.
    Water,
    /// Fire.
    Fire,
    /// Flying.
    Flying,
    /// Bug.
    Bug,
    /// Electric.
    Electric,
    /// Rock.
    Rock,
    /// Ground.
    Ground,
    /// Fighting.
    Fighting,
    /// Psychic.
    Psychic,
    /// Ghost.
    Ghost,
}

/// Where a species lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Habitat {
    /// Roams the farm without a home building.
    Wild,
    /// Lives inside buildings of the given kind.
    Building(BuildingKind),
    /// Patrols around the player's house.
    HousePatrol,
}

/// Gender assignment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderRule {
    /// Always female.
    Female,
    /// Always male.
    Male,
    /// Coin flip.
    Either,
}

/// Cooldown-gated action attempted during the continuous pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ability {
    /// Eat one `consume` from the inventory to make one `produce`.
    ConsumeAndYield {
        /// Item eaten.
        consume: Item,
        /// Item produced.
        produce: Item,
    },
    /// Water the nearest unwatered growing plot.
    WaterCrop,
    /// Fertilize the nearest unfertilized planted plot.
    FertilizeCrop,
    /// Pick one fruit from the nearest apple tree.
    HarvestAppleTree,
    /// Gather from the nearest flowering wild plant.
    HarvestWildPlant {
        /// Item gathered.
        produce: Item,
    },
    /// Produce an item from nothing.
    ProduceItem {
        /// Item produced.
        item: Item,
        /// Only produce while standing inside the home building.
        home_confined: bool,
    },
}

/// Once-per-day production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DailyAbility {
    /// Always yield `amount` of `item`.
    FlatYield {
        /// Item yielded.
        item: Item,
        /// Units per day.
        amount: u32,
    },
    /// Turn one `from` into one `to` when available.
    Convert {
        /// Item consumed.
        from: Item,
        /// Item produced.
        to: Item,
    },
    /// Find one `item` with probability `chance`.
    ChanceFind {
        /// Item found.
        item: Item,
        /// Probability per day.
        chance: f64,
    },
}

/// Static per-species data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesInfo {
    /// Elemental type.
    pub element: Element,
    /// Where the species lives.
    pub habitat: Habitat,
    /// Movement speed in world units per second.
    pub speed: f64,
    /// Age in days after which death is scheduled.
    pub max_age: u32,
    /// How gender is assigned at spawn.
    pub gender: GenderRule,
    /// Ignores obstacles and the river.
    pub flying: bool,
    /// Spoils other creatures' happiness and gets hunted.
    pub pest: bool,
    /// Base chance to catch a pest each day, for protectors.
    pub hunt_chance: Option<f64>,
    /// Periodically teleports away from home and back.
    pub teleports: bool,
    /// Confined to the river.
    pub river_bound: bool,
    /// Part of the lake family spawn group.
    pub lake_family: bool,
    /// Speeds up fossil revival in its laboratory.
    pub revival_accelerator: bool,
    /// Only obtainable by reviving a fossil.
    pub revived: bool,
    /// A ghost that haunts the farm.
    pub ghost: bool,
    /// Tick ability, if any.
    pub ability: Option<Ability>,
    /// Seconds between successful ability uses.
    pub cooldown: f64,
    /// Daily production, if any.
    pub daily: Option<DailyAbility>,
}

impl SpeciesInfo {
    const fn base(element: Element, habitat: Habitat, speed: f64, max_age: u32) -> Self {
        Self {
            element,
            habitat,
            speed,
            max_age,
            gender: GenderRule::Either,
            flying: false,
            pest: false,
            hunt_chance: None,
            teleports: false,
            river_bound: false,
            lake_family: false,
            revival_accelerator: false,
            revived: false,
            ghost: false,
            ability: None,
            cooldown: 0.0,
            daily: None,
        }
    }
}

/// Hour at which non-timetabled species fall asleep.
pub const DEFAULT_SLEEP_HOUR: f64 = 22.0;
/// Hour at which every day-active species wakes up.
pub const WAKE_HOUR: f64 = 6.0;

/// Every species that can live on the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Fertilizes crops.
    Bulbasaur,
    /// Waters crops.
    Squirtle,
    /// Wild day bird.
    Pidgey,
    /// Wild night bird.
    Hoothoot,
    /// Pest.
    Rattata,
    /// Pest hunter that finds coins.
    Meowth,
    /// House guard.
    Growlithe,
    /// Evolved house guard.
    Arcanine,
    /// Bee that gathers honey from flowers.
    Combee,
    /// Picks apples.
    Aipom,
    /// Turns berries into fertilizer.
    Munchlax,
    /// Gives milk in the stable.
    Miltank,
    /// Stable bull.
    Tauros,
    /// Gives wool in the stable.
    Mareep,
    /// Lays eggs in the coop.
    Torchic,
    /// Digs up fossils in the mine.
    Geodude,
    /// Digs ore in the mine.
    Diglett,
    /// Finds pearls in the lake.
    Lotad,
    /// Lake dweller.
    Slowpoke,
    /// Lake dweller.
    Shellder,
    /// Burns wood into charcoal at the campfire.
    Charmander,
    /// Earns coins at the gym.
    Machop,
    /// Teleporting gym resident.
    Abra,
    /// Teleporting gym resident that finds link cables.
    Kadabra,
    /// Laboratory assistant.
    Porygon,
    /// River fish.
    Magikarp,
    /// Evolved river fish.
    Gyarados,
    /// Revived from a fossil.
    Omanyte,
    /// Revived from a fossil.
    Aerodactyl,
    /// Wanderer more likely than most to return as a ghost.
    Cubone,
    /// Ghost of a departed creature.
    Gastly,
}

impl Species {
    /// Every species, in table order.
    pub const ALL: [Species; 31] = [
        Species::Bulbasaur,
        Species::Squirtle,
        Species::Pidgey,
        Species::Hoothoot,
        Species::Rattata,
        Species::Meowth,
        Species::Growlithe,
        Species::Arcanine,
        Species::Combee,
        Species::Aipom,
        Species::Munchlax,
        Species::Miltank,
        Species::Tauros,
        Species::Mareep,
        Species::Torchic,
        Species::Geodude,
        Species::Diglett,
        Species::Lotad,
        Species::Slowpoke,
        Species::Shellder,
        Species::Charmander,
        Species::Machop,
        Species::Abra,
        Species::Kadabra,
        Species::Porygon,
        Species::Magikarp,
        Species::Gyarados,
        Species::Omanyte,
        Species::Aerodactyl,
        Species::Cubone,
        Species::Gastly,
    ];

    /// Static data for this species.
    pub fn info(self) -> SpeciesInfo {
        use BuildingKind as B;
        use Element as E;
        use Habitat::{Building, HousePatrol, Wild};

        match self {
            Self::Bulbasaur => SpeciesInfo {
                ability: Some(Ability::FertilizeCrop),
                cooldown: 120.0,
                ..SpeciesInfo::base(E::Grass, Building(B::FarmArea), 2.0, 60)
            },
            Self::Squirtle => SpeciesInfo {
                ability: Some(Ability::WaterCrop),
                cooldown: 90.0,
                ..SpeciesInfo::base(E::Water, Building(B::FarmArea), 2.0, 60)
            },
            Self::Pidgey => SpeciesInfo {
                flying: true,
                ..SpeciesInfo::base(E::Flying, Wild, 4.0, 40)
            },
            Self::Hoothoot => SpeciesInfo {
                flying: true,
                ..SpeciesInfo::base(E::Flying, Wild, 3.5, 40)
            },
            Self::Rattata => SpeciesInfo {
                pest: true,
                ..SpeciesInfo::base(E::Normal, Wild, 3.0, 20)
            },
            Self::Meowth => SpeciesInfo {
                hunt_chance: Some(0.5),
                daily: Some(DailyAbility::ChanceFind {
                    item: Item::CoinPouch,
                    chance: 0.2,
                }),
                ..SpeciesInfo::base(E::Normal, Wild, 2.5, 45)
            },
            Self::Growlithe => SpeciesInfo {
                hunt_chance: Some(0.35),
                ..SpeciesInfo::base(E::Fire, HousePatrol, 3.0, 50)
            },
            Self::Arcanine => SpeciesInfo {
                hunt_chance: Some(0.6),
                ..SpeciesInfo::base(E::Fire, HousePatrol, 3.5, 80)
            },
            Self::Combee => SpeciesInfo {
                flying: true,
                ability: Some(Ability::HarvestWildPlant {
                    produce: Item::Honey,
                }),
                cooldown: 60.0,
                ..SpeciesInfo::base(E::Bug, Wild, 3.0, 25)
            },
            Self::Aipom => SpeciesInfo {
                ability: Some(Ability::HarvestAppleTree),
                cooldown: 45.0,
                ..SpeciesInfo::base(E::Normal, Wild, 3.0, 45)
            },
            Self::Munchlax => SpeciesInfo {
                ability: Some(Ability::ConsumeAndYield {
                    consume: Item::OranBerry,
                    produce: Item::Fertilizer,
                }),
                cooldown: 100.0,
                ..SpeciesInfo::base(E::Normal, Wild, 1.5, 70)
            },
            Self::Miltank => SpeciesInfo {
                gender: GenderRule::Female,
                ability: Some(Ability::ProduceItem {
                    item: Item::Milk,
                    home_confined: true,
                }),
                cooldown: 150.0,
                ..SpeciesInfo::base(E::Normal, Building(B::Stable), 1.5, 70)
            },
            Self::Tauros => SpeciesInfo {
                gender: GenderRule::Male,
                ..SpeciesInfo::base(E::Normal, Building(B::Stable), 3.0, 60)
            },
            Self::Mareep => SpeciesInfo {
                ability: Some(Ability::ProduceItem {
                    item: Item::Wool,
                    home_confined: true,
                }),
                cooldown: 180.0,
                ..SpeciesInfo::base(E::Electric, Building(B::Stable), 1.8, 55)
            },
            Self::Torchic => SpeciesInfo {
                ability: Some(Ability::ProduceItem {
                    item: Item::Egg,
                    home_confined: true,
                }),
                cooldown: 120.0,
                ..SpeciesInfo::base(E::Fire, Building(B::Coop), 1.8, 35)
            },
            Self::Geodude => SpeciesInfo {
                daily: Some(DailyAbility::ChanceFind {
                    item: Item::Fossil,
                    chance: 0.1,
                }),
                ..SpeciesInfo::base(E::Rock, Building(B::Mine), 1.2, 80)
            },
            Self::Diglett => SpeciesInfo {
                daily: Some(DailyAbility::FlatYield {
                    item: Item::Ore,
                    amount: 1,
                }),
                ..SpeciesInfo::base(E::Ground, Building(B::Mine), 2.0, 50)
            },
            Self::Lotad => SpeciesInfo {
                lake_family: true,
                daily: Some(DailyAbility::ChanceFind {
                    item: Item::Pearl,
                    chance: 0.15,
                }),
                ..SpeciesInfo::base(E::Water, Building(B::Lake), 1.2, 45)
            },
            Self::Slowpoke => SpeciesInfo::base(E::Water, Building(B::Lake), 0.8, 90),
            Self::Shellder => SpeciesInfo::base(E::Water, Building(B::Lake), 1.0, 50),
            Self::Charmander => SpeciesInfo {
                daily: Some(DailyAbility::Convert {
                    from: Item::Wood,
                    to: Item::Charcoal,
                }),
                ..SpeciesInfo::base(E::Fire, Building(B::Campfire), 2.0, 50)
            },
            Self::Machop => SpeciesInfo {
                daily: Some(DailyAbility::FlatYield {
                    item: Item::CoinPouch,
                    amount: 5,
                }),
                ..SpeciesInfo::base(E::Fighting, Building(B::PokemonGym), 2.2, 60)
            },
            Self::Abra => SpeciesInfo {
                teleports: true,
                ..SpeciesInfo::base(E::Psychic, Building(B::PokemonGym), 1.0, 50)
            },
            Self::Kadabra => SpeciesInfo {
                teleports: true,
                daily: Some(DailyAbility::ChanceFind {
                    item: Item::LinkCable,
                    chance: 0.05,
                }),
                ..SpeciesInfo::base(E::Psychic, Building(B::PokemonGym), 1.2, 65)
            },
            Self::Porygon => SpeciesInfo {
                revival_accelerator: true,
                ..SpeciesInfo::base(E::Normal, Building(B::Laboratory), 1.5, 100)
            },
            Self::Magikarp => SpeciesInfo {
                river_bound: true,
                ..SpeciesInfo::base(E::Water, Building(B::RiverArea), 1.5, 30)
            },
            Self::Gyarados => SpeciesInfo {
                river_bound: true,
                ..SpeciesInfo::base(E::Water, Building(B::RiverArea), 2.5, 90)
            },
            Self::Omanyte => SpeciesInfo {
                revived: true,
                ..SpeciesInfo::base(E::Rock, Wild, 1.0, 200)
            },
            Self::Aerodactyl => SpeciesInfo {
                revived: true,
                flying: true,
                ..SpeciesInfo::base(E::Flying, Wild, 4.0, 200)
            },
            Self::Cubone => SpeciesInfo::base(E::Ground, Wild, 1.8, 40),
            Self::Gastly => SpeciesInfo {
                ghost: true,
                flying: true,
                ..SpeciesInfo::base(E::Ghost, Wild, 2.5, 60)
            },
        }
    }

    /// Building kind this species lives in, if any.
    pub fn home_kind(self) -> Option<BuildingKind> {
        match self.info().habitat {
            Habitat::Building(kind) => Some(kind),
            Habitat::Wild | Habitat::HousePatrol => None,
        }
    }

    /// Whether this species ignores terrain collision.
    pub fn is_flying(self) -> bool {
        self.info().flying
    }

    /// Whether this species counts against crop safety.
    pub fn is_pest(self) -> bool {
        self.info().pest
    }

    /// Whether this species hunts pests.
    pub fn is_protector(self) -> bool {
        self.info().hunt_chance.is_some()
    }

    /// Whether this species patrols around the house.
    pub fn is_guard(self) -> bool {
        self.info().habitat == Habitat::HousePatrol
    }

    /// Chance of leaving a ghost behind on death.
    pub fn ghost_chance(self, shiny: bool) -> f64 {
        if self == Self::Cubone {
            0.5
        } else if shiny {
            0.25
        } else {
            0.05
        }
    }

    /// Whether `self` resents `other` being on the farm.
    pub fn is_rival_of(self, other: Species) -> bool {
        matches!(
            (self, other),
            (Self::Growlithe | Self::Arcanine, Self::Meowth)
                | (Self::Meowth, Self::Growlithe | Self::Arcanine)
        )
    }

    /// Whether this species only appears through evolution.
    pub fn is_evolved_form(self) -> bool {
        matches!(self, Self::Kadabra | Self::Arcanine | Self::Gyarados)
    }

    /// Evolution triggered by using `item` on this species.
    pub fn evolution(self, item: Item) -> Option<Species> {
        match (self, item) {
            (Self::Abra, Item::LinkCable) => Some(Self::Kadabra),
            (Self::Growlithe, Item::FireStone) => Some(Self::Arcanine),
            (Self::Magikarp, Item::RareCandy) => Some(Self::Gyarados),
            _ => None,
        }
    }

    /// Night counterpart of a day form, with the hour the day form sleeps.
    pub fn night_form(self) -> Option<(Species, f64)> {
        DAY_NIGHT_TIMETABLE
            .iter()
            .find(|(day, _, _)| *day == self)
            .map(|(_, night, hour)| (*night, *hour))
    }

    /// Day counterpart of a night form, with the hour the day form sleeps.
    pub fn day_form(self) -> Option<(Species, f64)> {
        DAY_NIGHT_TIMETABLE
            .iter()
            .find(|(_, night, _)| *night == self)
            .map(|(day, _, hour)| (*day, *hour))
    }

    /// Form appropriate for the given hour of the day.
    pub fn adjust_for_hour(self, hour: f64) -> Species {
        if let Some((night, sleep_hour)) = self.night_form()
            && in_window(hour, sleep_hour, WAKE_HOUR)
        {
            return night;
        }
        if let Some((day, sleep_hour)) = self.day_form()
            && in_window(hour, WAKE_HOUR, sleep_hour)
        {
            return day;
        }
        self
    }

    /// Hours `[start, end)` during which this species sleeps; may wrap midnight.
    pub fn sleep_window(self) -> (f64, f64) {
        if self == Self::Gastly {
            return (WAKE_HOUR, 19.0);
        }
        if let Some((_, sleep_hour)) = self.night_form() {
            return (sleep_hour, WAKE_HOUR);
        }
        if let Some((_, sleep_hour)) = self.day_form() {
            return (WAKE_HOUR, sleep_hour);
        }
        (DEFAULT_SLEEP_HOUR, WAKE_HOUR)
    }

    /// Whether this species sleeps at the given hour.
    pub fn is_asleep_at(self, hour: f64) -> bool {
        let (start, end) = self.sleep_window();
        in_window(hour, start, end)
    }
}

/// Day species, its night counterpart, and the hour the day form sleeps.
pub const DAY_NIGHT_TIMETABLE: &[(Species, Species, f64)] =
    &[(Species::Pidgey, Species::Hoothoot, 20.0)];

/// Whether `hour` falls in `[start, end)`, wrapping past midnight.
fn in_window(hour: f64, start: f64, end: f64) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

impl Species {
    /// Snake_case name used in saves and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bulbasaur => "bulbasaur",
            Self::Squirtle => "squirtle",
            Self::Pidgey => "pidgey",
            Self::Hoothoot => "hoothoot",
            Self::Rattata => "rattata",
            Self::Meowth => "meowth",
            Self::Growlithe => "growlithe",
            Self::Arcanine => "arcanine",
            Self::Combee => "combee",
            Self::Aipom => "aipom",
            Self::Munchlax => "munchlax",
            Self::Miltank => "miltank",
            Self::Tauros => "tauros",
            Self::Mareep => "mareep",
            Self::Torchic => "torchic",
            Self::Geodude => "geodude",
            Self::Diglett => "diglett",
            Self::Lotad => "lotad",
            Self::Slowpoke => "slowpoke",
            Self::Shellder => "shellder",
            Self::Charmander => "charmander",
            Self::Machop => "machop",
            Self::Abra => "abra",
            Self::Kadabra => "kadabra",
            Self::Porygon => "porygon",
            Self::Magikarp => "magikarp",
            Self::Gyarados => "gyarados",
            Self::Omanyte => "omanyte",
            Self::Aerodactyl => "aerodactyl",
            Self::Cubone => "cubone",
            Self::Gastly => "gastly",
        }
    }

    /// Parse the snake_case species name.
    pub fn parse(s: &str) -> Option<Species> {
        Self::ALL.into_iter().find(|sp| sp.name() == s)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
