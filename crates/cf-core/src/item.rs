use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Everything the player can hold in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Lumber from trees.
    Wood,
    /// Stone from rocks.
    Stone,
    /// Metal ore.
    Ore,
    /// A fossil that a laboratory can revive.
    Fossil,
    /// Oran berry.
    OranBerry,
    /// A picked flower.
    Flower,
    /// Honey from bees.
    Honey,
    /// Apple from an apple tree.
    Apple,
    /// Seed for an oran berry plot.
    BerrySeed,
    /// Seed for a wheat plot.
    WheatSeed,
    /// Seed for a carrot plot.
    CarrotSeed,
    /// Harvested wheat.
    Wheat,
    /// Harvested carrot.
    Carrot,
    /// Milk.
    Milk,
    /// Wool.
    Wool,
    /// Egg.
    Egg,
    /// Charcoal from the campfire.
    Charcoal,
    /// Pearl from the lake.
    Pearl,
    /// Coins in a pouch.
    CoinPouch,
    /// Fertilizer for crop plots.
    Fertilizer,
    /// Evolution stone for fire species.
    FireStone,
    /// Evolution item for trade species.
    LinkCable,
    /// Candy that evolves most species.
    RareCandy,
}

impl Item {
    /// Every item, in inventory display order.
    pub const ALL: [Item; 23] = [
        Item::Wood,
        Item::Stone,
        Item::Ore,
        Item::Fossil,
        Item::OranBerry,
        Item::Flower,
        Item::Honey,
        Item::Apple,
        Item::BerrySeed,
        Item::WheatSeed,
        Item::CarrotSeed,
        Item::Wheat,
        Item::Carrot,
        Item::Milk,
        Item::Wool,
        Item::Egg,
        Item::Charcoal,
        Item::Pearl,
        Item::CoinPouch,
        Item::Fertilizer,
        Item::FireStone,
        Item::LinkCable,
        Item::RareCandy,
    ];

    /// Money received for selling one unit.
    pub fn sell_price(self) -> i64 {
        match self {
            Self::Wood | Self::Stone | Self::Flower => 2,
            Self::OranBerry | Self::BerrySeed | Self::WheatSeed | Self::CarrotSeed => 3,
            Self::Ore | Self::Apple | Self::Wheat | Self::Charcoal => 6,
            Self::Carrot | Self::Egg | Self::Fertilizer => 8,
            Self::Honey | Self::Milk | Self::Wool => 15,
            Self::CoinPouch => 25,
            Self::Pearl | Self::Fossil => 60,
            Self::FireStone | Self::LinkCable | Self::RareCandy => 100,
        }
    }

    /// Parse the snake_case name used in saves and on the command line.
    pub fn parse(s: &str) -> Option<Item> {
        Self::ALL.into_iter().find(|item| item.to_string() == s)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Ore => "ore",
            Self::Fossil => "fossil",
            Self::OranBerry => "oran_berry",
            Self::Flower => "flower",
            Self::Honey => "honey",
            Self::Apple => "apple",
            Self::BerrySeed => "berry_seed",
            Self::WheatSeed => "wheat_seed",
            Self::CarrotSeed => "carrot_seed",
            Self::Wheat => "wheat",
            Self::Carrot => "carrot",
            Self::Milk => "milk",
            Self::Wool => "wool",
            Self::Egg => "egg",
            Self::Charcoal => "charcoal",
            Self::Pearl => "pearl",
            Self::CoinPouch => "coin_pouch",
            Self::Fertilizer => "fertilizer",
            Self::FireStone => "fire_stone",
            Self::LinkCable => "link_cable",
            Self::RareCandy => "rare_candy",
        };
        f.write_str(name)
    }
}

/// Sparse item counts. Entries that drop to zero or below are removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<Item, i64>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many of `item` are held.
    pub fn count(&self, item: Item) -> i64 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of `item` are held.
    pub fn has(&self, item: Item, amount: u32) -> bool {
        self.count(item) >= i64::from(amount)
    }

    /// Whether every `(item, amount)` pair is covered.
    pub fn has_all(&self, needs: &[(Item, u32)]) -> bool {
        needs.iter().all(|(item, amount)| self.has(*item, *amount))
    }

    /// Adjust a count by a signed delta, deleting non-positive entries.
    pub fn adjust(&mut self, item: Item, delta: i64) {
        let entry = self.items.entry(item).or_insert(0);
        *entry += delta;
        if *entry <= 0 {
            self.items.remove(&item);
        }
    }

    /// Add `amount` units.
    pub fn add(&mut self, item: Item, amount: u32) {
        self.adjust(item, i64::from(amount));
    }

    /// Remove `amount` units, failing without change when short.
    pub fn remove(&mut self, item: Item, amount: u32) -> CoreResult<()> {
        let have = self.count(item);
        let need = i64::from(amount);
        if have < need {
            return Err(CoreError::NotEnoughItems { item, have, need });
        }
        self.adjust(item, -need);
        Ok(())
    }

    /// Iterate over held items in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Item, i64)> + '_ {
        self.items.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of distinct items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
