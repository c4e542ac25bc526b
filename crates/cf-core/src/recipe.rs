use crate::item::Item;

/// A crafting recipe: ingredients in, outputs out, energy spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
    /// Identifier used by the craft command.
    pub id: &'static str,
    /// Items consumed.
    pub ingredients: &'static [(Item, u32)],
    /// Items produced.
    pub outputs: &'static [(Item, u32)],
    /// Energy spent by the player.
    pub energy: u32,
}

/// Every known recipe.
pub const RECIPES: &[Recipe] = &[
    Recipe {
        id: "fertilizer",
        ingredients: &[(Item::OranBerry, 2)],
        outputs: &[(Item::Fertilizer, 1)],
        energy: 2,
    },
    Recipe {
        id: "fire_stone",
        ingredients: &[(Item::Stone, 5), (Item::Charcoal, 2)],
        outputs: &[(Item::FireStone, 1)],
        energy: 5,
    },
    Recipe {
        id: "link_cable",
        ingredients: &[(Item::Ore, 3), (Item::Wool, 1)],
        outputs: &[(Item::LinkCable, 1)],
        energy: 5,
    },
    Recipe {
        id: "rare_candy",
        ingredients: &[(Item::Honey, 2), (Item::Apple, 2), (Item::Egg, 1)],
        outputs: &[(Item::RareCandy, 1)],
        energy: 4,
    },
    Recipe {
        id: "seed_bundle",
        ingredients: &[(Item::Flower, 2)],
        outputs: &[(Item::BerrySeed, 2), (Item::WheatSeed, 1)],
        energy: 1,
    },
];

/// Look up a recipe by id.
pub fn find_recipe(id: &str) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.id == id)
}
