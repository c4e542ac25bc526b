use std::path::Path;

use cf_core::item::Item;
use cf_core::recipe::RECIPES;
use cf_simulation::GameConfig;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(save: &Path, config: GameConfig, recipe: Option<&str>) -> Result<(), String> {
    let Some(recipe) = recipe else {
        print_recipes();
        return Ok(());
    };

    let mut sim = super::open_farm(save, config)?;
    let crafted = sim.craft_recipe(recipe).map_err(|e| e.to_string())?;
    super::write_farm(&sim, save)?;

    println!(
        "  {} {} -> {}",
        "Crafted".green().bold(),
        crafted.id,
        format_items(crafted.outputs)
    );
    println!("  Energy left: {}", sim.state().player.energy);
    Ok(())
}

fn print_recipes() {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Recipe", "Ingredients", "Makes", "Energy"]);
    for recipe in RECIPES {
        table.add_row(vec![
            recipe.id.to_string(),
            format_items(recipe.ingredients),
            format_items(recipe.outputs),
            recipe.energy.to_string(),
        ]);
    }
    println!("{table}");
}

fn format_items(items: &[(Item, u32)]) -> String {
    items
        .iter()
        .map(|(item, n)| format!("{item} x{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}
