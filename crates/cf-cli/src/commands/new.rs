use std::path::Path;

use cf_simulation::{GameConfig, Simulation};
use colored::Colorize;

pub fn run(save: &Path, config: GameConfig, seed: Option<u64>, force: bool) -> Result<(), String> {
    if save.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            save.display()
        ));
    }

    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    let sim = Simulation::new_game(config);
    super::write_farm(&sim, save)?;

    let state = sim.state();
    println!(
        "  {} {}",
        "New farm".bold(),
        format!("({})", save.display()).dimmed()
    );
    println!(
        "  {}x{} acres, {} buildings, {} resources, weather: {}",
        state.world.width,
        state.world.height,
        state.world.buildings.len(),
        state.world.resources.len(),
        state.weather
    );
    Ok(())
}
