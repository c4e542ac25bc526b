pub mod craft;
pub mod new;
pub mod place;
pub mod simulate;
pub mod status;

use std::path::Path;

use cf_simulation::{GameConfig, Simulation};
use tracing::debug;

/// Read the configuration file, or use defaults when none was given.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    match path {
        Some(path) => GameConfig::load(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Load an existing farm. Unlike `simulate`, these commands never create one.
fn open_farm(save: &Path, config: GameConfig) -> Result<Simulation, String> {
    if !save.exists() {
        return Err(format!(
            "no farm at {}; run `critterfarm new` first",
            save.display()
        ));
    }
    Simulation::load(save, config).map_err(|e| format!("cannot load {}: {e}", save.display()))
}

fn write_farm(sim: &Simulation, save: &Path) -> Result<(), String> {
    debug!(path = %save.display(), day = sim.state().day, "writing save");
    sim.save(save)
        .map_err(|e| format!("cannot write {}: {e}", save.display()))
}
