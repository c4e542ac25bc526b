use std::path::Path;

use cf_core::building::{BuildingKind, Rotation};
use cf_core::geometry::Point;
use cf_simulation::GameConfig;
use colored::Colorize;

pub fn run(
    save: &Path,
    config: GameConfig,
    kind: &str,
    x: f64,
    y: f64,
    rotation: u32,
) -> Result<(), String> {
    let kind = BuildingKind::parse(kind).ok_or_else(|| {
        let known: Vec<String> = BuildingKind::ALL
            .iter()
            .filter(|k| k.is_placeable())
            .map(|k| k.to_string())
            .collect();
        format!("unknown building '{kind}' (expected one of: {})", known.join(", "))
    })?;
    let rotation = Rotation::from_degrees(rotation)
        .ok_or_else(|| format!("invalid rotation {rotation} (expected 0, 90, 180 or 270)"))?;

    let mut sim = super::open_farm(save, config)?;
    let id = sim
        .place_building(kind, Point::new(x, y), rotation)
        .map_err(|e| e.to_string())?;
    super::write_farm(&sim, save)?;

    let residents = sim.state().resident_count(id);
    println!(
        "  {} {kind} at ({x}, {y}) {}",
        "Built".green().bold(),
        format!("[{id}]").dimmed()
    );
    if residents > 0 {
        println!(
            "  {residents} resident{} moved in",
            if residents == 1 { "" } else { "s" }
        );
    }
    println!("  Money left: {}", sim.state().player.money);
    Ok(())
}
