use std::path::Path;

use cf_simulation::{GameConfig, LoadOutcome, SimEventKind, Simulation};
use colored::Colorize;

pub fn run(
    save: &Path,
    config: GameConfig,
    seconds: f64,
    step: f64,
    day_length: Option<f64>,
    verbose: bool,
) -> Result<(), String> {
    if step <= 0.0 {
        return Err("--step must be positive".into());
    }
    if seconds < 0.0 {
        return Err("--seconds cannot be negative".into());
    }
    let config = match day_length {
        Some(secs) if secs > 0.0 => config.with_day_length(secs),
        Some(_) => return Err("--day-length must be positive".into()),
        None => config,
    };

    let (mut sim, outcome) = Simulation::load_or_new(save, config);
    if outcome == LoadOutcome::Fresh {
        println!("  {}", "No saved farm found, starting a new one".yellow());
    }

    let mut remaining = seconds;
    let mut rollovers = 0;
    while remaining > 0.0 {
        let dt = step.min(remaining);
        if sim.advance(dt) {
            rollovers += 1;
        }
        remaining -= dt;
    }
    super::write_farm(&sim, save)?;

    let state = sim.state();
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({seconds}s in {step}s steps)").dimmed()
    );
    println!(
        "  {} new day{}, now day {} ({}), {} creatures, {} events logged",
        rollovers,
        if rollovers == 1 { "" } else { "s" },
        state.day,
        state.weather,
        state.creatures.len(),
        sim.events().len()
    );
    println!();

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let label = format!("[day {:>3}]", event.day).dimmed();
            println!("  {label} {}", colorize_event(&event.kind, &event.description));
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
        return Ok(());
    }

    let events = sim.events();
    let summary = [
        (
            "arrived",
            events.count(|k| matches!(k, SimEventKind::CreatureSpawned { .. })),
        ),
        (
            "died",
            events.count(|k| matches!(k, SimEventKind::CreatureDied { .. })),
        ),
        (
            "pests caught",
            events.count(|k| matches!(k, SimEventKind::PestCaught { .. })),
        ),
        (
            "fossils revived",
            events.count(|k| matches!(k, SimEventKind::FossilRevived { .. })),
        ),
        (
            "crops ready",
            events.count(|k| matches!(k, SimEventKind::CropMatured { .. })),
        ),
        (
            "resources regrown",
            events.count(|k| matches!(k, SimEventKind::ResourceRespawned { .. })),
        ),
    ];
    if summary.iter().any(|(_, n)| *n > 0) {
        println!("  {}", "Summary".bold().underline());
        for (label, n) in summary.iter().filter(|(_, n)| *n > 0) {
            println!("  {n:>4} {label}");
        }
        println!();
    }
    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::DayStarted { .. } => description.bold(),
        SimEventKind::CreatureDied { .. } | SimEventKind::Evicted { .. } => description.red(),
        SimEventKind::PestCaught { .. } | SimEventKind::Bitten { .. } => description.yellow(),
        SimEventKind::CreatureSpawned { .. }
        | SimEventKind::FossilRevived { .. }
        | SimEventKind::Evolved { .. } => description.green(),
        SimEventKind::CropMatured { .. } | SimEventKind::ResourceRespawned { .. } => {
            description.cyan()
        }
        SimEventKind::BuildingPlaced { .. }
        | SimEventKind::BuildingDestroyed { .. }
        | SimEventKind::Relocated { .. } => description.blue(),
        SimEventKind::LevelUp { .. } => description.magenta().bold(),
        SimEventKind::AbilityUsed { .. } => description.normal(),
    }
}
