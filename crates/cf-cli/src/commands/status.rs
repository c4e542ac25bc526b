use std::path::Path;

use cf_core::creature::{AiState, Creature};
use cf_core::player::Skill;
use cf_core::state::GameState;
use cf_simulation::GameConfig;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(save: &Path, config: GameConfig) -> Result<(), String> {
    let sim = super::open_farm(save, config)?;
    let state = sim.state();
    let player = &state.player;

    println!(
        "  {} {}",
        format!("Day {}", state.day).bold(),
        format!("({})", state.weather).dimmed()
    );
    println!(
        "  Level {} ({} xp), {} coins, energy {}/{}",
        player.level, player.experience, player.money, player.energy, player.max_energy
    );
    let skills: Vec<String> = [Skill::Farming, Skill::Foraging, Skill::Training, Skill::Crafting]
        .iter()
        .map(|s| format!("{s} {}", player.skills.level(*s)))
        .collect();
    println!("  Skills: {}", skills.join(", "));
    if player.inventory.is_empty() {
        println!("  Inventory: {}", "(empty)".dimmed());
    } else {
        let items: Vec<String> = player
            .inventory
            .iter()
            .map(|(item, n)| format!("{item} x{n}"))
            .collect();
        println!("  Inventory: {}", items.join(", "));
    }
    println!();

    println!("  {}", "Buildings".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Building", "Id", "Position", "Residents"]);
    for b in &state.world.buildings {
        let residents = if b.kind.capacity() == 0 {
            "--".to_string()
        } else {
            format!("{}/{}", state.resident_count(b.id), b.kind.capacity())
        };
        table.add_row(vec![
            b.kind.to_string(),
            b.id.to_string(),
            format!("({:.1}, {:.1})", b.position.x, b.position.y),
            residents,
        ]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Creatures".bold().underline());
    println!();
    if state.creatures.is_empty() {
        println!("  {}", "(none yet)".dimmed());
        return Ok(());
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Species", "Id", "Home", "Age", "Happiness", "Doing"]);
    for c in &state.creatures {
        table.add_row(vec![
            species_label(c),
            c.id.to_string(),
            home_label(state, c),
            format!("{}/{}", c.age, c.max_age),
            format_happiness(c.happiness),
            activity(c).to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} creatures", state.creatures.len());
    Ok(())
}

fn species_label(c: &Creature) -> String {
    if c.shiny {
        format!("{} *", c.species)
    } else {
        c.species.to_string()
    }
}

fn home_label(state: &GameState, c: &Creature) -> String {
    if state.player.on_team(c.id) {
        return "team".into();
    }
    state
        .home_of(c)
        .map(|b| b.kind.to_string())
        .unwrap_or_else(|| "roaming".into())
}

fn activity(c: &Creature) -> &'static str {
    if c.sleeping {
        return "sleeping";
    }
    match c.ai {
        AiState::Idle => "idle",
        AiState::Moving => "moving",
        AiState::Working => "working",
    }
}

fn format_happiness(value: f64) -> String {
    let filled = (value / 10.0).round().clamp(0.0, 10.0) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(10 - filled));
    if value < 30.0 {
        format!("[{}] {:>3.0}", bar.red(), value)
    } else if value < 60.0 {
        format!("[{}] {:>3.0}", bar.yellow(), value)
    } else {
        format!("[{}] {:>3.0}", bar.green(), value)
    }
}
