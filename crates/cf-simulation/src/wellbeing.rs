//! Once-per-day happiness aggregation.
//!
//! Happiness is `50 + Σ modifiers`, clamped to 0..=100. Flat modifiers are
//! rebuilt from farm conditions every day; decaying ones count down and
//! vanish. `trainer_bond` is the one flat modifier that persists.

use std::collections::BTreeSet;

use cf_core::creature::Modifier;
use cf_core::id::{BuildingId, CreatureId};
use cf_core::player::Skill;
use cf_core::species::Species;
use rand::Rng;
use tracing::debug;

use crate::context::SimContext;
use crate::event::SimEventKind;

/// One-shot happiness change when a creature joins the team.
pub const TEAM_JOIN_BONUS: f64 = 10.0;
/// One-shot happiness change when a creature leaves the team.
pub const TEAM_LEAVE_PENALTY: f64 = -5.0;

/// Set once, the first day a creature spends on the team, at half the
/// training level of that day. It stays after the creature leaves the team;
/// only the `trainer` modifier depends on current membership.
const TRAINER_BOND: &str = "trainer_bond";
const PROTECTOR_BONUS: f64 = 5.0;
const PEST_PENALTY: f64 = -3.0;
const PEST_FLOOR: f64 = -15.0;
const RIVAL_PENALTY: f64 = -6.0;
const NEW_COMPANION: Modifier = Modifier::Decaying {
    value: 4.0,
    days_left: 3,
};
const BITE_CHANCE: f64 = 0.30;
const BITTEN: Modifier = Modifier::Decaying {
    value: -5.0,
    days_left: 2,
};

/// Run the daily well-being pass.
pub fn run(ctx: &mut SimContext<'_>) {
    refresh_modifiers(ctx);
    welcome_new_arrivals(ctx);
    roll_bites(ctx);
    for creature in &mut ctx.state.creatures {
        creature.recompute_happiness();
    }
}

fn refresh_modifiers(ctx: &mut SimContext<'_>) {
    let state = &mut *ctx.state;
    let present: BTreeSet<Species> = state.creatures.iter().map(|c| c.species).collect();
    let protector_present = present.iter().any(|s| s.is_protector());
    let pests = state.pest_count();
    let training = state.player.skills.level(Skill::Training);
    let team = state.player.team.clone();
    let weather = state.weather;

    for c in &mut state.creatures {
        c.decay_modifiers();
        c.clear_flat_except(&[TRAINER_BOND]);

        let on_team = team.contains(&c.id);
        if on_team && !c.modifiers.contains_key(TRAINER_BOND) {
            c.set_modifier(TRAINER_BOND, Modifier::Flat(f64::from(training / 2)));
        }

        let species = c.species;
        if protector_present && !species.is_pest() && !species.is_protector() {
            c.set_modifier("protector", Modifier::Flat(PROTECTOR_BONUS));
        }
        if pests > 0 && !species.is_pest() {
            let penalty = (PEST_PENALTY * pests as f64).max(PEST_FLOOR);
            c.set_modifier("pests", Modifier::Flat(penalty));
        }
        if present.iter().any(|other| species.is_rival_of(*other)) {
            c.set_modifier("rival", Modifier::Flat(RIVAL_PENALTY));
        }
        if on_team && training > 0 {
            c.set_modifier("trainer", Modifier::Flat(f64::from(training)));
        }
        let effect = weather.effect_on(species.info().element);
        if effect != 0.0 {
            c.set_modifier("weather", Modifier::Flat(effect));
        }
    }
}

fn welcome_new_arrivals(ctx: &mut SimContext<'_>) {
    let state = &mut *ctx.state;
    let arrivals: Vec<(CreatureId, BuildingId)> = state
        .creatures
        .iter()
        .filter(|c| c.is_new)
        .filter_map(|c| {
            let home = state.home_of(c)?;
            Some((c.id, home.id))
        })
        .collect();

    for (newcomer, home) in arrivals {
        for mate in state
            .creatures
            .iter_mut()
            .filter(|c| c.home == Some(home) && c.id != newcomer)
        {
            mate.set_modifier("new_companion", NEW_COMPANION);
        }
    }
    for c in &mut state.creatures {
        c.is_new = false;
    }
}

fn roll_bites(ctx: &mut SimContext<'_>) {
    let shellder_homes: BTreeSet<BuildingId> = ctx
        .state
        .creatures
        .iter()
        .filter(|c| c.species == Species::Shellder)
        .filter_map(|c| c.home)
        .collect();
    let victims: Vec<CreatureId> = ctx
        .state
        .creatures
        .iter()
        .filter(|c| {
            c.species == Species::Slowpoke && c.home.is_some_and(|h| shellder_homes.contains(&h))
        })
        .map(|c| c.id)
        .collect();

    for id in victims {
        if !ctx.rng.random_bool(BITE_CHANCE) {
            continue;
        }
        if let Ok(slowpoke) = ctx.state.creature_mut(id) {
            slowpoke.set_modifier("bitten", BITTEN);
            debug!(creature = %id, "slowpoke bitten");
            ctx.emit(
                SimEventKind::Bitten { creature: id },
                "A shellder bit a slowpoke's tail",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, BuildingKind, Rotation};
    use cf_core::creature::Creature;
    use cf_core::geometry::Point;
    use cf_core::weather::Weather;

    use super::*;
    use crate::testutil::Harness;

    fn add(h: &mut Harness, species: Species, home: Option<BuildingId>) -> CreatureId {
        let mut c = Creature::spawn(&mut h.rng, species, Point::new(50.0, 50.0));
        c.home = home;
        c.is_new = false;
        let id = c.id;
        h.state.creatures.push(c);
        id
    }

    fn modifier(h: &Harness, id: CreatureId, name: &str) -> Option<f64> {
        h.state
            .creature(id)
            .unwrap()
            .modifiers
            .get(name)
            .map(Modifier::value)
    }

    #[test]
    fn pests_and_protectors() {
        let mut h = Harness::new(1);
        h.state.weather = Weather::Cloudy;
        let cow = add(&mut h, Species::Miltank, None);
        let cat = add(&mut h, Species::Meowth, None);
        for _ in 0..7 {
            add(&mut h, Species::Rattata, None);
        }
        h.with_ctx(run);

        assert_eq!(modifier(&h, cow, "protector"), Some(5.0));
        assert_eq!(modifier(&h, cow, "pests"), Some(-15.0));
        assert_eq!(modifier(&h, cat, "protector"), None);
        let happiness = h.state.creature(cow).unwrap().happiness;
        assert!((happiness - 40.0).abs() < 1e-9);
    }

    #[test]
    fn rivals_resent_each_other() {
        let mut h = Harness::new(2);
        h.state.weather = Weather::Cloudy;
        let dog = add(&mut h, Species::Growlithe, None);
        let cat = add(&mut h, Species::Meowth, None);
        h.with_ctx(run);
        assert_eq!(modifier(&h, dog, "rival"), Some(-6.0));
        assert_eq!(modifier(&h, cat, "rival"), Some(-6.0));
    }

    #[test]
    fn weather_reaches_elements() {
        let mut h = Harness::new(3);
        h.state.weather = Weather::Rain;
        let fish = add(&mut h, Species::Magikarp, None);
        let lizard = add(&mut h, Species::Charmander, None);
        let cow = add(&mut h, Species::Miltank, None);
        h.with_ctx(run);
        assert_eq!(modifier(&h, fish, "weather"), Some(5.0));
        assert_eq!(modifier(&h, lizard, "weather"), Some(-5.0));
        assert_eq!(modifier(&h, cow, "weather"), None);
    }

    #[test]
    fn trainer_bond_persists_across_days() {
        let mut h = Harness::new(4);
        h.state.player.skills.training.level = 4;
        let buddy = add(&mut h, Species::Machop, None);
        h.state.player.team.push(buddy);
        h.with_ctx(run);
        assert_eq!(modifier(&h, buddy, TRAINER_BOND), Some(2.0));
        assert_eq!(modifier(&h, buddy, "trainer"), Some(4.0));

        h.state.player.skills.training.level = 10;
        h.with_ctx(run);
        assert_eq!(modifier(&h, buddy, TRAINER_BOND), Some(2.0));
        assert_eq!(modifier(&h, buddy, "trainer"), Some(10.0));
    }

    #[test]
    fn trainer_bond_outlasts_team_membership() {
        let mut h = Harness::new(8);
        h.state.player.skills.training.level = 6;
        let buddy = add(&mut h, Species::Machop, None);
        h.state.player.team.push(buddy);
        h.with_ctx(run);
        assert_eq!(modifier(&h, buddy, TRAINER_BOND), Some(3.0));

        h.state.player.team.clear();
        h.with_ctx(run);
        assert_eq!(modifier(&h, buddy, TRAINER_BOND), Some(3.0));
        assert_eq!(modifier(&h, buddy, "trainer"), None);
    }

    #[test]
    fn new_arrivals_cheer_up_housemates_once() {
        let mut h = Harness::new(5);
        h.state.weather = Weather::Cloudy;
        let stable = Building::new(BuildingKind::Stable, Point::new(50.0, 50.0), Rotation::Deg0);
        let home = stable.id;
        h.state.world.buildings.push(stable);
        let old = add(&mut h, Species::Mareep, Some(home));
        let newcomer = add(&mut h, Species::Miltank, Some(home));
        h.state.creature_mut(newcomer).unwrap().is_new = true;

        h.with_ctx(run);
        assert_eq!(modifier(&h, old, "new_companion"), Some(4.0));
        assert_eq!(modifier(&h, newcomer, "new_companion"), None);
        assert!(!h.state.creature(newcomer).unwrap().is_new);

        for _ in 0..3 {
            h.with_ctx(run);
        }
        assert_eq!(modifier(&h, old, "new_companion"), None);
    }

    #[test]
    fn shellder_bites_slowpoke_sometimes() {
        let mut h = Harness::new(6);
        let lake = Building::new(BuildingKind::Lake, Point::new(50.0, 50.0), Rotation::Deg0);
        let home = lake.id;
        h.state.world.buildings.push(lake);
        let slowpoke = add(&mut h, Species::Slowpoke, Some(home));
        add(&mut h, Species::Shellder, Some(home));

        let mut bitten_days = 0;
        for _ in 0..200 {
            h.with_ctx(run);
            if matches!(
                h.state.creature(slowpoke).unwrap().modifiers.get("bitten"),
                Some(Modifier::Decaying { days_left: 2, .. })
            ) {
                bitten_days += 1;
            }
        }
        assert!((35..85).contains(&bitten_days), "bitten {bitten_days} times");
        assert_eq!(
            h.events.count(|k| matches!(k, SimEventKind::Bitten { .. })),
            bitten_days
        );
    }
}
