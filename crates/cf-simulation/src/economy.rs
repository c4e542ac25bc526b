use cf_core::building::BuildingKind;
use cf_core::player::Player;
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;

/// Energy regeneration and passive gym income.
#[derive(Debug, Default)]
pub struct EconomySystem {
    energy_timer: f64,
    income_timer: f64,
}

impl EconomySystem {
    /// Create the system with empty timers.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Restore one energy per full `interval` in `secs`, returning the leftover
/// seconds that did not complete an interval.
pub fn regen_energy(player: &mut Player, secs: f64, interval: f64) -> f64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0.0;
    }
    if interval <= 0.0 {
        return secs;
    }
    let points = (secs / interval).floor();
    player.restore_energy(points.min(f64::from(u32::MAX)) as u32);
    secs - points * interval
}

impl System for EconomySystem {
    fn name(&self) -> &str {
        "economy"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>, dt: f64) -> SimResult<()> {
        let config = ctx.config;
        let economy = &config.economy;

        self.energy_timer = regen_energy(
            &mut ctx.state.player,
            self.energy_timer + dt,
            economy.energy_regen_interval,
        );

        let interval = economy.gym_income_interval;
        if interval > 0.0 {
            self.income_timer += dt;
            let payouts = (self.income_timer / interval).floor();
            if payouts >= 1.0 {
                self.income_timer -= payouts * interval;
                let trainees: usize = ctx
                    .state
                    .world
                    .buildings_of(BuildingKind::PokemonGym)
                    .map(|gym| ctx.state.resident_count(gym.id))
                    .sum();
                if trainees > 0 {
                    let coins = trainees as i64 * payouts as i64;
                    ctx.state.player.money += coins;
                    debug!(coins, payouts, "gym income");
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, Rotation};
    use cf_core::creature::Creature;
    use cf_core::geometry::Point;
    use cf_core::species::Species;

    use super::*;
    use crate::testutil::Harness;

    #[test]
    fn energy_regenerates_per_interval() {
        let mut h = Harness::new(1);
        h.state.player.energy = 10;
        let mut economy = EconomySystem::new();
        for _ in 0..6 {
            h.with_ctx(|ctx| economy.tick(ctx, 10.0)).unwrap();
        }
        assert_eq!(h.state.player.energy, 12);
    }

    #[test]
    fn regen_caps_at_max() {
        let mut player = Player::new(0, 95, 100);
        let leftover = regen_energy(&mut player, 3_000.0 + 7.0, 30.0);
        assert_eq!(player.energy, 100);
        assert!((leftover - 7.0).abs() < 1e-9);
    }

    #[test]
    fn gyms_pay_per_resident() {
        let mut h = Harness::new(2);
        let gym = Building::new(BuildingKind::PokemonGym, Point::new(50.0, 50.0), Rotation::Deg0);
        let gym_id = gym.id;
        h.state.world.buildings.push(gym);
        for species in [Species::Machop, Species::Abra] {
            let c = Creature::spawn(&mut h.rng, species, Point::new(50.0, 50.0)).with_home(gym_id);
            h.state.creatures.push(c);
        }
        let before = h.state.player.money;
        let mut economy = EconomySystem::new();
        h.with_ctx(|ctx| economy.tick(ctx, 125.0)).unwrap();
        assert_eq!(h.state.player.money, before + 4);
    }

    #[test]
    fn a_long_step_pays_every_interval_at_once() {
        let mut h = Harness::new(3);
        let gym = Building::new(BuildingKind::PokemonGym, Point::new(50.0, 50.0), Rotation::Deg0);
        let gym_id = gym.id;
        h.state.world.buildings.push(gym);
        let c = Creature::spawn(&mut h.rng, Species::Machop, Point::new(50.0, 50.0)).with_home(gym_id);
        h.state.creatures.push(c);
        let before = h.state.player.money;
        let mut economy = EconomySystem::new();
        h.with_ctx(|ctx| economy.tick(ctx, 60.0 * 1_000_000.0 + 30.0)).unwrap();
        assert_eq!(h.state.player.money, before + 1_000_000);
        h.with_ctx(|ctx| economy.tick(ctx, 30.0)).unwrap();
        assert_eq!(h.state.player.money, before + 1_000_001);
    }

    #[test]
    fn regen_ignores_non_finite_time() {
        let mut player = Player::new(0, 10, 100);
        assert_eq!(regen_energy(&mut player, f64::INFINITY, 30.0), 0.0);
        assert_eq!(regen_energy(&mut player, f64::NAN, 30.0), 0.0);
        assert_eq!(player.energy, 10);
    }
}
