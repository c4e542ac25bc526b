use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Grows planted crop plots in proportion to elapsed in-game days.
#[derive(Debug, Default)]
pub struct CropSystem;

impl CropSystem {
    /// Create the crop growth system.
    pub fn new() -> Self {
        Self
    }
}

impl System for CropSystem {
    fn name(&self) -> &str {
        "crops"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>, dt: f64) -> SimResult<()> {
        let day_length = ctx.day_length();
        if day_length <= 0.0 || dt <= 0.0 {
            return Ok(());
        }
        let days = dt / day_length;
        let matured: Vec<_> = ctx
            .state
            .plots
            .iter_mut()
            .filter_map(|plot| plot.grow(days).then_some(plot.id))
            .collect();
        for plot in matured {
            debug!(plot = %plot, "crop matured");
            ctx.emit(SimEventKind::CropMatured { plot }, "A crop is ready to harvest");
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
    use cf_core::building::Rotation;
    use cf_core::crop::{CropPlot, PlotState, SeedKind};
    use cf_core::geometry::Point;
    use cf_core::id::BuildingId;

    use super::*;
    use crate::testutil::Harness;

    #[test]
    fn watered_plot_matures_in_half_a_day() {
        let mut h = Harness::new(1);
        let mut plot = CropPlot::new(BuildingId::new(), Point::new(10.0, 10.0), Rotation::Deg0);
        plot.plant(SeedKind::WheatSeed);
        plot.watered = true;
        h.state.plots.push(plot);

        let mut crops = CropSystem::new();
        // 600 s days: 290 s is just short of half a day
        h.with_ctx(|ctx| crops.tick(ctx, 290.0)).unwrap();
        assert_eq!(h.state.plots[0].state, PlotState::Growing);
        for _ in 0..5 {
            h.with_ctx(|ctx| crops.tick(ctx, 20.0)).unwrap();
        }
        assert_eq!(h.state.plots[0].state, PlotState::Mature);
        assert_eq!(
            h.events
                .count(|k| matches!(k, SimEventKind::CropMatured { .. })),
            1
        );
    }

    #[test]
    fn dry_plot_grows_at_half_rate() {
        let mut h = Harness::new(2);
        let mut plot = CropPlot::new(BuildingId::new(), Point::new(10.0, 10.0), Rotation::Deg0);
        plot.plant(SeedKind::CarrotSeed);
        h.state.plots.push(plot);

        let mut crops = CropSystem::new();
        h.with_ctx(|ctx| crops.tick(ctx, 300.0)).unwrap();
        assert!((h.state.plots[0].growth - 0.25).abs() < 1e-9);
        assert_eq!(h.state.plots[0].state, PlotState::Growing);
    }
}
