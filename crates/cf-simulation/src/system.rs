use crate::context::SimContext;
use crate::error::SimResult;

/// A continuous subsystem that runs every `advance`.
///
/// Systems are executed in registration order. Each receives a mutable
/// context and the elapsed real seconds since the previous call.
pub trait System: std::fmt::Debug {
    /// Human-readable name for this system.
    fn name(&self) -> &str;

    /// Called once per `advance` with the frame delta in seconds.
    fn tick(&mut self, ctx: &mut SimContext<'_>, dt: f64) -> SimResult<()>;

    /// Support downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Support downcasting to concrete types.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
