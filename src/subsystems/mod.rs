mod sim;
mod vision;

pub use sim::*;
pub use vision::*;

/// Arcade style drive base. Safe to command every tick.
pub trait Drivetrain {
    fn arcade_drive(&mut self, speed: f64, rotation: f64);
    fn stop(&mut self);
}

/// Flywheel with an onboard velocity loop.
pub trait Shooter {
    /// Commands the closed loop to `speed` in the flywheel's native units.
    fn run(&mut self, speed: f64);
    /// True while the closed loop error is inside the acceptable band of
    /// the last commanded speed.
    fn is_ready(&self) -> bool;
    fn stop(&mut self);
}

/// One stage of the ball path. Intake, transfer and indexer all share
/// this shape.
pub trait Roller {
    fn intake(&mut self);
    fn output(&mut self);
    fn stop(&mut self);
}
