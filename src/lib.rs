pub mod commands;
pub mod constants;
pub mod interpolate;
pub mod pid;
pub mod scheduler;
pub mod subsystems;

use crate::commands::{ChaseBallCommand, ShootCommand, ShooterSpeed};
use crate::interpolate::InterpolationTable;
use crate::scheduler::Scheduler;
use crate::subsystems::{Detector, Drivetrain, Roller, Shooter, Vision};
use std::cell::RefCell;
use std::rc::Rc;

/// The robot container: the command scheduler plus shared handles to
/// every subsystem. Commands borrow subsystems tick by tick and never
/// own them.
pub struct Hopper {
    pub scheduler: Scheduler,

    pub drivetrain: Rc<RefCell<dyn Drivetrain>>,
    pub intake: Rc<RefCell<dyn Roller>>,
    pub transfer: Rc<RefCell<dyn Roller>>,
    pub indexer: Rc<RefCell<dyn Roller>>,
    pub shooter: Rc<RefCell<dyn Shooter>>,
    pub detector: Rc<RefCell<dyn Detector>>,
}

impl Hopper {
    pub fn new(
        drivetrain: Rc<RefCell<dyn Drivetrain>>,
        intake: Rc<RefCell<dyn Roller>>,
        transfer: Rc<RefCell<dyn Roller>>,
        indexer: Rc<RefCell<dyn Roller>>,
        shooter: Rc<RefCell<dyn Shooter>>,
        detector: Rc<RefCell<dyn Detector>>,
    ) -> Self {
        Hopper {
            scheduler: Scheduler::new(),
            drivetrain,
            intake,
            transfer,
            indexer,
            shooter,
            detector,
        }
    }

    pub fn vision(&self) -> Vision {
        Vision::new(Rc::clone(&self.detector))
    }

    pub fn chase_ball(&self) -> ChaseBallCommand {
        ChaseBallCommand::new(
            Rc::clone(&self.drivetrain),
            Rc::clone(&self.intake),
            Rc::clone(&self.transfer),
            Rc::clone(&self.indexer),
            self.vision(),
        )
    }

    pub fn shoot_fixed(&self, speed: f64) -> ShootCommand {
        ShootCommand::new(
            Rc::clone(&self.shooter),
            Rc::clone(&self.indexer),
            ShooterSpeed::Fixed(speed),
        )
    }

    pub fn shoot_for_range(&self, table: InterpolationTable) -> ShootCommand {
        ShootCommand::new(
            Rc::clone(&self.shooter),
            Rc::clone(&self.indexer),
            ShooterSpeed::ForRange {
                table,
                vision: self.vision(),
            },
        )
    }
}
