//! Simulated hardware for running the control stack off the robot.

use crate::constants::sim::{DISTANCE_M_PER_COMMAND, DRIVE_PX_PER_COMMAND, FLYWHEEL_ALPHA};
use crate::constants::shooter::CLOSED_LOOP_ERROR_RANGE;
use crate::subsystems::{Detection, Detector, Drivetrain, Roller, Shooter};
use nalgebra::Vector2;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use uom::si::f64::Length;
use uom::si::length::meter;

/// Shared world state: where the ball sits in the camera frame and how
/// far away it is. The drivetrain moves it, the detector reads it.
pub struct SimField {
    pub ball_offset: Vector2<f64>,
    pub ball_distance_m: f64,
}

impl SimField {
    pub fn new(offset_x: f64, offset_y: f64, distance_m: f64) -> Self {
        Self {
            ball_offset: Vector2::new(offset_x, offset_y),
            ball_distance_m: distance_m,
        }
    }
}

pub struct SimDrivetrain {
    field: Rc<RefCell<SimField>>,
    pub last_command: (f64, f64),
}

impl SimDrivetrain {
    pub fn new(field: Rc<RefCell<SimField>>) -> Self {
        Self {
            field,
            last_command: (0., 0.),
        }
    }
}

impl Drivetrain for SimDrivetrain {
    fn arcade_drive(&mut self, speed: f64, rotation: f64) {
        let mut field = self.field.borrow_mut();
        field.ball_offset.x -= rotation * DRIVE_PX_PER_COMMAND;
        field.ball_offset.y -= speed * DRIVE_PX_PER_COMMAND;
        field.ball_distance_m = (field.ball_distance_m - speed * DISTANCE_M_PER_COMMAND).max(0.5);
        self.last_command = (speed, rotation);
    }

    fn stop(&mut self) {
        self.last_command = (0., 0.);
    }
}

pub struct SimShooter {
    commanded: Option<f64>,
    pub actual: f64,
}

impl Default for SimShooter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimShooter {
    pub fn new() -> Self {
        Self {
            commanded: None,
            actual: 0.,
        }
    }
}

impl Shooter for SimShooter {
    fn run(&mut self, speed: f64) {
        // First order lag toward the commanded speed, stepped once per command
        self.actual += (speed - self.actual) * FLYWHEEL_ALPHA;
        self.commanded = Some(speed);
    }

    fn is_ready(&self) -> bool {
        match self.commanded {
            Some(commanded) => (commanded - self.actual).abs() <= CLOSED_LOOP_ERROR_RANGE,
            None => false,
        }
    }

    fn stop(&mut self) {
        self.commanded = None;
        debug!(speed = self.actual, "flywheel coasting down");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollerState {
    Idle,
    Intaking,
    Outputting,
}

pub struct SimRoller {
    name: &'static str,
    pub state: RollerState,
}

impl SimRoller {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RollerState::Idle,
        }
    }
}

impl Roller for SimRoller {
    fn intake(&mut self) {
        if self.state != RollerState::Intaking {
            debug!(roller = self.name, "intaking");
        }
        self.state = RollerState::Intaking;
    }

    fn output(&mut self) {
        self.state = RollerState::Outputting;
    }

    fn stop(&mut self) {
        self.state = RollerState::Idle;
    }
}

pub struct SimDetector {
    field: Rc<RefCell<SimField>>,
    enabled: bool,
}

impl SimDetector {
    pub fn new(field: Rc<RefCell<SimField>>) -> Self {
        Self {
            field,
            enabled: false,
        }
    }
}

impl Detector for SimDetector {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn closest_detection(&self) -> Option<Detection> {
        if !self.enabled {
            return None;
        }

        let field = self.field.borrow();
        Some(Detection {
            offset: field.ball_offset,
            distance: Length::new::<meter>(field.ball_distance_m),
        })
    }
}
