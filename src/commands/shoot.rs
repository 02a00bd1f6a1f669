use crate::constants::shooter::SHOT_DWELL_SECONDS;
use crate::interpolate::InterpolationTable;
use crate::scheduler::{Command, Resource};
use crate::subsystems::{Roller, Shooter, Vision};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use uom::si::length::meter;

const REQUIREMENTS: &[Resource] = &[Resource::Shooter, Resource::Indexer];

/// Where the flywheel setpoint comes from: fixed at construction, or
/// looked up in the range table from the detector's distance estimate.
pub enum ShooterSpeed {
    Fixed(f64),
    ForRange {
        table: InterpolationTable,
        vision: Vision,
    },
}

impl ShooterSpeed {
    fn resolve(&self) -> Option<f64> {
        match self {
            ShooterSpeed::Fixed(speed) => Some(*speed),
            ShooterSpeed::ForRange { table, vision } => vision
                .sample()
                .map(|detection| table.lookup(detection.distance.get::<meter>())),
        }
    }
}

/// Counts up once armed and never rewinds, so the feed window stays
/// bounded even when readiness flickers.
struct DwellTimer {
    armed: bool,
    elapsed: Duration,
}

impl DwellTimer {
    fn new() -> Self {
        Self {
            armed: false,
            elapsed: Duration::ZERO,
        }
    }

    fn reset(&mut self) {
        self.armed = false;
        self.elapsed = Duration::ZERO;
    }

    fn arm(&mut self) {
        self.armed = true;
    }

    fn armed(&self) -> bool {
        self.armed
    }

    fn advance(&mut self, dt: Duration) {
        if self.armed {
            self.elapsed += dt;
        }
    }

    fn has_elapsed(&self, duration: Duration) -> bool {
        self.armed && self.elapsed >= duration
    }
}

/// Spins the flywheel to its target speed, then runs the indexer from
/// the first tick the shooter reports ready until a fixed dwell has
/// passed, long enough for one full ball transit.
pub struct ShootCommand {
    shooter: Rc<RefCell<dyn Shooter>>,
    indexer: Rc<RefCell<dyn Roller>>,
    speed: ShooterSpeed,

    last_speed: Option<f64>,
    timer: DwellTimer,
    dwell: Duration,
}

impl ShootCommand {
    pub fn new(
        shooter: Rc<RefCell<dyn Shooter>>,
        indexer: Rc<RefCell<dyn Roller>>,
        speed: ShooterSpeed,
    ) -> Self {
        Self {
            shooter,
            indexer,
            speed,
            last_speed: None,
            timer: DwellTimer::new(),
            dwell: Duration::from_secs_f64(SHOT_DWELL_SECONDS),
        }
    }
}

impl Command for ShootCommand {
    fn start(&mut self) {
        self.last_speed = None;
        self.timer.reset();
    }

    fn tick(&mut self, dt: Duration) {
        self.timer.advance(dt);

        // Hold the last resolved speed through detection dropouts
        if let Some(speed) = self.speed.resolve() {
            self.last_speed = Some(speed);
        }

        let Some(speed) = self.last_speed else {
            // Range mode with no distance estimate yet: nothing to spin to
            return;
        };
        self.shooter.borrow_mut().run(speed);

        if !self.timer.armed() && self.shooter.borrow().is_ready() {
            debug!(speed, "shooter at speed, feeding");
            self.timer.arm();
        }

        if self.timer.armed() {
            self.indexer.borrow_mut().intake();
        }
    }

    fn is_done(&self) -> bool {
        self.timer.has_elapsed(self.dwell)
    }

    fn stop(&mut self, _interrupted: bool) {
        self.shooter.borrow_mut().stop();
        self.indexer.borrow_mut().stop();
    }

    fn requirements(&self) -> &[Resource] {
        REQUIREMENTS
    }

    fn name(&self) -> &'static str {
        "shoot"
    }
}
