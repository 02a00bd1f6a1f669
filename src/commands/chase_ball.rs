use crate::constants::targeting::{
    X_KD, X_KI, X_KP, X_TOLERANCE_PX, Y_KD, Y_KI, Y_KP, Y_TOLERANCE_PX,
};
use crate::pid::PidController;
use crate::scheduler::{Command, Resource};
use crate::subsystems::{Drivetrain, Roller, Vision};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const REQUIREMENTS: &[Resource] = &[
    Resource::Drivetrain,
    Resource::Vision,
    Resource::Intake,
    Resource::Transfer,
    Resource::Indexer,
];

/// Chases the closest detected ball: one PID loop per camera axis nulls
/// the offset while the ball path rollers pull the ball in. Losing the
/// detection stops the drive in place rather than guessing. Finishes
/// once both axes sit inside tolerance on the same tick.
pub struct ChaseBallCommand {
    drivetrain: Rc<RefCell<dyn Drivetrain>>,
    intake: Rc<RefCell<dyn Roller>>,
    transfer: Rc<RefCell<dyn Roller>>,
    indexer: Rc<RefCell<dyn Roller>>,
    vision: Vision,

    x_pid: PidController,
    y_pid: PidController,
}

impl ChaseBallCommand {
    pub fn new(
        drivetrain: Rc<RefCell<dyn Drivetrain>>,
        intake: Rc<RefCell<dyn Roller>>,
        transfer: Rc<RefCell<dyn Roller>>,
        indexer: Rc<RefCell<dyn Roller>>,
        vision: Vision,
    ) -> Self {
        let mut x_pid = PidController::new(X_KP, X_KI, X_KD);
        x_pid.set_setpoint(0.);
        x_pid.set_tolerance(X_TOLERANCE_PX);

        let mut y_pid = PidController::new(Y_KP, Y_KI, Y_KD);
        y_pid.set_setpoint(0.);
        y_pid.set_tolerance(Y_TOLERANCE_PX);

        Self {
            drivetrain,
            intake,
            transfer,
            indexer,
            vision,
            x_pid,
            y_pid,
        }
    }
}

impl Command for ChaseBallCommand {
    fn start(&mut self) {
        self.vision.enable();
        self.x_pid.reset();
        self.y_pid.reset();
    }

    fn tick(&mut self, dt: Duration) {
        match self.vision.sample() {
            None => self.drivetrain.borrow_mut().stop(),
            Some(detection) => {
                let speed = self.y_pid.update(detection.offset.y, dt);
                let rotation = self.x_pid.update(detection.offset.x, dt);
                self.drivetrain.borrow_mut().arcade_drive(-speed, -rotation);

                self.intake.borrow_mut().intake();
                self.transfer.borrow_mut().intake();
                self.indexer.borrow_mut().intake();
            }
        }
    }

    fn is_done(&self) -> bool {
        self.x_pid.at_setpoint() && self.y_pid.at_setpoint()
    }

    fn stop(&mut self, _interrupted: bool) {
        self.drivetrain.borrow_mut().stop();
        self.intake.borrow_mut().stop();
        self.transfer.borrow_mut().stop();
        self.indexer.borrow_mut().stop();
    }

    fn requirements(&self) -> &[Resource] {
        REQUIREMENTS
    }

    fn name(&self) -> &'static str {
        "chase ball"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{
        detection, DriveCall, RecordingDrivetrain, RecordingRoller, ScriptedDetector,
    };

    const DT: Duration = Duration::from_millis(20);

    struct Fixture {
        drivetrain: Rc<RefCell<RecordingDrivetrain>>,
        intake: Rc<RefCell<RecordingRoller>>,
        transfer: Rc<RefCell<RecordingRoller>>,
        indexer: Rc<RefCell<RecordingRoller>>,
        detector: Rc<RefCell<ScriptedDetector>>,
        command: ChaseBallCommand,
    }

    fn fixture(detector: ScriptedDetector) -> Fixture {
        let drivetrain = Rc::new(RefCell::new(RecordingDrivetrain::default()));
        let intake = Rc::new(RefCell::new(RecordingRoller::default()));
        let transfer = Rc::new(RefCell::new(RecordingRoller::default()));
        let indexer = Rc::new(RefCell::new(RecordingRoller::default()));
        let detector = Rc::new(RefCell::new(detector));

        let command = ChaseBallCommand::new(
            drivetrain.clone(),
            intake.clone(),
            transfer.clone(),
            indexer.clone(),
            Vision::new(detector.clone()),
        );

        Fixture {
            drivetrain,
            intake,
            transfer,
            indexer,
            detector,
            command,
        }
    }

    #[test]
    fn start_enables_the_detector() {
        let mut f = fixture(ScriptedDetector::empty());
        assert!(!f.detector.borrow().enabled);

        f.command.start();
        assert!(f.detector.borrow().enabled);
    }

    #[test]
    fn no_detection_stops_the_drive_and_never_finishes() {
        let mut f = fixture(ScriptedDetector::empty());
        f.command.start();

        for _ in 0..20 {
            f.command.tick(DT);
            assert!(!f.command.is_done());
        }

        assert!(f
            .drivetrain
            .borrow()
            .calls
            .iter()
            .all(|call| *call == DriveCall::Stop));
        assert!(f.intake.borrow().calls.is_empty());
        assert!(f.transfer.borrow().calls.is_empty());
        assert!(f.indexer.borrow().calls.is_empty());
    }

    #[test]
    fn offsets_drive_corrective_motion_and_the_ball_path() {
        let mut f = fixture(ScriptedDetector::with_target(100., 50., 2.));
        f.command.start();
        f.command.tick(DT);

        let drivetrain = f.drivetrain.borrow();
        let DriveCall::Arcade(speed, rotation) = drivetrain.calls[0] else {
            panic!("expected an arcade drive command, got {:?}", drivetrain.calls[0]);
        };
        drop(drivetrain);

        // update() returns kp * (0 - offset); the command negates it back
        assert!((speed - 0.0007 * 50.).abs() < 1e-12);
        assert!((rotation - 0.0007 * 100.).abs() < 1e-12);

        assert!(!f.intake.borrow().calls.is_empty());
        assert!(!f.transfer.borrow().calls.is_empty());
        assert!(!f.indexer.borrow().calls.is_empty());
        assert!(!f.command.is_done());
    }

    #[test]
    fn centered_target_finishes_after_one_tick() {
        let mut f = fixture(ScriptedDetector::with_target(0., 0., 2.));
        f.command.start();
        assert!(!f.command.is_done());

        f.command.tick(DT);
        assert!(f.command.is_done());
    }

    #[test]
    fn both_axes_must_converge_on_the_same_tick() {
        let mut f = fixture(ScriptedDetector::with_target(100., 0., 2.));
        f.command.start();

        // y is centered, x is far off
        f.command.tick(DT);
        assert!(!f.command.is_done());

        f.detector.borrow_mut().detection = Some(detection(1., 0.5, 2.));
        f.command.tick(DT);
        assert!(f.command.is_done());
    }

    #[test]
    fn interruption_stops_every_claimed_actuator_once() {
        let mut f = fixture(ScriptedDetector::with_target(100., 50., 2.));
        f.command.start();
        f.command.tick(DT);
        f.command.tick(DT);

        f.command.stop(true);

        assert_eq!(
            *f.drivetrain.borrow().calls.last().unwrap(),
            DriveCall::Stop
        );
        assert_eq!(
            f.drivetrain
                .borrow()
                .calls
                .iter()
                .filter(|call| **call == DriveCall::Stop)
                .count(),
            1
        );
        assert_eq!(f.intake.borrow().stops(), 1);
        assert_eq!(f.transfer.borrow().stops(), 1);
        assert_eq!(f.indexer.borrow().stops(), 1);
    }

    #[test]
    fn restart_clears_stale_convergence() {
        let mut f = fixture(ScriptedDetector::with_target(0., 0., 2.));
        f.command.start();
        f.command.tick(DT);
        assert!(f.command.is_done());

        f.command.stop(false);
        f.command.start();
        assert!(!f.command.is_done());
    }
}
