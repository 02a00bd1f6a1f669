#![warn(non_snake_case)]

use std::cell::RefCell;
use std::rc::Rc;
use tokio::task;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use BallBot2022::constants::shooter::{DEFAULT_RANGE_TABLE, RANGE_TABLE_PATH};
use BallBot2022::constants::LOOP_RATE_HZ;
use BallBot2022::interpolate::InterpolationTable;
use BallBot2022::subsystems::{SimDetector, SimDrivetrain, SimField, SimRoller, SimShooter};
use BallBot2022::Hopper;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let local = task::LocalSet::new();

    runtime.block_on(local.run_until(run()));
}

/// Drives the full sequence against simulated hardware: chase the ball
/// while loading it, then spin up and shoot once it's centered.
async fn run() {
    // Ball starts right of and below the crosshair, 3.2m out
    let field = Rc::new(RefCell::new(SimField::new(120., 40., 3.2)));

    let mut robot = Hopper::new(
        Rc::new(RefCell::new(SimDrivetrain::new(Rc::clone(&field)))),
        Rc::new(RefCell::new(SimRoller::new("intake"))),
        Rc::new(RefCell::new(SimRoller::new("transfer"))),
        Rc::new(RefCell::new(SimRoller::new("indexer"))),
        Rc::new(RefCell::new(SimShooter::new())),
        Rc::new(RefCell::new(SimDetector::new(Rc::clone(&field)))),
    );

    let table = InterpolationTable::load(RANGE_TABLE_PATH).unwrap_or_else(|e| {
        warn!("no range table at {RANGE_TABLE_PATH} ({e}), using built in map");
        InterpolationTable::new(DEFAULT_RANGE_TABLE).expect("built in range table is valid")
    });

    let chase = robot.scheduler.schedule(Box::new(robot.chase_ball()));
    let mut shot = None;

    let mut dt = Duration::from_secs_f64(1. / LOOP_RATE_HZ);
    let mut last_loop = Instant::now();

    loop {
        robot.scheduler.run(dt);

        if shot.is_none() && !robot.scheduler.is_active(chase) {
            info!(
                distance_m = field.borrow().ball_distance_m,
                "ball centered, spinning up"
            );

            let command = robot.shoot_for_range(table.clone());
            shot = Some(robot.scheduler.schedule(Box::new(command)));
        }

        if let Some(id) = shot {
            if !robot.scheduler.is_active(id) {
                info!("shot complete");
                break;
            }
        }

        let elapsed = last_loop.elapsed().as_secs_f64();
        let left = (1. / LOOP_RATE_HZ - elapsed).max(0.);
        sleep(Duration::from_secs_f64(left)).await;
        dt = last_loop.elapsed();
        last_loop = Instant::now();
    }
}
