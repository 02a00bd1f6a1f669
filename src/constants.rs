pub const LOOP_RATE_HZ: f64 = 50.;

pub mod targeting {
    // Detection offsets are in pixels from image center, positive right/down
    pub const X_KP: f64 = 0.0007;
    pub const X_KI: f64 = 0.;
    pub const X_KD: f64 = 0.;
    pub const X_TOLERANCE_PX: f64 = 3.;

    pub const Y_KP: f64 = 0.0007;
    pub const Y_KI: f64 = 0.;
    pub const Y_KD: f64 = 0.;
    pub const Y_TOLERANCE_PX: f64 = 1.;
}

pub mod shooter {
    // Speeds are in encoder ticks per 100ms, the flywheel's native closed loop unit
    pub const SPEED_NEAR: f64 = 15000.;
    pub const SPEED_MID: f64 = 15500.;
    pub const SPEED_FAR: f64 = 16000.;
    pub const SPEED_LAUNCHPAD: f64 = 20000.;

    pub const CLOSED_LOOP_ERROR_RANGE: f64 = 50.;

    pub const SHOT_DWELL_SECONDS: f64 = 0.25;

    pub const RANGE_TABLE_PATH: &str = "/home/lvuser/range_table.json";

    // Fallback distance (meters) -> speed map, measured on the practice field
    pub const DEFAULT_RANGE_TABLE: [(f64, f64); 5] = [
        (1.5, 13500.),
        (2., 14500.),
        (2.5, 15500.),
        (3., 16500.),
        (4., 18500.),
    ];
}

pub mod sim {
    // Pixels of apparent target motion per unit drive command per tick
    pub const DRIVE_PX_PER_COMMAND: f64 = 40.;
    pub const DISTANCE_M_PER_COMMAND: f64 = 0.2;

    // First order flywheel lag, fraction of remaining error closed per tick
    pub const FLYWHEEL_ALPHA: f64 = 0.15;
}
