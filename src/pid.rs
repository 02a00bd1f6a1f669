use std::time::Duration;

/// Single axis PID loop driven by a measured offset each tick. The
/// setpoint is the offset we want to see (zero for a centered target).
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,

    setpoint: f64,
    tolerance: f64,
    izone: f64,

    integral: f64,
    last_error: Option<f64>,
}

impl PidController {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint: 0.,
            tolerance: 0.,
            izone: f64::INFINITY,
            integral: 0.,
            last_error: None,
        }
    }

    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    /// Integral only accumulates while the error magnitude is inside this
    /// band, and is dumped when outside it.
    pub fn set_izone(&mut self, izone: f64) {
        self.izone = izone;
    }

    /// Clears integral and derivative memory. Call at the start of every
    /// new attempt so the loop doesn't open with windup from the last one.
    pub fn reset(&mut self) {
        self.integral = 0.;
        self.last_error = None;
    }

    pub fn update(&mut self, measurement: f64, dt: Duration) -> f64 {
        let error = self.setpoint - measurement;
        let dt = dt.as_secs_f64();

        if dt > 0. {
            if error.abs() <= self.izone {
                self.integral += error * dt;
            } else {
                self.integral = 0.;
            }
        }

        let derivative = match self.last_error {
            Some(last) if dt > 0. => (error - last) / dt,
            _ => 0.,
        };
        self.last_error = Some(error);

        self.kp * error + self.ki * self.integral + self.kd * derivative
    }

    /// True when the last measured offset was within tolerance of the
    /// setpoint. False until the first update after a reset.
    pub fn at_setpoint(&self) -> bool {
        match self.last_error {
            Some(error) => error.abs() <= self.tolerance,
            None => false,
        }
    }
}
