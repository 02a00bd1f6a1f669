use nalgebra::Vector2;
use std::cell::RefCell;
use std::rc::Rc;
use uom::si::f64::Length;

/// One target sighting: image plane offset from the crosshair in pixels
/// (positive right/down) and the estimated range to the target.
#[derive(Clone, Copy, Debug)]
pub struct Detection {
    pub offset: Vector2<f64>,
    pub distance: Length,
}

/// The perception coprocessor. Reporting no detection is a normal
/// reading, not a fault.
pub trait Detector {
    fn set_enabled(&mut self, enabled: bool);
    fn closest_detection(&self) -> Option<Detection>;
}

/// Per-tick view over the detector. Forwards the raw signal with no
/// smoothing; the axis controllers' derivative terms deal with noise.
#[derive(Clone)]
pub struct Vision {
    detector: Rc<RefCell<dyn Detector>>,
}

impl Vision {
    pub fn new(detector: Rc<RefCell<dyn Detector>>) -> Self {
        Self { detector }
    }

    pub fn enable(&self) {
        self.detector.borrow_mut().set_enabled(true);
    }

    pub fn disable(&self) {
        self.detector.borrow_mut().set_enabled(false);
    }

    pub fn sample(&self) -> Option<Detection> {
        self.detector.borrow().closest_detection()
    }
}
