mod chase_ball;
mod shoot;

pub use chase_ball::*;
pub use shoot::*;
