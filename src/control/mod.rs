//! Control-rate context: input handling, note allocation, sequencing.

pub mod clock;
pub mod controller;
pub mod random;
pub mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::Controller;
pub use throttle::Throttle;
