//! Platform abstraction traits
//!
//! These traits define what the scheduler needs from the board it runs on.
//! Everything else (timer wiring, GPIO, logging transport) stays outside.

pub mod clock;
pub mod platform;

pub use clock::Clock;
pub use platform::Platform;
