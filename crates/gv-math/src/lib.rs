//! Gamma variate math utilities.

pub mod math;

pub use math::gamma::*;
pub use math::stable::*;
