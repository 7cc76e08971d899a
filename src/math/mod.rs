//! Mathematical utilities: order statistics and rolling windows.

pub mod stats;
pub mod window;

pub use stats::*;
pub use window::*;
