//! Yield percentile bander.
//!
//! Responsibilities:
//!
//! - align annualized dividends onto the trading calendar (bounded carry-forward)
//! - compute trailing yield, drawdown and implied-price decile bands
//! - summarize the most recent row and label percentiles/bands

pub mod align;
pub mod bander;
pub mod labels;

pub use align::*;
pub use bander::*;
pub use labels::*;
