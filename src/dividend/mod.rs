//! Dividend normalizer.
//!
//! Turns an irregular, sparse series of payments into a continuous annualized
//! estimate that the bander can divide by price.

pub mod normalize;

pub use normalize::*;
