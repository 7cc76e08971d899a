//! `yield-bands` library crate.
//!
//! The binary (`yb`) is a thin wrapper around this library so that:
//!
//! - the normalizer and bander are testable without spawning processes
//! - the banded series can be served by something other than the CLI
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod bands;
pub mod cli;
pub mod data;
pub mod dividend;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
