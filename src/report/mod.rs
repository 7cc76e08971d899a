//! Reporting utilities: terminal tables for banded series, dividends and scans.

pub mod format;

pub use format::*;
