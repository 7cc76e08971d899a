//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - provider input rows (`PricePoint`) and derived dividend events
//! - normalizer output (`AnnualizedDividendRecord`, `PaymentCadence`)
//! - bander output (`BandedSeries`, `BandedRow`, `BandSummary`)
//! - run configuration (`BandConfig`, `Period`, `SourceKind`)

pub mod period;
pub mod types;

pub use period::*;
pub use types::*;
