//! Input/output helpers.
//!
//! - CSV history + ticker-list ingest (`ingest`)
//! - banded series / dividend record CSV exports (`export`)
//! - series JSON read/write (`series`)

pub mod export;
pub mod ingest;
pub mod series;

pub use export::*;
pub use ingest::*;
pub use series::*;
