//! Portfolio module - snapshot history, valuation, and performance.

pub mod performance;
pub mod snapshot;
pub mod valuation;

pub use performance::*;
pub use snapshot::*;
pub use valuation::*;
