//! Snapfolio Core - portfolio valuation and performance analytics.
//!
//! This crate is the pure analytics engine behind Snapfolio: it reconstructs
//! point-in-time valuations from sparse, carry-forward snapshots, normalizes
//! per-asset currencies into one reporting currency, derives growth,
//! time-weighted, and compound-annual returns in the presence of external
//! cash flows, and turns target-vs-actual allocations into a minimal set of
//! rebalancing suggestions.
//!
//! It performs no I/O. Snapshots, assets, categories, and exchange rate
//! tables are produced by the host application and handed in as immutable
//! values; every operation here is a synchronous, side-effect-free function
//! over those inputs.

pub mod assets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod portfolio;
pub mod rebalancing;

// Re-export common types from the domain modules
pub use assets::*;
pub use categories::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
