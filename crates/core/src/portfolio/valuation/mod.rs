//! Portfolio valuation module - carry-forward resolution of snapshot history.

mod valuation_model;
mod valuation_resolver;

pub use valuation_model::*;
pub use valuation_resolver::*;
