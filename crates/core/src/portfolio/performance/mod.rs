//! Portfolio performance module - pure return calculations.

mod performance_model;
mod performance_service;

pub use performance_model::*;
pub use performance_service::*;
