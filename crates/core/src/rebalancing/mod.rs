//! Rebalancing module - allocation gaps and suggested transfers.

mod rebalancing_model;
mod rebalancing_service;

pub use rebalancing_model::*;
pub use rebalancing_service::*;

#[cfg(test)]
mod rebalancing_service_tests;
