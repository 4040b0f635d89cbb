//! Portfolio snapshot module - user-entered point-in-time states.

mod snapshot_model;

pub use snapshot_model::*;
