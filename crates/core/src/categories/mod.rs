//! Category module - user-defined allocation buckets.

mod categories_model;

pub use categories_model::*;
