//! Asset module - domain models for tracked holdings.

mod assets_model;

pub use assets_model::*;
