//! Module for coercing raw row values into declared field types.

pub mod conversions;
pub mod types;

pub use conversions::coerce;
pub use types::{Coerced, CoercionMiss};
