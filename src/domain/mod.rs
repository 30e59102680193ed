//! Domain layer types and invariants.

pub mod error;
pub mod extract;
pub mod posts;
pub mod year;
