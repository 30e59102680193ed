//! HTML projection of the list model.

pub mod render;
pub mod views;
