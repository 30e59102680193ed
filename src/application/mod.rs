//! Discovery, the filter + pagination state machine, and page sessions.

pub mod controller;
pub mod discovery;
pub mod document;
pub mod error;
pub mod events;
pub mod filter;
pub mod location;
pub mod pagination;
pub mod session;
