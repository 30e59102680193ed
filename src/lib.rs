//! Year filtering and URL-synced pagination for static blog post lists.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
