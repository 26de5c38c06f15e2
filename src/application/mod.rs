//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers take the current time as an argument and never read a clock.

pub mod handlers;

pub use handlers::*;
