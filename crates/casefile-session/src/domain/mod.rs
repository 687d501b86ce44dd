//! Domain model for mission traversal.

pub mod commands;
pub mod events;
pub mod state;
pub mod traversal;
