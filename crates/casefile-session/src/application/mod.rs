//! Application layer: persistence, sessions and menu queries.

pub mod menu;
pub mod progress;
pub mod session;
pub mod views;
