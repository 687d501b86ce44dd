//! Casefile — terminal driver for the detective game.
//!
//! Stands in for the mobile screens: main menu, game screen and mission
//! complete screen, rendered as text and driven by line input.

pub mod config;
pub mod error;
pub mod play;
pub mod render;
pub mod state;
