//! Domain model for mission definitions.

pub mod assets;
pub mod graph;
pub mod model;
pub mod narration;
pub mod source;
pub mod validation;
