//! Application layer: catalogue configuration and the mission repository.

pub mod config;
pub mod repository;
