//! Shared test mocks and fixtures for the Casefile detective game engine.

mod clock;
mod fixtures;
mod logs;
mod store;

pub use clock::{FixedClock, fixed_now};
pub use fixtures::{cyclic_mission, dangling_mission, fixture_repository, two_branch_mission};
pub use logs::{CapturedEvent, LogCapture};
pub use store::{FailingKeyValueStore, RecordingKeyValueStore, StoreOperation};
