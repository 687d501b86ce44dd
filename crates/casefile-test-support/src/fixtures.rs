//! Mission fixtures shared by tests.

use casefile_mission::{
    AssetCatalog, Connection, Mission, MissionGraph, MissionRepository, Scene,
};

/// `S1 --A(10)--> S2`, `S1 --B(11)--> S3`; S2 and S3 only offer terminal
/// options. S2 narrates on both channels, S3 on the standard one.
///
/// # Panics
///
/// Never in practice; the fixture graph is non-empty.
#[must_use]
pub fn two_branch_mission() -> Mission {
    let graph = MissionGraph::new(
        vec![
            Scene::new(1, "Office")
                .with_image("images/office.jpg")
                .with_question("Where do you start?")
                .with_option(10, "Question the butler")
                .with_option(11, "Search the garden")
                .with_audio("audio/office.mp3"),
            Scene::new(2, "Pantry")
                .with_image("https://cdn.example.com/pantry.jpg")
                .with_question("Who did it?")
                .with_option(20, "Accuse the butler")
                .with_audio("audio/pantry.mp3")
                .with_extended_audio("audio/pantry-extended.mp3"),
            Scene::new(3, "Garden")
                .with_image("images/missing.jpg")
                .with_question("What now?")
                .with_option(30, "Call it a day")
                .with_audio("audio/garden.mp3"),
        ],
        vec![Connection::new(100, 1, 10, 2), Connection::new(101, 1, 11, 3)],
    )
    .unwrap();

    let assets = AssetCatalog::rooted("/missions/first-case")
        .with_image("images/office.jpg")
        .with_audio("audio/office.mp3")
        .with_audio("audio/pantry.mp3")
        .with_audio("audio/pantry-extended.mp3")
        .with_audio("audio/garden.mp3")
        .with_audio("audio/rain.mp3")
        .with_audio("audio/jazz.mp3");

    Mission::new(
        "mission-1",
        "The First Case",
        "Investigate the mysterious events.",
        graph,
    )
    .with_background_audio("audio/rain.mp3")
    .with_assets(assets)
}

/// `S1 --10--> S2`, `S1 --11--> S99` where S99 does not exist.
///
/// # Panics
///
/// Never in practice; the fixture graph is non-empty.
#[must_use]
pub fn dangling_mission() -> Mission {
    let graph = MissionGraph::new(
        vec![
            Scene::new(1, "Crossroads")
                .with_option(10, "Left")
                .with_option(11, "Right"),
            Scene::new(2, "Dead end").with_option(20, "Turn back"),
        ],
        vec![Connection::new(100, 1, 10, 2), Connection::new(101, 1, 11, 99)],
    )
    .unwrap();

    Mission::new("mission-dangling", "The Broken Map", "", graph)
}

/// `S1 <--> S2` with no unreferenced scene, plus a terminal option on S2.
///
/// # Panics
///
/// Never in practice; the fixture graph is non-empty.
#[must_use]
pub fn cyclic_mission() -> Mission {
    let graph = MissionGraph::new(
        vec![
            Scene::new(1, "Hall").with_option(10, "Upstairs"),
            Scene::new(2, "Landing")
                .with_option(20, "Downstairs")
                .with_option(21, "Leave"),
        ],
        vec![Connection::new(100, 1, 10, 2), Connection::new(101, 2, 20, 1)],
    )
    .unwrap();

    Mission::new("mission-loop", "The Endless Stair", "", graph)
}

/// Repository holding the two-branch, dangling and cyclic missions, in
/// that order.
///
/// # Panics
///
/// Never in practice; fixture ids are distinct.
#[must_use]
pub fn fixture_repository() -> MissionRepository {
    MissionRepository::new(vec![two_branch_mission(), dangling_mission(), cyclic_mission()])
        .unwrap()
}
