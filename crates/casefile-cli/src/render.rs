//! Text rendering of the game screens.

use std::fmt::Write as _;

use casefile_mission::{AssetHandle, track_display_name};
use casefile_session::SessionView;

/// The main menu.
#[must_use]
pub fn main_menu(has_saved_progress: bool, accessibility: bool) -> String {
    let mut out = String::from("\nDetective Game\nChoose your path. Solve the mystery.\n\n");
    out.push_str("  n) New Game\n");
    if has_saved_progress {
        out.push_str("  c) Continue\n");
    }
    let _ = writeln!(
        out,
        "  a) Audio Narration: {}",
        if accessibility { "ON" } else { "OFF" }
    );
    out.push_str("  q) Quit\n");
    out
}

/// The game screen for the current scene.
#[must_use]
pub fn scene(view: &SessionView) -> String {
    let mut out = String::new();
    let Some(scene) = &view.scene else {
        let _ = writeln!(out, "\n[scene unavailable in {}]", view.mission_title);
        out.push_str("  q) Main menu\n");
        return out;
    };

    let _ = writeln!(out, "\n== {} ==", scene.label);
    if !scene.image.is_empty() {
        out.push_str(&asset_line("image", view.image.as_ref(), &scene.image));
    }
    if let Some(track) = &view.narration_track {
        let channel = if view.narration.is_extended() {
            "extended"
        } else {
            "standard"
        };
        let line = asset_line("narration", view.narration_handle.as_ref(), track);
        let _ = writeln!(out, "{} ({channel})", line.trim_end());
    }
    match &view.background_track {
        Some(track) => {
            let _ = writeln!(out, "[music] {}", track_display_name(track));
        }
        None if !view.background_choices.is_empty() => out.push_str("[music] off\n"),
        None => {}
    }

    if !scene.question.is_empty() {
        let _ = writeln!(out, "\n{}", scene.question);
    }
    out.push('\n');
    if scene.options.is_empty() {
        out.push_str("  (no way forward from here)\n");
    }
    for (index, option) in scene.options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {}", index + 1, option.text);
    }

    out.push_str("\n  a) toggle narration");
    if !view.background_choices.is_empty() {
        out.push_str("  m) music");
    }
    out.push_str("  q) main menu\n");
    out
}

/// The background-music picker.
#[must_use]
pub fn music_picker(view: &SessionView) -> String {
    let mut out = String::from("\nBackground Music\n");
    let marker = |active: bool| if active { "*" } else { " " };
    let _ = writeln!(out, " {} 0) None (Off)", marker(view.background_track.is_none()));
    for (index, track) in view.background_choices.iter().enumerate() {
        let active = view.background_track.as_deref() == Some(track.as_str());
        let _ = writeln!(
            out,
            " {} {}) {}",
            marker(active),
            index + 1,
            track_display_name(track)
        );
    }
    out
}

/// The "Mission Complete" screen.
#[must_use]
pub fn mission_complete(view: &SessionView) -> String {
    format!(
        "\nMission Complete\n{}\nYou have reached the end of this investigation.\n\nPress enter to return to the main menu.\n",
        view.mission_title
    )
}

fn asset_line(kind: &str, handle: Option<&AssetHandle>, reference: &str) -> String {
    match handle {
        Some(AssetHandle::Bundled(path)) => format!("[{kind}] {}\n", path.display()),
        Some(AssetHandle::Remote(url)) => format!("[{kind}] {url}\n"),
        None => format!("[{kind} unavailable: {reference}]\n"),
    }
}
