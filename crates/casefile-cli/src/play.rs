//! The interactive game loop.
//!
//! Reads one command per line and writes screens as plain text. End of
//! input quits from any screen.

use std::io::Write;
use std::sync::Arc;

use casefile_session::{GameSession, SelectOption, SelectOutcome, SessionView, StartMission};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

/// Where control goes after leaving a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Menu,
    Quit,
}

/// Runs the main menu until the player quits or input ends.
///
/// # Errors
///
/// Returns `AppError::Io` if the terminal cannot be read or written, and
/// `AppError::Domain` if a mission cannot be started.
pub async fn run<R, W>(state: &AppState, input: &mut R, output: &mut W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let menu = state.menu();
    loop {
        let has_saved = menu.has_saved_progress().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not check for saved progress");
            false
        });
        let accessibility = menu.accessibility_mode().await;
        write!(output, "{}", render::main_menu(has_saved, accessibility))?;

        let Some(command) = prompt(input, output).await? else {
            return Ok(());
        };
        let flow = match command.as_str() {
            "n" => play_mission(state, &menu.new_game_command(), input, output).await?,
            "c" if has_saved => match menu.continue_command().await {
                Ok(Some(start)) => play_mission(state, &start, input, output).await?,
                Ok(None) | Err(_) => {
                    writeln!(output, "No saved investigation to continue.")?;
                    Flow::Menu
                }
            },
            "a" => {
                if let Err(e) = menu.toggle_accessibility().await {
                    tracing::warn!(error = %e, "could not save accessibility preference");
                    writeln!(output, "Could not save the narration setting.")?;
                }
                Flow::Menu
            }
            "q" => Flow::Quit,
            _ => {
                writeln!(output, "Unknown choice.")?;
                Flow::Menu
            }
        };
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

async fn play_mission<R, W>(
    state: &AppState,
    start: &StartMission,
    input: &mut R,
    output: &mut W,
) -> Result<Flow, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let session = GameSession::start(
        start,
        &state.missions,
        state.progress.clone(),
        Arc::clone(&state.clock),
        state.options,
    )
    .await?;

    loop {
        let view = session.view()?;
        if view.is_complete() {
            write!(output, "{}", render::mission_complete(&view))?;
            return Ok(match prompt(input, output).await? {
                Some(_) => Flow::Menu,
                None => Flow::Quit,
            });
        }

        write!(output, "{}", render::scene(&view))?;
        let Some(command) = prompt(input, output).await? else {
            return Ok(Flow::Quit);
        };
        match command.as_str() {
            "q" => return Ok(Flow::Menu),
            "a" => {
                session
                    .set_accessibility_mode(!view.narration.is_extended())
                    .await?;
            }
            "m" if !view.background_choices.is_empty() => {
                if !pick_music(&session, &view, input, output).await? {
                    return Ok(Flow::Quit);
                }
            }
            other => choose(&session, &view, other, output).await?,
        }
    }
}

async fn choose<W: Write>(
    session: &GameSession,
    view: &SessionView,
    command: &str,
    output: &mut W,
) -> Result<(), AppError> {
    let option = view.scene.as_ref().and_then(|scene| {
        let index = command.parse::<usize>().ok()?.checked_sub(1)?;
        scene.options.get(index)
    });
    let Some(option) = option else {
        writeln!(output, "Choose one of the numbered options.")?;
        return Ok(());
    };

    if session.select_option(&SelectOption::new(option.id)).await? == SelectOutcome::Ignored {
        writeln!(output, "Still weighing the last choice...")?;
    }
    Ok(())
}

/// Returns `false` if input ended at the picker.
async fn pick_music<R, W>(
    session: &GameSession,
    view: &SessionView,
    input: &mut R,
    output: &mut W,
) -> Result<bool, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(output, "{}", render::music_picker(view))?;
    let Some(command) = prompt(input, output).await? else {
        return Ok(false);
    };
    let selection = match command.parse::<usize>() {
        Ok(0) => Some(None),
        Ok(n) => view.background_choices.get(n - 1).map(|t| Some(t.as_str())),
        Err(_) => None,
    };
    match selection {
        Some(track) => session.select_background_track(track)?,
        None => writeln!(output, "No such track.")?,
    }
    Ok(true)
}

async fn prompt<R, W>(input: &mut R, output: &mut W) -> Result<Option<String>, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(output, "> ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}
