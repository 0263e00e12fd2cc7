//! Play a session at a terminal.
//!
//! Whoever is acting types an abbreviation; matching ignores case. A blank
//! line prints the game as JSON, `?` prints the engine's debug dump. The
//! loop ends when the game does or input runs out.

use std::io::{self, BufRead, Write};

use crate::core::GameState;
use crate::session::Session;

fn present<W: Write>(state: &GameState, out: &mut W) -> io::Result<()> {
    if let Some(player) = &state.acting_player {
        writeln!(out, "Acting player: {}\n", player.name)?;
    }
    for choice in &state.choices {
        writeln!(out, "{}: {}", choice.abbr, choice.text)?;
    }
    write!(out, "> ")?;
    out.flush()
}

/// Drive `session` from `input` until the game ends or input is exhausted.
///
/// Rejected input is reported and the prompt repeats. Only I/O failures
/// end the loop early.
pub fn play_to_console<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut out: W,
) -> io::Result<()> {
    if session.is_finished() {
        writeln!(out, "Game over: {}", session.state().outcome.text)?;
        return Ok(());
    }
    present(session.state(), &mut out)?;

    for line in input.lines() {
        let line = line?;
        let typed = line.trim();

        if typed.is_empty() {
            match session.game().to_json() {
                Ok(json) => writeln!(out, "{json}")?,
                Err(e) => writeln!(out, "Error: {e}")?,
            }
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }
        if typed == "?" {
            write!(out, "{}> ", session.debug())?;
            out.flush()?;
            continue;
        }

        let state = session.state();
        let (Some(choice), Some(acting)) =
            (state.find_choice_ignore_case(typed), state.acting_player.as_ref())
        else {
            write!(out, "Invalid option: {typed}.\n> ")?;
            out.flush()?;
            continue;
        };
        let action = choice.to_action();
        let acting = acting.id.clone();

        match session.perform(&acting, action) {
            Ok(state) => {
                writeln!(out, "Outcome: {}", state.outcome.text)?;
                if state.is_terminal() {
                    return Ok(());
                }
            }
            Err(e) => writeln!(out, "Error: {}", e.user_message())?,
        }
        present(session.state(), &mut out)?;
    }
    Ok(())
}
