//! Full-screen TUI for the MadLibs client.
//!
//! The architecture follows the Elm shape: a pure reducer (`update`) mutates
//! state and returns effects, and the runtime executes those effects and
//! feeds results back in as events. Network calls never happen inside the
//! reducer.

pub mod common;
pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use madlibs_core::api::MadLibsClient;
pub use runtime::TuiRuntime;

/// Runs an interactive MadLibs session against the given backend.
///
/// # Errors
/// Returns an error if stderr is not a terminal or the terminal cannot be
/// set up.
pub async fn run_session(client: MadLibsClient) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!("madlibs play requires a terminal.");
    }

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "MadLibs")?;
    writeln!(err, "Backend: {}", client.base_url())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(client)?;
    runtime.run()?;

    // Terminal is restored by this point
    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
