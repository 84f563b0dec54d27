//! UI event types.
//!
//! All inputs to the TUI (terminal input, timer ticks, backend call results)
//! are converted to `UiEvent` before being processed by the reducer.
//!
//! ## Task lifecycle
//!
//! Async work uses a uniform lifecycle:
//! - The reducer marks the task kind active when it emits a request effect,
//!   so a second trigger in the same event batch is rejected
//! - The runtime emits `UiEvent::TaskStarted` once the call is actually
//!   spawned (re-marking the same id is a no-op)
//! - The runtime emits `UiEvent::TaskCompleted` wrapping the result event
//! - The reducer is the only place that mutates `TaskState`
//!
//! ## Generation gating
//!
//! Every `Api` result carries the generation captured when its call was
//! spawned. The reducer discards results whose generation no longer matches
//! the session, which is how a reset races safely with in-flight calls.

use crossterm::event::Event as CrosstermEvent;
use madlibs_core::api::{CompletedMadLib, Template};

use crate::common::{Generation, TaskCompleted, TaskKind, TaskStarted};

/// Results of backend calls.
///
/// Errors arrive pre-formatted: the runtime renders the anyhow chain to a
/// string at the async boundary.
#[derive(Debug)]
pub enum ApiUiEvent {
    /// Template generation finished.
    TemplateReady {
        generation: Generation,
        result: Result<Template, String>,
    },

    /// Madlib submission finished.
    SubmitReady {
        generation: Generation,
        result: Result<CompletedMadLib, String>,
    },

    /// Image generation finished (Ok carries the resolved absolute URL).
    ImageReady {
        generation: Generation,
        result: Result<String, String>,
    },
}

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner animation, render cadence).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Task lifecycle: runtime started a call.
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// Task lifecycle: runtime completed a call (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// Backend call results.
    Api(ApiUiEvent),
}
