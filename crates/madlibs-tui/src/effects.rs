//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer itself never
//! performs network calls or touches the terminal.

use crate::common::{Generation, TaskId};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Request a template for a topic.
    GenerateTemplate {
        task: TaskId,
        generation: Generation,
        topic: String,
    },

    /// Submit the filled blanks for completion.
    SubmitMadlib {
        task: TaskId,
        generation: Generation,
        template_id: String,
        inputs: Vec<(String, String)>,
    },

    /// Request an illustration for the completed madlib.
    GenerateImage {
        task: TaskId,
        generation: Generation,
        madlib_id: String,
    },

    /// Open a URL in the system browser.
    OpenBrowser { url: String },
}
