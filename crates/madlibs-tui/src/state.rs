//! Application state composition.
//!
//! ```text
//! AppState
//! ├── phase: Phase            (topic-entry | filling | completed)
//! ├── generation: Generation  (bumped on start-over, gates stale results)
//! ├── task_seq: TaskSeq       (async task id generator)
//! ├── tasks: Tasks            (per-operation loading state)
//! └── notice: Option<Notice>  (error/info line, cleared on next keypress)
//! ```
//!
//! The phase enum owns exactly the entities its view state may hold, so
//! "exactly one view state is active" and "entities are cleared together on
//! reset" are structural rather than enforced by discipline.

use madlibs_core::api::{CompletedMadLib, Template};

use crate::common::{Generation, TaskSeq, Tasks};
use crate::input::TextField;

/// One fillable blank: its category label and the user's word.
#[derive(Debug, Clone)]
pub struct BlankField {
    pub label: String,
    pub input: TextField,
}

/// The session's view state.
#[derive(Debug)]
pub enum Phase {
    /// Collecting a topic for the story.
    TopicEntry { topic: TextField },

    /// Collecting one word per blank category.
    Filling {
        template: Template,
        fields: Vec<BlankField>,
        focus: usize,
    },

    /// Showing the completed story, optionally with an illustration.
    Completed {
        madlib: CompletedMadLib,
        image_url: Option<String>,
    },
}

impl Phase {
    pub fn topic_entry() -> Self {
        Phase::TopicEntry {
            topic: TextField::default(),
        }
    }
}

/// A transient status-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

/// TUI application state.
#[derive(Debug)]
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Current view state and the entities it owns.
    pub phase: Phase,
    /// Current session generation; results from earlier generations are stale.
    pub generation: Generation,
    /// Task id sequence for async operations.
    pub task_seq: TaskSeq,
    /// Per-operation loading state.
    pub tasks: Tasks,
    /// Transient status-line message.
    pub notice: Option<Notice>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Backend base address (display only).
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            phase: Phase::topic_entry(),
            generation: Generation::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            notice: None,
            spinner_frame: 0,
            base_url: base_url.into(),
        }
    }

    /// Clears all session entities and returns to topic entry.
    ///
    /// Bumps the generation so any outstanding call's result is discarded
    /// when it eventually arrives.
    pub fn start_over(&mut self) {
        self.phase = Phase::topic_entry();
        self.generation = self.generation.next();
        self.notice = None;
    }
}

/// Builds one empty field per blank label, in template order.
///
/// Duplicate labels collapse to a single field (the backend keys submitted
/// inputs by label, so duplicates share one value).
pub fn blank_fields(word_types: &[String]) -> Vec<BlankField> {
    let mut fields: Vec<BlankField> = Vec::with_capacity(word_types.len());
    for label in word_types {
        if fields.iter().any(|f| &f.label == label) {
            continue;
        }
        fields.push(BlankField {
            label: label.clone(),
            input: TextField::default(),
        });
    }
    fields
}

/// Submission is allowed only when every blank has a non-empty trimmed value.
///
/// Vacuously true for a template with no blanks.
pub fn form_complete(fields: &[BlankField]) -> bool {
    fields.iter().all(|f| !f.input.is_blank())
}

/// Renders the template text with filled blanks substituted in.
///
/// Blanks whose field is still empty keep their `{label}` marker so the user
/// can see what remains.
pub fn fill_preview(template: &str, fields: &[BlankField]) -> String {
    let mut preview = template.to_string();
    for field in fields {
        let value = field.input.text().trim();
        if value.is_empty() {
            continue;
        }
        let marker = format!("{{{}}}", field.label);
        preview = preview.replace(&marker, value);
    }
    preview
}
