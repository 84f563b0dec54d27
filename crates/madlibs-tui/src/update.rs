//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::common::{TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::{ApiUiEvent, UiEvent};
use crate::state::{AppState, Notice, Phase, blank_fields, form_complete};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            app.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                vec![]
            }
        }
        UiEvent::Api(api_event) => handle_api_event(app, api_event),
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            match &mut app.phase {
                Phase::TopicEntry { topic } => topic.insert_str(&text),
                Phase::Filling { fields, focus, .. } => {
                    if let Some(field) = fields.get_mut(*focus) {
                        field.input.insert_str(&text);
                    }
                }
                Phase::Completed { .. } => {}
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    // Error/info notices are transient: any keypress dismisses them.
    app.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    match app.phase {
        Phase::TopicEntry { .. } => handle_topic_key(app, key),
        Phase::Filling { .. } => handle_filling_key(app, key),
        Phase::Completed { .. } => handle_completed_key(app, key),
    }
}

fn handle_topic_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => return vec![UiEffect::Quit],
        KeyCode::Enter => return request_template(app),
        _ => {}
    }

    if let Phase::TopicEntry { topic } = &mut app.phase {
        topic.handle_key(key);
    }
    vec![]
}

fn handle_filling_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Esc {
        app.start_over();
        return vec![];
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        return request_submit(app);
    }

    let Phase::Filling { fields, focus, .. } = &mut app.phase else {
        return vec![];
    };
    let field_count = fields.len();

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            if field_count > 0 {
                *focus = (*focus + 1) % field_count;
            }
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            if field_count > 0 {
                *focus = (*focus + field_count - 1) % field_count;
            }
            vec![]
        }
        KeyCode::Enter => {
            // Enter advances through the blanks; on the last one it submits.
            if *focus + 1 < field_count {
                *focus += 1;
                vec![]
            } else {
                request_submit(app)
            }
        }
        _ => {
            if let Some(field) = fields.get_mut(*focus) {
                field.input.handle_key(key);
            }
            vec![]
        }
    }
}

fn handle_completed_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('n') => {
            app.start_over();
            vec![]
        }
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('g') => request_image(app),
        KeyCode::Char('o') => {
            if let Phase::Completed {
                image_url: Some(url),
                ..
            } = &app.phase
            {
                vec![UiEffect::OpenBrowser { url: url.clone() }]
            } else {
                vec![]
            }
        }
        _ => vec![],
    }
}

// ============================================================================
// Request Effects
// ============================================================================

/// Allocates a task id and marks its kind active immediately.
///
/// The runtime's `TaskStarted` round-trip only lands on a later loop
/// iteration, so the flag must be set here for a second trigger in the same
/// event batch (key repeat, buffered input) to be rejected.
fn begin_task(app: &mut AppState, kind: TaskKind) -> TaskId {
    let id = app.task_seq.next_id();
    app.tasks.state_mut(kind).on_started(&TaskStarted { id });
    id
}

fn request_template(app: &mut AppState) -> Vec<UiEffect> {
    let Phase::TopicEntry { topic } = &app.phase else {
        return vec![];
    };
    if topic.is_blank() || app.tasks.template.is_running() {
        return vec![];
    }
    let topic = topic.text().trim().to_string();
    let task = begin_task(app, TaskKind::Template);
    vec![UiEffect::GenerateTemplate {
        task,
        generation: app.generation,
        topic,
    }]
}

fn request_submit(app: &mut AppState) -> Vec<UiEffect> {
    let Phase::Filling {
        template, fields, ..
    } = &app.phase
    else {
        return vec![];
    };
    if !form_complete(fields) || app.tasks.submit.is_running() {
        return vec![];
    }
    let template_id = template.template_id.clone();
    let inputs: Vec<(String, String)> = fields
        .iter()
        .map(|f| (f.label.clone(), f.input.text().trim().to_string()))
        .collect();
    let task = begin_task(app, TaskKind::Submit);
    vec![UiEffect::SubmitMadlib {
        task,
        generation: app.generation,
        template_id,
        inputs,
    }]
}

fn request_image(app: &mut AppState) -> Vec<UiEffect> {
    let Phase::Completed {
        madlib,
        image_url: None,
    } = &app.phase
    else {
        // Once an image exists the action is no longer offered.
        return vec![];
    };
    if app.tasks.image.is_running() {
        return vec![];
    }
    let madlib_id = madlib.madlib_id.clone();
    let task = begin_task(app, TaskKind::Image);
    vec![UiEffect::GenerateImage {
        task,
        generation: app.generation,
        madlib_id,
    }]
}

// ============================================================================
// Backend Result Handlers
// ============================================================================

fn handle_api_event(app: &mut AppState, event: ApiUiEvent) -> Vec<UiEffect> {
    match event {
        ApiUiEvent::TemplateReady { generation, result } => {
            if generation != app.generation {
                tracing::debug!("discarding stale template result");
                return vec![];
            }
            match result {
                Ok(template) => {
                    if matches!(app.phase, Phase::TopicEntry { .. }) {
                        let fields = blank_fields(&template.word_types);
                        app.phase = Phase::Filling {
                            template,
                            fields,
                            focus: 0,
                        };
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "template generation failed");
                    app.notice = Some(Notice::Error(format!(
                        "Failed to create template: {error}"
                    )));
                }
            }
            vec![]
        }
        ApiUiEvent::SubmitReady { generation, result } => {
            if generation != app.generation {
                tracing::debug!("discarding stale submit result");
                return vec![];
            }
            match result {
                Ok(madlib) => {
                    if matches!(app.phase, Phase::Filling { .. }) {
                        app.phase = Phase::Completed {
                            madlib,
                            image_url: None,
                        };
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "madlib submission failed");
                    app.notice =
                        Some(Notice::Error(format!("Failed to complete story: {error}")));
                }
            }
            vec![]
        }
        ApiUiEvent::ImageReady { generation, result } => {
            if generation != app.generation {
                tracing::debug!("discarding stale image result");
                return vec![];
            }
            match result {
                Ok(url) => {
                    if let Phase::Completed {
                        image_url: image_url @ None,
                        ..
                    } = &mut app.phase
                    {
                        *image_url = Some(url);
                        app.notice = Some(Notice::Info(
                            "Illustration ready. Press o to open it.".to_string(),
                        ));
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "image generation failed");
                    app.notice =
                        Some(Notice::Error(format!("Failed to draw the story: {error}")));
                }
            }
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use madlibs_core::api::{CompletedMadLib, Template};

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn sample_template() -> Template {
        Template {
            template_id: "tmpl-1".to_string(),
            template: "The {noun} likes to {verb}.".to_string(),
            word_types: vec!["noun".to_string(), "verb".to_string()],
            topic: "cats".to_string(),
        }
    }

    fn sample_madlib() -> CompletedMadLib {
        CompletedMadLib {
            madlib_id: "ml-1".to_string(),
            completed_text: "The cat likes to jump.".to_string(),
            comic_prompt: "a cat jumping".to_string(),
            panel_suggestions: "three panels".to_string(),
        }
    }

    fn started(app: &mut AppState, kind: TaskKind, id: TaskId) {
        update(
            app,
            UiEvent::TaskStarted {
                kind,
                started: TaskStarted { id },
            },
        );
    }

    fn completed(app: &mut AppState, kind: TaskKind, id: TaskId, inner: UiEvent) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(inner),
                },
            },
        )
    }

    /// Drives a fresh app into the filling phase via the reducer.
    fn app_in_filling() -> AppState {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "cats");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::GenerateTemplate { task, generation, .. } = &effects[0] else {
            panic!("expected GenerateTemplate, got {effects:?}");
        };
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Template, task);
        completed(
            &mut app,
            TaskKind::Template,
            task,
            UiEvent::Api(ApiUiEvent::TemplateReady {
                generation,
                result: Ok(sample_template()),
            }),
        );
        assert!(matches!(app.phase, Phase::Filling { .. }));
        app
    }

    /// Drives a fresh app into the completed phase via the reducer.
    fn app_in_completed() -> AppState {
        let mut app = app_in_filling();
        type_text(&mut app, "cat");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "jump");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::SubmitMadlib { task, generation, .. } = &effects[0] else {
            panic!("expected SubmitMadlib, got {effects:?}");
        };
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Submit, task);
        completed(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::Api(ApiUiEvent::SubmitReady {
                generation,
                result: Ok(sample_madlib()),
            }),
        );
        assert!(matches!(app.phase, Phase::Completed { .. }));
        app
    }

    #[test]
    fn test_template_success_initializes_one_empty_field_per_blank() {
        let app = app_in_filling();
        let Phase::Filling { fields, focus, .. } = &app.phase else {
            panic!("expected filling phase");
        };
        assert_eq!(*focus, 0);
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["noun", "verb"]);
        assert!(fields.iter().all(|f| f.input.text().is_empty()));
        assert!(!app.tasks.template.is_running());
    }

    #[test]
    fn test_empty_topic_does_not_fire_request() {
        let mut app = AppState::new("http://localhost:8000");
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        type_text(&mut app, "   ");
        assert!(press(&mut app, KeyCode::Enter).is_empty());
    }

    #[test]
    fn test_template_request_not_reentrant_while_loading() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "cats");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::GenerateTemplate { task, .. } = &effects[0] else {
            panic!("expected GenerateTemplate");
        };
        started(&mut app, TaskKind::Template, *task);

        // Control is disabled while the call is outstanding
        assert!(press(&mut app, KeyCode::Enter).is_empty());
    }

    #[test]
    fn test_double_enter_in_one_batch_fires_one_template_request() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "cats");

        // Key repeat can deliver a second Enter before the runtime has
        // round-tripped any TaskStarted event.
        let effects = press(&mut app, KeyCode::Enter);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], UiEffect::GenerateTemplate { .. }));
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert!(app.tasks.template.is_running());
    }

    #[test]
    fn test_double_submit_in_one_batch_fires_once() {
        let mut app = app_in_filling();
        type_text(&mut app, "cat");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "jump");

        let effects = press(&mut app, KeyCode::Enter);
        assert_eq!(effects.len(), 1);
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert!(app.tasks.submit.is_running());
    }

    #[test]
    fn test_submit_gated_on_all_blanks_filled() {
        let mut app = app_in_filling();
        type_text(&mut app, "cat");

        // verb still empty: Enter on the last field does nothing
        press(&mut app, KeyCode::Tab);
        assert!(press(&mut app, KeyCode::Enter).is_empty());

        // whitespace-only does not count as filled
        type_text(&mut app, "  ");
        assert!(press(&mut app, KeyCode::Enter).is_empty());

        type_text(&mut app, "jump");
        let effects = press(&mut app, KeyCode::Enter);
        match &effects[0] {
            UiEffect::SubmitMadlib {
                template_id,
                inputs,
                ..
            } => {
                assert_eq!(template_id, "tmpl-1");
                assert_eq!(
                    inputs,
                    &vec![
                        ("noun".to_string(), "cat".to_string()),
                        ("verb".to_string(), "jump".to_string()),
                    ]
                );
            }
            other => panic!("expected SubmitMadlib, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_success_shows_story_verbatim() {
        let app = app_in_completed();
        let Phase::Completed { madlib, image_url } = &app.phase else {
            panic!("expected completed phase");
        };
        assert_eq!(madlib.completed_text, "The cat likes to jump.");
        assert!(image_url.is_none());
        assert!(!app.tasks.submit.is_running());
    }

    #[test]
    fn test_failed_call_keeps_phase_and_clears_only_its_flag() {
        let mut app = app_in_filling();
        type_text(&mut app, "cat");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "jump");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::SubmitMadlib { task, generation, .. } = &effects[0] else {
            panic!("expected SubmitMadlib");
        };
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Submit, task);

        completed(
            &mut app,
            TaskKind::Submit,
            task,
            UiEvent::Api(ApiUiEvent::SubmitReady {
                generation,
                result: Err("backend returned 500".to_string()),
            }),
        );

        // No partial transition, flag cleared, retry possible
        assert!(matches!(app.phase, Phase::Filling { .. }));
        assert!(!app.tasks.submit.is_running());
        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(!press(&mut app, KeyCode::Enter).is_empty());
    }

    #[test]
    fn test_start_over_clears_everything_from_completed() {
        let mut app = app_in_completed();
        press(&mut app, KeyCode::Esc);
        let Phase::TopicEntry { topic } = &app.phase else {
            panic!("expected topic entry after start over");
        };
        assert!(topic.text().is_empty());
    }

    #[test]
    fn test_start_over_from_filling() {
        let mut app = app_in_filling();
        type_text(&mut app, "cat");
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.phase, Phase::TopicEntry { .. }));
    }

    #[test]
    fn test_stale_result_after_reset_is_discarded() {
        let mut app = AppState::new("http://localhost:8000");
        type_text(&mut app, "cats");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::GenerateTemplate { task, generation, .. } = &effects[0] else {
            panic!("expected GenerateTemplate");
        };
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Template, task);

        // User resets while the call is still outstanding
        app.start_over();

        completed(
            &mut app,
            TaskKind::Template,
            task,
            UiEvent::Api(ApiUiEvent::TemplateReady {
                generation,
                result: Ok(sample_template()),
            }),
        );

        // Result is dropped silently; the flag is still cleared
        assert!(matches!(app.phase, Phase::TopicEntry { .. }));
        assert!(app.notice.is_none());
        assert!(!app.tasks.template.is_running());
    }

    #[test]
    fn test_image_flow_and_single_generation() {
        let mut app = app_in_completed();
        let effects = press(&mut app, KeyCode::Char('g'));
        let UiEffect::GenerateImage { task, generation, madlib_id } = &effects[0] else {
            panic!("expected GenerateImage, got {effects:?}");
        };
        assert_eq!(madlib_id, "ml-1");
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Image, task);

        // Re-entrant request is a no-op while loading
        assert!(press(&mut app, KeyCode::Char('g')).is_empty());

        completed(
            &mut app,
            TaskKind::Image,
            task,
            UiEvent::Api(ApiUiEvent::ImageReady {
                generation,
                result: Ok("http://localhost:8000/images/123.png".to_string()),
            }),
        );

        let Phase::Completed { image_url, .. } = &app.phase else {
            panic!("expected completed phase");
        };
        assert_eq!(
            image_url.as_deref(),
            Some("http://localhost:8000/images/123.png")
        );

        // Once an image exists the action is no longer offered
        assert!(press(&mut app, KeyCode::Char('g')).is_empty());

        // But opening it is
        let effects = press(&mut app, KeyCode::Char('o'));
        assert_eq!(
            effects,
            vec![UiEffect::OpenBrowser {
                url: "http://localhost:8000/images/123.png".to_string()
            }]
        );
    }

    #[test]
    fn test_image_failure_allows_retry() {
        let mut app = app_in_completed();
        let effects = press(&mut app, KeyCode::Char('g'));
        let UiEffect::GenerateImage { task, generation, .. } = &effects[0] else {
            panic!("expected GenerateImage");
        };
        let (task, generation) = (*task, *generation);
        started(&mut app, TaskKind::Image, task);
        completed(
            &mut app,
            TaskKind::Image,
            task,
            UiEvent::Api(ApiUiEvent::ImageReady {
                generation,
                result: Err("backend returned 500".to_string()),
            }),
        );

        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(!press(&mut app, KeyCode::Char('g')).is_empty());
    }

    #[test]
    fn test_notice_cleared_on_next_keypress() {
        let mut app = app_in_filling();
        app.notice = Some(Notice::Error("boom".to_string()));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_ctrl_c_quits_from_any_phase() {
        let mut app = app_in_completed();
        let effects = update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))),
        );
        assert_eq!(effects, vec![UiEffect::Quit]);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = app_in_filling();
        press(&mut app, KeyCode::Tab);
        let Phase::Filling { focus, .. } = &app.phase else {
            panic!();
        };
        assert_eq!(*focus, 1);
        press(&mut app, KeyCode::Tab);
        let Phase::Filling { focus, .. } = &app.phase else {
            panic!();
        };
        assert_eq!(*focus, 0);
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let mut app = app_in_filling();
        press(&mut app, KeyCode::Tab);
        update(
            &mut app,
            UiEvent::Terminal(Event::Paste("somersault".to_string())),
        );
        let Phase::Filling { fields, .. } = &app.phase else {
            panic!();
        };
        assert_eq!(fields[1].input.text(), "somersault");
        assert!(fields[0].input.text().is_empty());
    }
}
