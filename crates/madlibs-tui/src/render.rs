//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! Frame, and never mutate state or return effects. All mutation happens in
//! the reducer; all drawing happens here.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::common::TaskKind;
use crate::input::TextField;
use crate::state::{self, AppState, Notice, Phase};

/// Height of the title line.
const TITLE_HEIGHT: u16 = 1;

/// Height of the status line below the body.
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the entire TUI to the frame.
///
/// This is a pure render function - it only reads state and draws to frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_title(app, frame, chunks[0]);
    match &app.phase {
        Phase::TopicEntry { topic } => render_topic_entry(app, topic, frame, chunks[1]),
        Phase::Filling {
            template,
            fields,
            focus,
        } => render_filling(&template.template, fields, *focus, frame, chunks[1]),
        Phase::Completed { madlib, image_url } => {
            render_completed(&madlib.completed_text, image_url.as_deref(), frame, chunks[1]);
        }
    }
    render_status(app, frame, chunks[2]);
}

fn render_title(app: &AppState, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("MadLibs", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            app.base_url.as_str(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_topic_entry(app: &AppState, topic: &TextField, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Topic");
    let inner = block.inner(chunks[0]);
    frame.render_widget(Paragraph::new(topic.text()).block(block), chunks[0]);

    // The topic prompt is the only input on this screen, so the cursor
    // always sits in it unless a request is in flight.
    if !app.tasks.state(TaskKind::Template).is_running() {
        set_field_cursor(frame, inner, 0, topic);
    }

    let help = Paragraph::new(vec![
        Line::default(),
        Line::from("Pick a topic for your story (e.g. \"space pirates\", \"a day at the zoo\")."),
        Line::from("Press Enter to generate a template."),
    ])
    .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(help, chunks[1]);
}

fn render_filling(
    template_text: &str,
    fields: &[state::BlankField],
    focus: usize,
    frame: &mut Frame,
    area: Rect,
) {
    let fields_height = (fields.len() as u16).saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(fields_height)])
        .split(area);

    let preview = state::fill_preview(template_text, fields);
    let preview_block = Block::default().borders(Borders::ALL).title("Story so far");
    frame.render_widget(
        Paragraph::new(preview)
            .wrap(Wrap { trim: false })
            .block(preview_block),
        chunks[0],
    );

    let fields_block = Block::default().borders(Borders::ALL).title("Your words");
    let inner = fields_block.inner(chunks[1]);
    let lines: Vec<Line<'_>> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field, i == focus))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(fields_block), chunks[1]);

    if let Some(field) = fields.get(focus) {
        let row = focus as u16;
        if row < inner.height {
            let prefix = format!("> {}: ", field.label);
            let prefix_width = prefix.width() as u16;
            let field_area = Rect {
                x: inner.x.saturating_add(prefix_width).min(inner.right()),
                y: inner.y + row,
                width: inner.width.saturating_sub(prefix_width),
                height: 1,
            };
            set_field_cursor(frame, field_area, 0, &field.input);
        }
    }
}

fn field_line<'a>(field: &'a state::BlankField, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(field.label.as_str(), label_style),
        Span::raw(": "),
        Span::raw(field.input.text()),
    ])
}

fn render_completed(text: &str, image_url: Option<&str>, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let story_block = Block::default().borders(Borders::ALL).title("Your MadLib");
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(story_block),
        chunks[0],
    );

    let image_line = match image_url {
        Some(url) => Line::from(vec![
            Span::raw("Illustration: "),
            Span::styled(url, Style::default().fg(Color::Cyan)),
        ]),
        None => Line::from(Span::styled(
            "No illustration yet.",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(Paragraph::new(image_line), chunks[1]);
}

fn render_status(app: &AppState, frame: &mut Frame, area: Rect) {
    let line = if let Some(notice) = &app.notice {
        notice_line(notice)
    } else if let Some(kind) = running_task(app) {
        let frame_idx = app.spinner_frame % SPINNER_FRAMES.len();
        let verb = match kind {
            TaskKind::Template => "Generating template...",
            TaskKind::Submit => "Completing your story...",
            TaskKind::Image => "Illustrating...",
        };
        Line::from(vec![
            Span::raw(SPINNER_FRAMES[frame_idx]),
            Span::raw(" "),
            Span::raw(verb),
        ])
    } else {
        Line::from(Span::styled(
            key_hints(&app.phase),
            Style::default().add_modifier(Modifier::DIM),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn notice_line(notice: &Notice) -> Line<'_> {
    match notice {
        Notice::Error(msg) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Red),
        )),
        Notice::Info(msg) => Line::from(Span::styled(
            msg.as_str(),
            Style::default().fg(Color::Green),
        )),
    }
}

fn running_task(app: &AppState) -> Option<TaskKind> {
    [TaskKind::Template, TaskKind::Submit, TaskKind::Image]
        .into_iter()
        .find(|kind| app.tasks.state(*kind).is_running())
}

fn key_hints(phase: &Phase) -> &'static str {
    match phase {
        Phase::TopicEntry { .. } => "Enter: generate  Esc: quit",
        Phase::Filling { .. } => "Tab: next blank  Enter: next/submit  Ctrl+S: submit  Esc: start over",
        Phase::Completed {
            image_url: Some(_), ..
        } => "o: open illustration  n: new story  q: quit",
        Phase::Completed { image_url: None, .. } => "g: illustrate  n: new story  q: quit",
    }
}

/// Places the terminal cursor inside a single-line input area.
///
/// `extra_cols` offsets past any prefix already drawn in the same row.
fn set_field_cursor(frame: &mut Frame, area: Rect, extra_cols: u16, field: &TextField) {
    let before_cursor: String = field.text().chars().take(field.cursor()).collect();
    let cursor_width = before_cursor.width() as u16;
    let x = area
        .x
        .saturating_add(extra_cols)
        .saturating_add(cursor_width)
        .min(area.right().saturating_sub(1).max(area.x));
    frame.set_cursor_position((x, area.y));
}
