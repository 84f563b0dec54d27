//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! The runtime uses an "inbox" pattern for async event collection:
//! - Spawned tasks send `UiEvent`s directly to `inbox_tx`
//! - The runtime drains `inbox_rx` each frame to collect results
//!
//! ## Task lifecycle
//!
//! Every backend call goes through `spawn_task`, which sends `TaskStarted`
//! immediately and wraps the call's result event in `TaskCompleted`. The
//! reducer owns all task state; the runtime only reads it to pick a poll
//! cadence.

use std::future::Future;
use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event;
use madlibs_core::api::MadLibsClient;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::{ApiUiEvent, UiEvent};
use crate::state::AppState;
use crate::{render, terminal, update};

/// Target frame rate while a backend call is in flight (~60fps).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage when nothing
/// is happening.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Full-screen TUI runtime.
///
/// Owns the terminal, the state, and the backend client. Terminal state is
/// restored on drop and on panic.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state.
    pub state: AppState,
    /// Backend client, cloned into spawned tasks.
    client: MadLibsClient,
    /// Inbox sender - spawned tasks send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - the runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    /// Last time a Tick event was emitted.
    last_tick: std::time::Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(client: MadLibsClient) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(client.base_url());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            client,
            inbox_tx,
            inbox_rx,
            last_tick: std::time::Instant::now(),
        })
    }

    /// Runs the main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_bracketed_paste()?;

        let result = self.event_loop();

        let _ = terminal::disable_bracketed_paste();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Only Tick triggers render - this caps frame rate at tick
                // cadence while terminal events batch to the next Tick.
                let marks_dirty = matches!(&event, UiEvent::Tick);

                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from the inbox and the terminal, emitting a Tick when
    /// the tick interval has elapsed.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast polling while a backend call is in flight (spinner animation),
        // slow polling otherwise to save CPU.
        let tick_interval = if self.state.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Drain inbox - all async results arrive here
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Poll terminal events:
        // - If we already have events to process, do a non-blocking poll
        // - Otherwise block until the next tick is due
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::GenerateTemplate {
                task,
                generation,
                topic,
            } => {
                let client = self.client.clone();
                self.spawn_task(TaskKind::Template, task, move || async move {
                    let result = client
                        .generate_template(&topic)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    UiEvent::Api(ApiUiEvent::TemplateReady { generation, result })
                });
            }
            UiEffect::SubmitMadlib {
                task,
                generation,
                template_id,
                inputs,
            } => {
                let client = self.client.clone();
                self.spawn_task(TaskKind::Submit, task, move || async move {
                    let result = client
                        .submit_madlib(&template_id, inputs)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    UiEvent::Api(ApiUiEvent::SubmitReady { generation, result })
                });
            }
            UiEffect::GenerateImage {
                task,
                generation,
                madlib_id,
            } => {
                let client = self.client.clone();
                self.spawn_task(TaskKind::Image, task, move || async move {
                    let result = client
                        .generate_image(&madlib_id)
                        .await
                        .map_err(|e| format!("{e:#}"));
                    UiEvent::Api(ApiUiEvent::ImageReady { generation, result })
                });
            }
            UiEffect::OpenBrowser { url } => {
                if let Err(error) = open::that(&url) {
                    tracing::warn!(%error, %url, "failed to open browser");
                }
            }
        }
    }

    /// Spawns a backend call with a uniform `TaskStarted`/`TaskCompleted`
    /// lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let inner = f().await;
            let _ = tx.send(UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(inner),
                },
            });
        });
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
