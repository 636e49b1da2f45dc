use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, Stderr, Write};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};

use crate::audio::{play_events, AudioSink};
use crate::game::{FrameReport, GameEngine, GameEvent, Session};
use crate::input::{InputHandler, KeyAction};
use crate::render::{Renderer, Viewport};
use crate::storage::HighScoreStore;

/// Roughly one display refresh
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    store: Box<dyn HighScoreStore>,
    audio: Box<dyn AudioSink>,
    viewport: Viewport,
    clock: Instant,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(
        engine: GameEngine,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read high score, starting from 0");
            0
        });
        let grid_size = engine.config().grid_size;
        let clock = Instant::now();

        Self {
            session: Session::new(engine, high_score, Duration::ZERO),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            store,
            audio,
            viewport: Viewport::fit(0, 0, grid_size),
            clock,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        enter_alternate_screen(&mut stderr, disable_raw_mode)?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let size = terminal.size().context("Failed to read terminal size")?;
        self.resize(size.width, size.height);

        tracing::info!(high_score = self.session.high_score(), "game started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        tracing::info!(high_score = self.session.high_score(), "game closed");
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Frame: maybe tick, always draw
                _ = frame_timer.tick() => {
                    let now = self.clock.elapsed();
                    self.advance(now);
                    let snapshot = self.session.snapshot();
                    let viewport = self.viewport;
                    let anim_ms = now.as_millis() as u64;
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &viewport, anim_ms);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match self.input_handler.handle_key_event(key) {
                KeyAction::Game(intent) => {
                    self.session.handle_intent(intent, self.clock.elapsed());
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            },
            Event::Resize(cols, rows) => self.resize(cols, rows),
            _ => {}
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::fit(cols, rows, self.session.state().grid_size);
        if !self.viewport.fits {
            tracing::debug!(cols, rows, "terminal too small for the board");
        }
    }

    /// Frame callback against the session clock, then side effects
    fn advance(&mut self, now: Duration) -> FrameReport {
        let report = self.session.on_frame(now);

        if report.high_score_changed {
            let best = self.session.high_score();
            if let Err(e) = self.store.save(best) {
                tracing::warn!(error = %e, high_score = best, "could not save high score");
            }
        }

        play_events(self.audio.as_mut(), &report.events);

        if let Some(GameEvent::GameOver { score }) = report
            .events
            .iter()
            .find(|event| matches!(event, GameEvent::GameOver { .. }))
        {
            tracing::info!(score, high_score = self.session.high_score(), "game over");
        }

        report
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Switch `out` to the alternate screen, calling `restore` to undo raw mode
/// if the switch fails
fn enter_alternate_screen<W: Write>(
    out: &mut W,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<()> {
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        if let Err(restore_err) = restore() {
            tracing::warn!(error = %restore_err, "could not leave raw mode");
        }
        return Err(e).context("Failed to enter alternate screen");
    }
    Ok(())
}
