use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, Write, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{InputEvent, ScreenKind, StateMachine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Cues, ParticleSystem, Renderer};
use crate::scores::ScoreStore;

/// Render at ~30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

pub struct HumanMode<S: ScoreStore> {
    machine: StateMachine<S>,
    metrics: GameMetrics,
    renderer: Renderer,
    particles: ParticleSystem,
    cues: Cues,
    input_handler: InputHandler,
    /// Input collected since the last tick
    pending: Vec<InputEvent>,
    should_quit: bool,
}

impl<S: ScoreStore> HumanMode<S> {
    pub fn new(machine: StateMachine<S>, bell: bool) -> Self {
        Self {
            machine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            particles: ParticleSystem::new(),
            cues: Cues::new(bell),
            input_handler: InputHandler::new(),
            pending: Vec::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks follow the machine; a speed boost shortens them
        let mut tick_period = self.machine.tick_interval();
        let mut tick = tick_timer(tick_period);

        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick.tick() => {
                    if self.update_game() {
                        terminal
                            .backend_mut()
                            .write_all(b"\x07")
                            .and_then(|_| terminal.backend_mut().flush())
                            .context("Failed to ring bell")?;
                    }

                    let next_period = self.machine.tick_interval();
                    if next_period != tick_period {
                        debug!("Tick interval now {:?}", next_period);
                        tick_period = next_period;
                        tick = tick_timer(tick_period);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.particles.update();
                    if self.machine.screen_kind() == ScreenKind::Playing {
                        self.metrics.update();
                    }
                    let snapshot = self.machine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.particles, &self.metrics);
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

        info!(
            "Leaving after {} runs, {} food, {} power-ups",
            self.metrics.runs_played, self.metrics.food_eaten, self.metrics.power_ups_collected
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(input) => self.pending.push(input),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Run one machine tick with the queued input. Returns true when the
    /// bell should ring.
    fn update_game(&mut self) -> bool {
        let was_playing = self.machine.screen_kind() == ScreenKind::Playing;
        let inputs = std::mem::take(&mut self.pending);

        let events = self.machine.update(&inputs);

        if !was_playing && self.machine.screen_kind() == ScreenKind::Playing {
            self.metrics.on_run_start();
            self.particles.clear();
        }
        for event in &events {
            self.metrics.on_event(event);
        }
        self.cues.play(&events, &mut self.particles)
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
