//! The event loop.
//!
//! One cooperative loop drives everything: sample, draw, then wait for the
//! next refresh while polling input. Suspension only happens in the wait
//! step, so a render always shows the history as of the sample right
//! before it.
//!
//! ```text
//! Running ──▶ Sampling ──▶ Rendering ──▶ Waiting ──▶ Running ...
//!    │                                      │
//!    └──────────── quit key ────────────────┴──▶ Stopped
//! ```

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info, warn};

use crate::data::{HistoryBuffer, Sampler, Snapshot};
use crate::events::{action_for, Action, InputSource};
use crate::ui::DashboardRenderer;

/// Time between samples.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Longest the loop goes without checking input.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a transient cycle error stays on screen.
pub const ERROR_PAUSE: Duration = Duration::from_secs(2);

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub refresh: Duration,
    pub input_poll: Duration,
    pub error_pause: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            refresh: REFRESH_INTERVAL,
            input_poll: INPUT_POLL_INTERVAL,
            error_pause: ERROR_PAUSE,
        }
    }
}

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Sampling,
    Rendering,
    Waiting,
    Stopped,
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitOutcome {
    Elapsed,
    Refresh,
    Quit,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    sampler: Sampler,
    renderer: DashboardRenderer,
    timing: LoopTiming,
    phase: Phase,
    last_snapshot: Option<Snapshot>,
    cycles: u64,
}

impl App {
    pub fn new(sampler: Sampler, renderer: DashboardRenderer) -> Self {
        Self {
            sampler,
            renderer,
            timing: LoopTiming::default(),
            phase: Phase::Running,
            last_snapshot: None,
            cycles: 0,
        }
    }

    pub fn with_timing(mut self, timing: LoopTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed sample cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn history(&self) -> &HistoryBuffer {
        self.sampler.history()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    /// Run until the quit key is pressed or input fails.
    ///
    /// Draw failures are shown as a transient error and the loop carries
    /// on; only an input error ends the loop with an error.
    pub fn run<B: Backend, I: InputSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        input: &mut I,
    ) -> Result<()> {
        info!(refresh = ?self.timing.refresh, "monitor started");
        let result = self.run_cycles(terminal, input);
        self.phase = Phase::Stopped;
        info!(cycles = self.cycles, "monitor stopped");
        result
    }

    fn run_cycles<B: Backend, I: InputSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        input: &mut I,
    ) -> Result<()> {
        loop {
            // Quit keys queued behind a refresh, or typed before the first sample
            if self.drain_pending(input)? {
                return Ok(());
            }

            self.phase = Phase::Sampling;
            let snapshot = self.sampler.sample();
            self.cycles += 1;
            self.last_snapshot = Some(snapshot);

            self.phase = Phase::Rendering;
            let pause = match self.draw(terminal) {
                Ok(()) => self.timing.refresh,
                Err(e) => {
                    warn!(error = %e, "render failed");
                    self.show_error(terminal, &e.to_string());
                    self.timing.error_pause
                }
            };

            self.phase = Phase::Waiting;
            match self.wait(terminal, input, pause)? {
                WaitOutcome::Quit => return Ok(()),
                WaitOutcome::Refresh => debug!("refresh requested"),
                WaitOutcome::Elapsed => {}
            }
            self.phase = Phase::Running;
        }
    }

    /// Consume already queued input; true if it held a quit.
    ///
    /// Other queued keys are dropped: a sample and a draw follow anyway.
    fn drain_pending<I: InputSource>(&self, input: &mut I) -> Result<bool> {
        while let Some(event) = input.poll(Duration::ZERO)? {
            if action_for(&event) == Some(Action::Quit) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Wait up to `duration`, checking input every poll interval.
    fn wait<B: Backend, I: InputSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        input: &mut I,
        duration: Duration,
    ) -> Result<WaitOutcome> {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(WaitOutcome::Elapsed);
            }
            let step = (deadline - now).min(self.timing.input_poll);

            let Some(event) = input.poll(step)? else {
                continue;
            };
            match action_for(&event) {
                Some(Action::Quit) => return Ok(WaitOutcome::Quit),
                Some(Action::Refresh) => return Ok(WaitOutcome::Refresh),
                Some(Action::Redraw) => {
                    if let Err(e) = self.draw(terminal) {
                        warn!(error = %e, "redraw failed");
                    }
                }
                None => {}
            }
        }
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        let Some(snapshot) = &self.last_snapshot else {
            return Ok(());
        };
        let history = self.sampler.history();
        terminal.draw(|frame| self.renderer.render(frame, snapshot, history))?;
        Ok(())
    }

    fn show_error<B: Backend>(&self, terminal: &mut Terminal<B>, message: &str) {
        if let Err(e) =
            terminal.draw(|frame| self.renderer.render_transient_error(frame, message))
        {
            warn!(error = %e, "could not show error");
        }
    }
}
