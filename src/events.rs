//! Terminal input.
//!
//! Input is read through the [`InputSource`] trait so the event loop can be
//! driven by crossterm in production and by scripted events in tests.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What an input event asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the loop.
    Quit,
    /// End the current wait and sample now.
    Refresh,
    /// Draw the last snapshot again without sampling.
    Redraw,
}

/// A source of terminal events.
pub trait InputSource {
    /// Wait up to `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Reads events from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        poll_event(timeout)
    }
}

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Map an event to an action, if it has one.
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key_event(*key),
        Event::Resize(_, _) => Some(Action::Redraw),
        _ => None,
    }
}

/// Handle a key event
pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        // Raw mode swallows SIGINT
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Refresh),
        _ => None,
    }
}
