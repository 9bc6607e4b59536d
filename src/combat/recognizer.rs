//! Rolling-window combo recognition.
//!
//! Idle (nothing recorded) -> Recording (1+ moves, window running) -> Idle
//! on window expiry, on a full match, or on a forced reset.

use std::sync::Arc;

use super::charge::ChargeGate;
use super::library::{ComboEffect, ComboLibrary, LibraryError};
use super::MoveId;

/// A combo that fired
#[derive(Debug, Clone, PartialEq)]
pub struct ComboMatch {
    pub index: usize,
    pub title: String,
    pub effect: ComboEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// Gate not armed, nothing recorded
    NoMatch,
    /// Move recorded, no combo completed yet
    Partial { recorded: usize },
    Matched(ComboMatch),
}

impl MatchResult {
    pub fn matched(&self) -> Option<&ComboMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComboRecognizer {
    library: Arc<ComboLibrary>,
    recorded: Vec<MoveId>,
    window: f32,
    window_remaining: f32,
}

impl ComboRecognizer {
    pub fn new(library: Arc<ComboLibrary>, window: f32) -> Self {
        Self {
            library,
            recorded: Vec::new(),
            window,
            window_remaining: 0.0,
        }
    }

    /// Frame tick: count the window down, drop the sequence once it lapses.
    /// The window itself is only re-armed by the next accepted record.
    pub fn tick(&mut self, delta: f32) {
        if self.recorded.is_empty() {
            return;
        }

        self.window_remaining -= delta;
        if self.window_remaining <= 0.0 {
            tracing::trace!(dropped = self.recorded.len(), "combo window expired");
            self.recorded.clear();
        }
    }

    pub fn record(&mut self, mv: MoveId, gate: &ChargeGate) -> MatchResult {
        if !gate.is_ready() {
            tracing::trace!(?mv, charge = gate.charge(), "record ignored, gate not armed");
            return MatchResult::NoMatch;
        }

        self.recorded.push(mv);
        self.window_remaining = self.window;

        let Some((index, def)) = self.library.find_match(&self.recorded) else {
            tracing::debug!(sequence = ?self.recorded, "move recorded");
            return MatchResult::Partial {
                recorded: self.recorded.len(),
            };
        };

        tracing::debug!(index, title = %def.title, "combo matched");
        def.fire();
        let matched = ComboMatch {
            index,
            title: def.title.clone(),
            effect: def.effect,
        };
        self.recorded.clear();
        MatchResult::Matched(matched)
    }

    /// Clear the sequence and fire the finisher, ignoring charge entirely
    pub fn force_reset(&mut self) -> Result<ComboMatch, LibraryError> {
        self.recorded.clear();

        let def = self.library.finisher()?;
        def.fire();
        Ok(ComboMatch {
            index: 0,
            title: def.title.clone(),
            effect: def.effect,
        })
    }

    pub fn recorded(&self) -> &[MoveId] {
        &self.recorded
    }

    pub fn is_recording(&self) -> bool {
        !self.recorded.is_empty()
    }

    pub fn window_remaining(&self) -> f32 {
        self.window_remaining
    }

    pub fn library(&self) -> &Arc<ComboLibrary> {
        &self.library
    }
}
