//! Registered combo definitions.
//!
//! Order matters: recognition scans front to back and the first exact match
//! wins. Index 0 is the finisher, fired directly by the jump/reset input.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::MoveId;

/// Opaque callback fired when a combo completes or is force-triggered
pub type CompletionAction = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LibraryError {
    #[error("no default combo configured")]
    NoDefaultCombo,
    #[error("combo #{index} ({title}) has invalid window {window}")]
    InvalidWindow {
        index: usize,
        title: String,
        window: f32,
    },
}

/// Built-in effect a combo can carry besides its callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboEffect {
    #[default]
    None,
    /// Launch the timed multi-hit special attack
    SpecialAttack,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub title: String,
    /// Seconds. For the finisher this is also the special attack duration.
    pub window: f32,
    pub sequence: Vec<MoveId>,
    #[serde(default)]
    pub effect: ComboEffect,
    #[serde(skip)]
    pub on_complete: Option<CompletionAction>,
}

impl ComboDefinition {
    pub fn new(title: impl Into<String>, window: f32, sequence: Vec<MoveId>) -> Self {
        Self {
            title: title.into(),
            window,
            sequence,
            effect: ComboEffect::None,
            on_complete: None,
        }
    }

    pub fn with_effect(mut self, effect: ComboEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn on_complete(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(action));
        self
    }

    /// Invoke the completion callback, if any
    pub fn fire(&self) {
        if let Some(action) = &self.on_complete {
            action();
        }
    }

    /// Exact equality: same length, same order, same moves
    pub fn matches(&self, recorded: &[MoveId]) -> bool {
        self.sequence.as_slice() == recorded
    }
}

impl fmt::Debug for ComboDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboDefinition")
            .field("title", &self.title)
            .field("window", &self.window)
            .field("sequence", &self.sequence)
            .field("effect", &self.effect)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Ordered, immutable set of combos. Shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ComboLibrary {
    definitions: Vec<ComboDefinition>,
}

impl ComboLibrary {
    /// Validate and freeze a library. Rejects an empty list so the finisher
    /// lookup can never fail for a library built this way.
    pub fn new(definitions: Vec<ComboDefinition>) -> Result<Self, LibraryError> {
        if definitions.is_empty() {
            return Err(LibraryError::NoDefaultCombo);
        }

        for (index, def) in definitions.iter().enumerate() {
            if !def.window.is_finite() || def.window < 0.0 {
                return Err(LibraryError::InvalidWindow {
                    index,
                    title: def.title.clone(),
                    window: def.window,
                });
            }
        }

        Ok(Self { definitions })
    }

    /// The index-0 combo
    pub fn finisher(&self) -> Result<&ComboDefinition, LibraryError> {
        self.definitions.first().ok_or(LibraryError::NoDefaultCombo)
    }

    /// First definition whose sequence equals `recorded`
    pub fn find_match(&self, recorded: &[MoveId]) -> Option<(usize, &ComboDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .find(|(_, def)| def.matches(recorded))
    }

    pub fn get(&self, index: usize) -> Option<&ComboDefinition> {
        self.definitions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComboDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Combos used when no config file is supplied
pub fn default_combos() -> Vec<ComboDefinition> {
    vec![
        ComboDefinition::new("Super Hit", 2.0, vec![MoveId::Punch, MoveId::Punch, MoveId::Kick])
            .with_effect(ComboEffect::SpecialAttack),
        ComboDefinition::new("One-Two", 0.9, vec![MoveId::Punch, MoveId::Kick]),
        ComboDefinition::new("Double Kick", 0.9, vec![MoveId::Kick, MoveId::Kick]),
    ]
}
