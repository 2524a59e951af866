use std::collections::HashMap;

use kopi_types::ClassId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitState {
    #[default]
    Uninitialized,
    InProgress,
    Initialized,
}

/// Per-class static initialization state.
///
/// A class is initialized at most once: [`InitTracker::begin`] returns `true` only for the first
/// trigger. A trigger that arrives while the class is still in progress (a circular or
/// self-referential trigger) is a no-op; the caller then observes whatever values the static
/// fields hold at that point, zero values included.
#[derive(Clone, Debug, Default)]
pub struct InitTracker {
    states: HashMap<ClassId, InitState>,
    started: Vec<ClassId>,
}

impl InitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, class: ClassId) -> InitState {
        self.states.get(&class).copied().unwrap_or_default()
    }

    /// Record a trigger; `true` means the caller must run the class's initialization now.
    pub fn begin(&mut self, class: ClassId) -> bool {
        if self.state(class) != InitState::Uninitialized {
            return false;
        }
        self.states.insert(class, InitState::InProgress);
        self.started.push(class);
        true
    }

    pub fn finish(&mut self, class: ClassId) {
        self.states.insert(class, InitState::Initialized);
    }

    /// Classes in the order their initialization started.
    #[must_use]
    pub fn started(&self) -> &[ClassId] {
        &self.started
    }
}
