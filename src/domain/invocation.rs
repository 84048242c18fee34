use crate::error::{Result, TokenizeError};
use uuid::Uuid;

/// Lifecycle of a single tokenize call.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum InvocationState {
    #[default]
    Pending,
    Dispatched,
    Succeeded,
    Failed,
    Reported,
}

impl InvocationState {
    pub fn can_transition_to(self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (Pending, Dispatched)
                | (Dispatched, Succeeded)
                | (Dispatched, Failed)
                | (Succeeded, Reported)
                | (Failed, Reported)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == InvocationState::Reported
    }
}

/// Tracks one invocation through its states. Transitions only move forward.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub id: Uuid,
    pub kind: &'static str,
    state: InvocationState,
}

impl Invocation {
    pub fn new(kind: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            state: InvocationState::Pending,
        }
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    pub fn advance(&mut self, next: InvocationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(TokenizeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(invocation = %self.id, kind = self.kind, from = ?self.state, to = ?next, "invocation transition");
        self.state = next;
        Ok(())
    }
}
