//! Session state machine

use std::fmt;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Confidence cleared the approval threshold with no pending revision
    Approved,

    /// The iteration cap was hit first
    MaxIterationsReached,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Approved => f.write_str("approved"),
            Termination::MaxIterationsReached => f.write_str("max iterations reached"),
        }
    }
}

/// Controller state
///
/// ```text
/// Init → Retrieving → Evaluating → Scoring → Retrieving
///                                          → Stopped(Approved)
///                                          → Stopped(MaxIterationsReached)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Session accepted, nothing run yet
    Init,
    /// Asking the retriever for candidates
    Retrieving,
    /// Fanning out evaluator calls
    Evaluating,
    /// Aggregating, normalizing and reviewing
    Scoring,
    /// Terminal
    Stopped(Termination),
}

impl ControllerState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ControllerState) -> bool {
        use ControllerState::*;
        matches!(
            (self, next),
            (Init, Retrieving)
                | (Retrieving, Evaluating)
                | (Evaluating, Scoring)
                | (Scoring, Retrieving)
                | (Scoring, Stopped(_))
        )
    }

    /// Whether the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Stopped(_))
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Init => f.write_str("init"),
            ControllerState::Retrieving => f.write_str("retrieving"),
            ControllerState::Evaluating => f.write_str("evaluating"),
            ControllerState::Scoring => f.write_str("scoring"),
            ControllerState::Stopped(t) => write!(f, "stopped ({})", t),
        }
    }
}
