/// Run phase definitions for the scrape state machine
///
/// A run moves Idle → Running → (Stopping) → Idle. Only one run is ever
/// active, so the phase doubles as the "is a run in progress" flag.
use serde::Serialize;
use std::fmt;

/// Represents the current phase of the scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run in progress; a new run may start
    #[default]
    Idle,

    /// The run loop is working through the site list
    Running,

    /// Stop was requested; the run loop exits at its next checkpoint
    Stopping,
}

impl RunPhase {
    /// Returns true while a run loop is alive (running or winding down)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Checks whether moving from this phase to `next` is legal
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Stopping)
                | (Self::Running, Self::Idle)
                | (Self::Stopping, Self::Idle)
        )
    }

    /// Compact representation for atomic storage
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Stopping => 2,
        }
    }

    /// Inverse of [`RunPhase::as_u8`]; unknown values read as Idle
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }

    /// Returns a short lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RunPhase::default(), RunPhase::Idle);
        assert!(!RunPhase::Idle.is_active());
        assert!(RunPhase::Running.is_active());
        assert!(RunPhase::Stopping.is_active());
    }

    #[test]
    fn test_legal_transitions() {
        assert!(RunPhase::Idle.can_transition_to(RunPhase::Running));
        assert!(RunPhase::Running.can_transition_to(RunPhase::Stopping));
        assert!(RunPhase::Running.can_transition_to(RunPhase::Idle));
        assert!(RunPhase::Stopping.can_transition_to(RunPhase::Idle));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Stopping));
        assert!(!RunPhase::Idle.can_transition_to(RunPhase::Idle));
        assert!(!RunPhase::Stopping.can_transition_to(RunPhase::Running));
        assert!(!RunPhase::Running.can_transition_to(RunPhase::Running));
    }

    #[test]
    fn test_u8_roundtrip() {
        for phase in [RunPhase::Idle, RunPhase::Running, RunPhase::Stopping] {
            assert_eq!(RunPhase::from_u8(phase.as_u8()), phase);
        }
        assert_eq!(RunPhase::from_u8(42), RunPhase::Idle);
    }

    #[test]
    fn test_display() {
        assert_eq!(RunPhase::Stopping.to_string(), "stopping");
    }
}
