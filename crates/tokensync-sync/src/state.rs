//! Sync run states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Idle,
    Extracting,
    Validating,
    Fetching,
    Diffing,
    Publishing,
    Done,
    Failed,
}

impl SyncState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` may follow this state.
    ///
    /// `Validating -> Done` ends a local save or check, `Diffing -> Done`
    /// ends a sync with nothing to publish.
    pub fn can_transition_to(&self, next: SyncState) -> bool {
        use SyncState::*;
        match (self, next) {
            (Idle, Extracting)
            | (Extracting, Validating)
            | (Validating, Fetching)
            | (Validating, Done)
            | (Fetching, Diffing)
            | (Diffing, Publishing)
            | (Diffing, Done)
            | (Publishing, Done)
            | (Done, Idle)
            | (Failed, Idle) => true,
            (current, Failed) => !matches!(current, Idle | Done | Failed),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Diffing => "diffing",
            Self::Publishing => "publishing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SyncState::*;

    #[test]
    fn test_happy_path_is_allowed() {
        let path = [Idle, Extracting, Validating, Fetching, Diffing, Publishing, Done, Idle];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failed_reachable_from_active_states_only() {
        for state in [Extracting, Validating, Fetching, Diffing, Publishing] {
            assert!(state.can_transition_to(Failed), "{state}");
        }
        for state in [Idle, Done, Failed] {
            assert!(!state.can_transition_to(Failed), "{state}");
        }
    }

    #[test]
    fn test_no_skipping_stages() {
        assert!(!Idle.can_transition_to(Fetching));
        assert!(!Extracting.can_transition_to(Publishing));
        assert!(!Fetching.can_transition_to(Done));
        assert!(!Done.can_transition_to(Extracting));
    }

    #[test]
    fn test_terminal() {
        assert!(Done.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Publishing.is_terminal());
    }
}
