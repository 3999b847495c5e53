//! Room lifecycle phases.

use std::fmt;

/// Where a room is in its lifecycle.
///
/// The phase is derived from the room's players and game-over flag
/// rather than stored, so it can never disagree with them:
///
/// ```text
/// WaitingForOpponent → InProgress → Finished
///         ↑                 │
///         └── opponent left ┘
/// ```
///
/// - **WaitingForOpponent**: one seated player, game not over. Moves are
///   still accepted; nothing checks that an opponent is present.
/// - **InProgress**: two seated players, game not over.
/// - **Finished**: a win or draw was recorded. The board is frozen, but
///   the room lives on until its players leave or disconnect.
///
/// There is no "empty" phase: a room whose last player leaves is removed
/// from the registry immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    WaitingForOpponent,
    InProgress,
    Finished,
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_phase_display() {
        assert_eq!(
            RoomPhase::WaitingForOpponent.to_string(),
            "WaitingForOpponent"
        );
        assert_eq!(RoomPhase::Finished.to_string(), "Finished");
    }
}
