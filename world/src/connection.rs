//! Two-slot connection tracker gating networked matches.

use hex_tactics_core::{ConnectionState, PlayerId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlayerConnections {
    states: [ConnectionState; 2],
}

impl PlayerConnections {
    pub(crate) fn state(&self, player: PlayerId) -> ConnectionState {
        self.states[player.index()]
    }

    /// Moves the slot to `state`, returning `true` when it changed.
    pub(crate) fn set(&mut self, player: PlayerId, state: ConnectionState) -> bool {
        let slot = &mut self.states[player.index()];
        let changed = *slot != state;
        *slot = state;
        changed
    }

    pub(crate) fn ready_to_begin(&self) -> bool {
        self.states
            .iter()
            .all(|state| *state == ConnectionState::Connecting)
    }

    pub(crate) fn all_connected(&self) -> bool {
        self.states
            .iter()
            .all(|state| *state == ConnectionState::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_begins_only_when_both_players_are_connecting() {
        let mut connections = PlayerConnections::default();
        assert!(connections.set(PlayerId::One, ConnectionState::Connecting));
        assert!(!connections.ready_to_begin());

        assert!(connections.set(PlayerId::Two, ConnectionState::Connecting));
        assert!(connections.ready_to_begin());

        assert!(!connections.set(PlayerId::Two, ConnectionState::Connecting));
        assert!(connections.set(PlayerId::Two, ConnectionState::Disconnected));
        assert!(!connections.ready_to_begin());
        assert!(!connections.all_connected());
        assert_eq!(connections.state(PlayerId::One), ConnectionState::Connecting);
    }
}
