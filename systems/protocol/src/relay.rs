//! Relay funnelling local, console and remote commands through the world.

use std::collections::VecDeque;

use hex_tactics_core::{Command, Event};
use hex_tactics_world::{self as world, Game};

use crate::codec::{self, ProtocolError};

/// Source a command entered the relay from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Produced by local input; replicated to the peer once accepted.
    Local,
    /// Received from the peer.
    Remote,
    /// Typed into the debug console; applied locally only.
    Console,
}

/// Single serialized application point for local, console and remote commands.
#[derive(Debug, Default)]
pub struct Relay {
    inbound: VecDeque<String>,
    outbound: Vec<String>,
}

impl Relay {
    /// Creates a relay with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line delivered by the peer until the next [`Relay::pump`].
    pub fn receive(&mut self, line: impl Into<String>) {
        self.inbound.push_back(line.into());
    }

    /// Number of remote lines waiting to be applied.
    #[must_use]
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    /// Applies a command and replicates it when it was accepted locally.
    ///
    /// Returns whether the world accepted the command.
    pub fn submit(
        &mut self,
        game: &mut Game,
        origin: Origin,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let replicate = origin == Origin::Local && command.is_replicated();
        let line = replicate.then(|| codec::encode(&command));

        let start = out_events.len();
        world::apply(game, command, out_events);
        let accepted = !out_events[start..]
            .iter()
            .any(|event| matches!(event, Event::CommandRejected { .. }));

        if let Some(line) = line.filter(|_| accepted) {
            tracing::debug!(%line, "replicating command");
            self.outbound.push(line);
        }
        accepted
    }

    /// Parses and applies a single protocol line.
    pub fn submit_line(
        &mut self,
        game: &mut Game,
        origin: Origin,
        line: &str,
        out_events: &mut Vec<Event>,
    ) -> Result<bool, ProtocolError> {
        match codec::parse(line) {
            Ok(command) => Ok(self.submit(game, origin, command, out_events)),
            Err(error) => {
                if origin == Origin::Remote {
                    tracing::warn!(%line, %error, "discarding malformed remote command");
                }
                Err(error)
            }
        }
    }

    /// Applies every queued remote line in delivery order.
    ///
    /// Returns the number of lines that parsed.
    pub fn pump(&mut self, game: &mut Game, out_events: &mut Vec<Event>) -> usize {
        let mut parsed = 0;
        while let Some(line) = self.inbound.pop_front() {
            if self
                .submit_line(game, Origin::Remote, &line, out_events)
                .is_ok()
            {
                parsed += 1;
            }
        }
        parsed
    }

    /// Drains the lines that must be sent to the peer.
    pub fn take_outbound(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbound)
    }
}
