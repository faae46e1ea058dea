#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating player intent into board commands.

use hex_tactics_core::{Command, Event, GameOutcome, HexCoord, PlayerId, UnitSnapshot};
use hex_tactics_world::{query, Game};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Hex currently under the cursor, if it resolves to a grid coordinate.
    pub focused: Option<HexCoord>,
    /// Indicates whether the primary button was clicked on this frame.
    pub primary: bool,
    /// Indicates whether the secondary button was clicked on this frame.
    pub secondary: bool,
    /// Indicates whether the end-turn key was pressed on this frame.
    pub end_turn: bool,
    /// Indicates whether the confirm key was pressed on this frame.
    pub confirm: bool,
    /// Indicates whether the decline key was pressed on this frame.
    pub decline: bool,
}

impl PlayerInput {
    /// Creates an input that only reports the hovered hex.
    #[must_use]
    pub const fn hovering(coord: HexCoord) -> Self {
        Self {
            focused: Some(coord),
            primary: false,
            secondary: false,
            end_turn: false,
            confirm: false,
            decline: false,
        }
    }

    /// Creates an input that clicks the primary button on the provided hex.
    #[must_use]
    pub const fn clicking(coord: HexCoord) -> Self {
        Self {
            primary: true,
            ..Self::hovering(coord)
        }
    }
}

/// Modal dialog blocking regular board input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    /// Announces whose turn just started.
    TurnBanner {
        /// Player that now owns the turn.
        player: PlayerId,
    },
    /// Asks the local player to confirm ending their turn.
    ConfirmEndTurn,
    /// Reports the final outcome of the match.
    GameOver {
        /// Outcome that ended the match.
        outcome: GameOutcome,
    },
}

/// Controller system that turns input plus world state into commands.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    modal: Option<Modal>,
}

impl Controller {
    /// Creates a controller with no dialog open.
    #[must_use]
    pub const fn new() -> Self {
        Self { modal: None }
    }

    /// Dialog currently capturing input, if any.
    #[must_use]
    pub const fn modal(&self) -> Option<Modal> {
        self.modal
    }

    /// Consumes world events and adapter input to emit commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: PlayerInput,
        game: &Game,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            self.observe(event, game);
        }

        if let Some(modal) = self.modal {
            self.answer_modal(modal, input, game, out);
            return;
        }

        let Some(turn) = query::turn(game) else {
            return;
        };
        if !query::is_your_turn(game) {
            return;
        }

        if let Some(coord) = input.focused {
            if coord != turn.focused {
                out.push(Command::SetFocusedHex { coord });
            }
        }
        if turn.game_ended || turn.pending_end_turn {
            return;
        }

        let selected = query::selected_unit(game);
        if input.end_turn && selected.is_none() {
            out.push(Command::EndTurn);
            return;
        }

        if let Some(unit) = selected.as_ref() {
            if unit.animating || !unit.rotation_settled {
                return;
            }
            if input.secondary {
                out.push(Command::Cancel);
                return;
            }
        }

        if !input.primary {
            return;
        }
        let Some(coord) = input.focused.filter(|coord| query::is_playable(game, *coord)) else {
            return;
        };
        if let Some(command) = primary_action(game, turn.current_player, selected, coord) {
            out.push(command);
        }
    }

    fn observe(&mut self, event: &Event, game: &Game) {
        match event {
            Event::TurnStarted { player } => {
                self.modal = Some(Modal::TurnBanner { player: *player });
            }
            Event::EndTurnRequested { player } => {
                let local = query::local_player(game).map_or(true, |local| local == *player);
                if local {
                    self.modal = Some(Modal::ConfirmEndTurn);
                }
            }
            Event::EndTurnDeclined { .. } => {
                if self.modal == Some(Modal::ConfirmEndTurn) {
                    self.modal = None;
                }
            }
            Event::GameEnded { outcome } => {
                self.modal = Some(Modal::GameOver { outcome: *outcome });
            }
            Event::MapLoaded { .. } | Event::BoardReset => self.modal = None,
            _ => {}
        }
    }

    fn answer_modal(
        &mut self,
        modal: Modal,
        input: PlayerInput,
        game: &Game,
        out: &mut Vec<Command>,
    ) {
        let accept = input.confirm || input.primary;
        let refuse = input.decline || input.secondary;
        match modal {
            Modal::TurnBanner { .. } => {
                if accept {
                    self.modal = None;
                }
            }
            Modal::ConfirmEndTurn => {
                if accept {
                    out.push(Command::StartTurn);
                    self.modal = None;
                } else if refuse {
                    out.push(Command::CancelEndTurn);
                    self.modal = None;
                }
            }
            Modal::GameOver { .. } => {
                if !(accept || input.decline) {
                    return;
                }
                let player = query::local_player(game)
                    .or_else(|| query::turn(game).map(|turn| turn.current_player))
                    .unwrap_or(PlayerId::One);
                tracing::debug!(player = player.number(), "leaving finished match");
                out.push(Command::PlayerQuit { player });
                if accept {
                    out.push(Command::ResetBoard);
                }
                self.modal = None;
            }
        }
    }
}

/// Command a primary click on `coord` stands for, if any.
fn primary_action(
    game: &Game,
    current_player: PlayerId,
    selected: Option<UnitSnapshot>,
    coord: HexCoord,
) -> Option<Command> {
    let occupant = query::tile_occupant(game, coord).and_then(|id| query::unit(game, id));
    let Some(unit) = selected else {
        return occupant
            .filter(|unit| unit.owner == current_player && !unit.done_for_turn)
            .map(|_| Command::SelectUnit { coord });
    };

    if !unit.moved {
        if coord == unit.coord {
            return Some(Command::Stay);
        }
        return (occupant.is_none() && query::in_movement_range(game, coord))
            .then_some(Command::Move { coord });
    }

    if coord == unit.coord {
        return Some(Command::HoldFire);
    }
    query::can_target(game, coord).then_some(Command::Attack { coord })
}
