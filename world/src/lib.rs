#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Hex Tactics.

mod board;
mod connection;
mod heat_map;
mod unit;

use hex_tactics_core::{
    Command, ConnectionState, Event, GameOutcome, NetworkRole, PlayerId, RejectionReason,
    WELCOME_BANNER,
};
use hex_tactics_definitions::Definitions;

use crate::{board::Board, connection::PlayerConnections};

pub use heat_map::{HeatMap, MAX_COST, UNREACHABLE};

/// Represents the authoritative Hex Tactics game state.
#[derive(Debug)]
pub struct Game {
    banner: &'static str,
    definitions: Definitions,
    role: NetworkRole,
    connections: PlayerConnections,
    board: Option<Board>,
}

impl Game {
    /// Creates a game with no map loaded.
    #[must_use]
    pub fn new(definitions: Definitions, role: NetworkRole) -> Self {
        Self {
            banner: WELCOME_BANNER,
            definitions,
            role,
            connections: PlayerConnections::default(),
            board: None,
        }
    }

    fn board_mut(&mut self) -> Result<&mut Board, RejectionReason> {
        self.board.as_mut().ok_or(RejectionReason::NoMapLoaded)
    }

    /// Board for turn and unit actions; networked play stays blocked until
    /// both slots are connected.
    fn board_for_play(&mut self) -> Result<&mut Board, RejectionReason> {
        let awaiting = self.role.is_networked() && !self.connections.all_connected();
        let board = self.board_mut()?;
        board.ensure_running()?;
        if awaiting {
            return Err(RejectionReason::AwaitingPlayers);
        }
        Ok(board)
    }
}

/// Applies the provided command to the game, mutating state deterministically.
///
/// Refused commands leave the state untouched and report
/// [`Event::CommandRejected`].
pub fn apply(game: &mut Game, command: Command, out_events: &mut Vec<Event>) {
    let kind = command.kind();
    tracing::debug!(command = kind.wire_name(), "applying command");

    let result = match command {
        Command::LoadMap { name } => load_map(game, name, out_events),
        Command::ResetBoard => {
            let units = game.definitions.units();
            match game.board.as_mut() {
                Some(board) => {
                    board.reset(units);
                    out_events.push(Event::BoardReset);
                    Ok(())
                }
                None => Err(RejectionReason::NoMapLoaded),
            }
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            tick(game, dt.as_secs_f32(), out_events);
            Ok(())
        }
        Command::SetFocusedHex { coord } => game.board_mut().map(|board| {
            board.set_focus(coord, out_events);
        }),
        Command::SelectUnit { coord } => game
            .board_for_play()
            .and_then(|board| board.select(coord, out_events)),
        Command::Move { coord } => game
            .board_for_play()
            .and_then(|board| board.move_selected(coord, out_events)),
        Command::Stay => game.board_for_play().and_then(|board| board.stay(out_events)),
        Command::Attack { coord } => game
            .board_for_play()
            .and_then(|board| board.attack(coord, out_events)),
        Command::HoldFire => game
            .board_for_play()
            .and_then(|board| board.hold_fire(out_events)),
        Command::Cancel => game.board_for_play().and_then(|board| board.cancel(out_events)),
        Command::EndTurn => game
            .board_for_play()
            .and_then(|board| board.end_turn(out_events)),
        Command::CancelEndTurn => game
            .board_for_play()
            .and_then(|board| board.cancel_end_turn(out_events)),
        Command::StartTurn => game
            .board_for_play()
            .and_then(|board| board.start_turn(out_events)),
        Command::PlayerReady { player } => {
            set_connection(game, player, ConnectionState::Connecting, out_events);
            Ok(())
        }
        Command::PlayerQuit { player } => {
            set_connection(game, player, ConnectionState::Disconnected, out_events);
            if let Some(board) = game.board.as_mut() {
                board.end_game(GameOutcome::Abandoned { player }, out_events);
            }
            Ok(())
        }
    };

    if let Err(reason) = result {
        tracing::debug!(command = kind.wire_name(), ?reason, "command rejected");
        out_events.push(Event::CommandRejected {
            command: kind,
            reason,
        });
    }

    debug_assert!(
        query::occupancy_consistent(game),
        "tile occupants diverged from unit coordinates"
    );
}

fn load_map(game: &mut Game, name: String, out_events: &mut Vec<Event>) -> Result<(), RejectionReason> {
    let Some(layout) = game.definitions.maps().get(&name) else {
        return Err(RejectionReason::UnknownMap);
    };
    let board = Board::new(layout, game.definitions.tiles(), game.definitions.units());
    tracing::info!(
        map = %name,
        width = layout.width(),
        height = layout.height(),
        units = board.units.len(),
        "map loaded"
    );
    game.board = Some(board);
    out_events.push(Event::MapLoaded { name });
    Ok(())
}

fn tick(game: &mut Game, seconds: f32, out_events: &mut Vec<Event>) {
    if let Some(board) = game.board.as_mut() {
        board.advance(seconds, out_events);
    }

    if game.role.is_networked() && game.connections.ready_to_begin() {
        for player in PlayerId::ALL {
            set_connection(game, player, ConnectionState::Connected, out_events);
        }
        if let Some(board) = game.board.as_mut() {
            board.resume();
        }
        tracing::info!("both players connected");
        out_events.push(Event::MatchStarted);
    }

    if let Some(board) = game.board.as_mut() {
        board.check_victory(out_events);
    }
}

fn set_connection(
    game: &mut Game,
    player: PlayerId,
    state: ConnectionState,
    out_events: &mut Vec<Event>,
) {
    if game.connections.set(player, state) {
        tracing::info!(player = player.number(), ?state, "connection changed");
        out_events.push(Event::ConnectionChanged { player, state });
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use hex_tactics_core::{
        ConnectionState, HexCoord, NetworkRole, PlayerId, TurnSnapshot, UnitId, UnitSnapshot,
        UnitView,
    };
    use hex_tactics_definitions::{Definitions, MapLayout, UnitKind};

    use super::{Game, HeatMap};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(game: &Game) -> &'static str {
        game.banner
    }

    /// Provides read-only access to the loaded content catalogs.
    #[must_use]
    pub fn definitions(game: &Game) -> &Definitions {
        &game.definitions
    }

    /// Role this process plays in the match.
    #[must_use]
    pub fn network_role(game: &Game) -> NetworkRole {
        game.role
    }

    /// Player controlled by this process, if the match is networked.
    #[must_use]
    pub fn local_player(game: &Game) -> Option<PlayerId> {
        game.role.local_player()
    }

    /// Numeric local player id: `1` for hosts, `2` for peers, `0` offline.
    #[must_use]
    pub fn local_player_number(game: &Game) -> u8 {
        game.role.local_player_number()
    }

    /// Reports whether local input may act on the current turn.
    ///
    /// Offline play always owns the turn.
    #[must_use]
    pub fn is_your_turn(game: &Game) -> bool {
        match game.role.local_player() {
            None => true,
            Some(player) => game
                .board
                .as_ref()
                .is_some_and(|board| board.current_player == player),
        }
    }

    /// Connection state of the provided player slot.
    #[must_use]
    pub fn connection_state(game: &Game, player: PlayerId) -> ConnectionState {
        game.connections.state(player)
    }

    /// Layout of the loaded map, if any.
    #[must_use]
    pub fn map_layout(game: &Game) -> Option<&MapLayout> {
        game.board.as_ref().map(|board| &board.layout)
    }

    /// Reports whether the coordinate lies inside the grid and the world bounds.
    #[must_use]
    pub fn is_in_bounds(game: &Game, coord: HexCoord) -> bool {
        game.board
            .as_ref()
            .is_some_and(|board| board.is_in_bounds(coord))
    }

    /// Reports whether the coordinate is in bounds and its tile is passable.
    #[must_use]
    pub fn is_playable(game: &Game, coord: HexCoord) -> bool {
        game.board
            .as_ref()
            .is_some_and(|board| board.is_playable(coord))
    }

    /// Captures a read-only view of the units on the board.
    #[must_use]
    pub fn unit_view(game: &Game) -> UnitView {
        let snapshots = game
            .board
            .as_ref()
            .map(|board| board.units.iter().map(|unit| unit.snapshot()).collect())
            .unwrap_or_default();
        UnitView::from_snapshots(snapshots)
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(game: &Game, id: UnitId) -> Option<UnitSnapshot> {
        game.board
            .as_ref()
            .and_then(|board| board.unit(id))
            .map(|unit| unit.snapshot())
    }

    /// Catalog entry describing the unit's kind.
    #[must_use]
    pub fn unit_kind(game: &Game, id: UnitId) -> Option<&UnitKind> {
        let kind = game.board.as_ref()?.unit(id)?.kind;
        game.definitions.units().get(kind)
    }

    /// Snapshot of the currently selected unit.
    #[must_use]
    pub fn selected_unit(game: &Game) -> Option<UnitSnapshot> {
        game.board
            .as_ref()
            .and_then(|board| board.selected_unit())
            .map(|unit| unit.snapshot())
    }

    /// Live unit standing on the coordinate, if any.
    #[must_use]
    pub fn tile_occupant(game: &Game, coord: HexCoord) -> Option<UnitId> {
        game.board
            .as_ref()
            .and_then(|board| board.occupant(coord))
    }

    /// Turn and selection state of the loaded board.
    #[must_use]
    pub fn turn(game: &Game) -> Option<TurnSnapshot> {
        game.board.as_ref().map(|board| board.turn_snapshot())
    }

    /// Distance field computed for the current selection.
    #[must_use]
    pub fn heat_map(game: &Game) -> Option<&HeatMap> {
        game.board.as_ref().map(|board| &board.heat)
    }

    /// Heat stored for the coordinate in the current distance field.
    #[must_use]
    pub fn heat(game: &Game, coord: HexCoord) -> Option<f32> {
        heat_map(game).and_then(|heat| heat.value(coord))
    }

    /// Reports whether the selected, unmoved unit may move to the coordinate.
    #[must_use]
    pub fn in_movement_range(game: &Game, coord: HexCoord) -> bool {
        game.board
            .as_ref()
            .is_some_and(|board| board.in_movement_range(coord))
    }

    /// Reports whether the selected unit may fire on the coordinate right now.
    #[must_use]
    pub fn can_target(game: &Game, coord: HexCoord) -> bool {
        game.board
            .as_ref()
            .is_some_and(|board| board.can_target(coord))
    }

    /// Path the selected unit would follow to reach the coordinate.
    ///
    /// Empty when nothing is selected or the coordinate is unreachable.
    #[must_use]
    pub fn movement_path(game: &Game, coord: HexCoord) -> Vec<HexCoord> {
        game.board
            .as_ref()
            .and_then(|board| {
                board
                    .selected_unit()
                    .map(|unit| board.path_to(unit.coord, coord))
            })
            .unwrap_or_default()
    }

    /// Reports whether every live unit occupies exactly its own tile.
    #[must_use]
    pub fn occupancy_consistent(game: &Game) -> bool {
        game.board
            .as_ref()
            .map_or(true, |board| board.occupancy_consistent())
    }
}
