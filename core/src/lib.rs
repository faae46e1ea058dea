#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hex Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hex Tactics.";

/// Radius of a single hex tile measured in world units.
pub const TILE_RADIUS: f32 = 0.5;

/// Horizontal distance between adjacent hex columns in world units.
const COLUMN_SPACING: f32 = 0.866;

/// Axial offsets of the six hex neighbours in their canonical enumeration order.
///
/// Path reconstruction breaks ties by this order, so it must never change.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(0, 1), (0, -1), (1, 0), (-1, 0), (1, -1), (-1, 1)];

/// Axial coordinate of a flat-top hex cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    column: i32,
    row: i32,
}

impl HexCoord {
    /// Creates a new hex coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate displaced by the provided axial offset.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Iterates over the six neighbours in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self) -> impl Iterator<Item = HexCoord> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(columns, rows)| self.offset(columns, rows))
    }

    /// Number of hex steps separating two coordinates on an unobstructed grid.
    #[must_use]
    pub fn hex_distance(self, other: HexCoord) -> u32 {
        let columns = self.column - other.column;
        let rows = self.row - other.row;
        (columns.unsigned_abs() + rows.unsigned_abs() + (columns + rows).unsigned_abs()) / 2
    }

    /// Projects the cell centre into world space.
    ///
    /// Columns are spaced `0.866` apart and every column is shifted half a
    /// tile upward relative to its left neighbour.
    #[must_use]
    pub fn world_position(self) -> Vec2 {
        let column = self.column as f32;
        Vec2::new(column * COLUMN_SPACING, 0.5 * column + self.row as f32)
    }
}

/// One of the two sides taking part in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// The first player, who always opens the match.
    One,
    /// The second player.
    Two,
}

impl PlayerId {
    /// Both players in turn order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Resolves a player from its protocol number (`1` or `2`).
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Protocol number of the player.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// The other side of the match.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based slot index used by per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Role this process plays in a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkRole {
    /// Local hot-seat play where both sides share one process.
    #[default]
    Offline,
    /// Hosting a networked match as player one.
    Host,
    /// Joined a networked match as player two.
    Peer,
}

impl NetworkRole {
    /// Player controlled by this process, if the role is networked.
    #[must_use]
    pub const fn local_player(self) -> Option<PlayerId> {
        match self {
            Self::Offline => None,
            Self::Host => Some(PlayerId::One),
            Self::Peer => Some(PlayerId::Two),
        }
    }

    /// Numeric local player id: `1` for hosts, `2` for peers, `0` offline.
    #[must_use]
    pub const fn local_player_number(self) -> u8 {
        match self.local_player() {
            Some(player) => player.number(),
            None => 0,
        }
    }

    /// Reports whether the role takes part in a networked match.
    #[must_use]
    pub const fn is_networked(self) -> bool {
        !matches!(self, Self::Offline)
    }
}

/// Connection lifecycle of a single player slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// The slot is empty or its player left.
    #[default]
    Disconnected,
    /// The player announced readiness and waits for the opponent.
    Connecting,
    /// Both players are present and the match is running.
    Connected,
}

/// Stable index of a unit within the loaded board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a unit kind within the unit catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKindId(u16);

impl UnitKindId {
    /// Creates a new unit kind identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the catalog index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Index of a tile kind within the tile catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKindId(u16);

impl TileKindId {
    /// Creates a new tile kind identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the catalog index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the board with a fresh session of the named map layout.
    LoadMap {
        /// Name of the layout to load.
        name: String,
    },
    /// Rebuilds every unit from the loaded layout and hands the turn to player one.
    ResetBoard,
    /// Advances animations, session gating and the victory check.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records the hex currently hovered by the active player.
    SetFocusedHex {
        /// Focused coordinate.
        coord: HexCoord,
    },
    /// Selects the unit standing on the provided hex.
    SelectUnit {
        /// Coordinate of the unit to select.
        coord: HexCoord,
    },
    /// Moves the selected unit to the provided hex.
    Move {
        /// Destination of the move.
        coord: HexCoord,
    },
    /// Ends the selected unit's movement without relocating it.
    Stay,
    /// Fires the selected unit at the unit standing on the provided hex.
    Attack {
        /// Coordinate of the targeted unit.
        coord: HexCoord,
    },
    /// Finishes the selected unit's turn without firing.
    HoldFire,
    /// Releases the selection, reverting an uncommitted move.
    Cancel,
    /// Requests the end of the current player's turn.
    EndTurn,
    /// Withdraws a pending end-of-turn request.
    CancelEndTurn,
    /// Hands the turn to the other player.
    StartTurn,
    /// Announces that a player is ready to begin a networked match.
    PlayerReady {
        /// Player announcing readiness.
        player: PlayerId,
    },
    /// Announces that a player left the match.
    PlayerQuit {
        /// Player leaving the match.
        player: PlayerId,
    },
}

impl Command {
    /// Payload-free discriminant of the command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::LoadMap { .. } => CommandKind::LoadMap,
            Self::ResetBoard => CommandKind::ResetBoard,
            Self::Tick { .. } => CommandKind::Tick,
            Self::SetFocusedHex { .. } => CommandKind::SetFocusedHex,
            Self::SelectUnit { .. } => CommandKind::SelectUnit,
            Self::Move { .. } => CommandKind::Move,
            Self::Stay => CommandKind::Stay,
            Self::Attack { .. } => CommandKind::Attack,
            Self::HoldFire => CommandKind::HoldFire,
            Self::Cancel => CommandKind::Cancel,
            Self::EndTurn => CommandKind::EndTurn,
            Self::CancelEndTurn => CommandKind::CancelEndTurn,
            Self::StartTurn => CommandKind::StartTurn,
            Self::PlayerReady { .. } => CommandKind::PlayerReady,
            Self::PlayerQuit { .. } => CommandKind::PlayerQuit,
        }
    }

    /// Reports whether a locally issued command must be mirrored to the peer.
    #[must_use]
    pub const fn is_replicated(&self) -> bool {
        self.kind().is_replicated()
    }
}

/// Payload-free discriminant of [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// See [`Command::LoadMap`].
    LoadMap,
    /// See [`Command::ResetBoard`].
    ResetBoard,
    /// See [`Command::Tick`].
    Tick,
    /// See [`Command::SetFocusedHex`].
    SetFocusedHex,
    /// See [`Command::SelectUnit`].
    SelectUnit,
    /// See [`Command::Move`].
    Move,
    /// See [`Command::Stay`].
    Stay,
    /// See [`Command::Attack`].
    Attack,
    /// See [`Command::HoldFire`].
    HoldFire,
    /// See [`Command::Cancel`].
    Cancel,
    /// See [`Command::EndTurn`].
    EndTurn,
    /// See [`Command::CancelEndTurn`].
    CancelEndTurn,
    /// See [`Command::StartTurn`].
    StartTurn,
    /// See [`Command::PlayerReady`].
    PlayerReady,
    /// See [`Command::PlayerQuit`].
    PlayerQuit,
}

impl CommandKind {
    /// Every command kind in declaration order.
    pub const ALL: [CommandKind; 15] = [
        CommandKind::LoadMap,
        CommandKind::ResetBoard,
        CommandKind::Tick,
        CommandKind::SetFocusedHex,
        CommandKind::SelectUnit,
        CommandKind::Move,
        CommandKind::Stay,
        CommandKind::Attack,
        CommandKind::HoldFire,
        CommandKind::Cancel,
        CommandKind::EndTurn,
        CommandKind::CancelEndTurn,
        CommandKind::StartTurn,
        CommandKind::PlayerReady,
        CommandKind::PlayerQuit,
    ];

    /// Canonical name used by the text protocol.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::LoadMap => "LoadMap",
            Self::ResetBoard => "ResetBoard",
            Self::Tick => "Tick",
            Self::SetFocusedHex => "SetFocusedHex",
            Self::SelectUnit => "SelectFocusedUnit",
            Self::Move => "Move",
            Self::Stay => "Stay",
            Self::Attack => "Attack",
            Self::HoldFire => "HoldFire",
            Self::Cancel => "Cancel",
            Self::EndTurn => "EndTurn",
            Self::CancelEndTurn => "CancelEndTurn",
            Self::StartTurn => "StartTurn",
            Self::PlayerReady => "PlayerReady",
            Self::PlayerQuit => "PlayerQuit",
        }
    }

    /// Reports whether commands of this kind are mirrored to the peer.
    ///
    /// Map loading, board resets and ticks stay local to each process.
    #[must_use]
    pub const fn is_replicated(self) -> bool {
        !matches!(self, Self::LoadMap | Self::ResetBoard | Self::Tick)
    }
}

/// Reasons a command may be rejected by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// No map is loaded, so board commands have nothing to act on.
    NoMapLoaded,
    /// The requested map layout does not exist.
    UnknownMap,
    /// The match has ended and the board is frozen.
    GameOver,
    /// A networked match is waiting for both players to connect.
    AwaitingPlayers,
    /// An end-of-turn request awaits confirmation.
    EndTurnPending,
    /// No end-of-turn request is pending.
    NoPendingEndTurn,
    /// Another unit is already selected.
    SelectionActive,
    /// No unit is selected.
    NoSelection,
    /// The coordinate lies outside the playable region.
    OutOfBounds,
    /// The tile holds no live unit.
    NoUnit,
    /// The unit belongs to the player who is not taking the current turn.
    NotCurrentPlayer,
    /// The unit already acted this turn.
    UnitDone,
    /// The selected unit already moved this turn.
    AlreadyMoved,
    /// The selected unit must move or stay before it can act.
    NotMoved,
    /// The destination lies outside the unit's movement range.
    OutOfMovementRange,
    /// The destination tile is held by another unit.
    TileOccupied,
    /// The selected unit cannot fire from its current situation.
    CannotFire,
    /// The target belongs to the attacking side.
    FriendlyTarget,
    /// The target lies outside the unit's attack range.
    OutOfAttackRange,
}

/// How a match concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The named player eliminated every opposing unit.
    Victory {
        /// Winning player.
        winner: PlayerId,
    },
    /// Both sides lost their last unit in the same tick.
    Draw,
    /// The named player left before the match was decided.
    Abandoned {
        /// Player who quit.
        player: PlayerId,
    },
}

/// Events broadcast by the game after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a fresh board was built from a layout.
    MapLoaded {
        /// Name of the loaded layout.
        name: String,
    },
    /// Confirms that all units were rebuilt from the layout.
    BoardReset,
    /// Announces the hex hovered by the active player.
    FocusChanged {
        /// Focused coordinate.
        coord: HexCoord,
    },
    /// Confirms that a unit was selected.
    UnitSelected {
        /// Selected unit.
        unit: UnitId,
        /// Coordinate of the selected unit.
        coord: HexCoord,
    },
    /// Confirms that the selected unit moved, or stayed when `from == to`.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Coordinate held before the move.
        from: HexCoord,
        /// Coordinate held after the move.
        to: HexCoord,
        /// Hexes traversed from `from` to `to`, both inclusive.
        path: Vec<HexCoord>,
    },
    /// Reports that a unit finished its move animation.
    UnitArrived {
        /// Unit that arrived.
        unit: UnitId,
        /// Coordinate reached.
        coord: HexCoord,
    },
    /// Confirms that a unit fired on another.
    UnitAttacked {
        /// Firing unit.
        attacker: UnitId,
        /// Targeted unit.
        target: UnitId,
    },
    /// Reports damage applied to a unit that survived the hit.
    UnitDamaged {
        /// Damaged unit.
        unit: UnitId,
        /// Health removed by the hit.
        damage: i32,
        /// Health remaining after the hit.
        health: i32,
        /// Unit responsible for the hit, when known.
        attacker: Option<UnitId>,
    },
    /// Reports that a hit dropped a unit's health to zero or below.
    UnitDestroyed {
        /// Destroyed unit.
        unit: UnitId,
        /// Tile the unit occupied.
        coord: HexCoord,
        /// Health removed by the final hit.
        damage: i32,
        /// Unit responsible for the final hit, when known.
        attacker: Option<UnitId>,
    },
    /// Confirms that the selected unit finished its turn without firing.
    FireHeld {
        /// Unit that held fire.
        unit: UnitId,
    },
    /// Confirms that a selection was released.
    SelectionCancelled {
        /// Unit that was selected.
        unit: UnitId,
        /// Coordinate the unit holds after any move was reverted.
        coord: HexCoord,
    },
    /// Announces that the current player asked to end the turn.
    EndTurnRequested {
        /// Player whose turn is ending.
        player: PlayerId,
    },
    /// Announces that a pending end-of-turn request was withdrawn.
    EndTurnDeclined {
        /// Player who keeps the turn.
        player: PlayerId,
    },
    /// Announces that a new turn began.
    TurnStarted {
        /// Player taking the turn.
        player: PlayerId,
    },
    /// Reports a player's connection state transition.
    ConnectionChanged {
        /// Player whose slot changed.
        player: PlayerId,
        /// New connection state.
        state: ConnectionState,
    },
    /// Announces that both players connected and a networked match began.
    MatchStarted,
    /// Announces the end of the match.
    GameEnded {
        /// How the match concluded.
        outcome: GameOutcome,
    },
    /// Reports that a command was refused without mutating state.
    CommandRejected {
        /// Kind of the refused command.
        command: CommandKind,
        /// Specific reason the command failed.
        reason: RejectionReason,
    },
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Identifier of the unit.
    pub id: UnitId,
    /// Catalog kind of the unit.
    pub kind: UnitKindId,
    /// Player commanding the unit.
    pub owner: PlayerId,
    /// Hex currently held by the unit.
    pub coord: HexCoord,
    /// Hex held before the unit's latest move.
    pub previous_coord: HexCoord,
    /// Remaining health.
    pub health: i32,
    /// Indicates whether the unit is the current selection.
    pub selected: bool,
    /// Indicates whether the unit moved or stayed this turn.
    pub moved: bool,
    /// Indicates whether the unit finished acting this turn.
    pub done_for_turn: bool,
    /// Indicates whether the unit was destroyed.
    pub dead: bool,
    /// Indicates whether the unit satisfies its firing eligibility rule.
    pub can_attack: bool,
    /// Indicates whether a move animation is playing.
    pub animating: bool,
    /// Indicates whether the unit finished turning toward the focused hex.
    pub rotation_settled: bool,
    /// Interpolated world-space position.
    pub world_position: Vec2,
    /// Facing in degrees about the vertical axis.
    pub yaw_degrees: f32,
}

/// Read-only snapshot describing all units on the board.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided unit, if present.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&unit, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live units commanded by the provided player.
    #[must_use]
    pub fn live_count(&self, player: PlayerId) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.owner == player && !snapshot.dead)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of the turn and selection state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnSnapshot {
    /// Player taking the current turn.
    pub current_player: PlayerId,
    /// Indicates whether an end-of-turn request awaits confirmation.
    pub pending_end_turn: bool,
    /// Indicates whether the match has ended.
    pub game_ended: bool,
    /// Outcome recorded when the match ended.
    pub outcome: Option<GameOutcome>,
    /// Currently selected unit, if any.
    pub selected: Option<UnitId>,
    /// Hex most recently focused by the active player.
    pub focused: HexCoord,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Command, CommandKind, HexCoord, NetworkRole, PlayerId};

    #[test]
    fn neighbors_follow_canonical_order() {
        let origin = HexCoord::new(2, 2);
        let neighbors: Vec<_> = origin.neighbors().collect();
        assert_eq!(
            neighbors,
            vec![
                HexCoord::new(2, 3),
                HexCoord::new(2, 1),
                HexCoord::new(3, 2),
                HexCoord::new(1, 2),
                HexCoord::new(3, 1),
                HexCoord::new(1, 3),
            ]
        );
        for neighbor in neighbors {
            assert_eq!(origin.hex_distance(neighbor), 1);
        }
    }

    #[test]
    fn hex_distance_matches_axial_metric() {
        let origin = HexCoord::new(0, 0);
        assert_eq!(origin.hex_distance(HexCoord::new(2, 0)), 2);
        assert_eq!(origin.hex_distance(HexCoord::new(1, 1)), 2);
        assert_eq!(origin.hex_distance(HexCoord::new(2, -2)), 2);
        assert_eq!(origin.hex_distance(HexCoord::new(3, -1)), 3);
        assert_eq!(HexCoord::new(3, -1).hex_distance(origin), 3);
    }

    #[test]
    fn world_position_uses_flat_top_projection() {
        let position = HexCoord::new(2, 1).world_position();
        assert!((position.x - 1.732).abs() < 1e-5);
        assert!((position.y - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn players_alternate_between_one_and_two() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
        assert_eq!(PlayerId::from_number(2), Some(PlayerId::Two));
        assert_eq!(PlayerId::from_number(0), None);
        assert_eq!(PlayerId::from_number(3), None);
    }

    #[test]
    fn local_player_number_follows_role() {
        assert_eq!(NetworkRole::Host.local_player_number(), 1);
        assert_eq!(NetworkRole::Peer.local_player_number(), 2);
        assert_eq!(NetworkRole::Offline.local_player_number(), 0);
        assert!(!NetworkRole::Offline.is_networked());
    }

    #[test]
    fn only_board_actions_replicate() {
        let local_only: Vec<_> = CommandKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_replicated())
            .collect();
        assert_eq!(
            local_only,
            vec![CommandKind::LoadMap, CommandKind::ResetBoard, CommandKind::Tick]
        );
        assert!(Command::Stay.is_replicated());
    }

    #[test]
    fn recorded_command_log_survives_bincode() {
        let log = vec![
            Command::LoadMap {
                name: String::from("Outpost"),
            },
            Command::SelectUnit {
                coord: HexCoord::new(1, -2),
            },
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            Command::PlayerQuit {
                player: PlayerId::Two,
            },
        ];
        let bytes = bincode::serialize(&log).expect("serialize");
        let restored: Vec<Command> = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, log);
    }
}
