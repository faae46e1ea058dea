use std::time::Duration;

use hex_tactics_core::{Command, Event, GameOutcome, HexCoord, NetworkRole, PlayerId};
use hex_tactics_definitions::Definitions;
use hex_tactics_system_controller::{Controller, Modal, PlayerInput};
use hex_tactics_world::{self as world, query, Game};

const TILES: &str = r#"
    [[tile]]
    name = "Grass"
    symbol = "."

    [[tile]]
    name = "Rock"
    symbol = "X"
    blocked = true
"#;

const UNITS: &str = r#"
    [[unit]]
    name = "Grizzly"
    symbol = "G"
    type = "Tank"
    movement_range = 2
    attack_range_min = 1
    attack_range_max = 2
    attack_damage = 10
    defense = 5
    health = 20
"#;

const MAPS: &str = r#"
    [[map]]
    name = "Duel"
    width = 4
    height = 2
    world_bounds_min = [0.0, 0.0]
    world_bounds_max = [10.0, 10.0]
    tiles = """
    . . . .
    . . . X
    """

    [[map.units]]
    player = 1
    layout = """
    . . . .
    G . . .
    """

    [[map.units]]
    player = 2
    layout = """
    . . . .
    . . G .
    """
"#;

struct Session {
    game: Game,
    controller: Controller,
    pending: Vec<Event>,
}

impl Session {
    fn new(role: NetworkRole) -> Self {
        let definitions = Definitions::from_toml_strs(TILES, UNITS, MAPS).expect("definitions");
        let mut session = Self {
            game: Game::new(definitions, role),
            controller: Controller::new(),
            pending: Vec::new(),
        };
        session.apply(Command::LoadMap {
            name: String::from("Duel"),
        });
        session
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.game, command, &mut self.pending);
    }

    fn tick(&mut self, seconds: f32) {
        self.apply(Command::Tick {
            dt: Duration::from_secs_f32(seconds),
        });
    }

    /// Runs the controller over the pending events and applies what it emits.
    fn frame(&mut self, input: PlayerInput) -> Vec<Command> {
        let events = std::mem::take(&mut self.pending);
        let mut commands = Vec::new();
        self.controller
            .handle(&events, input, &self.game, &mut commands);
        for command in commands.clone() {
            self.apply(command);
        }
        commands
    }
}

fn hex(column: i32, row: i32) -> HexCoord {
    HexCoord::new(column, row)
}

#[test]
fn clicking_an_own_unit_selects_it() {
    let mut session = Session::new(NetworkRole::Offline);

    let commands = session.frame(PlayerInput::clicking(hex(0, 0)));

    assert_eq!(commands, vec![Command::SelectUnit { coord: hex(0, 0) }]);
    assert!(query::selected_unit(&session.game).is_some());
}

#[test]
fn hovering_reports_focus_changes_once() {
    let mut session = Session::new(NetworkRole::Offline);

    let first = session.frame(PlayerInput::hovering(hex(1, 1)));
    let second = session.frame(PlayerInput::hovering(hex(1, 1)));

    assert_eq!(first, vec![Command::SetFocusedHex { coord: hex(1, 1) }]);
    assert!(second.is_empty());
}

#[test]
fn clicking_enemies_or_blocked_tiles_without_selection_does_nothing() {
    let mut session = Session::new(NetworkRole::Offline);

    let enemy = session.frame(PlayerInput::clicking(hex(2, 0)));
    let rock = session.frame(PlayerInput::clicking(hex(3, 0)));

    assert_eq!(enemy, vec![Command::SetFocusedHex { coord: hex(2, 0) }]);
    assert_eq!(rock, vec![Command::SetFocusedHex { coord: hex(3, 0) }]);
    assert!(query::selected_unit(&session.game).is_none());
}

#[test]
fn move_waits_for_animation_before_holding_fire() {
    let mut session = Session::new(NetworkRole::Offline);
    let _ = session.frame(PlayerInput::clicking(hex(0, 0)));

    let moved = session.frame(PlayerInput::clicking(hex(1, 0)));
    assert_eq!(
        moved,
        vec![
            Command::SetFocusedHex { coord: hex(1, 0) },
            Command::Move { coord: hex(1, 0) },
        ]
    );

    let busy = session.frame(PlayerInput::clicking(hex(1, 0)));
    assert!(busy.is_empty(), "animating units must not receive commands");

    session.tick(1.0);
    let settled = session.frame(PlayerInput::clicking(hex(1, 0)));
    assert_eq!(settled, vec![Command::HoldFire]);
    assert!(query::selected_unit(&session.game).is_none());
}

#[test]
fn move_waits_for_rotation_to_settle() {
    let mut session = Session::new(NetworkRole::Offline);
    let _ = session.frame(PlayerInput::clicking(hex(0, 0)));
    let _ = session.frame(PlayerInput::hovering(hex(1, 1)));
    session.tick(0.05);

    let turning = session.frame(PlayerInput::clicking(hex(1, 1)));
    assert!(turning.is_empty());

    session.tick(1.0);
    let ready = session.frame(PlayerInput::clicking(hex(1, 1)));
    assert_eq!(ready, vec![Command::Move { coord: hex(1, 1) }]);
}

#[test]
fn staying_then_clicking_an_enemy_attacks() {
    let mut session = Session::new(NetworkRole::Offline);
    let _ = session.frame(PlayerInput::clicking(hex(0, 0)));

    let stay = session.frame(PlayerInput::clicking(hex(0, 0)));
    assert_eq!(stay, vec![Command::Stay]);

    let attack = session.frame(PlayerInput::clicking(hex(2, 0)));
    assert_eq!(
        attack,
        vec![
            Command::SetFocusedHex { coord: hex(2, 0) },
            Command::Attack { coord: hex(2, 0) },
        ]
    );
    let target = query::tile_occupant(&session.game, hex(2, 0)).expect("target");
    assert_eq!(
        query::unit(&session.game, target).map(|unit| unit.health),
        Some(16)
    );
}

#[test]
fn secondary_click_cancels_the_selection() {
    let mut session = Session::new(NetworkRole::Offline);
    let _ = session.frame(PlayerInput::clicking(hex(0, 0)));

    let commands = session.frame(PlayerInput {
        secondary: true,
        ..PlayerInput::hovering(hex(0, 0))
    });

    assert_eq!(commands, vec![Command::Cancel]);
    assert!(query::selected_unit(&session.game).is_none());
}

#[test]
fn ending_a_turn_asks_for_confirmation() {
    let mut session = Session::new(NetworkRole::Offline);

    let requested = session.frame(PlayerInput {
        end_turn: true,
        ..PlayerInput::default()
    });
    assert_eq!(requested, vec![Command::EndTurn]);

    let idle = session.frame(PlayerInput::default());
    assert!(idle.is_empty());
    assert_eq!(session.controller.modal(), Some(Modal::ConfirmEndTurn));

    let confirmed = session.frame(PlayerInput {
        confirm: true,
        ..PlayerInput::default()
    });
    assert_eq!(confirmed, vec![Command::StartTurn]);

    let _ = session.frame(PlayerInput::default());
    assert_eq!(
        session.controller.modal(),
        Some(Modal::TurnBanner {
            player: PlayerId::Two
        })
    );

    let blocked = session.frame(PlayerInput::clicking(hex(2, 0)));
    assert!(blocked.is_empty(), "banner swallows the dismissing click");
    assert_eq!(session.controller.modal(), None);
}

#[test]
fn declining_the_end_turn_dialog_keeps_the_turn() {
    let mut session = Session::new(NetworkRole::Offline);
    let _ = session.frame(PlayerInput {
        end_turn: true,
        ..PlayerInput::default()
    });
    let _ = session.frame(PlayerInput::default());

    let declined = session.frame(PlayerInput {
        decline: true,
        ..PlayerInput::default()
    });
    let _ = session.frame(PlayerInput::default());

    assert_eq!(declined, vec![Command::CancelEndTurn]);
    assert_eq!(session.controller.modal(), None);
    let turn = query::turn(&session.game).expect("turn");
    assert_eq!(turn.current_player, PlayerId::One);
    assert!(!turn.pending_end_turn);
}

#[test]
fn peers_wait_for_their_turn() {
    let mut session = Session::new(NetworkRole::Peer);

    let commands = session.frame(PlayerInput {
        end_turn: true,
        ..PlayerInput::clicking(hex(2, 0))
    });

    assert!(commands.is_empty());
}

#[test]
fn game_over_dialog_quits_and_resets() {
    let mut session = Session::new(NetworkRole::Offline);
    session.pending.push(Event::GameEnded {
        outcome: GameOutcome::Victory {
            winner: PlayerId::Two,
        },
    });

    let idle = session.frame(PlayerInput::default());
    assert!(idle.is_empty());
    assert!(matches!(
        session.controller.modal(),
        Some(Modal::GameOver { .. })
    ));

    let commands = session.frame(PlayerInput {
        confirm: true,
        ..PlayerInput::default()
    });
    assert_eq!(
        commands,
        vec![
            Command::PlayerQuit {
                player: PlayerId::One
            },
            Command::ResetBoard,
        ]
    );
    let _ = session.frame(PlayerInput::default());
    assert_eq!(session.controller.modal(), None);
    assert!(!query::turn(&session.game).expect("turn").game_ended);
}
