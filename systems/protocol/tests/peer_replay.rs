use std::time::Duration;

use hex_tactics_core::{Command, Event, HexCoord, NetworkRole, PlayerId, TurnSnapshot, UnitSnapshot};
use hex_tactics_definitions::Definitions;
use hex_tactics_system_protocol::{encode, Origin, Relay};
use hex_tactics_world::{query, Game};

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

    [[unit]]
    name = "Hadrian"
    symbol = "H"
    type = "Artillery"
    movement_range = 1
    attack_range_min = 2
    attack_range_max = 3
    attack_damage = 12
    defense = 3
    health = 14
"#;

const MAPS: &str = r#"
    [[map]]
    name = "Ridge"
    width = 4
    height = 4
    world_bounds_min = [0.0, 0.0]
    world_bounds_max = [10.0, 10.0]
    tiles = """
    . . . .
    . . X .
    . . . .
    . . . .
    """

    [[map.units]]
    player = 1
    layout = """
    . . . .
    . . . .
    H . . .
    G . . .
    """

    [[map.units]]
    player = 2
    layout = """
    . . . G
    . . . .
    . . . H
    . . . .
    """
"#;

struct Peer {
    game: Game,
    relay: Relay,
    events: Vec<Event>,
}

impl Peer {
    fn new(role: NetworkRole) -> Self {
        let definitions = Definitions::from_toml_strs(TILES, UNITS, MAPS).expect("definitions");
        let mut peer = Self {
            game: Game::new(definitions, role),
            relay: Relay::new(),
            events: Vec::new(),
        };
        let _ = peer.local(Command::LoadMap {
            name: String::from("Ridge"),
        });
        peer
    }

    fn local(&mut self, command: Command) -> bool {
        self.relay
            .submit(&mut self.game, Origin::Local, command, &mut self.events)
    }

    /// Marks both players ready as if the handshake arrived from the wire.
    fn connect(&mut self) {
        for player in PlayerId::ALL {
            self.relay.receive(encode(&Command::PlayerReady { player }));
        }
        let _ = self.relay.pump(&mut self.game, &mut self.events);
        self.tick();
    }

    fn tick(&mut self) {
        let _ = self.local(Command::Tick {
            dt: Duration::from_millis(50),
        });
    }

    fn state(&self) -> (Vec<UnitSnapshot>, Option<TurnSnapshot>) {
        (
            query::unit_view(&self.game).into_vec(),
            query::turn(&self.game),
        )
    }
}

/// Delivers everything `from` replicated since the last exchange to `to`.
fn deliver(from: &mut Peer, to: &mut Peer) -> usize {
    for line in from.relay.take_outbound() {
        to.relay.receive(line);
    }
    to.relay.pump(&mut to.game, &mut to.events)
}

fn hex(column: i32, row: i32) -> HexCoord {
    HexCoord::new(column, row)
}

fn play_match() -> (Peer, Peer) {
    let mut host = Peer::new(NetworkRole::Host);
    let mut guest = Peer::new(NetworkRole::Peer);

    assert!(host.local(Command::PlayerReady {
        player: PlayerId::One
    }));
    assert!(guest.local(Command::PlayerReady {
        player: PlayerId::Two
    }));
    let _ = deliver(&mut host, &mut guest);
    let _ = deliver(&mut guest, &mut host);
    host.tick();
    guest.tick();

    let host_turn = [
        Command::SelectUnit { coord: hex(0, 0) },
        Command::SetFocusedHex { coord: hex(1, 1) },
        Command::Move { coord: hex(1, 1) },
        Command::HoldFire,
        Command::SelectUnit { coord: hex(0, 1) },
        Command::Stay,
        Command::Attack { coord: hex(3, 1) },
        Command::EndTurn,
        Command::StartTurn,
    ];
    for command in host_turn {
        assert!(host.local(command.clone()), "host rejected {command:?}");
        host.tick();
        let _ = deliver(&mut host, &mut guest);
        guest.tick();
    }

    let guest_turn = [
        Command::SelectUnit { coord: hex(3, 3) },
        Command::Move { coord: hex(2, 3) },
        Command::Cancel,
        Command::SelectUnit { coord: hex(3, 3) },
        Command::Move { coord: hex(1, 3) },
        Command::Attack { coord: hex(1, 1) },
        Command::EndTurn,
        Command::CancelEndTurn,
        Command::EndTurn,
        Command::StartTurn,
    ];
    for command in guest_turn {
        assert!(guest.local(command.clone()), "guest rejected {command:?}");
        guest.tick();
        let _ = deliver(&mut guest, &mut host);
        host.tick();
    }

    (host, guest)
}

#[test]
fn peers_fed_the_same_stream_converge() {
    let (host, guest) = play_match();

    assert_eq!(host.state(), guest.state());
    let turn = query::turn(&host.game).expect("turn");
    assert_eq!(turn.current_player, PlayerId::One);
    assert!(!turn.game_ended);
}

#[test]
fn replays_are_deterministic() {
    let (first, _) = play_match();
    let (second, _) = play_match();

    assert_eq!(first.state(), second.state());
}

#[test]
fn only_accepted_local_commands_are_replicated() {
    let mut host = Peer::new(NetworkRole::Host);

    assert!(!host.local(Command::SelectUnit { coord: hex(0, 0) }));
    assert!(host.relay.take_outbound().is_empty());
    host.connect();

    assert!(!host.local(Command::Move { coord: hex(1, 1) }));
    host.tick();
    assert!(host.local(Command::SelectUnit { coord: hex(0, 0) }));
    let _ = host
        .relay
        .submit(&mut host.game, Origin::Console, Command::Cancel, &mut host.events);

    assert_eq!(
        host.relay.take_outbound(),
        vec![String::from("SelectFocusedUnit coords=0,0")]
    );
    assert!(host.relay.take_outbound().is_empty());
}

#[test]
fn remote_commands_are_never_echoed() {
    let mut guest = Peer::new(NetworkRole::Peer);
    guest.connect();
    guest.relay.receive("SelectFocusedUnit coords=0,0");
    guest.relay.receive("Move coords=1,0");

    assert_eq!(guest.relay.pump(&mut guest.game, &mut guest.events), 2);
    assert_eq!(guest.relay.pending_inbound(), 0);
    assert!(guest.relay.take_outbound().is_empty());
    assert!(query::tile_occupant(&guest.game, hex(1, 0)).is_some());
}

#[test]
fn malformed_remote_lines_leave_state_untouched() {
    let mut guest = Peer::new(NetworkRole::Peer);
    let before = guest.state();
    guest.relay.receive("Move coords=oops");
    guest.relay.receive("Launch");

    assert_eq!(guest.relay.pump(&mut guest.game, &mut guest.events), 0);
    assert_eq!(guest.state(), before);

    let console = guest.relay.submit_line(
        &mut guest.game,
        Origin::Console,
        "StartTurn extra=1",
        &mut guest.events,
    );
    assert!(console.is_err());
    assert_eq!(guest.state(), before);
}
