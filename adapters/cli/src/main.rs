#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Hex Tactics match from a script or stdin.
//!
//! Every input line is one frame: the line is applied, queued remote commands
//! are drained, the controller reacts and the world advances by one tick.
//! In networked roles replicated commands are printed to stdout prefixed with `>`.

mod script;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use hex_tactics_core::{Command, Event, NetworkRole};
use hex_tactics_definitions::Definitions;
use hex_tactics_system_controller::{Controller, Modal, PlayerInput};
use hex_tactics_system_presentation::{dialog, Presentation};
use hex_tactics_system_protocol::{parse, Origin, Relay};
use hex_tactics_world::{query, Game};
use tracing_subscriber::EnvFilter;

use crate::script::{parse_gesture, ScriptLine};

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "hex-tactics", about = "Turn-based hex tactics driver", version)]
struct Args {
    /// Directory holding tiles.toml, units.toml and maps.toml.
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// Map layout to load.
    #[arg(long, default_value = "Outpost")]
    map: String,
    /// Role this process plays in the match.
    #[arg(long, value_enum, default_value_t = Role::Offline)]
    role: Role,
    /// Script to run instead of reading standard input.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Seed for presentation randomness.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 30)]
    tick_rate: u32,
}

/// Network role selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    /// Hot-seat play without a peer.
    Offline,
    /// Player one of a networked match.
    Host,
    /// Player two of a networked match.
    Peer,
}

impl From<Role> for NetworkRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Offline => NetworkRole::Offline,
            Role::Host => NetworkRole::Host,
            Role::Peer => NetworkRole::Peer,
        }
    }
}

/// Entry point for the Hex Tactics command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    ensure!(args.tick_rate > 0, "--tick-rate must be positive");
    let definitions = Definitions::load_from_dir(&args.data)
        .with_context(|| format!("failed to load definitions from {}", args.data.display()))?;

    let mut session = Session::new(definitions, &args)?;
    println!("{}", query::welcome_banner(&session.game));

    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        session.step(&line);
    }

    if let Some(turn) = query::turn(&session.game) {
        tracing::info!(
            player = turn.current_player.number(),
            ended = turn.game_ended,
            outcome = ?turn.outcome,
            "session finished"
        );
    }
    Ok(())
}

struct Session {
    game: Game,
    relay: Relay,
    controller: Controller,
    presentation: Presentation,
    tick: Duration,
    networked: bool,
    backlog: Vec<Event>,
    modal: Option<Modal>,
}

impl Session {
    fn new(definitions: Definitions, args: &Args) -> Result<Self> {
        let role = NetworkRole::from(args.role);
        let mut session = Self {
            game: Game::new(definitions, role),
            relay: Relay::new(),
            controller: Controller::new(),
            presentation: Presentation::new(args.seed),
            tick: Duration::from_secs(1) / args.tick_rate,
            networked: role.is_networked(),
            backlog: Vec::new(),
            modal: None,
        };

        let mut events = Vec::new();
        let loaded = session.relay.submit(
            &mut session.game,
            Origin::Local,
            Command::LoadMap {
                name: args.map.clone(),
            },
            &mut events,
        );
        ensure!(loaded, "unknown map `{}`", args.map);
        if let Some(player) = role.local_player() {
            let _ = session.relay.submit(
                &mut session.game,
                Origin::Local,
                Command::PlayerReady { player },
                &mut events,
            );
        }
        session.report(&events);
        session.backlog = events;
        Ok(session)
    }

    /// Runs one frame driven by a single input line.
    fn step(&mut self, line: &str) {
        let mut events = std::mem::take(&mut self.backlog);
        let presented = events.len();
        let mut input = PlayerInput::default();

        match ScriptLine::classify(line) {
            ScriptLine::Skip => {}
            ScriptLine::Remote(text) => self.relay.receive(text),
            ScriptLine::Console(text) => {
                if let Err(error) =
                    self.relay
                        .submit_line(&mut self.game, Origin::Console, text, &mut events)
                {
                    tracing::warn!(%error, "console command ignored");
                }
            }
            ScriptLine::Local(text) => match parse(text) {
                Ok(command) => {
                    let _ = self
                        .relay
                        .submit(&mut self.game, Origin::Local, command, &mut events);
                }
                Err(error) => tracing::warn!(%error, "command ignored"),
            },
            ScriptLine::Gesture(text) => match parse_gesture(text) {
                Ok(gesture) => input = gesture,
                Err(error) => tracing::warn!(error = %format!("{error:#}"), "gesture ignored"),
            },
        }
        let _ = self.relay.pump(&mut self.game, &mut events);

        let mut commands = Vec::new();
        self.controller
            .handle(&events, input, &self.game, &mut commands);
        let seen = events.len();
        for command in commands {
            let _ = self
                .relay
                .submit(&mut self.game, Origin::Local, command, &mut events);
        }
        let _ = self.relay.submit(
            &mut self.game,
            Origin::Local,
            Command::Tick { dt: self.tick },
            &mut events,
        );

        self.report(&events[presented..]);
        self.backlog = events.split_off(seen);
    }

    fn report(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => {}
                Event::CommandRejected { command, reason } => {
                    tracing::warn!(command = command.wire_name(), ?reason, "command rejected");
                }
                _ => tracing::info!(?event, "event"),
            }
        }

        let mut directives = Vec::new();
        self.presentation.handle(events, &self.game, &mut directives);
        for directive in &directives {
            tracing::debug!(?directive, "directive");
        }

        for line in self.relay.take_outbound() {
            if self.networked {
                println!("> {line}");
            }
        }

        let modal = self.controller.modal();
        if modal != self.modal {
            if let Some(modal) = modal {
                let text = dialog(modal);
                println!("[{}] {}", text.title, text.detail.replace('\n', " | "));
            }
            self.modal = modal;
        }
    }
}
