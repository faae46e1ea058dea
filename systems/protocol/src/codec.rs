//! Line-oriented text encoding of commands.
//!
//! A line holds the command name followed by whitespace separated `key=value`
//! arguments, e.g. `Move coords=3,5`. Names and keys match case-insensitively.

use std::time::Duration;

use hex_tactics_core::{Command, CommandKind, HexCoord, PlayerId};
use thiserror::Error;

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const FRACTION_DIGITS: usize = 9;

/// Reasons a protocol line could not be turned into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line holds no command name.
    #[error("empty command line")]
    Empty,
    /// The command name is not part of the protocol.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// An argument is not written as `key=value`.
    #[error("malformed argument `{0}`, expected key=value")]
    MalformedArgument(String),
    /// A required argument is absent.
    #[error("{command} requires argument `{key}`")]
    MissingArgument {
        /// Canonical command name.
        command: &'static str,
        /// Argument key.
        key: &'static str,
    },
    /// An argument the command does not take, or one given twice.
    #[error("{command} does not take argument `{key}` here")]
    UnexpectedArgument {
        /// Canonical command name.
        command: &'static str,
        /// Argument key as written.
        key: String,
    },
    /// An argument value could not be parsed.
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue {
        /// Argument key.
        key: &'static str,
        /// Value as written.
        value: String,
    },
}

/// Encodes a command using the canonical spelling.
#[must_use]
pub fn encode(command: &Command) -> String {
    let name = command.kind().wire_name();
    match command {
        Command::LoadMap { name: map } => format!("{name} name={map}"),
        Command::Tick { dt } => format!("{name} dt={}", format_seconds(*dt)),
        Command::SetFocusedHex { coord }
        | Command::SelectUnit { coord }
        | Command::Move { coord }
        | Command::Attack { coord } => {
            format!("{name} coords={},{}", coord.column(), coord.row())
        }
        Command::PlayerReady { player } | Command::PlayerQuit { player } => {
            format!("{name} id={}", player.number())
        }
        Command::ResetBoard
        | Command::Stay
        | Command::HoldFire
        | Command::Cancel
        | Command::EndTurn
        | Command::CancelEndTurn
        | Command::StartTurn => name.to_owned(),
    }
}

/// Parses a protocol line into a command.
pub fn parse(line: &str) -> Result<Command, ProtocolError> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or(ProtocolError::Empty)?;
    let kind = CommandKind::ALL
        .into_iter()
        .find(|kind| kind.wire_name().eq_ignore_ascii_case(name))
        .ok_or_else(|| ProtocolError::UnknownCommand(name.to_owned()))?;

    let mut arguments = Arguments::collect(kind.wire_name(), tokens)?;
    let command = match kind {
        CommandKind::LoadMap => Command::LoadMap {
            name: arguments.take("name")?.to_owned(),
        },
        CommandKind::ResetBoard => Command::ResetBoard,
        CommandKind::Tick => Command::Tick {
            dt: parse_seconds(arguments.take("dt")?)?,
        },
        CommandKind::SetFocusedHex => Command::SetFocusedHex {
            coord: parse_coords(arguments.take("coords")?)?,
        },
        CommandKind::SelectUnit => Command::SelectUnit {
            coord: parse_coords(arguments.take("coords")?)?,
        },
        CommandKind::Move => Command::Move {
            coord: parse_coords(arguments.take("coords")?)?,
        },
        CommandKind::Stay => Command::Stay,
        CommandKind::Attack => Command::Attack {
            coord: parse_coords(arguments.take("coords")?)?,
        },
        CommandKind::HoldFire => Command::HoldFire,
        CommandKind::Cancel => Command::Cancel,
        CommandKind::EndTurn => Command::EndTurn,
        CommandKind::CancelEndTurn => Command::CancelEndTurn,
        CommandKind::StartTurn => Command::StartTurn,
        CommandKind::PlayerReady => Command::PlayerReady {
            player: parse_player(arguments.take("id")?)?,
        },
        CommandKind::PlayerQuit => Command::PlayerQuit {
            player: parse_player(arguments.take("id")?)?,
        },
    };
    arguments.finish()?;
    Ok(command)
}

struct Arguments<'a> {
    command: &'static str,
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Arguments<'a> {
    fn collect<I>(command: &'static str, tokens: I) -> Result<Self, ProtocolError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut entries: Vec<(&str, &str)> = Vec::new();
        for token in tokens {
            let (key, value) = token
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| ProtocolError::MalformedArgument(token.to_owned()))?;
            if entries
                .iter()
                .any(|(existing, _)| existing.eq_ignore_ascii_case(key))
            {
                return Err(ProtocolError::UnexpectedArgument {
                    command,
                    key: key.to_owned(),
                });
            }
            entries.push((key, value));
        }
        Ok(Self { command, entries })
    }

    fn take(&mut self, key: &'static str) -> Result<&'a str, ProtocolError> {
        let position = self
            .entries
            .iter()
            .position(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .ok_or(ProtocolError::MissingArgument {
                command: self.command,
                key,
            })?;
        Ok(self.entries.remove(position).1)
    }

    fn finish(self) -> Result<(), ProtocolError> {
        match self.entries.first() {
            Some((key, _)) => Err(ProtocolError::UnexpectedArgument {
                command: self.command,
                key: (*key).to_owned(),
            }),
            None => Ok(()),
        }
    }
}

fn invalid(key: &'static str, value: &str) -> ProtocolError {
    ProtocolError::InvalidValue {
        key,
        value: value.to_owned(),
    }
}

fn parse_coords(value: &str) -> Result<HexCoord, ProtocolError> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| invalid("coords", value))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| invalid("coords", value))?;
    let row = row.trim().parse().map_err(|_| invalid("coords", value))?;
    Ok(HexCoord::new(column, row))
}

fn parse_player(value: &str) -> Result<PlayerId, ProtocolError> {
    value
        .parse()
        .ok()
        .and_then(PlayerId::from_number)
        .ok_or_else(|| invalid("id", value))
}

/// Formats a duration as decimal seconds without losing nanoseconds.
fn format_seconds(duration: Duration) -> String {
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        return duration.as_secs().to_string();
    }
    let fraction = format!("{nanos:0width$}", width = FRACTION_DIGITS);
    format!("{}.{}", duration.as_secs(), fraction.trim_end_matches('0'))
}

/// Parses decimal seconds exactly, rejecting signs and sub-nanosecond digits.
fn parse_seconds(value: &str) -> Result<Duration, ProtocolError> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let digits_only = |text: &str| text.bytes().all(|byte| byte.is_ascii_digit());
    if whole.is_empty()
        || !digits_only(whole)
        || !digits_only(fraction)
        || fraction.len() > FRACTION_DIGITS
    {
        return Err(invalid("dt", value));
    }
    let seconds: u64 = whole.parse().map_err(|_| invalid("dt", value))?;
    let nanos = if fraction.is_empty() {
        0
    } else {
        let scale = 10_u32.pow((FRACTION_DIGITS - fraction.len()) as u32);
        fraction.parse::<u32>().map_err(|_| invalid("dt", value))? * scale
    };
    debug_assert!(nanos < NANOS_PER_SECOND);
    Ok(Duration::new(seconds, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_keep_nanosecond_precision() {
        assert_eq!(format_seconds(Duration::from_millis(16)), "0.016");
        assert_eq!(format_seconds(Duration::from_secs(2)), "2");
        assert_eq!(format_seconds(Duration::new(1, 5)), "1.000000005");
        assert_eq!(parse_seconds("0.016"), Ok(Duration::from_millis(16)));
        assert_eq!(parse_seconds("3"), Ok(Duration::from_secs(3)));
    }

    #[test]
    fn malformed_seconds_are_rejected() {
        for value in ["", "-1", ".5", "1.0000000001", "1e3", "0.5s"] {
            assert!(parse_seconds(value).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn coordinates_accept_negative_components() {
        assert_eq!(parse_coords("-1,4"), Ok(HexCoord::new(-1, 4)));
        assert!(parse_coords("1;4").is_err());
        assert!(parse_coords("1,").is_err());
    }
}
