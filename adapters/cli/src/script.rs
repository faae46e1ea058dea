//! Classification of script and console lines.

use anyhow::{bail, Context, Result};
use hex_tactics_core::HexCoord;
use hex_tactics_system_controller::PlayerInput;

/// One line of driver input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScriptLine<'a> {
    /// Blank line or `#` comment.
    Skip,
    /// `<`-prefixed protocol line delivered by the peer.
    Remote(&'a str),
    /// `/`-prefixed protocol line typed into the debug console.
    Console(&'a str),
    /// `!`-prefixed player gesture routed through the controller.
    Gesture(&'a str),
    /// Protocol line issued by the local player.
    Local(&'a str),
}

impl<'a> ScriptLine<'a> {
    pub(crate) fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Self::Skip;
        }
        if let Some(rest) = line.strip_prefix('<') {
            Self::Remote(rest.trim_start())
        } else if let Some(rest) = line.strip_prefix('/') {
            Self::Console(rest.trim_start())
        } else if let Some(rest) = line.strip_prefix('!') {
            Self::Gesture(rest.trim_start())
        } else {
            Self::Local(line)
        }
    }
}

/// Parses a gesture such as `click 2,3`, `hover 1,1`, `right`, `end`,
/// `confirm` or `decline`.
pub(crate) fn parse_gesture(text: &str) -> Result<PlayerInput> {
    let mut words = text.split_whitespace();
    let verb = words.next().context("empty gesture")?;
    let argument = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected `{extra}` after gesture `{verb}`");
    }

    let input = match (verb.to_ascii_lowercase().as_str(), argument) {
        ("hover", Some(coords)) => PlayerInput::hovering(parse_coords(coords)?),
        ("click", Some(coords)) => PlayerInput::clicking(parse_coords(coords)?),
        ("right", None) => PlayerInput {
            secondary: true,
            ..PlayerInput::default()
        },
        ("end", None) => PlayerInput {
            end_turn: true,
            ..PlayerInput::default()
        },
        ("confirm", None) => PlayerInput {
            confirm: true,
            ..PlayerInput::default()
        },
        ("decline", None) => PlayerInput {
            decline: true,
            ..PlayerInput::default()
        },
        _ => bail!("unrecognised gesture `{text}`"),
    };
    Ok(input)
}

fn parse_coords(text: &str) -> Result<HexCoord> {
    let (column, row) = text
        .split_once(',')
        .with_context(|| format!("expected column,row but found `{text}`"))?;
    let column = column
        .parse()
        .with_context(|| format!("invalid column in `{text}`"))?;
    let row = row
        .parse()
        .with_context(|| format!("invalid row in `{text}`"))?;
    Ok(HexCoord::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_pick_the_origin() {
        assert_eq!(ScriptLine::classify("  "), ScriptLine::Skip);
        assert_eq!(ScriptLine::classify("# setup"), ScriptLine::Skip);
        assert_eq!(
            ScriptLine::classify("< Move coords=1,1"),
            ScriptLine::Remote("Move coords=1,1")
        );
        assert_eq!(
            ScriptLine::classify("/ResetBoard"),
            ScriptLine::Console("ResetBoard")
        );
        assert_eq!(
            ScriptLine::classify("!click 0,0"),
            ScriptLine::Gesture("click 0,0")
        );
        assert_eq!(ScriptLine::classify("EndTurn"), ScriptLine::Local("EndTurn"));
    }

    #[test]
    fn gestures_map_to_controller_input() {
        assert_eq!(
            parse_gesture("click 2,-1").expect("click"),
            PlayerInput::clicking(HexCoord::new(2, -1))
        );
        assert!(parse_gesture("end").expect("end").end_turn);
        assert!(parse_gesture("RIGHT").expect("right").secondary);
        assert!(parse_gesture("click").is_err());
        assert!(parse_gesture("hover 1,x").is_err());
        assert!(parse_gesture("confirm now").is_err());
    }
}
