//! Hover affordances, unit info panels and dialog text.

use hex_tactics_core::{GameOutcome, PlayerId, UnitSnapshot};
use hex_tactics_system_controller::Modal;
use hex_tactics_world::{query, Game};

/// Action a primary click on the focused hex would perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryAction {
    /// Selects the hovered unit.
    Select,
    /// Moves the selected unit to the hovered hex.
    Move,
    /// Keeps the selected unit where it stands.
    Stay,
    /// Fires on the hovered enemy.
    Fire,
    /// Ends the selected unit's activation without firing.
    HoldFire,
}

impl PrimaryAction {
    /// Button label shown next to the cursor.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Move => "Move",
            Self::Stay => "Stay",
            Self::Fire => "Fire",
            Self::HoldFire => "Hold Fire",
        }
    }
}

/// Stat block describing one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitInfo {
    /// Catalog name of the unit kind.
    pub name: String,
    /// Portrait asset.
    pub image: String,
    /// Raw attack damage.
    pub damage: i32,
    /// Defense divisor.
    pub defense: i32,
    /// Minimum attack range in hexes.
    pub attack_range_min: i32,
    /// Maximum attack range in hexes.
    pub attack_range_max: i32,
    /// Movement range in hexes.
    pub movement: i32,
    /// Remaining health.
    pub health: i32,
    /// Set when the panel shows the selected unit and ignores hovering.
    pub locked: bool,
}

/// Everything the hover UI needs for the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affordances {
    /// Action offered for the focused hex.
    pub primary_action: Option<PrimaryAction>,
    /// Whether the cancel button is shown.
    pub cancel_visible: bool,
    /// Whether the end-turn hint is shown.
    pub end_turn_hint: bool,
    /// Info panels indexed by [`PlayerId::index`].
    pub panels: [Option<UnitInfo>; 2],
}

impl Affordances {
    /// Info panel of the provided player.
    #[must_use]
    pub fn panel(&self, player: PlayerId) -> Option<&UnitInfo> {
        self.panels[player.index()].as_ref()
    }
}

/// Derives the hover UI from the current world state.
#[must_use]
pub fn affordances(game: &Game) -> Affordances {
    let mut affordances = Affordances::default();
    let Some(turn) = query::turn(game) else {
        return affordances;
    };

    let selected = query::selected_unit(game);
    let hovered = query::tile_occupant(game, turn.focused)
        .and_then(|id| query::unit(game, id))
        .filter(|unit| !unit.dead);

    if let Some(unit) = selected.as_ref() {
        affordances.panels[unit.owner.index()] = unit_info(game, unit, true);
    }
    if let Some(unit) = hovered.as_ref() {
        let slot = &mut affordances.panels[unit.owner.index()];
        if slot.is_none() {
            *slot = unit_info(game, unit, false);
        }
    }

    if turn.game_ended || turn.pending_end_turn || !query::is_your_turn(game) {
        return affordances;
    }
    affordances.cancel_visible = selected.is_some();
    affordances.end_turn_hint = selected.is_none();

    let focused = turn.focused;
    affordances.primary_action = match selected {
        None => hovered
            .filter(|unit| unit.owner == turn.current_player && !unit.done_for_turn)
            .map(|_| PrimaryAction::Select),
        Some(unit) if !unit.moved => {
            if focused == unit.coord {
                Some(PrimaryAction::Stay)
            } else if hovered.is_none() && query::in_movement_range(game, focused) {
                Some(PrimaryAction::Move)
            } else {
                None
            }
        }
        Some(unit) => {
            if focused == unit.coord {
                Some(PrimaryAction::HoldFire)
            } else if query::can_target(game, focused) {
                Some(PrimaryAction::Fire)
            } else {
                None
            }
        }
    };
    affordances
}

fn unit_info(game: &Game, unit: &UnitSnapshot, locked: bool) -> Option<UnitInfo> {
    let kind = query::unit_kind(game, unit.id)?;
    Some(UnitInfo {
        name: kind.name.clone(),
        image: kind.assets.image.clone(),
        damage: kind.stats.attack_damage,
        defense: kind.stats.defense,
        attack_range_min: kind.stats.attack_range_min,
        attack_range_max: kind.stats.attack_range_max,
        movement: kind.stats.movement_range,
        health: unit.health,
        locked,
    })
}

/// Title and instructions of a modal dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogText {
    /// Headline.
    pub title: String,
    /// Key hints below the headline.
    pub detail: &'static str,
}

/// Text shown for the provided modal dialog.
#[must_use]
pub fn dialog(modal: Modal) -> DialogText {
    match modal {
        Modal::TurnBanner { player } => DialogText {
            title: format!("Player {}'s turn", player.number()),
            detail: "Press ENTER or Click to continue",
        },
        Modal::ConfirmEndTurn => DialogText {
            title: String::from("End Turn?"),
            detail: "Press ENTER or Left Click to continue\nPress ESCAPE or Right Click to cancel",
        },
        Modal::GameOver { outcome } => {
            let title = match outcome {
                GameOutcome::Victory { winner } => format!("Player {} Win", winner.number()),
                GameOutcome::Abandoned { player } => {
                    format!("Player {} Win", player.opponent().number())
                }
                GameOutcome::Draw => String::from("Draw"),
            };
            DialogText {
                title,
                detail: "Press ENTER or Click to continue\nPress ESCAPE to cancel",
            }
        }
    }
}
