//! Unit kind catalog.

use glam::Vec3;
use hex_tactics_core::UnitKindId;
use serde::Deserialize;

use crate::{DefinitionError, UNITS_FILE};

/// Firing discipline of a unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum FireMode {
    /// Direct fire: may shoot after moving.
    #[serde(rename = "Tank")]
    Direct,
    /// Indirect fire: may only shoot when it did not relocate this turn.
    #[serde(rename = "Artillery")]
    Indirect,
    /// Any other declared type; never fires.
    #[serde(other)]
    Unarmed,
}

/// Combat statistics copied onto every unit of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct UnitStats {
    /// Maximum number of hex steps the unit may move in one turn.
    pub movement_range: i32,
    /// Smallest hex distance the unit may fire at.
    pub attack_range_min: i32,
    /// Largest hex distance the unit may fire at.
    pub attack_range_max: i32,
    /// Raw damage dealt per shot before the target's defense applies.
    pub attack_damage: i32,
    /// Divisor applied to incoming damage.
    pub defense: i32,
    /// Health of a fresh unit.
    pub health: i32,
}

impl UnitStats {
    /// Damage a hit of `raw` strength inflicts on a unit with these stats.
    #[must_use]
    pub const fn effective_damage(&self, raw: i32) -> i32 {
        2 * raw / self.defense
    }
}

/// Asset and effect keys consumed by presentation layers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnitAssets {
    /// Portrait shown in the unit info panel.
    pub image: String,
    /// Model drawn on the board.
    pub model: String,
    /// Particle effect played where the unit is hit.
    pub hit_effect: String,
    /// Particle effect played when the unit is destroyed.
    pub explosion_effect: String,
    /// Particle effect played at the muzzle when the unit fires.
    pub shot_effect: String,
    /// Sound played when the unit is hit.
    pub hit_sound: String,
    /// Sound played when the unit is destroyed.
    pub explosion_sound: String,
    /// Sound played when the unit fires.
    pub shot_sound: String,
}

/// Immutable description of a unit type.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UnitKind {
    /// Unique name of the kind.
    pub name: String,
    /// Character used for the kind in map placement blocks.
    pub symbol: char,
    /// Firing discipline.
    #[serde(rename = "type")]
    pub fire_mode: FireMode,
    /// Combat statistics.
    #[serde(flatten)]
    pub stats: UnitStats,
    /// Muzzle position relative to the model origin.
    #[serde(default)]
    pub muzzle_offset: [f32; 3],
    /// Presentation keys.
    #[serde(default)]
    pub assets: UnitAssets,
}

impl UnitKind {
    /// Muzzle position relative to the model origin as a vector.
    #[must_use]
    pub fn muzzle(&self) -> Vec3 {
        Vec3::from_array(self.muzzle_offset)
    }
}

#[derive(Deserialize)]
struct UnitSource {
    #[serde(default, rename = "unit")]
    units: Vec<UnitKind>,
}

/// Read-only catalog of unit kinds in declaration order.
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    kinds: Vec<UnitKind>,
}

impl UnitCatalog {
    /// Parses the catalog from the contents of a unit definition file.
    pub fn from_toml_str(contents: &str) -> Result<Self, DefinitionError> {
        let source: UnitSource =
            toml::from_str(contents).map_err(|source| DefinitionError::Parse {
                file: UNITS_FILE,
                source,
            })?;
        Self::from_kinds(source.units)
    }

    /// Builds the catalog from already parsed kinds, validating their content.
    pub fn from_kinds(kinds: Vec<UnitKind>) -> Result<Self, DefinitionError> {
        for (index, kind) in kinds.iter().enumerate() {
            if kind.stats.defense < 1 {
                return Err(DefinitionError::InvalidDefense {
                    unit: kind.name.clone(),
                    defense: kind.stats.defense,
                });
            }
            let earlier = &kinds[..index];
            if earlier.iter().any(|other| other.name == kind.name) {
                return Err(DefinitionError::DuplicateName {
                    catalog: "unit",
                    name: kind.name.clone(),
                });
            }
            if earlier.iter().any(|other| other.symbol == kind.symbol) {
                return Err(DefinitionError::DuplicateSymbol {
                    catalog: "unit",
                    symbol: kind.symbol,
                });
            }
        }
        Ok(Self { kinds })
    }

    /// Looks up the kind placed with the provided symbol.
    #[must_use]
    pub fn get_by_symbol(&self, symbol: char) -> Option<UnitKindId> {
        self.kinds
            .iter()
            .position(|kind| kind.symbol == symbol)
            .and_then(to_id)
    }

    /// Looks up the kind with the provided name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<UnitKindId> {
        self.kinds
            .iter()
            .position(|kind| kind.name == name)
            .and_then(to_id)
    }

    /// Retrieves the kind stored under the provided identifier.
    #[must_use]
    pub fn get(&self, id: UnitKindId) -> Option<&UnitKind> {
        self.kinds.get(usize::from(id.get()))
    }

    /// Iterates over the kinds with their identifiers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKindId, &UnitKind)> {
        self.kinds
            .iter()
            .enumerate()
            .filter_map(|(index, kind)| to_id(index).map(|id| (id, kind)))
    }

    /// Number of kinds in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Reports whether the catalog holds no kinds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Removes every kind from the catalog.
    pub fn clear(&mut self) {
        self.kinds.clear();
    }
}

fn to_id(index: usize) -> Option<UnitKindId> {
    u16::try_from(index).ok().map(UnitKindId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        [[unit]]
        name = "Grizzly"
        symbol = "G"
        type = "Tank"
        movement_range = 3
        attack_range_min = 1
        attack_range_max = 2
        attack_damage = 10
        defense = 5
        health = 20
        muzzle_offset = [0.6, 0.0, 0.35]

        [unit.assets]
        shot_effect = "Smoke"

        [[unit]]
        name = "Hadrian"
        symbol = "H"
        type = "Artillery"
        movement_range = 2
        attack_range_min = 2
        attack_range_max = 4
        attack_damage = 12
        defense = 3
        health = 14

        [[unit]]
        name = "Scout"
        symbol = "S"
        type = "Recon"
        movement_range = 5
        attack_range_min = 0
        attack_range_max = 0
        attack_damage = 0
        defense = 1
        health = 6
    "#;

    #[test]
    fn parses_fire_modes_and_stats() {
        let catalog = UnitCatalog::from_toml_str(SOURCE).expect("catalog parses");

        let grizzly = catalog
            .get(catalog.get_by_name("Grizzly").expect("grizzly"))
            .expect("kind");
        assert_eq!(grizzly.fire_mode, FireMode::Direct);
        assert_eq!(grizzly.stats.attack_range_max, 2);
        assert_eq!(grizzly.assets.shot_effect, "Smoke");
        assert!((grizzly.muzzle().x - 0.6).abs() < f32::EPSILON);

        let hadrian = catalog.get_by_symbol('H').expect("hadrian");
        assert_eq!(
            catalog.get(hadrian).expect("kind").fire_mode,
            FireMode::Indirect
        );

        let scout = catalog.get_by_symbol('S').expect("scout");
        assert_eq!(catalog.get(scout).expect("kind").fire_mode, FireMode::Unarmed);
    }

    #[test]
    fn effective_damage_doubles_then_divides_by_defense() {
        let stats = UnitStats {
            movement_range: 1,
            attack_range_min: 1,
            attack_range_max: 1,
            attack_damage: 1,
            defense: 5,
            health: 10,
        };
        assert_eq!(stats.effective_damage(10), 4);
        assert_eq!(stats.effective_damage(3), 1);
        assert_eq!(stats.effective_damage(2), 0);
    }

    #[test]
    fn zero_defense_is_rejected() {
        let source = SOURCE.replace("defense = 3", "defense = 0");
        assert!(matches!(
            UnitCatalog::from_toml_str(&source),
            Err(DefinitionError::InvalidDefense { defense: 0, .. })
        ));
    }
}
