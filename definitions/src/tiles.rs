//! Tile kind catalog.

use hex_tactics_core::TileKindId;
use serde::Deserialize;

use crate::{DefinitionError, TILES_FILE};

/// Immutable description of a terrain type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TileKind {
    /// Unique name of the kind.
    pub name: String,
    /// Character used for the kind in map layouts.
    pub symbol: char,
    /// Indicates whether units may never enter tiles of this kind.
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Deserialize)]
struct TileSource {
    #[serde(default, rename = "tile")]
    tiles: Vec<TileKind>,
}

/// Read-only catalog of tile kinds in declaration order.
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    kinds: Vec<TileKind>,
}

impl TileCatalog {
    /// Parses the catalog from the contents of a tile definition file.
    pub fn from_toml_str(contents: &str) -> Result<Self, DefinitionError> {
        let source: TileSource =
            toml::from_str(contents).map_err(|source| DefinitionError::Parse {
                file: TILES_FILE,
                source,
            })?;
        Self::from_kinds(source.tiles)
    }

    /// Builds the catalog from already parsed kinds, rejecting duplicates.
    pub fn from_kinds(kinds: Vec<TileKind>) -> Result<Self, DefinitionError> {
        for (index, kind) in kinds.iter().enumerate() {
            let earlier = &kinds[..index];
            if earlier.iter().any(|other| other.name == kind.name) {
                return Err(DefinitionError::DuplicateName {
                    catalog: "tile",
                    name: kind.name.clone(),
                });
            }
            if earlier.iter().any(|other| other.symbol == kind.symbol) {
                return Err(DefinitionError::DuplicateSymbol {
                    catalog: "tile",
                    symbol: kind.symbol,
                });
            }
        }
        Ok(Self { kinds })
    }

    /// Looks up the kind drawn with the provided symbol.
    #[must_use]
    pub fn get_by_symbol(&self, symbol: char) -> Option<TileKindId> {
        self.kinds
            .iter()
            .position(|kind| kind.symbol == symbol)
            .and_then(to_id)
    }

    /// Retrieves the kind stored under the provided identifier.
    #[must_use]
    pub fn get(&self, id: TileKindId) -> Option<&TileKind> {
        self.kinds.get(usize::from(id.get()))
    }

    /// Iterates over the kinds with their identifiers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TileKindId, &TileKind)> {
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

fn to_id(index: usize) -> Option<TileKindId> {
    u16::try_from(index).ok().map(TileKindId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        [[tile]]
        name = "Grass"
        symbol = "."

        [[tile]]
        name = "Rock"
        symbol = "X"
        blocked = true
    "#;

    #[test]
    fn symbols_resolve_in_declaration_order() {
        let catalog = TileCatalog::from_toml_str(SOURCE).expect("catalog parses");

        let rock = catalog.get_by_symbol('X').expect("rock present");
        assert_eq!(rock, TileKindId::new(1));
        assert!(catalog.get(rock).expect("rock kind").blocked);
        assert!(!catalog.get(TileKindId::new(0)).expect("grass").blocked);
        assert_eq!(catalog.get_by_symbol('?'), None);
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let kinds = vec![
            TileKind {
                name: String::from("Grass"),
                symbol: '.',
                blocked: false,
            },
            TileKind {
                name: String::from("Sand"),
                symbol: '.',
                blocked: false,
            },
        ];

        assert!(matches!(
            TileCatalog::from_kinds(kinds),
            Err(DefinitionError::DuplicateSymbol { symbol: '.', .. })
        ));
    }

    #[test]
    fn clear_empties_catalog() {
        let mut catalog = TileCatalog::from_toml_str(SOURCE).expect("catalog parses");
        catalog.clear();
        assert!(catalog.is_empty());
        assert_eq!(catalog.get_by_symbol('.'), None);
    }
}
