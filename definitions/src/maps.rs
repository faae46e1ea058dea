//! Map layouts parsed from text blocks.

use glam::Vec2;
use hex_tactics_core::{HexCoord, PlayerId, TileKindId, UnitKindId};
use serde::Deserialize;

use crate::{DefinitionError, TileCatalog, UnitCatalog, MAPS_FILE};

/// Axis-aligned rectangle delimiting the playable region in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl WorldBounds {
    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Initial position of a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitPlacement {
    /// Player commanding the unit.
    pub player: PlayerId,
    /// Kind of the unit.
    pub kind: UnitKindId,
    /// Starting hex.
    pub coord: HexCoord,
}

/// Parsed map: grid dimensions, world bounds, tiles and unit placements.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    name: String,
    width: u32,
    height: u32,
    bounds: WorldBounds,
    tiles: Vec<TileKindId>,
    placements: Vec<UnitPlacement>,
}

impl MapLayout {
    /// Unique name of the layout.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of hex columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of hex rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// World-space rectangle delimiting the playable region.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Row-major tile kinds, row zero first.
    #[must_use]
    pub fn tiles(&self) -> &[TileKindId] {
        &self.tiles
    }

    /// Unit placements in the order units are created.
    #[must_use]
    pub fn placements(&self) -> &[UnitPlacement] {
        &self.placements
    }

    /// Row-major index of the coordinate when it lies inside the grid.
    #[must_use]
    pub fn index(&self, coord: HexCoord) -> Option<usize> {
        let column = u32::try_from(coord.column()).ok()?;
        let row = u32::try_from(coord.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let index = u64::from(row) * u64::from(self.width) + u64::from(column);
        usize::try_from(index).ok()
    }

    /// Reports whether the coordinate lies inside the grid dimensions.
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Reports whether the coordinate is playable: inside the grid and its
    /// projected centre inside the world bounds.
    #[must_use]
    pub fn is_in_bounds(&self, coord: HexCoord) -> bool {
        self.contains(coord) && self.bounds.contains(coord.world_position())
    }

    /// Tile kind at the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, coord: HexCoord) -> Option<TileKindId> {
        self.index(coord).and_then(|index| self.tiles.get(index).copied())
    }
}

#[derive(Deserialize)]
struct MapSource {
    #[serde(default, rename = "map")]
    maps: Vec<MapEntry>,
}

#[derive(Deserialize)]
struct MapEntry {
    name: String,
    width: u32,
    height: u32,
    world_bounds_min: [f32; 2],
    world_bounds_max: [f32; 2],
    tiles: String,
    #[serde(default)]
    units: Vec<UnitBlock>,
}

#[derive(Deserialize)]
struct UnitBlock {
    player: u8,
    layout: String,
}

/// Read-only catalog of map layouts in declaration order.
#[derive(Clone, Debug, Default)]
pub struct MapCatalog {
    layouts: Vec<MapLayout>,
}

impl MapCatalog {
    /// Parses map layouts, resolving symbols against the provided catalogs.
    pub fn from_toml_str(
        contents: &str,
        tiles: &TileCatalog,
        units: &UnitCatalog,
    ) -> Result<Self, DefinitionError> {
        let source: MapSource =
            toml::from_str(contents).map_err(|source| DefinitionError::Parse {
                file: MAPS_FILE,
                source,
            })?;

        let mut layouts: Vec<MapLayout> = Vec::with_capacity(source.maps.len());
        for entry in source.maps {
            if layouts.iter().any(|layout| layout.name == entry.name) {
                return Err(DefinitionError::DuplicateName {
                    catalog: "map",
                    name: entry.name,
                });
            }
            layouts.push(parse_layout(entry, tiles, units)?);
        }
        Ok(Self { layouts })
    }

    /// Looks up a layout by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MapLayout> {
        self.layouts.iter().find(|layout| layout.name == name)
    }

    /// Iterates over the layouts in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MapLayout> {
        self.layouts.iter()
    }

    /// Number of layouts in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Reports whether the catalog holds no layouts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

fn parse_layout(
    entry: MapEntry,
    tiles: &TileCatalog,
    units: &UnitCatalog,
) -> Result<MapLayout, DefinitionError> {
    let MapEntry {
        name,
        width,
        height,
        world_bounds_min,
        world_bounds_max,
        tiles: tile_block,
        units: unit_blocks,
    } = entry;

    if width == 0 || height == 0 {
        return Err(DefinitionError::EmptyGrid {
            map: name,
            width,
            height,
        });
    }

    let mut tile_kinds = Vec::new();
    for row in block_rows(&tile_block).rev() {
        for symbol in row_symbols(row) {
            let Some(kind) = tiles.get_by_symbol(symbol) else {
                return Err(DefinitionError::UnknownTileSymbol { map: name, symbol });
            };
            tile_kinds.push(kind);
        }
    }

    let expected = width as usize * height as usize;
    if tile_kinds.len() != expected {
        return Err(DefinitionError::GridMismatch {
            map: name,
            expected,
            found: tile_kinds.len(),
        });
    }

    let mut layout = MapLayout {
        name,
        width,
        height,
        bounds: WorldBounds {
            min: Vec2::from_array(world_bounds_min),
            max: Vec2::from_array(world_bounds_max),
        },
        tiles: tile_kinds,
        placements: Vec::new(),
    };

    for block in unit_blocks {
        let Some(player) = PlayerId::from_number(block.player) else {
            return Err(DefinitionError::InvalidPlayer {
                map: layout.name,
                player: block.player,
            });
        };

        let rows: Vec<&str> = block_rows(&block.layout).collect();
        let row_count = rows.len();
        for (text_index, row) in rows.into_iter().enumerate().rev() {
            let row_index = (row_count - 1 - text_index) as i32;
            for (column_index, symbol) in row_symbols(row).enumerate() {
                let Some(kind) = units.get_by_symbol(symbol) else {
                    continue;
                };
                let coord = HexCoord::new(column_index as i32, row_index);
                if !layout.contains(coord) {
                    return Err(DefinitionError::PlacementOutOfGrid {
                        map: layout.name,
                        column: coord.column(),
                        row: coord.row(),
                    });
                }
                if layout.placements.iter().any(|placed| placed.coord == coord) {
                    return Err(DefinitionError::OverlappingUnits {
                        map: layout.name,
                        column: coord.column(),
                        row: coord.row(),
                    });
                }
                layout.placements.push(UnitPlacement {
                    player,
                    kind,
                    coord,
                });
            }
        }
    }

    Ok(layout)
}

fn block_rows(block: &str) -> impl DoubleEndedIterator<Item = &str> {
    block.lines().map(str::trim).filter(|row| !row.is_empty())
}

fn row_symbols(row: &str) -> impl Iterator<Item = char> + '_ {
    row.split_whitespace()
        .filter_map(|token| token.chars().next())
}

#[cfg(test)]
mod tests {
    use super::*;

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
        movement_range = 3
        attack_range_min = 1
        attack_range_max = 2
        attack_damage = 10
        defense = 5
        health = 20
    "#;

    fn catalogs() -> (TileCatalog, UnitCatalog) {
        (
            TileCatalog::from_toml_str(TILES).expect("tiles"),
            UnitCatalog::from_toml_str(UNITS).expect("units"),
        )
    }

    #[test]
    fn bottom_text_row_becomes_row_zero() {
        let (tiles, units) = catalogs();
        let maps = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Strip"
            width = 3
            height = 2
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [10.0, 10.0]
            tiles = """
            X . .
            . . X
            """

            [[map.units]]
            player = 2
            layout = """
            . G .
            . . .
            """
            "#,
            &tiles,
            &units,
        )
        .expect("map parses");

        let layout = maps.get("Strip").expect("layout");
        let rock = tiles.get_by_symbol('X').expect("rock");
        assert_eq!(layout.tile(HexCoord::new(2, 0)), Some(rock));
        assert_eq!(layout.tile(HexCoord::new(0, 1)), Some(rock));
        assert_ne!(layout.tile(HexCoord::new(0, 0)), Some(rock));
        assert_eq!(
            layout.placements(),
            &[UnitPlacement {
                player: PlayerId::Two,
                kind: UnitKindId::new(0),
                coord: HexCoord::new(1, 1),
            }]
        );
    }

    #[test]
    fn world_bounds_clip_the_grid() {
        let (tiles, units) = catalogs();
        let maps = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Clipped"
            width = 3
            height = 1
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [0.9, 1.0]
            tiles = ". . ."
            "#,
            &tiles,
            &units,
        )
        .expect("map parses");

        let layout = maps.get("Clipped").expect("layout");
        assert!(layout.is_in_bounds(HexCoord::new(0, 0)));
        assert!(layout.is_in_bounds(HexCoord::new(1, 0)));
        assert!(!layout.is_in_bounds(HexCoord::new(2, 0)));
        assert!(!layout.is_in_bounds(HexCoord::new(-1, 0)));
        assert!(layout.contains(HexCoord::new(2, 0)));
    }

    #[test]
    fn tile_count_must_match_dimensions() {
        let (tiles, units) = catalogs();
        let result = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Short"
            width = 3
            height = 2
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [10.0, 10.0]
            tiles = ". . ."
            "#,
            &tiles,
            &units,
        );

        assert!(matches!(
            result,
            Err(DefinitionError::GridMismatch {
                expected: 6,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn unknown_tile_symbol_is_fatal() {
        let (tiles, units) = catalogs();
        let result = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Odd"
            width = 1
            height = 1
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [10.0, 10.0]
            tiles = "~"
            "#,
            &tiles,
            &units,
        );

        assert!(matches!(
            result,
            Err(DefinitionError::UnknownTileSymbol { symbol: '~', .. })
        ));
    }

    #[test]
    fn overlapping_and_foreign_placements_are_fatal() {
        let (tiles, units) = catalogs();
        let overlapping = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Crowded"
            width = 1
            height = 1
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [10.0, 10.0]
            tiles = "."

            [[map.units]]
            player = 1
            layout = "G"

            [[map.units]]
            player = 2
            layout = "G"
            "#,
            &tiles,
            &units,
        );
        assert!(matches!(
            overlapping,
            Err(DefinitionError::OverlappingUnits { column: 0, row: 0, .. })
        ));

        let foreign = MapCatalog::from_toml_str(
            r#"
            [[map]]
            name = "Foreign"
            width = 1
            height = 1
            world_bounds_min = [0.0, 0.0]
            world_bounds_max = [10.0, 10.0]
            tiles = "."

            [[map.units]]
            player = 3
            layout = "G"
            "#,
            &tiles,
            &units,
        );
        assert!(matches!(
            foreign,
            Err(DefinitionError::InvalidPlayer { player: 3, .. })
        ));
    }
}
