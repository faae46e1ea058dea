#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Content catalogs for Hex Tactics.
//!
//! Tile kinds, unit kinds and map layouts are described by three TOML files
//! living in a single data directory. Loading is all-or-nothing: any malformed
//! or inconsistent entry yields a [`DefinitionError`] and no catalog is built.

use std::{
    fs,
    path::{Path, PathBuf},
};

mod maps;
mod tiles;
mod units;

pub use maps::{MapCatalog, MapLayout, UnitPlacement, WorldBounds};
pub use tiles::{TileCatalog, TileKind};
pub use units::{FireMode, UnitAssets, UnitCatalog, UnitKind, UnitStats};

/// File name of the tile catalog inside a data directory.
pub const TILES_FILE: &str = "tiles.toml";
/// File name of the unit catalog inside a data directory.
pub const UNITS_FILE: &str = "units.toml";
/// File name of the map catalog inside a data directory.
pub const MAPS_FILE: &str = "maps.toml";

/// Fatal content errors raised while loading definitions.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// A definition file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A definition file is not valid TOML or does not match the schema.
    #[error("failed to parse {file}: {source}")]
    Parse {
        /// Name of the malformed file.
        file: &'static str,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// Two entries of one catalog share a name.
    #[error("{catalog} catalog defines `{name}` more than once")]
    DuplicateName {
        /// Catalog containing the clash.
        catalog: &'static str,
        /// Repeated name.
        name: String,
    },
    /// Two entries of one catalog share a symbol.
    #[error("{catalog} catalog assigns symbol `{symbol}` more than once")]
    DuplicateSymbol {
        /// Catalog containing the clash.
        catalog: &'static str,
        /// Repeated symbol.
        symbol: char,
    },
    /// A unit kind declares a defense that cannot divide damage.
    #[error("unit `{unit}` has defense {defense}; defense must be at least 1")]
    InvalidDefense {
        /// Offending unit kind.
        unit: String,
        /// Declared defense.
        defense: i32,
    },
    /// A map declares a grid without cells.
    #[error("map `{map}` declares an empty {width}x{height} grid")]
    EmptyGrid {
        /// Offending map.
        map: String,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// A map's tile block uses a symbol missing from the tile catalog.
    #[error("map `{map}` uses unknown tile symbol `{symbol}`")]
    UnknownTileSymbol {
        /// Offending map.
        map: String,
        /// Unknown symbol.
        symbol: char,
    },
    /// A map's tile block does not hold exactly width×height tiles.
    #[error("map `{map}` declares {expected} tiles but its layout holds {found}")]
    GridMismatch {
        /// Offending map.
        map: String,
        /// Tile count implied by the declared dimensions.
        expected: usize,
        /// Tile count found in the layout block.
        found: usize,
    },
    /// A unit block names a player other than 1 or 2.
    #[error("map `{map}` assigns units to player {player}; players are 1 or 2")]
    InvalidPlayer {
        /// Offending map.
        map: String,
        /// Declared player number.
        player: u8,
    },
    /// A unit placement lies outside the declared grid.
    #[error("map `{map}` places a unit at ({column}, {row}) outside its grid")]
    PlacementOutOfGrid {
        /// Offending map.
        map: String,
        /// Placement column.
        column: i32,
        /// Placement row.
        row: i32,
    },
    /// Two unit placements share a cell.
    #[error("map `{map}` places more than one unit at ({column}, {row})")]
    OverlappingUnits {
        /// Offending map.
        map: String,
        /// Shared column.
        column: i32,
        /// Shared row.
        row: i32,
    },
}

/// Every content catalog required to run a match.
#[derive(Clone, Debug)]
pub struct Definitions {
    tiles: TileCatalog,
    units: UnitCatalog,
    maps: MapCatalog,
}

impl Definitions {
    /// Loads the three catalogs from the provided data directory.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let dir = dir.as_ref();
        let tiles = read_source(&dir.join(TILES_FILE))?;
        let units = read_source(&dir.join(UNITS_FILE))?;
        let maps = read_source(&dir.join(MAPS_FILE))?;
        Self::from_toml_strs(&tiles, &units, &maps)
    }

    /// Builds the catalogs from in-memory TOML sources.
    pub fn from_toml_strs(tiles: &str, units: &str, maps: &str) -> Result<Self, DefinitionError> {
        let tiles = TileCatalog::from_toml_str(tiles)?;
        let units = UnitCatalog::from_toml_str(units)?;
        let maps = MapCatalog::from_toml_str(maps, &tiles, &units)?;
        tracing::info!(
            tiles = tiles.len(),
            units = units.len(),
            maps = maps.len(),
            "definitions loaded"
        );
        Ok(Self { tiles, units, maps })
    }

    /// Assembles definitions from already validated catalogs.
    #[must_use]
    pub fn from_catalogs(tiles: TileCatalog, units: UnitCatalog, maps: MapCatalog) -> Self {
        Self { tiles, units, maps }
    }

    /// Tile kinds available to map layouts.
    #[must_use]
    pub fn tiles(&self) -> &TileCatalog {
        &self.tiles
    }

    /// Unit kinds available to map layouts.
    #[must_use]
    pub fn units(&self) -> &UnitCatalog {
        &self.units
    }

    /// Playable map layouts.
    #[must_use]
    pub fn maps(&self) -> &MapCatalog {
        &self.maps
    }
}

fn read_source(path: &Path) -> Result<String, DefinitionError> {
    fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
