use std::path::PathBuf;

use hex_tactics_core::PlayerId;
use hex_tactics_definitions::{DefinitionError, Definitions, FireMode};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data")
}

#[test]
fn bundled_definitions_load() {
    let definitions = Definitions::load_from_dir(data_dir()).expect("bundled data loads");

    assert_eq!(definitions.units().len(), 5);
    for name in ["Polar", "Octopus", "Hadrian", "Grizzly", "Bison"] {
        assert!(
            definitions.units().get_by_name(name).is_some(),
            "missing unit kind {name}"
        );
    }

    let hadrian = definitions
        .units()
        .get_by_name("Hadrian")
        .and_then(|id| definitions.units().get(id))
        .expect("hadrian");
    assert_eq!(hadrian.fire_mode, FireMode::Indirect);
}

#[test]
fn bundled_placements_are_playable() {
    let definitions = Definitions::load_from_dir(data_dir()).expect("bundled data loads");

    for layout in definitions.maps().iter() {
        for player in PlayerId::ALL {
            assert!(
                layout
                    .placements()
                    .iter()
                    .any(|placement| placement.player == player),
                "{} has no units for {player:?}",
                layout.name()
            );
        }
        for placement in layout.placements() {
            assert!(
                layout.is_in_bounds(placement.coord),
                "{} places a unit outside the playable region",
                layout.name()
            );
            let tile = layout.tile(placement.coord).expect("tile under unit");
            assert!(!definitions.tiles().get(tile).expect("tile kind").blocked);
        }
    }
}

#[test]
fn missing_directory_reports_io_error() {
    let result = Definitions::load_from_dir(data_dir().join("does-not-exist"));
    assert!(matches!(result, Err(DefinitionError::Io { .. })));
}
