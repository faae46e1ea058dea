//! Tile occupancy and the turn and selection state machine of a loaded map.

use hex_tactics_core::{
    Event, GameOutcome, HexCoord, PlayerId, RejectionReason, TurnSnapshot, UnitId,
};
use hex_tactics_definitions::{MapLayout, TileCatalog, UnitCatalog};

use crate::{
    heat_map::{HeatMap, MAX_COST},
    unit::{yaw_of, Unit, TURN_RATE_DEGREES},
};

type Outcome = Result<(), RejectionReason>;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Tile {
    pub(crate) passable: bool,
    pub(crate) occupant: Option<UnitId>,
}

/// Authoritative state of a single map session.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    pub(crate) layout: MapLayout,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) units: Vec<Unit>,
    pub(crate) selected: Option<UnitId>,
    pub(crate) current_player: PlayerId,
    pub(crate) pending_end_turn: bool,
    pub(crate) game_ended: bool,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) focused: HexCoord,
    pub(crate) heat: HeatMap,
}

impl Board {
    pub(crate) fn new(layout: &MapLayout, tile_kinds: &TileCatalog, unit_kinds: &UnitCatalog) -> Self {
        let tiles = layout
            .tiles()
            .iter()
            .map(|kind| Tile {
                passable: tile_kinds.get(*kind).is_some_and(|kind| !kind.blocked),
                occupant: None,
            })
            .collect();
        let mut board = Self {
            layout: layout.clone(),
            tiles,
            units: Vec::new(),
            selected: None,
            current_player: PlayerId::One,
            pending_end_turn: false,
            game_ended: false,
            outcome: None,
            focused: HexCoord::new(0, 0),
            heat: HeatMap::new(layout.width(), layout.height()),
        };
        board.spawn_units(unit_kinds);
        board
    }

    /// Rebuilds every unit from the layout and hands the turn to player one.
    pub(crate) fn reset(&mut self, unit_kinds: &UnitCatalog) {
        for tile in &mut self.tiles {
            tile.occupant = None;
        }
        self.selected = None;
        self.current_player = PlayerId::One;
        self.pending_end_turn = false;
        self.game_ended = false;
        self.outcome = None;
        self.focused = HexCoord::new(0, 0);
        self.heat.clear();
        self.spawn_units(unit_kinds);
    }

    fn spawn_units(&mut self, unit_kinds: &UnitCatalog) {
        self.units.clear();
        for placement in self.layout.placements() {
            let Some(kind) = unit_kinds.get(placement.kind) else {
                continue;
            };
            let id = UnitId::new(self.units.len() as u32);
            if let Some(index) = self.layout.index(placement.coord) {
                self.tiles[index].occupant = Some(id);
            }
            self.units.push(Unit::spawn(id, placement, kind));
        }
    }

    pub(crate) fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.get() as usize)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.get() as usize)
    }

    pub(crate) fn selected_unit(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.unit(id))
    }

    pub(crate) fn occupant(&self, coord: HexCoord) -> Option<UnitId> {
        self.layout
            .index(coord)
            .and_then(|index| self.tiles.get(index))
            .and_then(|tile| tile.occupant)
    }

    fn set_occupant(&mut self, coord: HexCoord, occupant: Option<UnitId>) {
        if let Some(tile) = self
            .layout
            .index(coord)
            .and_then(|index| self.tiles.get_mut(index))
        {
            tile.occupant = occupant;
        }
    }

    pub(crate) fn is_in_bounds(&self, coord: HexCoord) -> bool {
        self.layout.is_in_bounds(coord)
    }

    pub(crate) fn is_playable(&self, coord: HexCoord) -> bool {
        is_playable(&self.layout, &self.tiles, coord)
    }

    fn recompute_heat(&mut self, source: HexCoord) {
        let Self {
            heat,
            layout,
            tiles,
            ..
        } = self;
        heat.compute(source, |coord| is_playable(layout, tiles, coord), MAX_COST);
    }

    pub(crate) fn path_to(&self, start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
        self.heat
            .shortest_path(start, end, |coord| self.is_playable(coord))
    }

    /// Reports whether the selected, unmoved unit may move to the coordinate.
    pub(crate) fn in_movement_range(&self, coord: HexCoord) -> bool {
        self.selected_unit().is_some_and(|unit| {
            !unit.moved && self.heat.is_in_range(coord, 0, unit.stats.movement_range)
        })
    }

    /// Reports whether the selected unit may fire on the coordinate right now.
    pub(crate) fn can_target(&self, coord: HexCoord) -> bool {
        self.selected_unit().is_some_and(|unit| {
            unit.moved && unit.can_attack() && self.enemy_in_attack_range(unit, coord)
        })
    }

    fn enemy_in_attack_range(&self, attacker: &Unit, coord: HexCoord) -> bool {
        let Some(target) = self.occupant(coord).and_then(|id| self.unit(id)) else {
            return false;
        };
        !target.dead
            && target.owner != attacker.owner
            && self.heat.is_in_range(
                coord,
                attacker.stats.attack_range_min,
                attacker.stats.attack_range_max,
            )
    }

    pub(crate) fn ensure_running(&self) -> Outcome {
        if self.game_ended {
            Err(RejectionReason::GameOver)
        } else {
            Ok(())
        }
    }

    pub(crate) fn set_focus(&mut self, coord: HexCoord, out_events: &mut Vec<Event>) {
        self.focused = coord;
        out_events.push(Event::FocusChanged { coord });
    }

    pub(crate) fn select(&mut self, coord: HexCoord, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        if self.pending_end_turn {
            return Err(RejectionReason::EndTurnPending);
        }
        if self.selected.is_some() {
            return Err(RejectionReason::SelectionActive);
        }
        if !self.is_in_bounds(coord) {
            return Err(RejectionReason::OutOfBounds);
        }
        let id = self.occupant(coord).ok_or(RejectionReason::NoUnit)?;
        let current_player = self.current_player;
        let unit = self
            .unit_mut(id)
            .filter(|unit| !unit.dead)
            .ok_or(RejectionReason::NoUnit)?;
        if unit.owner != current_player {
            return Err(RejectionReason::NotCurrentPlayer);
        }
        if unit.done_for_turn {
            return Err(RejectionReason::UnitDone);
        }

        unit.selected = true;
        unit.yaw_before_selection = unit.yaw;
        unit.rotation_settled = true;
        self.selected = Some(id);
        self.recompute_heat(coord);
        out_events.push(Event::UnitSelected { unit: id, coord });
        Ok(())
    }

    pub(crate) fn move_selected(
        &mut self,
        destination: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> Outcome {
        self.ensure_running()?;
        let unit = self.selected_unit().ok_or(RejectionReason::NoSelection)?;
        let (id, from, movement_range) = (unit.id, unit.coord, unit.stats.movement_range);
        if unit.moved {
            return Err(RejectionReason::AlreadyMoved);
        }
        if !self.is_in_bounds(destination) {
            return Err(RejectionReason::OutOfBounds);
        }
        if !self.heat.is_in_range(destination, 0, movement_range) {
            return Err(RejectionReason::OutOfMovementRange);
        }
        if self
            .occupant(destination)
            .is_some_and(|occupant| occupant != id)
        {
            return Err(RejectionReason::TileOccupied);
        }

        let path = self.path_to(from, destination);
        self.set_occupant(from, None);
        self.set_occupant(destination, Some(id));
        if let Some(unit) = self.unit_mut(id) {
            unit.previous_coord = from;
            unit.coord = destination;
            unit.moved = true;
            unit.start_move(&path);
        }
        self.recompute_heat(destination);
        out_events.push(Event::UnitMoved {
            unit: id,
            from,
            to: destination,
            path,
        });
        Ok(())
    }

    pub(crate) fn stay(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        let coord = self
            .selected_unit()
            .map(|unit| unit.coord)
            .ok_or(RejectionReason::NoSelection)?;
        self.move_selected(coord, out_events)
    }

    pub(crate) fn attack(&mut self, coord: HexCoord, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        let attacker = self.selected_unit().ok_or(RejectionReason::NoSelection)?;
        if !attacker.moved {
            return Err(RejectionReason::NotMoved);
        }
        if !attacker.can_attack() {
            return Err(RejectionReason::CannotFire);
        }
        if !self.is_in_bounds(coord) {
            return Err(RejectionReason::OutOfBounds);
        }
        let target_id = self.occupant(coord).ok_or(RejectionReason::NoUnit)?;
        let target = self
            .unit(target_id)
            .filter(|target| !target.dead)
            .ok_or(RejectionReason::NoUnit)?;
        if target.owner == attacker.owner {
            return Err(RejectionReason::FriendlyTarget);
        }
        if !self.enemy_in_attack_range(attacker, coord) {
            return Err(RejectionReason::OutOfAttackRange);
        }

        let attacker_id = attacker.id;
        let raw_damage = attacker.stats.attack_damage;
        out_events.push(Event::UnitAttacked {
            attacker: attacker_id,
            target: target_id,
        });

        let mut destroyed = false;
        if let Some(target) = self.unit_mut(target_id) {
            target.last_attacker = Some(attacker_id);
            if let Some(damage) = target.take_damage(raw_damage) {
                if target.dead {
                    destroyed = true;
                    out_events.push(Event::UnitDestroyed {
                        unit: target_id,
                        coord,
                        damage,
                        attacker: target.last_attacker,
                    });
                } else {
                    out_events.push(Event::UnitDamaged {
                        unit: target_id,
                        damage,
                        health: target.health,
                        attacker: target.last_attacker,
                    });
                }
            }
        }
        if destroyed {
            tracing::debug!(unit = target_id.get(), "unit destroyed");
            self.set_occupant(coord, None);
        }

        let _ = self.finish_selected();
        Ok(())
    }

    pub(crate) fn hold_fire(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        let unit = self.selected_unit().ok_or(RejectionReason::NoSelection)?;
        if !unit.moved {
            return Err(RejectionReason::NotMoved);
        }
        if let Some(unit) = self.finish_selected() {
            out_events.push(Event::FireHeld { unit });
        }
        Ok(())
    }

    fn finish_selected(&mut self) -> Option<UnitId> {
        let id = self.selected.take()?;
        if let Some(unit) = self.unit_mut(id) {
            unit.selected = false;
            unit.done_for_turn = true;
            unit.rotation_settled = true;
        }
        self.heat.clear();
        Some(id)
    }

    pub(crate) fn cancel(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        let id = self.selected.ok_or(RejectionReason::NoSelection)?;
        self.release_selection(id, out_events);
        Ok(())
    }

    fn release_selection(&mut self, id: UnitId, out_events: &mut Vec<Event>) {
        self.selected = None;
        self.heat.clear();
        let Some((moved, coord, previous)) = self
            .unit(id)
            .map(|unit| (unit.moved, unit.coord, unit.previous_coord))
        else {
            return;
        };

        if moved {
            self.set_occupant(coord, None);
            self.set_occupant(previous, Some(id));
        }
        if let Some(unit) = self.unit_mut(id) {
            if moved {
                unit.coord = previous;
                unit.moved = false;
            }
            unit.stop_animation();
            unit.selected = false;
            unit.yaw = unit.yaw_before_selection;
            unit.rotation_settled = true;
            out_events.push(Event::SelectionCancelled {
                unit: id,
                coord: unit.coord,
            });
        }
    }

    pub(crate) fn end_turn(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        if self.selected.is_some() {
            return Err(RejectionReason::SelectionActive);
        }
        if self.pending_end_turn {
            return Err(RejectionReason::EndTurnPending);
        }
        self.pending_end_turn = true;
        out_events.push(Event::EndTurnRequested {
            player: self.current_player,
        });
        Ok(())
    }

    pub(crate) fn cancel_end_turn(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        if !self.pending_end_turn {
            return Err(RejectionReason::NoPendingEndTurn);
        }
        self.pending_end_turn = false;
        out_events.push(Event::EndTurnDeclined {
            player: self.current_player,
        });
        Ok(())
    }

    pub(crate) fn start_turn(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        self.ensure_running()?;
        if let Some(id) = self.selected {
            self.release_selection(id, out_events);
        }
        self.pending_end_turn = false;
        self.current_player = self.current_player.opponent();
        for unit in &mut self.units {
            unit.selected = false;
            unit.moved = false;
            unit.done_for_turn = false;
        }
        tracing::info!(player = self.current_player.number(), "turn started");
        out_events.push(Event::TurnStarted {
            player: self.current_player,
        });
        Ok(())
    }

    /// Advances move animations and turns the selected unit toward the focus.
    pub(crate) fn advance(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        for unit in &mut self.units {
            if unit.advance_animation(seconds) {
                out_events.push(Event::UnitArrived {
                    unit: unit.id,
                    coord: unit.coord,
                });
            }
        }
        self.rotate_selected(seconds);
    }

    fn rotate_selected(&mut self, seconds: f32) {
        let focused = self.focused;
        let Some(unit) = self.selected_unit() else {
            return;
        };
        if unit.is_animating() {
            return;
        }

        let id = unit.id;
        let max_delta = seconds * TURN_RATE_DEGREES;
        if focused == unit.coord {
            let (goal, turning) = (unit.yaw_before_selection, !unit.moved);
            if let Some(unit) = self.unit_mut(id) {
                unit.rotate_toward(goal, max_delta, turning);
                unit.rotation_settled = true;
            }
            return;
        }

        let goal = yaw_of(focused.world_position() - unit.position);
        let turning = if unit.moved {
            self.enemy_in_attack_range(unit, focused)
        } else {
            self.heat
                .is_in_range(focused, 0, unit.stats.movement_range)
        };
        if let Some(unit) = self.unit_mut(id) {
            unit.rotate_toward(goal, max_delta, turning);
        }
    }

    /// Ends the match once a side has no live units left.
    pub(crate) fn check_victory(&mut self, out_events: &mut Vec<Event>) {
        if self.game_ended {
            return;
        }
        let has_units = |player: PlayerId| {
            self.units
                .iter()
                .any(|unit| unit.owner == player && !unit.dead)
        };
        let outcome = match (has_units(PlayerId::One), has_units(PlayerId::Two)) {
            (true, true) => return,
            (true, false) => GameOutcome::Victory {
                winner: PlayerId::One,
            },
            (false, true) => GameOutcome::Victory {
                winner: PlayerId::Two,
            },
            (false, false) => GameOutcome::Draw,
        };
        self.end_game(outcome, out_events);
    }

    pub(crate) fn end_game(&mut self, outcome: GameOutcome, out_events: &mut Vec<Event>) {
        if self.game_ended {
            return;
        }
        self.game_ended = true;
        self.outcome = Some(outcome);
        tracing::info!(?outcome, "game ended");
        out_events.push(Event::GameEnded { outcome });
    }

    /// Reopens a finished board when a networked match begins.
    pub(crate) fn resume(&mut self) {
        self.game_ended = false;
        self.outcome = None;
    }

    pub(crate) fn turn_snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            current_player: self.current_player,
            pending_end_turn: self.pending_end_turn,
            game_ended: self.game_ended,
            outcome: self.outcome,
            selected: self.selected,
            focused: self.focused,
        }
    }

    /// Reports whether unit coordinates and tile occupants agree.
    pub(crate) fn occupancy_consistent(&self) -> bool {
        let units_agree = self.units.iter().all(|unit| {
            let holders = self
                .tiles
                .iter()
                .filter(|tile| tile.occupant == Some(unit.id))
                .count();
            if unit.dead {
                holders == 0
            } else {
                holders == 1 && self.occupant(unit.coord) == Some(unit.id)
            }
        });
        let tiles_agree = self.tiles.iter().all(|tile| {
            tile.occupant
                .map_or(true, |id| self.unit(id).is_some_and(|unit| !unit.dead))
        });
        units_agree && tiles_agree
    }
}

fn is_playable(layout: &MapLayout, tiles: &[Tile], coord: HexCoord) -> bool {
    layout.is_in_bounds(coord)
        && layout
            .index(coord)
            .and_then(|index| tiles.get(index))
            .is_some_and(|tile| tile.passable)
}
