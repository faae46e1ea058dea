//! Runtime state of a single unit on the board.

use glam::Vec2;
use hex_tactics_core::{HexCoord, PlayerId, UnitId, UnitKindId, UnitSnapshot};
use hex_tactics_definitions::{FireMode, UnitKind, UnitPlacement, UnitStats};

/// Path segments traversed per second by a move animation.
pub(crate) const ANIMATION_PLAY_RATE: f32 = 3.0;

/// Maximum turning speed of a unit in degrees per second.
pub(crate) const TURN_RATE_DEGREES: f32 = 180.0;

const SETTLED_TOLERANCE_DEGREES: f32 = 1.0;

/// Progress along the waypoints of an in-flight move.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MoveAnimation {
    waypoints: Vec<Vec2>,
    progress: f32,
}

impl MoveAnimation {
    fn along(path: &[HexCoord]) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }
        Some(Self {
            waypoints: path.iter().map(|coord| coord.world_position()).collect(),
            progress: 0.0,
        })
    }

    fn segment_count(&self) -> f32 {
        (self.waypoints.len() - 1) as f32
    }

    fn finished(&self) -> bool {
        self.progress >= self.segment_count()
    }

    fn position(&self) -> Vec2 {
        let clamped = self.progress.clamp(0.0, self.segment_count());
        let segment = (clamped.floor() as usize).min(self.waypoints.len() - 2);
        let local = clamped - segment as f32;
        self.waypoints[segment].lerp(self.waypoints[segment + 1], local)
    }
}

/// A unit placed on the board.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) kind: UnitKindId,
    pub(crate) stats: UnitStats,
    pub(crate) fire_mode: FireMode,
    pub(crate) owner: PlayerId,
    pub(crate) coord: HexCoord,
    pub(crate) previous_coord: HexCoord,
    pub(crate) health: i32,
    pub(crate) selected: bool,
    pub(crate) moved: bool,
    pub(crate) done_for_turn: bool,
    pub(crate) dead: bool,
    pub(crate) last_attacker: Option<UnitId>,
    pub(crate) position: Vec2,
    pub(crate) yaw: f32,
    pub(crate) yaw_before_selection: f32,
    pub(crate) animation: Option<MoveAnimation>,
    pub(crate) rotation_settled: bool,
}

impl Unit {
    pub(crate) fn spawn(id: UnitId, placement: &UnitPlacement, kind: &UnitKind) -> Self {
        let yaw = match placement.player {
            PlayerId::One => 0.0,
            PlayerId::Two => 180.0,
        };
        Self {
            id,
            kind: placement.kind,
            stats: kind.stats,
            fire_mode: kind.fire_mode,
            owner: placement.player,
            coord: placement.coord,
            previous_coord: placement.coord,
            health: kind.stats.health,
            selected: false,
            moved: false,
            done_for_turn: false,
            dead: false,
            last_attacker: None,
            position: placement.coord.world_position(),
            yaw,
            yaw_before_selection: yaw,
            animation: None,
            rotation_settled: true,
        }
    }

    /// Firing eligibility: direct fire always, indirect fire only when the
    /// unit did not relocate.
    pub(crate) fn can_attack(&self) -> bool {
        if self.dead {
            return false;
        }
        match self.fire_mode {
            FireMode::Direct => true,
            FireMode::Indirect => self.coord == self.previous_coord,
            FireMode::Unarmed => false,
        }
    }

    /// Applies a hit of raw strength, returning the health removed.
    ///
    /// Dead units ignore further hits.
    pub(crate) fn take_damage(&mut self, raw: i32) -> Option<i32> {
        if self.dead {
            return None;
        }
        let damage = self.stats.effective_damage(raw);
        self.health -= damage;
        if self.health <= 0 {
            self.dead = true;
            self.selected = false;
            self.animation = None;
        }
        Some(damage)
    }

    pub(crate) fn start_move(&mut self, path: &[HexCoord]) {
        self.animation = MoveAnimation::along(path);
        if self.animation.is_none() {
            self.position = self.coord.world_position();
        }
    }

    pub(crate) fn stop_animation(&mut self) {
        self.animation = None;
        self.position = self.coord.world_position();
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advances the move animation, returning `true` when the unit arrives.
    pub(crate) fn advance_animation(&mut self, seconds: f32) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            self.position = self.coord.world_position();
            return false;
        };

        animation.progress += seconds * ANIMATION_PLAY_RATE;
        let next_position = animation.position();
        let finished = animation.finished();

        let travel = next_position - self.position;
        if travel.length_squared() > f32::EPSILON {
            self.yaw = turned_toward(self.yaw, yaw_of(travel), seconds * TURN_RATE_DEGREES);
        }
        self.position = next_position;

        if finished {
            self.stop_animation();
        }
        finished
    }

    /// Turns toward `goal` by at most `max_delta` degrees when `turning`, then
    /// records whether the facing settled.
    pub(crate) fn rotate_toward(&mut self, goal: f32, max_delta: f32, turning: bool) {
        if turning {
            self.yaw = turned_toward(self.yaw, goal, max_delta);
        }
        self.rotation_settled =
            !turning || angular_displacement(self.yaw, goal).abs() < SETTLED_TOLERANCE_DEGREES;
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            owner: self.owner,
            coord: self.coord,
            previous_coord: self.previous_coord,
            health: self.health,
            selected: self.selected,
            moved: self.moved,
            done_for_turn: self.done_for_turn,
            dead: self.dead,
            can_attack: self.can_attack(),
            animating: self.is_animating(),
            rotation_settled: self.rotation_settled,
            world_position: self.position,
            yaw_degrees: self.yaw,
        }
    }
}

/// Facing in degrees of a planar direction, measured from the +x axis.
pub(crate) fn yaw_of(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x).to_degrees()
}

fn angular_displacement(from: f32, to: f32) -> f32 {
    let mut displacement = (to - from) % 360.0;
    if displacement > 180.0 {
        displacement -= 360.0;
    } else if displacement < -180.0 {
        displacement += 360.0;
    }
    displacement
}

fn turned_toward(current: f32, goal: f32, max_delta: f32) -> f32 {
    let displacement = angular_displacement(current, goal);
    if displacement.abs() <= max_delta {
        goal
    } else {
        current + max_delta.copysign(displacement)
    }
}
