#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure presentation system turning world events into renderer directives.

mod color;
mod effects;
mod hud;

use std::collections::BTreeSet;

use glam::Vec3;
use hex_tactics_core::{Event, PlayerId, UnitId, UnitSnapshot};
use hex_tactics_definitions::UnitAssets;
use hex_tactics_world::{query, Game};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use color::Color;
pub use effects::{EffectSpec, Spread};
pub use hud::{affordances, dialog, Affordances, DialogText, PrimaryAction, UnitInfo};

/// Looping sound played while a unit travels.
pub const MOVE_SOUND: &str = "Data/Audio/Move.wav";

/// Upward speed of floating damage numbers in world units per second.
pub const DAMAGE_RISE_SPEED: f32 = 1.0;

/// Seconds a floating damage number stays visible.
pub const DAMAGE_LIFETIME: f32 = 1.0;

/// Instruction for a rendering or audio backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Shows whose turn it is, or hides the indicator when `None`.
    TurnIndicator {
        /// Player that owns the turn.
        player: Option<PlayerId>,
    },
    /// Spawns a particle effect.
    PlayEffect(EffectSpec),
    /// Starts a sound attached to a unit.
    PlaySound {
        /// Sound asset to play.
        sound: String,
        /// Unit emitting the sound.
        unit: UnitId,
        /// Whether the sound repeats until stopped.
        looping: bool,
    },
    /// Stops a looping sound attached to a unit.
    StopSound {
        /// Sound asset to stop.
        sound: String,
        /// Unit emitting the sound.
        unit: UnitId,
    },
    /// Floats a damage number above a unit.
    ShowDamage {
        /// Unit that took the damage.
        unit: UnitId,
        /// Health removed by the hit.
        amount: i32,
        /// Starting position of the text.
        position: Vec3,
        /// Text tint.
        color: Color,
        /// Upward speed in world units per second.
        rise_speed: f32,
        /// Seconds the text stays visible.
        lifetime: f32,
    },
}

/// Presentation system translating events into directives.
#[derive(Debug, Clone)]
pub struct Presentation {
    rng: ChaCha8Rng,
    moving: BTreeSet<UnitId>,
}

impl Presentation {
    /// Creates a presentation system whose random choices follow `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            moving: BTreeSet::new(),
        }
    }

    /// Consumes world events and emits the matching directives.
    pub fn handle(&mut self, events: &[Event], game: &Game, out: &mut Vec<Directive>) {
        for event in events {
            match event {
                Event::MapLoaded { .. } | Event::BoardReset | Event::MatchStarted => {
                    self.stop_all_moves(out);
                    out.push(Directive::TurnIndicator {
                        player: query::turn(game)
                            .filter(|turn| !turn.game_ended)
                            .map(|turn| turn.current_player),
                    });
                }
                Event::TurnStarted { player } => out.push(Directive::TurnIndicator {
                    player: Some(*player),
                }),
                Event::GameEnded { .. } => {
                    self.stop_all_moves(out);
                    out.push(Directive::TurnIndicator { player: None });
                }
                Event::UnitMoved { unit, from, to, .. } if from != to => {
                    if self.moving.insert(*unit) {
                        out.push(Directive::PlaySound {
                            sound: MOVE_SOUND.to_owned(),
                            unit: *unit,
                            looping: true,
                        });
                    }
                }
                Event::UnitArrived { unit, .. } | Event::SelectionCancelled { unit, .. } => {
                    if self.moving.remove(unit) {
                        out.push(stop_move(*unit));
                    }
                }
                Event::UnitAttacked { attacker, .. } => shot(game, *attacker, out),
                Event::UnitDamaged {
                    unit,
                    damage,
                    attacker,
                    ..
                } => hit(game, *unit, *damage, *attacker, out),
                Event::UnitDestroyed { unit, damage, .. } => {
                    let _ = self.moving.remove(unit);
                    self.destroyed(game, *unit, *damage, out);
                }
                _ => {}
            }
        }
    }

    fn stop_all_moves(&mut self, out: &mut Vec<Directive>) {
        out.extend(std::mem::take(&mut self.moving).into_iter().map(stop_move));
    }

    fn destroyed(&mut self, game: &Game, unit: UnitId, damage: i32, out: &mut Vec<Directive>) {
        let Some((snapshot, assets)) = unit_with_assets(game, unit) else {
            tracing::trace!(unit = unit.get(), "no presentation for unknown unit");
            return;
        };
        let spin = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let position = effects::ground(snapshot.world_position);
        for effect in effects::destruction(
            &assets.hit_effect,
            &assets.explosion_effect,
            position,
            spin,
        ) {
            push_effect(effect, out);
        }
        push_sound(&assets.explosion_sound, unit, out);
        out.push(damage_number(unit, damage, position));
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(0)
    }
}

fn stop_move(unit: UnitId) -> Directive {
    Directive::StopSound {
        sound: MOVE_SOUND.to_owned(),
        unit,
    }
}

fn shot(game: &Game, attacker: UnitId, out: &mut Vec<Directive>) {
    let (Some(snapshot), Some(kind)) = (query::unit(game, attacker), query::unit_kind(game, attacker))
    else {
        return;
    };
    let muzzle = effects::muzzle_position(snapshot.world_position, snapshot.yaw_degrees, kind.muzzle());
    push_effect(
        effects::shot(&kind.assets.shot_effect, muzzle, snapshot.yaw_degrees),
        out,
    );
    push_sound(&kind.assets.shot_sound, attacker, out);
}

fn hit(
    game: &Game,
    unit: UnitId,
    damage: i32,
    attacker: Option<UnitId>,
    out: &mut Vec<Directive>,
) {
    let Some((snapshot, assets)) = unit_with_assets(game, unit) else {
        return;
    };
    let target = effects::ground(snapshot.world_position);
    let toward_attacker = attacker
        .and_then(|attacker| query::unit(game, attacker))
        .map_or(Vec3::ZERO, |attacker| {
            (effects::ground(attacker.world_position) - target).normalize_or_zero()
        });
    for effect in effects::impact(
        &assets.hit_effect,
        &assets.explosion_effect,
        target,
        toward_attacker,
    ) {
        push_effect(effect, out);
    }
    push_sound(&assets.hit_sound, unit, out);
    out.push(damage_number(unit, damage, target));
}

fn unit_with_assets(
    game: &Game,
    unit: UnitId,
) -> Option<(UnitSnapshot, &UnitAssets)> {
    let snapshot = query::unit(game, unit)?;
    let kind = query::unit_kind(game, unit)?;
    Some((snapshot, &kind.assets))
}

fn push_effect(effect: EffectSpec, out: &mut Vec<Directive>) {
    if !effect.asset.is_empty() {
        out.push(Directive::PlayEffect(effect));
    }
}

fn push_sound(sound: &str, unit: UnitId, out: &mut Vec<Directive>) {
    if !sound.is_empty() {
        out.push(Directive::PlaySound {
            sound: sound.to_owned(),
            unit,
            looping: false,
        });
    }
}

fn damage_number(unit: UnitId, amount: i32, position: Vec3) -> Directive {
    Directive::ShowDamage {
        unit,
        amount,
        position: position + Vec3::Z,
        color: Color::RED,
        rise_speed: DAMAGE_RISE_SPEED,
        lifetime: DAMAGE_LIFETIME,
    }
}
