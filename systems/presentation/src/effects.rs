//! Particle effect descriptors for shots, impacts and destruction.

use glam::{Quat, Vec2, Vec3};

use crate::Color;

/// Inclusive range a renderer samples from for every spawned particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spread<T> {
    /// Lower bound of the range.
    pub min: T,
    /// Upper bound of the range.
    pub max: T,
}

impl<T: Copy> Spread<T> {
    /// Creates a range between two bounds.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Creates a range holding a single value.
    #[must_use]
    pub const fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// Fully resolved particle effect a renderer can spawn as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSpec {
    /// Particle asset to spawn.
    pub asset: String,
    /// World position of the emitter.
    pub position: Vec3,
    /// Emitter facing in degrees.
    pub yaw_degrees: f32,
    /// Particle tint.
    pub color: Color,
    /// Base direction particles travel in.
    pub velocity: Vec3,
    /// Multiplier applied to `velocity` per particle.
    pub speed: Spread<f32>,
    /// Angular velocity in degrees per second.
    pub angular_velocity: f32,
    /// Starting particle size.
    pub size: Spread<f32>,
    /// Size growth per second.
    pub scale_by_time: f32,
    /// Seconds each particle lives.
    pub lifetime: f32,
    /// Number of particles spawned.
    pub count: Spread<u32>,
}

/// Lifts a board position into world space.
pub(crate) fn ground(position: Vec2) -> Vec3 {
    position.extend(0.0)
}

pub(crate) fn muzzle_position(position: Vec2, yaw_degrees: f32, muzzle: Vec3) -> Vec3 {
    ground(position) + Quat::from_rotation_z(yaw_degrees.to_radians()) * muzzle
}

pub(crate) fn shot(asset: &str, position: Vec3, yaw_degrees: f32) -> EffectSpec {
    EffectSpec {
        asset: asset.to_owned(),
        position,
        yaw_degrees,
        color: Color::ORANGE,
        velocity: Vec3::ZERO,
        speed: Spread::fixed(0.0),
        angular_velocity: 0.0,
        size: Spread::new(0.5, 0.7),
        scale_by_time: 0.1,
        lifetime: 0.5,
        count: Spread::fixed(1),
    }
}

/// Sparks and smoke thrown back toward the attacker.
///
/// `toward_attacker` is a unit vector, or zero when the attacker is unknown.
pub(crate) fn impact(
    hit_asset: &str,
    explosion_asset: &str,
    target: Vec3,
    toward_attacker: Vec3,
) -> [EffectSpec; 2] {
    let position = target + toward_attacker * 0.2;
    [
        EffectSpec {
            asset: hit_asset.to_owned(),
            position,
            yaw_degrees: 0.0,
            color: Color::EMBER,
            velocity: -toward_attacker,
            speed: Spread::new(0.1, 0.5),
            angular_velocity: 10.0,
            size: Spread::new(0.8, 1.2),
            scale_by_time: 0.2,
            lifetime: 0.8,
            count: Spread::new(3, 4),
        },
        EffectSpec {
            asset: explosion_asset.to_owned(),
            position,
            yaw_degrees: 0.0,
            color: Color::DARKER_GRAY,
            velocity: Vec3::ZERO,
            speed: Spread::fixed(0.0),
            angular_velocity: 0.0,
            size: Spread::new(0.6, 0.8),
            scale_by_time: 2.5,
            lifetime: 0.8,
            count: Spread::new(1, 2),
        },
    ]
}

/// Debris and a smoke plume; `spin` is `1.0` or `-1.0`.
pub(crate) fn destruction(
    hit_asset: &str,
    explosion_asset: &str,
    position: Vec3,
    spin: f32,
) -> [EffectSpec; 2] {
    [
        EffectSpec {
            asset: hit_asset.to_owned(),
            position,
            yaw_degrees: 0.0,
            color: Color::EMBER,
            velocity: Vec3::Z,
            speed: Spread::new(-0.05, 0.05),
            angular_velocity: 5.0 * spin,
            size: Spread::new(0.7, 0.8),
            scale_by_time: 0.4,
            lifetime: 0.8,
            count: Spread::new(2, 3),
        },
        EffectSpec {
            asset: explosion_asset.to_owned(),
            position,
            yaw_degrees: 0.0,
            color: Color::DARK_GRAY,
            velocity: Vec3::Z,
            speed: Spread::new(-0.2, 0.2),
            angular_velocity: 30.0 * spin,
            size: Spread::new(1.4, 1.7),
            scale_by_time: 0.7,
            lifetime: 1.2,
            count: Spread::new(4, 7),
        },
    ]
}
